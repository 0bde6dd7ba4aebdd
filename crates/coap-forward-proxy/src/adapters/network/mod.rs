//! # Network Adapters
//!
//! Production adapters for running the proxy on a real node.
//!
//! ## Adapters Provided
//!
//! - `SystemTimeSource` - Production time source using system clock
//! - `StaticConfigProvider` - Hardcoded configuration
//! - `UdpTransport` - Shared tokio UDP socket (requires "network" feature)
//! - `TomlConfigProvider` - Config file loading (requires "network" feature)
//!
//! ## Feature Flags
//!
//! - `network` - Enables async UDP networking and config file parsing

// Semantic submodules
/// Configuration providers
pub mod config;
/// Time source adapters
pub mod time;
/// Transport adapters
#[cfg(feature = "network")]
pub mod transport;

// Re-export public API
pub use config::StaticConfigProvider;
pub use time::SystemTimeSource;

#[cfg(feature = "network")]
pub use config::{ConfigError, TomlConfigProvider};

#[cfg(feature = "network")]
pub use transport::UdpTransport;

#[cfg(test)]
mod tests;
