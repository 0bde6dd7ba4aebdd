//! # Adapters
//!
//! Concrete implementations of the driven ports.
//!
//! - `interfaces` - static interface registry
//! - `memo` - in-memory client request engine
//! - `random` - thread-local random source for retransmission jitter
//! - `network` - clock, configuration and UDP transport (socket and TOML
//!   support behind the `network` feature)

pub mod interfaces;
pub mod memo;
pub mod network;
pub mod random;

pub use interfaces::StaticInterfaceRegistry;
pub use memo::MemoRequestEngine;
pub use network::{StaticConfigProvider, SystemTimeSource};
pub use random::ThreadRandomSource;

#[cfg(feature = "network")]
pub use network::{ConfigError, TomlConfigProvider, UdpTransport};
