use std::net::{Ipv6Addr, SocketAddr, SocketAddrV6};

use crate::domain::{InterfaceId, ProxyConfig, COAP_DEFAULT_PORT};
use crate::ports::ConfigProvider;

/// `[::]:5683`
pub fn default_bind_addr() -> SocketAddr {
    SocketAddr::V6(SocketAddrV6::new(Ipv6Addr::UNSPECIFIED, COAP_DEFAULT_PORT, 0, 0))
}

// ============================================================================
// StaticConfigProvider - Hardcoded config for testing/development
// ============================================================================

/// Static configuration provider with hardcoded values.
///
/// Useful for testing and development. For production, use `TomlConfigProvider`.
#[derive(Debug, Clone)]
pub struct StaticConfigProvider {
    bind_addr: SocketAddr,
    config: ProxyConfig,
    interfaces: Vec<InterfaceId>,
}

impl StaticConfigProvider {
    /// Default config, `[::]:5683`, no interfaces.
    #[must_use]
    pub fn new() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            config: ProxyConfig::default(),
            interfaces: Vec::new(),
        }
    }

    /// Set the socket address to bind.
    #[must_use]
    pub fn with_bind_addr(mut self, addr: SocketAddr) -> Self {
        self.bind_addr = addr;
        self
    }

    /// Set the proxy config.
    #[must_use]
    pub fn with_config(mut self, config: ProxyConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the interface list.
    #[must_use]
    pub fn with_interfaces(mut self, interfaces: Vec<InterfaceId>) -> Self {
        self.interfaces = interfaces;
        self
    }
}

impl Default for StaticConfigProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigProvider for StaticConfigProvider {
    fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }

    fn proxy_config(&self) -> ProxyConfig {
        self.config.clone()
    }

    fn interfaces(&self) -> Vec<InterfaceId> {
        self.interfaces.clone()
    }
}

// ============================================================================
// TomlConfigProvider - Production Config Loading (requires "network" feature)
// ============================================================================

#[cfg(feature = "network")]
mod toml_config {
    use super::*;
    use serde::Deserialize;
    use std::fs;
    use std::path::Path;
    use thiserror::Error;

    /// Configuration file structure.
    #[derive(Debug, Deserialize)]
    #[serde(deny_unknown_fields)]
    struct ConfigFile {
        bind_addr: Option<String>,
        #[serde(default)]
        interfaces: Vec<u16>,
        #[serde(default)]
        proxy: ProxyConfigFile,
    }

    #[derive(Debug, Deserialize, Default)]
    #[serde(deny_unknown_fields)]
    struct ProxyConfigFile {
        waiter_timeout_secs: Option<u64>,
        memo_lifetime_secs: Option<u64>,
        sweep_interval_secs: Option<u64>,
    }

    /// TOML-based configuration provider.
    ///
    /// # Config File Format
    ///
    /// ```toml
    /// bind_addr = "[::]:5683"
    /// interfaces = [1, 2]
    ///
    /// [proxy]
    /// waiter_timeout_secs = 93
    /// memo_lifetime_secs = 93
    /// sweep_interval_secs = 1
    /// ```
    ///
    /// Every key is optional; missing keys take the `ProxyConfig` defaults.
    #[derive(Debug, Clone)]
    pub struct TomlConfigProvider {
        bind_addr: SocketAddr,
        config: ProxyConfig,
        interfaces: Vec<InterfaceId>,
    }

    impl TomlConfigProvider {
        /// Load configuration from a TOML file.
        ///
        /// # Errors
        ///
        /// Returns error if file cannot be read, parsed or validated.
        pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
            let content = fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Io {
                path: path.as_ref().display().to_string(),
                error: e.to_string(),
            })?;

            Self::parse(&content)
        }

        /// Parse configuration from a TOML string.
        pub fn parse(content: &str) -> Result<Self, ConfigError> {
            let file: ConfigFile =
                toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;

            let bind_addr = match file.bind_addr {
                Some(addr) => addr
                    .parse()
                    .map_err(|_| ConfigError::InvalidBindAddr(addr))?,
                None => default_bind_addr(),
            };

            let defaults = ProxyConfig::default();
            let pc = file.proxy;
            let config = ProxyConfig {
                waiter_timeout_secs: pc.waiter_timeout_secs.unwrap_or(defaults.waiter_timeout_secs),
                memo_lifetime_secs: pc.memo_lifetime_secs.unwrap_or(defaults.memo_lifetime_secs),
                sweep_interval_secs: pc.sweep_interval_secs.unwrap_or(defaults.sweep_interval_secs),
            };

            for (name, value) in [
                ("waiter_timeout_secs", config.waiter_timeout_secs),
                ("memo_lifetime_secs", config.memo_lifetime_secs),
                ("sweep_interval_secs", config.sweep_interval_secs),
            ] {
                if value == 0 {
                    return Err(ConfigError::ZeroDuration(name));
                }
            }

            Ok(Self {
                bind_addr,
                config,
                interfaces: file.interfaces.into_iter().map(InterfaceId::new).collect(),
            })
        }
    }

    impl ConfigProvider for TomlConfigProvider {
        fn bind_addr(&self) -> SocketAddr {
            self.bind_addr
        }

        fn proxy_config(&self) -> ProxyConfig {
            self.config.clone()
        }

        fn interfaces(&self) -> Vec<InterfaceId> {
            self.interfaces.clone()
        }
    }

    /// Errors that can occur during config loading.
    #[derive(Debug, Clone, PartialEq, Eq, Error)]
    pub enum ConfigError {
        /// File I/O error.
        #[error("failed to read {path}: {error}")]
        Io {
            /// Path of the file that failed to load.
            path: String,
            /// Error message from the I/O operation.
            error: String,
        },
        /// TOML parsing error.
        #[error("failed to parse config: {0}")]
        Parse(String),
        /// `bind_addr` is not a socket address.
        #[error("invalid bind_addr {0:?}")]
        InvalidBindAddr(String),
        /// A duration that must be positive is zero.
        #[error("{0} must be greater than zero")]
        ZeroDuration(&'static str),
    }
}

#[cfg(feature = "network")]
pub use toml_config::{ConfigError, TomlConfigProvider};
