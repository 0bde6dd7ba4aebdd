//! Command line arguments and configuration resolution.
//!
//! Precedence: command line flags, then the TOML file given with
//! `--config`, then built-in defaults.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use coap_forward_proxy::{
    ConfigProvider, InterfaceId, ProxyConfig, StaticConfigProvider, TomlConfigProvider,
};

/// CoAP forward proxy node
#[derive(Parser, Debug, Clone)]
#[command(name = "proxy-node")]
#[command(about = "Forwards CoAP requests carrying a Proxy-Uri to their origin server")]
pub struct Args {
    /// TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Socket address to bind (overrides the config file)
    #[arg(short, long)]
    pub bind: Option<SocketAddr>,

    /// Network interface id usable as an IPv6 zone; repeat for several
    /// (overrides the config file)
    #[arg(short, long = "interface")]
    pub interfaces: Vec<u16>,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

/// Everything the node needs to start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeConfig {
    pub bind_addr: SocketAddr,
    pub proxy: ProxyConfig,
    pub interfaces: Vec<InterfaceId>,
}

impl NodeConfig {
    /// Snapshot a config provider.
    pub fn from_provider(provider: &dyn ConfigProvider) -> Self {
        Self {
            bind_addr: provider.bind_addr(),
            proxy: provider.proxy_config(),
            interfaces: provider.interfaces(),
        }
    }
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self::from_provider(&StaticConfigProvider::new())
    }
}

impl Args {
    /// Resolve the node configuration from the file and flag overrides.
    pub fn node_config(&self) -> Result<NodeConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let provider = TomlConfigProvider::load(path)
                    .with_context(|| format!("loading config from {}", path.display()))?;
                NodeConfig::from_provider(&provider)
            }
            None => NodeConfig::default(),
        };

        if let Some(bind) = self.bind {
            config.bind_addr = bind;
        }
        if !self.interfaces.is_empty() {
            config.interfaces = self.interfaces.iter().copied().map(InterfaceId::new).collect();
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("proxy-node").chain(args.iter().copied()))
            .unwrap()
    }

    #[test]
    fn test_defaults_without_arguments() {
        let args = parse(&[]);
        assert_eq!(args.log_level, "info");

        let config = args.node_config().unwrap();
        assert_eq!(config.bind_addr, "[::]:5683".parse().unwrap());
        assert_eq!(config.proxy, ProxyConfig::default());
        assert!(config.interfaces.is_empty());
    }

    #[test]
    fn test_flags_override_defaults() {
        let args = parse(&["--bind", "127.0.0.1:6000", "-i", "3", "-i", "4"]);
        let config = args.node_config().unwrap();

        assert_eq!(config.bind_addr, "127.0.0.1:6000".parse().unwrap());
        assert_eq!(config.interfaces, vec![InterfaceId::new(3), InterfaceId::new(4)]);
    }

    #[test]
    fn test_flags_override_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "bind_addr = \"[::1]:7000\"\ninterfaces = [1]\n\n[proxy]\nwaiter_timeout_secs = 10"
        )
        .unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let from_file = parse(&["--config", &path]).node_config().unwrap();
        assert_eq!(from_file.bind_addr, "[::1]:7000".parse().unwrap());
        assert_eq!(from_file.interfaces, vec![InterfaceId::new(1)]);
        assert_eq!(from_file.proxy.waiter_timeout_secs, 10);

        let overridden = parse(&["--config", &path, "--bind", "[::1]:7001"])
            .node_config()
            .unwrap();
        assert_eq!(overridden.bind_addr, "[::1]:7001".parse().unwrap());
        assert_eq!(overridden.proxy.waiter_timeout_secs, 10);
    }

    #[test]
    fn test_missing_config_file_is_error() {
        let args = parse(&["--config", "/nonexistent/proxy.toml"]);
        let err = args.node_config().unwrap_err();
        assert!(format!("{err:#}").contains("/nonexistent/proxy.toml"));
    }

    #[test]
    fn test_invalid_bind_flag_rejected() {
        let result = Args::try_parse_from(["proxy-node", "--bind", "not-an-address"]);
        assert!(result.is_err());
    }
}
