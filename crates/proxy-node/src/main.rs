//! # CoAP Forward Proxy Node
//!
//! ## Startup Sequence
//!
//! 1. Parse arguments and initialize logging
//! 2. Load configuration (file, then flag overrides)
//! 3. Bind the UDP socket and wire the proxy
//! 4. Serve until Ctrl+C

use anyhow::Result;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use proxy_node::{Args, ProxyNode};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // RUST_LOG wins over --log-level
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&args.log_level))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    let config = args.node_config()?;
    info!(
        bind = %config.bind_addr,
        interfaces = config.interfaces.len(),
        waiter_timeout_secs = config.proxy.waiter_timeout_secs,
        "starting proxy node"
    );

    let node = ProxyNode::bind(&config).await?;
    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "failed to listen for Ctrl+C");
        }
        info!("shutdown requested");
    };

    node.run(shutdown).await
}
