//! # Proxy Node
//!
//! Runs the CoAP forward proxy on a UDP socket. The `proxy-node` binary is
//! a thin wrapper around [`ProxyNode`]; the library half exists so the
//! event loop can be driven from tests.
//!
//! - `cli/` - Command line arguments and configuration resolution
//! - `runtime/` - Socket event loop and datagram routing

pub mod cli;
pub mod runtime;

pub use cli::{Args, NodeConfig};
pub use runtime::{NodeProxy, ProxyNode, MAX_DATAGRAM_LEN};
