//! # Ports Layer - Hexagonal Architecture Boundaries
//!
//! - **Driving Ports (Inbound):** what the host node calls on the proxy
//! - **Driven Ports (Outbound):** what the proxy needs from the host
//!   (request engine, datagram transport, interfaces, clock, randomness,
//!   configuration)

pub mod inbound;
pub mod outbound;

pub use inbound::{ForwardProxyApi, ProxyOutcome, ProxyStats};
pub use outbound::{
    ConfigProvider, InterfaceRegistry, RandomSource, RequestEngine, TimeSource, Transport,
};
