//! # Driven Ports (Outbound SPI)
//!
//! These are the interfaces the proxy **requires** the host application to
//! implement.

use std::net::SocketAddr;

use crate::domain::{
    EngineError, Endpoint, InterfaceId, Pdu, ProxyConfig, Timestamp, TransportError, WaiterHandle,
};

/// Client-side CoAP request engine.
///
/// Owns retransmission and response matching for outgoing requests. The
/// dedup gate drops client retransmissions while a request is in flight, so
/// an engine must retransmit confirmable requests itself. The
/// proxy only needs to know whether an equivalent request is already
/// outstanding, to hand over a new one together with its waiter, and to
/// withdraw one whose waiter timed out.
pub trait RequestEngine: Send {
    /// `true` if a request with the same token is outstanding towards
    /// `remote`.
    fn has_in_flight(&self, request: &Pdu<'_>, remote: &Endpoint) -> bool;

    /// Send `request` to `remote` and remember `context` for the response.
    ///
    /// On `Ok`, the engine eventually reports the response (or nothing, if
    /// the origin never answers) together with `context`.
    fn send(
        &mut self,
        request: &[u8],
        remote: Endpoint,
        context: WaiterHandle,
    ) -> Result<(), EngineError>;

    /// Forget the request carrying `context`, if any.
    fn cancel(&mut self, context: WaiterHandle);
}

/// Abstract interface for datagram I/O.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`; the UDP adapter is shared between
/// the proxy and the request engine.
pub trait Transport: Send + Sync {
    /// Send one datagram. Must not block.
    fn send_to(&self, bytes: &[u8], remote: &Endpoint) -> Result<(), TransportError>;
}

/// Network interfaces known to the node.
pub trait InterfaceRegistry: Send + Sync {
    /// Number of interfaces.
    fn count(&self) -> usize;

    /// `true` if an interface with this id exists.
    fn contains(&self, id: InterfaceId) -> bool;

    /// The only interface, when exactly one exists.
    fn sole(&self) -> Option<InterfaceId>;
}

/// Abstract interface for time-related operations.
///
/// Enables deterministic testing by injecting controllable time sources.
pub trait TimeSource: Send + Sync {
    /// Get the current timestamp.
    fn now(&self) -> Timestamp;
}

/// Source of randomness for retransmission jitter.
pub trait RandomSource: Send + Sync {
    /// Uniform value in `0..bound`; `0` when `bound` is zero.
    fn random_below(&self, bound: u64) -> u64;
}

/// Abstract interface for configuration loading.
pub trait ConfigProvider: Send + Sync {
    /// Local address the proxy socket binds to.
    fn bind_addr(&self) -> SocketAddr;

    /// Timeouts and sweep interval.
    fn proxy_config(&self) -> ProxyConfig;

    /// Interfaces available for scoping link-local destinations.
    fn interfaces(&self) -> Vec<InterfaceId>;
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Test-only TimeSource returning a fixed timestamp for deterministic assertions.
    struct FixedTimeSource(u64);

    impl TimeSource for FixedTimeSource {
        fn now(&self) -> Timestamp {
            Timestamp::new(self.0)
        }
    }

    #[test]
    fn test_fixed_time_source_returns_configured_value() {
        let source = FixedTimeSource(1000);
        assert_eq!(source.now().as_secs(), 1000);
    }

    #[test]
    fn test_transport_error_display() {
        assert_eq!(TransportError::WouldBlock.to_string(), "socket would block");
        assert_eq!(
            TransportError::Unreachable("[::1]:1".into()).to_string(),
            "destination [::1]:1 unreachable"
        );
    }
}
