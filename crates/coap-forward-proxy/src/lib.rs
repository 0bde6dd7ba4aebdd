//! # CoAP Forward Proxy
//!
//! Correlation engine of a CoAP (RFC 7252) forward proxy for constrained
//! nodes. A client asks the proxy to fetch a resource by putting the
//! absolute target URI in a `Proxy-Uri` option; the proxy rewrites the
//! request into `Uri-Path`/`Uri-Query` form, sends it to the origin server
//! and relays the origin's response back to the client unmodified.
//!
//! ## Bounded by construction
//!
//! - At most `K` requests are proxied at once (`WaiterPool<K>`, a
//!   compile-time bound). Further requests are answered with 5.00.
//! - Outgoing requests are assembled in a fixed scratch buffer; proxying a
//!   request does not allocate.
//! - A request whose token and destination match an outstanding one is
//!   dropped without a reply.
//!
//! ## Architecture
//!
//! The crate follows Hexagonal Architecture with:
//! - **Domain Layer:** CoAP codec, URI lexer, endpoint parser, waiter
//!   arena, option translator
//! - **Ports Layer:** `ForwardProxyApi` (driving) and `RequestEngine`,
//!   `Transport`, `InterfaceRegistry`, `TimeSource`, `ConfigProvider`
//!   (driven)
//! - **Service Layer:** `ForwardProxy`
//! - **Adapters Layer:** in-memory request engine, static registries, UDP
//!   and TOML adapters (feature `network`)
//!
//! ## Example
//!
//! ```rust
//! use coap_forward_proxy::{
//!     Code, Endpoint, ForwardProxy, ForwardProxyApi, InterfaceId, MemoRequestEngine,
//!     MessageType, OptionNumber, PduWriter, ProxyConfig, StaticInterfaceRegistry,
//!     SystemTimeSource, Transport, TransportError,
//! };
//!
//! #[derive(Clone)]
//! struct Discard;
//!
//! impl Transport for Discard {
//!     fn send_to(&self, _bytes: &[u8], _remote: &Endpoint) -> Result<(), TransportError> {
//!         Ok(())
//!     }
//! }
//!
//! let engine: MemoRequestEngine<Discard> =
//!     MemoRequestEngine::new(Discard, Box::new(SystemTimeSource::new()), 93);
//! let mut proxy: ForwardProxy<_, _> = ForwardProxy::new(
//!     engine,
//!     Discard,
//!     Box::new(StaticInterfaceRegistry::new([InterfaceId::new(1)])),
//!     Box::new(SystemTimeSource::new()),
//!     ProxyConfig::default(),
//! );
//!
//! let mut request = [0u8; 64];
//! let mut writer =
//!     PduWriter::new(&mut request, MessageType::Confirmable, Code::GET, 7, &[0x2a]).unwrap();
//! writer
//!     .option(OptionNumber::PROXY_URI, b"coap://[2001:db8::1]:5683/temp")
//!     .unwrap();
//! let len = writer.finish(&[]).unwrap();
//!
//! let client = Endpoint::new("2001:db8::99".parse().unwrap(), 40000);
//! let mut reply = [0u8; 16];
//! let reply_len = proxy
//!     .handle_request(&request[..len], client, &mut reply)
//!     .unwrap();
//!
//! // Forwarded: nothing to send back yet, one waiter held.
//! assert_eq!(reply_len, 0);
//! assert_eq!(proxy.stats().in_use, 1);
//! ```

// =============================================================================
// CORE MODULES
// =============================================================================

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

/// Test utilities (ControllableTimeSource, RecordingTransport, etc.)
/// Requires feature: `test-utils`
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

// =============================================================================
// CORE RE-EXPORTS (Always Available)
// =============================================================================

// Domain
pub use domain::{
    is_link_local, parse_endpoint, translate_request, write_error_response, Code, CoapOption,
    EngineError, Endpoint, EndpointError, InterfaceId, InvalidProxyUri, MessageType, OptionNumber,
    ParsedUri, Pdu, PduError, PduWriter, PoolStats, ProxyConfig, ProxyError, RelayError, Timestamp,
    TransportError, UriError, Waiter, WaiterHandle, WaiterPool, ACK_TIMEOUT_SECS, MAX_RETRANSMIT,
    MAX_TRANSMIT_WAIT_SECS, MEMO_CAPACITY, REQUEST_BUF_SIZE, WAITER_POOL_CAPACITY,
};

// Port traits
pub use ports::{
    ConfigProvider, ForwardProxyApi, InterfaceRegistry, ProxyOutcome, ProxyStats, RandomSource,
    RequestEngine, TimeSource, Transport,
};

// Service
pub use service::ForwardProxy;

// Adapters
pub use adapters::{
    MemoRequestEngine, StaticConfigProvider, StaticInterfaceRegistry, SystemTimeSource,
    ThreadRandomSource,
};

#[cfg(feature = "network")]
pub use adapters::{ConfigError, TomlConfigProvider, UdpTransport};

// =============================================================================
// TEST UTILITIES (Requires `test-utils` feature)
// =============================================================================

#[cfg(feature = "test-utils")]
pub use test_utils::{
    ControllableTimeSource, FixedRandomSource, FixedTimeSource, RecordingTransport, SentDatagram,
};
