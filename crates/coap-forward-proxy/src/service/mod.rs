//! # Forward Proxy Service
//!
//! Wires the domain (waiter pool, URI lexer, endpoint parser, option
//! translator) to the driven ports and implements `ForwardProxyApi`.
//!
//! ## Request path
//!
//! ```text
//! handle_request ─► process ─► Proxy-Uri? ─► lex ─► scheme ─► endpoint
//!                                   │                            │
//!                                   ▼                            ▼
//!                           NotProxyRequest           dedup gate ─► Duplicate
//!                                                                │
//!                                   allocate waiter ◄────────────┘
//!                                          │
//!                                   translate ─► RequestEngine::send
//! ```
//!
//! ## Response path
//!
//! The host delivers `(WaiterHandle, response bytes)` to `relay_response`,
//! which sends the bytes unmodified to the waiter's client and frees it.

mod api;
mod core;
mod dispatcher;
mod maintenance;
mod relay;

pub use self::core::ForwardProxy;
