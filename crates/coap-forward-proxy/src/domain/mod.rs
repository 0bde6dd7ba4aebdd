//! Domain Layer - Pure proxy logic with no I/O
//!
//! This module contains:
//! - CoAP message parsing and heap-free writing (`pdu`)
//! - A borrowed RFC 3986 URI lexer (`uri`)
//! - Transport endpoints and the `Proxy-Uri` authority parser (`endpoint`)
//! - The fixed-capacity waiter arena (`waiter_pool`)
//! - Proxy-Uri to Uri-Path/Uri-Query option translation (`translator`)

pub mod endpoint;
pub mod pdu;
pub mod translator;
/// Core domain types (entities, values, errors)
pub mod types;
pub mod uri;
pub mod waiter_pool;

pub use endpoint::{is_link_local, parse_endpoint, Endpoint, EndpointError};
pub use pdu::{
    write_error_response, Code, CoapOption, MessageType, OptionNumber, Pdu, PduError, PduWriter,
    MAX_TOKEN_LEN,
};
pub use translator::translate_request;
pub use types::*;
pub use uri::{ParsedUri, UriError};
pub use waiter_pool::{PoolStats, Waiter, WaiterHandle, WaiterPool};
