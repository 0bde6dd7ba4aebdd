//! Domain Errors for the Forward Proxy
//!
//! Every request-level failure maps onto exactly one CoAP response code; see
//! [`ProxyError::response_code`].

use thiserror::Error;

use crate::domain::endpoint::EndpointError;
use crate::domain::pdu::{Code, PduError};
use crate::domain::uri::UriError;

/// Errors that stop a proxy request from being forwarded.
///
/// None of these are system errors: the dispatcher answers the client with
/// an error response and carries on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProxyError {
    /// Every waiter slot is in use.
    #[error("waiter pool exhausted ({capacity} slots in use)")]
    OutOfResources {
        /// Compile-time pool capacity.
        capacity: usize,
    },
    /// The `Proxy-Uri` is relative, unparsable or names an unusable origin.
    #[error("invalid Proxy-Uri: {0}")]
    InvalidProxyUri(#[from] InvalidProxyUri),
    /// The `Proxy-Uri` scheme is not `coap`.
    #[error("unsupported Proxy-Uri scheme")]
    UnsupportedScheme,
    /// The translated request does not fit or could not be encoded.
    #[error("request translation failed: {0}")]
    Translation(#[from] PduError),
    /// The request engine refused the translated request.
    #[error("request dispatch failed: {0}")]
    Dispatch(#[from] EngineError),
}

impl ProxyError {
    /// CoAP response code sent back to the client.
    pub fn response_code(&self) -> Code {
        match self {
            Self::OutOfResources { .. } | Self::Dispatch(_) => Code::INTERNAL_SERVER_ERROR,
            // Valid request whose translation outgrew the request buffer
            Self::Translation(PduError::BufferTooSmall { .. }) => Code::REQUEST_ENTITY_TOO_LARGE,
            Self::InvalidProxyUri(_) | Self::Translation(_) => Code::BAD_OPTION,
            Self::UnsupportedScheme => Code::PROXYING_NOT_SUPPORTED,
        }
    }
}

/// Reasons a `Proxy-Uri` value is rejected with 4.02.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidProxyUri {
    /// Option value is not UTF-8.
    #[error("value is not UTF-8")]
    NotUtf8,
    /// URI lexer failure (empty, malformed, relative).
    #[error(transparent)]
    Uri(#[from] UriError),
    /// Authority does not denote a usable origin endpoint.
    #[error(transparent)]
    Endpoint(#[from] EndpointError),
}

impl From<UriError> for ProxyError {
    fn from(err: UriError) -> Self {
        Self::InvalidProxyUri(err.into())
    }
}

impl From<EndpointError> for ProxyError {
    fn from(err: EndpointError) -> Self {
        Self::InvalidProxyUri(err.into())
    }
}

/// Request engine failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// No memo slot left for another outstanding request.
    #[error("request engine is full ({capacity} outstanding requests)")]
    Full {
        /// Maximum number of outstanding requests.
        capacity: usize,
    },
    /// Request bytes are not a valid CoAP message.
    #[error("malformed request: {0}")]
    Malformed(#[from] PduError),
    /// The underlying transport failed.
    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Datagram transport failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// Socket buffer full; the datagram was not sent.
    #[error("socket would block")]
    WouldBlock,
    /// Destination cannot be reached from this socket (e.g. address family).
    #[error("destination {0} unreachable")]
    Unreachable(String),
    /// Any other I/O failure.
    #[error("transport I/O error: {0}")]
    Io(String),
}

/// Failures while relaying an origin response.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RelayError {
    /// Handle refers to a freed or reused waiter.
    #[error("stale waiter handle")]
    StaleHandle,
    /// The response could not be sent to the client (the waiter is freed).
    #[error(transparent)]
    Transport(#[from] TransportError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_code_mapping() {
        assert_eq!(
            ProxyError::OutOfResources { capacity: 2 }.response_code(),
            Code::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ProxyError::from(UriError::Relative).response_code(),
            Code::BAD_OPTION
        );
        assert_eq!(
            ProxyError::from(EndpointError::InvalidPort).response_code(),
            Code::BAD_OPTION
        );
        assert_eq!(
            ProxyError::UnsupportedScheme.response_code(),
            Code::PROXYING_NOT_SUPPORTED
        );
        assert_eq!(
            ProxyError::from(PduError::Truncated).response_code(),
            Code::BAD_OPTION
        );
        assert_eq!(
            ProxyError::from(EngineError::Full { capacity: 8 }).response_code(),
            Code::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_oversized_translation_maps_to_entity_too_large() {
        let err = ProxyError::from(PduError::BufferTooSmall {
            needed: 170,
            available: 128,
        });
        assert_eq!(err.response_code(), Code::REQUEST_ENTITY_TOO_LARGE);
        assert_eq!(err.response_code().to_string(), "4.13");
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            ProxyError::OutOfResources { capacity: 2 }.to_string(),
            "waiter pool exhausted (2 slots in use)"
        );
        assert_eq!(
            ProxyError::from(UriError::Relative).to_string(),
            "invalid Proxy-Uri: URI is relative"
        );
        assert_eq!(
            RelayError::StaleHandle.to_string(),
            "stale waiter handle"
        );
    }
}
