//! Fixed CoAP header fields: version, type, token length, code, message id.

use std::fmt;

/// Protocol version carried in every message (RFC 7252 Section 3).
pub const COAP_VERSION: u8 = 1;

/// Length of the fixed header in bytes.
pub const HEADER_LEN: usize = 4;

/// Largest token length allowed by RFC 7252.
pub const MAX_TOKEN_LEN: usize = 8;

/// Message type (2-bit `T` field).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MessageType {
    /// Confirmable: retransmitted until acknowledged.
    Confirmable = 0,
    /// Non-confirmable.
    NonConfirmable = 1,
    /// Acknowledgement, possibly carrying a piggybacked response.
    Acknowledgement = 2,
    /// Reset.
    Reset = 3,
}

impl MessageType {
    /// Decode from the two type bits.
    pub fn from_bits(bits: u8) -> Self {
        match bits & 0x03 {
            0 => Self::Confirmable,
            1 => Self::NonConfirmable,
            2 => Self::Acknowledgement,
            _ => Self::Reset,
        }
    }

    /// The two type bits.
    pub fn bits(self) -> u8 {
        self as u8
    }
}

/// Message code in `class.detail` form, stored as the raw wire byte.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Code(u8);

impl Code {
    /// 0.00 Empty message.
    pub const EMPTY: Code = Code::new(0, 0);
    /// 0.01 GET
    pub const GET: Code = Code::new(0, 1);
    /// 0.02 POST
    pub const POST: Code = Code::new(0, 2);
    /// 0.03 PUT
    pub const PUT: Code = Code::new(0, 3);
    /// 0.04 DELETE
    pub const DELETE: Code = Code::new(0, 4);
    /// 2.05 Content
    pub const CONTENT: Code = Code::new(2, 5);
    /// 4.00 Bad Request
    pub const BAD_REQUEST: Code = Code::new(4, 0);
    /// 4.02 Bad Option
    pub const BAD_OPTION: Code = Code::new(4, 2);
    /// 4.04 Not Found
    pub const NOT_FOUND: Code = Code::new(4, 4);
    /// 4.13 Request Entity Too Large
    pub const REQUEST_ENTITY_TOO_LARGE: Code = Code::new(4, 13);
    /// 5.00 Internal Server Error
    pub const INTERNAL_SERVER_ERROR: Code = Code::new(5, 0);
    /// 5.02 Bad Gateway
    pub const BAD_GATEWAY: Code = Code::new(5, 2);
    /// 5.04 Gateway Timeout
    pub const GATEWAY_TIMEOUT: Code = Code::new(5, 4);
    /// 5.05 Proxying Not Supported
    pub const PROXYING_NOT_SUPPORTED: Code = Code::new(5, 5);

    /// Build a code from its class (3 bits) and detail (5 bits).
    pub const fn new(class: u8, detail: u8) -> Self {
        Self(((class & 0x07) << 5) | (detail & 0x1F))
    }

    /// Wrap a raw wire byte.
    pub const fn from_raw(raw: u8) -> Self {
        Self(raw)
    }

    /// Raw wire byte.
    pub const fn raw(self) -> u8 {
        self.0
    }

    /// Code class (0 = request, 2..=5 = response).
    pub const fn class(self) -> u8 {
        self.0 >> 5
    }

    /// Code detail.
    pub const fn detail(self) -> u8 {
        self.0 & 0x1F
    }

    /// `true` for 0.00.
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// `true` for request methods (class 0, non-empty).
    pub const fn is_request(self) -> bool {
        self.class() == 0 && self.detail() != 0
    }

    /// `true` for response codes (classes 2 to 5).
    pub const fn is_response(self) -> bool {
        matches!(self.class(), 2..=5)
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.class(), self.detail())
    }
}

impl fmt::Debug for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Code({})", self)
    }
}

/// First header byte: `Ver | T | TKL`.
pub(crate) fn encode_first_byte(msg_type: MessageType, token_len: usize) -> u8 {
    (COAP_VERSION << 6) | (msg_type.bits() << 4) | (token_len as u8 & 0x0F)
}
