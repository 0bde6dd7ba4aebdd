//! # CoAP Message Codec
//!
//! Minimal RFC 7252 codec used by the proxy. Parsing borrows the received
//! datagram; writing goes into a caller-provided buffer, so neither side
//! allocates.
//!
//! ## Wire Layout
//!
//! ```text
//!  0                   1                   2                   3
//! |Ver| T |  TKL  |      Code     |          Message ID           |
//! |   Token (if any, TKL bytes) ...
//! |   Options (if any) ...
//! |1 1 1 1 1 1 1 1|    Payload (if any) ...
//! ```

mod header;
mod options;
mod writer;

pub use header::{Code, MessageType, COAP_VERSION, HEADER_LEN, MAX_TOKEN_LEN};
pub use options::{CoapOption, OptionIter, OptionNumber, PAYLOAD_MARKER};
pub use writer::{write_error_response, PduWriter};

use thiserror::Error;

use options::read_option;

/// Errors raised while decoding or encoding a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PduError {
    /// Fewer bytes than the header and token require.
    #[error("message truncated")]
    Truncated,
    /// Version field is not 1.
    #[error("unsupported CoAP version {0}")]
    UnsupportedVersion(u8),
    /// Token length 9 to 15 is reserved.
    #[error("invalid token length {0}")]
    InvalidTokenLength(u8),
    /// Option header or value runs past the message, or uses nibble 15.
    #[error("malformed option at offset {offset}")]
    MalformedOption {
        /// Byte offset of the offending option header.
        offset: usize,
    },
    /// Payload marker followed by zero payload bytes.
    #[error("payload marker without payload")]
    EmptyPayload,
    /// The output buffer cannot hold the message.
    #[error("buffer too small: need {needed} bytes, have {available}")]
    BufferTooSmall {
        /// Bytes the message would need.
        needed: usize,
        /// Size of the output buffer.
        available: usize,
    },
    /// Options were appended with a decreasing number.
    #[error("option {number} appended after option {previous}")]
    OptionOutOfOrder {
        /// Number of the last option written.
        previous: u16,
        /// Number that was rejected.
        number: u16,
    },
    /// Delta or value length exceeds the 16-bit extended encoding.
    #[error("option field of {len} exceeds the encodable maximum")]
    OptionTooLong {
        /// Offending length.
        len: usize,
    },
}

/// A validated, borrowed view of a CoAP message.
#[derive(Debug, Clone, Copy)]
pub struct Pdu<'a> {
    bytes: &'a [u8],
    options_start: usize,
    options_end: usize,
    payload_start: usize,
}

impl<'a> Pdu<'a> {
    /// Validate `bytes` as a CoAP message.
    ///
    /// The header, token and option list are checked once here; accessors
    /// afterwards are infallible.
    pub fn parse(bytes: &'a [u8]) -> Result<Self, PduError> {
        if bytes.len() < HEADER_LEN {
            return Err(PduError::Truncated);
        }
        let version = bytes[0] >> 6;
        if version != COAP_VERSION {
            return Err(PduError::UnsupportedVersion(version));
        }
        let token_len = bytes[0] & 0x0F;
        if usize::from(token_len) > MAX_TOKEN_LEN {
            return Err(PduError::InvalidTokenLength(token_len));
        }
        let options_start = HEADER_LEN + usize::from(token_len);
        if options_start > bytes.len() {
            return Err(PduError::Truncated);
        }

        let mut pos = options_start;
        let mut previous = 0u16;
        let (options_end, payload_start) = loop {
            if pos == bytes.len() {
                break (pos, pos);
            }
            if bytes[pos] == PAYLOAD_MARKER {
                if pos + 1 == bytes.len() {
                    return Err(PduError::EmptyPayload);
                }
                break (pos, pos + 1);
            }
            let raw = read_option(bytes, pos, previous)?;
            previous = raw.number;
            pos = raw.next;
        };

        Ok(Self {
            bytes,
            options_start,
            options_end,
            payload_start,
        })
    }

    /// Protocol version (always 1 after parsing).
    pub fn version(&self) -> u8 {
        self.bytes[0] >> 6
    }

    /// Message type.
    pub fn msg_type(&self) -> MessageType {
        MessageType::from_bits(self.bytes[0] >> 4)
    }

    /// Request method or response code.
    pub fn code(&self) -> Code {
        Code::from_raw(self.bytes[1])
    }

    /// Message id.
    pub fn message_id(&self) -> u16 {
        u16::from_be_bytes([self.bytes[2], self.bytes[3]])
    }

    /// Token bytes (0 to 8).
    pub fn token(&self) -> &'a [u8] {
        &self.bytes[HEADER_LEN..self.options_start]
    }

    /// Options in wire order (non-decreasing numbers).
    pub fn options(&self) -> OptionIter<'a> {
        OptionIter::new(self.bytes, self.options_start, self.options_end)
    }

    /// First value of option `number`, if present.
    pub fn option(&self, number: OptionNumber) -> Option<&'a [u8]> {
        self.options()
            .take_while(|opt| opt.number <= number)
            .find(|opt| opt.number == number)
            .map(|opt| opt.value)
    }

    /// Payload bytes (empty when the message has no payload marker).
    pub fn payload(&self) -> &'a [u8] {
        &self.bytes[self.payload_start..]
    }

    /// The whole message exactly as received.
    pub fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }
}

#[cfg(test)]
mod tests;
