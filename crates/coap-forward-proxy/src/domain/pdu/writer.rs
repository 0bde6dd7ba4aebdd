//! Heap-free message writer over a caller-provided buffer.

use super::header::{encode_first_byte, HEADER_LEN, MAX_TOKEN_LEN};
use super::options::{encode_extended, OptionNumber, PAYLOAD_MARKER};
use super::{Code, MessageType, Pdu, PduError};

/// Writes a CoAP message into a borrowed buffer.
///
/// Options must be appended in non-decreasing number order; the writer
/// computes the deltas and refuses anything that would go backwards.
#[derive(Debug)]
pub struct PduWriter<'b> {
    buf: &'b mut [u8],
    len: usize,
    last_option: u16,
}

impl<'b> PduWriter<'b> {
    /// Start a message with a fresh header and token.
    pub fn new(
        buf: &'b mut [u8],
        msg_type: MessageType,
        code: Code,
        message_id: u16,
        token: &[u8],
    ) -> Result<Self, PduError> {
        if token.len() > MAX_TOKEN_LEN {
            return Err(PduError::InvalidTokenLength(token.len() as u8));
        }
        let mut writer = Self {
            buf,
            len: 0,
            last_option: 0,
        };
        let mid = message_id.to_be_bytes();
        writer.push(&[
            encode_first_byte(msg_type, token.len()),
            code.raw(),
            mid[0],
            mid[1],
        ])?;
        writer.push(token)?;
        Ok(writer)
    }

    /// Start a message whose header and token are copied verbatim from
    /// `source` (version, type, token length, code, message id, token).
    pub fn copy_header(buf: &'b mut [u8], source: &Pdu<'_>) -> Result<Self, PduError> {
        let head = &source.as_bytes()[..HEADER_LEN + source.token().len()];
        let mut writer = Self {
            buf,
            len: 0,
            last_option: 0,
        };
        writer.push(head)?;
        Ok(writer)
    }

    /// Append one option.
    pub fn option(&mut self, number: OptionNumber, value: &[u8]) -> Result<(), PduError> {
        let number = number.get();
        if number < self.last_option {
            return Err(PduError::OptionOutOfOrder {
                previous: self.last_option,
                number,
            });
        }
        let delta = usize::from(number - self.last_option);
        let (delta_nibble, delta_ext, delta_ext_len) =
            encode_extended(delta).ok_or(PduError::OptionTooLong { len: delta })?;
        let (len_nibble, len_ext, len_ext_len) =
            encode_extended(value.len()).ok_or(PduError::OptionTooLong { len: value.len() })?;

        let needed = 1 + delta_ext_len + len_ext_len + value.len();
        self.reserve(needed)?;

        self.push(&[(delta_nibble << 4) | len_nibble])?;
        self.push(&delta_ext[..delta_ext_len])?;
        self.push(&len_ext[..len_ext_len])?;
        self.push(value)?;
        self.last_option = number;
        Ok(())
    }

    /// Append the payload (if any) and return the total message length.
    pub fn finish(mut self, payload: &[u8]) -> Result<usize, PduError> {
        if !payload.is_empty() {
            self.reserve(1 + payload.len())?;
            self.push(&[PAYLOAD_MARKER])?;
            self.push(payload)?;
        }
        Ok(self.len)
    }

    /// Bytes written so far.
    pub fn len(&self) -> usize {
        self.len
    }

    /// `true` if nothing has been written.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn reserve(&self, needed: usize) -> Result<(), PduError> {
        let available = self.buf.len() - self.len;
        if needed > available {
            return Err(PduError::BufferTooSmall {
                needed: self.len + needed,
                available: self.buf.len(),
            });
        }
        Ok(())
    }

    fn push(&mut self, bytes: &[u8]) -> Result<(), PduError> {
        self.reserve(bytes.len())?;
        self.buf[self.len..self.len + bytes.len()].copy_from_slice(bytes);
        self.len += bytes.len();
        Ok(())
    }
}

/// Write a bare error response for `request` into `buf`.
///
/// A confirmable request is answered with a piggybacked ACK carrying the
/// same message id; anything else gets a non-confirmable reply. The token
/// is echoed so the client can correlate.
pub fn write_error_response(request: &Pdu<'_>, code: Code, buf: &mut [u8]) -> Result<usize, PduError> {
    let msg_type = match request.msg_type() {
        MessageType::Confirmable => MessageType::Acknowledgement,
        _ => MessageType::NonConfirmable,
    };
    PduWriter::new(buf, msg_type, code, request.message_id(), request.token())?.finish(&[])
}
