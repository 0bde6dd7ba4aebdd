//! Option numbers and the delta-encoded option list.

use std::fmt;

use super::PduError;

/// Marker separating the option list from the payload.
pub const PAYLOAD_MARKER: u8 = 0xFF;

/// CoAP option number (RFC 7252 Section 12.2 registry).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OptionNumber(u16);

impl OptionNumber {
    /// If-Match
    pub const IF_MATCH: OptionNumber = OptionNumber(1);
    /// Uri-Host
    pub const URI_HOST: OptionNumber = OptionNumber(3);
    /// ETag
    pub const ETAG: OptionNumber = OptionNumber(4);
    /// If-None-Match
    pub const IF_NONE_MATCH: OptionNumber = OptionNumber(5);
    /// Observe (RFC 7641)
    pub const OBSERVE: OptionNumber = OptionNumber(6);
    /// Uri-Port
    pub const URI_PORT: OptionNumber = OptionNumber(7);
    /// Location-Path
    pub const LOCATION_PATH: OptionNumber = OptionNumber(8);
    /// Uri-Path
    pub const URI_PATH: OptionNumber = OptionNumber(11);
    /// Content-Format
    pub const CONTENT_FORMAT: OptionNumber = OptionNumber(12);
    /// Max-Age
    pub const MAX_AGE: OptionNumber = OptionNumber(14);
    /// Uri-Query
    pub const URI_QUERY: OptionNumber = OptionNumber(15);
    /// Accept
    pub const ACCEPT: OptionNumber = OptionNumber(17);
    /// Location-Query
    pub const LOCATION_QUERY: OptionNumber = OptionNumber(20);
    /// Block2 (RFC 7959)
    pub const BLOCK2: OptionNumber = OptionNumber(23);
    /// Block1 (RFC 7959)
    pub const BLOCK1: OptionNumber = OptionNumber(27);
    /// Size2 (RFC 7959)
    pub const SIZE2: OptionNumber = OptionNumber(28);
    /// Proxy-Uri
    pub const PROXY_URI: OptionNumber = OptionNumber(35);
    /// Proxy-Scheme
    pub const PROXY_SCHEME: OptionNumber = OptionNumber(39);
    /// Size1
    pub const SIZE1: OptionNumber = OptionNumber(60);

    /// Wrap a raw option number.
    pub const fn new(number: u16) -> Self {
        Self(number)
    }

    /// Raw option number.
    pub const fn get(self) -> u16 {
        self.0
    }
}

impl fmt::Display for OptionNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for OptionNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OptionNumber({})", self.0)
    }
}

/// A single option borrowed from a received message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoapOption<'a> {
    /// Absolute option number.
    pub number: OptionNumber,
    /// Raw option value.
    pub value: &'a [u8],
}

/// One decoded option header: absolute number, value range, next offset.
#[derive(Debug, Clone, Copy)]
pub(crate) struct RawOption {
    pub number: u16,
    pub value_start: usize,
    pub value_end: usize,
    pub next: usize,
}

/// Decode the option starting at `pos`, relative to `previous`.
///
/// The caller guarantees `bytes[pos]` exists and is not the payload marker.
pub(crate) fn read_option(bytes: &[u8], pos: usize, previous: u16) -> Result<RawOption, PduError> {
    let malformed = PduError::MalformedOption { offset: pos };
    let first = bytes[pos];
    let mut cursor = pos + 1;

    let delta = read_extended(bytes, &mut cursor, first >> 4).ok_or(malformed)?;
    let len = read_extended(bytes, &mut cursor, first & 0x0F).ok_or(malformed)?;

    let number = u32::from(previous) + delta;
    let number = u16::try_from(number).map_err(|_| malformed)?;

    let value_end = cursor + len as usize;
    if value_end > bytes.len() {
        return Err(malformed);
    }

    Ok(RawOption {
        number,
        value_start: cursor,
        value_end,
        next: value_end,
    })
}

/// Resolve a 4-bit delta/length nibble, consuming extended bytes.
fn read_extended(bytes: &[u8], cursor: &mut usize, nibble: u8) -> Option<u32> {
    match nibble {
        0..=12 => Some(u32::from(nibble)),
        13 => {
            let ext = *bytes.get(*cursor)?;
            *cursor += 1;
            Some(u32::from(ext) + 13)
        }
        14 => {
            let hi = *bytes.get(*cursor)?;
            let lo = *bytes.get(*cursor + 1)?;
            *cursor += 2;
            Some(u32::from(u16::from_be_bytes([hi, lo])) + 269)
        }
        _ => None,
    }
}

/// Nibble and extended bytes for a delta or length value.
pub(crate) fn encode_extended(value: usize) -> Option<(u8, [u8; 2], usize)> {
    match value {
        0..=12 => Some((value as u8, [0, 0], 0)),
        13..=268 => Some((13, [(value - 13) as u8, 0], 1)),
        269..=65_804 => {
            let ext = ((value - 269) as u16).to_be_bytes();
            Some((14, ext, 2))
        }
        _ => None,
    }
}

/// Iterator over the options of a parsed message.
///
/// The option list is validated once by [`super::Pdu::parse`]; iteration
/// never fails afterwards.
#[derive(Debug, Clone)]
pub struct OptionIter<'a> {
    bytes: &'a [u8],
    pos: usize,
    end: usize,
    previous: u16,
}

impl<'a> OptionIter<'a> {
    pub(crate) fn new(bytes: &'a [u8], start: usize, end: usize) -> Self {
        Self {
            bytes,
            pos: start,
            end,
            previous: 0,
        }
    }
}

impl<'a> Iterator for OptionIter<'a> {
    type Item = CoapOption<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos >= self.end {
            return None;
        }
        let raw = read_option(self.bytes, self.pos, self.previous).ok()?;
        self.pos = raw.next;
        self.previous = raw.number;
        Some(CoapOption {
            number: OptionNumber(raw.number),
            value: &self.bytes[raw.value_start..raw.value_end],
        })
    }
}
