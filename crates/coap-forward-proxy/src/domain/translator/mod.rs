//! # Option Translator
//!
//! Turns a proxy request into the request sent to the origin:
//!
//! ```text
//! client → proxy:  GET  Proxy-Uri: coap://[2001:db8::1]:5683/sensors/temp?fresh=1
//! proxy  → origin: GET  Uri-Path: sensors  Uri-Path: temp  Uri-Query: fresh=1
//! ```
//!
//! Header, token and payload are copied verbatim. `Proxy-Uri` is dropped,
//! every other option is copied opaquely, and the synthesized `Uri-Path` /
//! `Uri-Query` options are placed at their numeric position so the output
//! stays in non-decreasing option order.

use crate::domain::pdu::{OptionNumber, Pdu, PduError, PduWriter};
use crate::domain::uri::ParsedUri;

/// Longest Uri-Path / Uri-Query value allowed by RFC 7252.
pub const MAX_URI_OPTION_LEN: usize = 255;

/// Write the origin request for `request` into `buf` and return its length.
///
/// `uri` is the already validated `Proxy-Uri` of `request`. Nothing is
/// guaranteed about the contents of `buf` when an error is returned.
pub fn translate_request(
    request: &Pdu<'_>,
    uri: &ParsedUri<'_>,
    buf: &mut [u8],
) -> Result<usize, PduError> {
    let mut writer = PduWriter::copy_header(buf, request)?;
    let mut path_written = false;
    let mut query_written = false;

    for option in request.options() {
        if option.number == OptionNumber::PROXY_URI {
            continue;
        }
        if !path_written && option.number > OptionNumber::URI_PATH {
            write_path(&mut writer, uri.path)?;
            path_written = true;
        }
        if !query_written && option.number > OptionNumber::URI_QUERY {
            write_query(&mut writer, uri.query)?;
            query_written = true;
        }
        writer.option(option.number, option.value)?;
    }

    if !path_written {
        write_path(&mut writer, uri.path)?;
    }
    if !query_written {
        write_query(&mut writer, uri.query)?;
    }

    writer.finish(request.payload())
}

/// Uri-Path segments of `path` (RFC 7252 Section 6.4, steps 8-9).
///
/// `""` and `"/"` yield no segments; otherwise the leading `/` is removed
/// and every remaining `/`-separated component becomes one segment, empty
/// ones included.
pub fn path_segments(path: &str) -> impl Iterator<Item = &str> {
    let trimmed = path.strip_prefix('/').unwrap_or(path);
    let segments = (!trimmed.is_empty()).then(|| trimmed.split('/'));
    segments.into_iter().flatten()
}

/// Uri-Query arguments of `query`; none for an absent or empty query.
pub fn query_arguments(query: Option<&str>) -> impl Iterator<Item = &str> {
    query
        .filter(|q| !q.is_empty())
        .map(|q| q.split('&'))
        .into_iter()
        .flatten()
}

fn write_path(writer: &mut PduWriter<'_>, path: &str) -> Result<(), PduError> {
    for segment in path_segments(path) {
        write_uri_option(writer, OptionNumber::URI_PATH, segment)?;
    }
    Ok(())
}

fn write_query(writer: &mut PduWriter<'_>, query: Option<&str>) -> Result<(), PduError> {
    for argument in query_arguments(query) {
        write_uri_option(writer, OptionNumber::URI_QUERY, argument)?;
    }
    Ok(())
}

fn write_uri_option(
    writer: &mut PduWriter<'_>,
    number: OptionNumber,
    value: &str,
) -> Result<(), PduError> {
    if value.len() > MAX_URI_OPTION_LEN {
        return Err(PduError::OptionTooLong { len: value.len() });
    }
    writer.option(number, value.as_bytes())
}
