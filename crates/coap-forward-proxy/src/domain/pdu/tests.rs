//! Tests for the CoAP message codec

use super::*;

/// CON GET, mid 0x1234, token [0xAA, 0xBB], Uri-Path "a", payload "hi".
fn sample_message() -> Vec<u8> {
    vec![
        0x42, 0x01, 0x12, 0x34, // ver 1, CON, tkl 2, GET, mid
        0xAA, 0xBB, // token
        0xB1, b'a', // delta 11 (Uri-Path), len 1
        0xFF, b'h', b'i',
    ]
}

// =============================================================================
// TEST GROUP 1: Parsing
// =============================================================================

#[test]
fn test_parse_header_token_options_payload() {
    let bytes = sample_message();
    let pdu = Pdu::parse(&bytes).unwrap();

    assert_eq!(pdu.version(), 1);
    assert_eq!(pdu.msg_type(), MessageType::Confirmable);
    assert_eq!(pdu.code(), Code::GET);
    assert_eq!(pdu.message_id(), 0x1234);
    assert_eq!(pdu.token(), &[0xAA, 0xBB]);
    assert_eq!(pdu.option(OptionNumber::URI_PATH), Some(&b"a"[..]));
    assert_eq!(pdu.payload(), b"hi");
    assert_eq!(pdu.as_bytes(), &bytes[..]);
}

#[test]
fn test_parse_extended_delta_and_length() {
    // Proxy-Uri (35): delta 35 -> nibble 13, ext 22; length 20 -> nibble 13, ext 7
    let uri = b"coap://[::1]:5683/ab";
    let mut bytes = vec![0x50, 0x01, 0x00, 0x01, 0xDD, 22, 7];
    bytes.extend_from_slice(uri);

    let pdu = Pdu::parse(&bytes).unwrap();
    assert_eq!(pdu.msg_type(), MessageType::NonConfirmable);
    assert_eq!(pdu.option(OptionNumber::PROXY_URI), Some(&uri[..]));
    assert!(pdu.payload().is_empty());
}

#[test]
fn test_parse_two_byte_extended_length() {
    // Uri-Query (15) with a 300-byte value:
    // delta nibble 13 + ext 2, length nibble 14 + ext 300 - 269 = 31
    let mut bytes = vec![0x40, 0x01, 0x00, 0x01, 0xDE, 2, 0x00, 31];
    bytes.extend(std::iter::repeat(b'q').take(300));

    let pdu = Pdu::parse(&bytes).unwrap();
    let opt = pdu.options().next().unwrap();
    assert_eq!(opt.number, OptionNumber::URI_QUERY);
    assert_eq!(opt.value.len(), 300);
}

#[test]
fn test_parse_rejects_short_message() {
    assert_eq!(Pdu::parse(&[0x40, 0x01]).unwrap_err(), PduError::Truncated);
}

#[test]
fn test_parse_rejects_bad_version() {
    assert_eq!(
        Pdu::parse(&[0x80, 0x01, 0, 0]).unwrap_err(),
        PduError::UnsupportedVersion(2)
    );
}

#[test]
fn test_parse_rejects_reserved_token_length() {
    assert_eq!(
        Pdu::parse(&[0x49, 0x01, 0, 0]).unwrap_err(),
        PduError::InvalidTokenLength(9)
    );
}

#[test]
fn test_parse_rejects_truncated_token() {
    assert_eq!(
        Pdu::parse(&[0x44, 0x01, 0, 0, 1, 2]).unwrap_err(),
        PduError::Truncated
    );
}

#[test]
fn test_parse_rejects_option_past_end() {
    assert_eq!(
        Pdu::parse(&[0x40, 0x01, 0, 0, 0xB5, b'a']).unwrap_err(),
        PduError::MalformedOption { offset: 4 }
    );
}

#[test]
fn test_parse_rejects_reserved_nibble() {
    assert_eq!(
        Pdu::parse(&[0x40, 0x01, 0, 0, 0x1F]).unwrap_err(),
        PduError::MalformedOption { offset: 4 }
    );
}

#[test]
fn test_parse_rejects_marker_without_payload() {
    assert_eq!(
        Pdu::parse(&[0x40, 0x01, 0, 0, 0xFF]).unwrap_err(),
        PduError::EmptyPayload
    );
}

#[test]
fn test_options_iterate_in_order() {
    // Uri-Path "a", Uri-Path "b", Content-Format 0 (empty), Uri-Query "x"
    let bytes = [
        0x40, 0x02, 0, 1, 0xB1, b'a', 0x01, b'b', 0x10, 0x31, b'x',
    ];
    let pdu = Pdu::parse(&bytes).unwrap();
    let numbers: Vec<u16> = pdu.options().map(|o| o.number.get()).collect();
    assert_eq!(numbers, vec![11, 11, 12, 15]);
}

// =============================================================================
// TEST GROUP 2: Writing
// =============================================================================

#[test]
fn test_writer_produces_parsable_message() {
    let mut buf = [0u8; 64];
    let mut writer =
        PduWriter::new(&mut buf, MessageType::Confirmable, Code::GET, 0x1234, &[0xAA, 0xBB])
            .unwrap();
    writer.option(OptionNumber::URI_PATH, b"a").unwrap();
    let len = writer.finish(b"hi").unwrap();

    assert_eq!(&buf[..len], &sample_message()[..]);
}

#[test]
fn test_writer_rejects_decreasing_options() {
    let mut buf = [0u8; 32];
    let mut writer = PduWriter::new(&mut buf, MessageType::Confirmable, Code::GET, 1, &[]).unwrap();
    writer.option(OptionNumber::URI_QUERY, b"a=1").unwrap();

    let err = writer.option(OptionNumber::URI_PATH, b"x").unwrap_err();
    assert_eq!(
        err,
        PduError::OptionOutOfOrder {
            previous: 15,
            number: 11
        }
    );
}

#[test]
fn test_writer_reports_overflow() {
    let mut buf = [0u8; 8];
    let mut writer = PduWriter::new(&mut buf, MessageType::Confirmable, Code::GET, 1, &[]).unwrap();
    let err = writer.option(OptionNumber::URI_PATH, b"too-long").unwrap_err();
    assert!(matches!(err, PduError::BufferTooSmall { available: 8, .. }));
    assert_eq!(writer.len(), 4);
}

#[test]
fn test_writer_rejects_long_token() {
    let mut buf = [0u8; 32];
    let err = PduWriter::new(&mut buf, MessageType::Confirmable, Code::GET, 1, &[0u8; 9])
        .unwrap_err();
    assert_eq!(err, PduError::InvalidTokenLength(9));
}

#[test]
fn test_copy_header_is_verbatim() {
    let source = sample_message();
    let pdu = Pdu::parse(&source).unwrap();

    let mut buf = [0u8; 32];
    let len = PduWriter::copy_header(&mut buf, &pdu).unwrap().finish(&[]).unwrap();
    assert_eq!(&buf[..len], &source[..6]);
}

#[test]
fn test_error_response_to_confirmable_is_piggybacked_ack() {
    let request = sample_message();
    let pdu = Pdu::parse(&request).unwrap();

    let mut buf = [0u8; 32];
    let len = write_error_response(&pdu, Code::BAD_OPTION, &mut buf).unwrap();
    let reply = Pdu::parse(&buf[..len]).unwrap();

    assert_eq!(reply.msg_type(), MessageType::Acknowledgement);
    assert_eq!(reply.code(), Code::BAD_OPTION);
    assert_eq!(reply.message_id(), 0x1234);
    assert_eq!(reply.token(), &[0xAA, 0xBB]);
    assert_eq!(reply.options().count(), 0);
}

#[test]
fn test_error_response_to_non_confirmable_is_non() {
    let request = [0x51, 0x01, 0x00, 0x07, 0x42];
    let pdu = Pdu::parse(&request).unwrap();

    let mut buf = [0u8; 16];
    let len = write_error_response(&pdu, Code::PROXYING_NOT_SUPPORTED, &mut buf).unwrap();
    let reply = Pdu::parse(&buf[..len]).unwrap();

    assert_eq!(reply.msg_type(), MessageType::NonConfirmable);
    assert_eq!(reply.code().to_string(), "5.05");
    assert_eq!(reply.token(), &[0x42]);
}

// =============================================================================
// TEST GROUP 3: Codes
// =============================================================================

#[test]
fn test_code_classes() {
    assert!(Code::GET.is_request());
    assert!(!Code::EMPTY.is_request());
    assert!(Code::EMPTY.is_empty());
    assert!(Code::CONTENT.is_response());
    assert!(Code::INTERNAL_SERVER_ERROR.is_response());
    assert_eq!(Code::INTERNAL_SERVER_ERROR.raw(), 0xA0);
    assert_eq!(Code::BAD_OPTION.raw(), 0x82);
    assert_eq!(Code::PROXYING_NOT_SUPPORTED.raw(), 0xA5);
    assert_eq!(Code::CONTENT.to_string(), "2.05");
}
