//! Tests for the URI lexer

use super::*;

#[test]
fn test_full_coap_uri() {
    let uri = ParsedUri::parse("coap://RIOT:test@[2001:db8::1]:5683/.well-known/core?v=1").unwrap();
    assert_eq!(uri.scheme, Some("coap"));
    assert_eq!(uri.userinfo, Some("RIOT:test"));
    assert_eq!(uri.host, Some("[2001:db8::1]"));
    assert_eq!(uri.port, Some("5683"));
    assert_eq!(uri.path, "/.well-known/core");
    assert_eq!(uri.query, Some("v=1"));
}

#[test]
fn test_relative_reference() {
    let uri = ParsedUri::parse("/.well-known/core?v=1").unwrap();
    assert!(!uri.is_absolute());
    assert_eq!(uri.host, None);
    assert_eq!(uri.path, "/.well-known/core");
    assert_eq!(uri.query, Some("v=1"));
}

#[test]
fn test_port_is_not_validated_by_lexer() {
    let uri = ParsedUri::parse("coap://R@[2001:db8::1]:5own/v=1").unwrap();
    assert_eq!(uri.port, Some("5own"));
    assert_eq!(uri.path, "/v=1");
    assert_eq!(uri.query, None);
}

#[test]
fn test_colon_in_path_is_kept() {
    let uri = ParsedUri::parse("coap://R@[2001:db8::1]:5own/:v=1").unwrap();
    assert_eq!(uri.path, "/:v=1");
}

#[test]
fn test_unbracketed_host_with_stray_bracket() {
    let uri = ParsedUri::parse("oap://Y2001:db8::1]:5own/av=1").unwrap();
    assert_eq!(uri.scheme, Some("oap"));
    assert_eq!(uri.host, Some("Y2001:db8::1]"));
    assert_eq!(uri.port, Some("5own"));
}

#[test]
fn test_leading_slash_without_scheme_is_relative() {
    let uri = ParsedUri::parse("//Rb[ʰ00J:d/5v=0").unwrap();
    assert_eq!(uri.scheme, None);
    assert_eq!(uri.path, "//Rb[ʰ00J:d/5v=0");
}

#[test]
fn test_empty_port_is_malformed() {
    assert_eq!(
        ParsedUri::parse("coap://oap://P@[2001:b").unwrap_err(),
        UriError::Malformed
    );
}

#[test]
fn test_empty_authority_keeps_path() {
    let uri = ParsedUri::parse("coap:///R@[2008::1]:5own//R@[2008::1]:5own/?v=1").unwrap();
    assert_eq!(uri.host, Some(""));
    assert_eq!(uri.userinfo, None);
    assert_eq!(uri.path, "/R@[2008::1]:5own//R@[2008::1]:5own/");
    assert_eq!(uri.query, Some("v=1"));
}

#[test]
fn test_empty_host_with_userinfo_is_malformed() {
    assert_eq!(
        ParsedUri::parse("coap://R@////////////////7///v=1").unwrap_err(),
        UriError::Malformed
    );
}

#[test]
fn test_unterminated_ipv6_literal_is_malformed() {
    assert_eq!(
        ParsedUri::parse("coap://[2001:db8::1/x").unwrap_err(),
        UriError::Malformed
    );
}

#[test]
fn test_odd_scheme_and_empty_authority() {
    let uri = ParsedUri::parse("coa[:////[2001:db5ow:5own/Ov=1").unwrap();
    assert_eq!(uri.scheme, Some("coa["));
    assert_eq!(uri.host, Some(""));
    assert_eq!(uri.path, "//[2001:db5ow:5own/Ov=1");
}

#[test]
fn test_schemes_without_authority() {
    let tel = ParsedUri::parse("tel:+1-816-555-1212").unwrap();
    assert_eq!(tel.scheme, Some("tel"));
    assert_eq!(tel.host, None);
    assert_eq!(tel.path, "+1-816-555-1212");

    let sms = ParsedUri::parse("sms:+15105550101,+15105550102?body=hello%20there").unwrap();
    assert_eq!(sms.path, "+15105550101,+15105550102");
    assert_eq!(sms.query, Some("body=hello%20there"));

    let mail = ParsedUri::parse("mailto:test@example.com").unwrap();
    assert_eq!(mail.userinfo, None);
    assert_eq!(mail.path, "test@example.com");
}

#[test]
fn test_registered_name_without_port() {
    let uri = ParsedUri::parse("ftp://ftp.is.co.za/rfc/rfc1808.txt").unwrap();
    assert_eq!(uri.host, Some("ftp.is.co.za"));
    assert_eq!(uri.port, None);
    assert_eq!(uri.path, "/rfc/rfc1808.txt");
}

#[test]
fn test_query_directly_after_authority() {
    let uri = ParsedUri::parse("coap://[2001:db8::1]:5683?fresh=1").unwrap();
    assert_eq!(uri.host, Some("[2001:db8::1]"));
    assert_eq!(uri.port, Some("5683"));
    assert_eq!(uri.path, "");
    assert_eq!(uri.query, Some("fresh=1"));
}

#[test]
fn test_empty_query_is_present() {
    let uri = ParsedUri::parse("coap://[::1]:5683/a?").unwrap();
    assert_eq!(uri.query, Some(""));
}

#[test]
fn test_parse_absolute_rejects_relative_and_empty() {
    assert_eq!(ParsedUri::parse_absolute("a").unwrap_err(), UriError::Relative);
    assert_eq!(
        ParsedUri::parse_absolute("not a uri").unwrap_err(),
        UriError::Relative
    );
    assert_eq!(ParsedUri::parse_absolute("").unwrap_err(), UriError::Empty);
    assert_eq!(ParsedUri::parse("").unwrap_err(), UriError::Empty);
}

#[test]
fn test_is_absolute() {
    assert!(is_absolute("coap://x"));
    assert!(is_absolute("http:"));
    assert!(!is_absolute("/path:with:colon"));
    assert!(!is_absolute("no-colon"));
    assert!(!is_absolute("1a:b"));
}
