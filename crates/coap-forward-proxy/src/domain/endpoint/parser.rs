//! Authority → endpoint conversion for `coap` Proxy-Uri targets.

use std::net::Ipv6Addr;

use super::{Endpoint, EndpointError};
use crate::domain::InterfaceId;
use crate::ports::InterfaceRegistry;

/// Build the origin endpoint from the `host` and `port` of a parsed URI.
///
/// Rules:
/// - only bracketed IPv6 literals are accepted;
/// - `%<n>` inside the brackets selects interface `n`, which must exist;
/// - without a zone, a node with exactly one interface uses it, otherwise
///   the interface stays unspecified, which is an error for link-local
///   addresses;
/// - the port must be a non-zero decimal number.
pub fn parse_endpoint(
    host: &str,
    port: &str,
    interfaces: &dyn InterfaceRegistry,
) -> Result<Endpoint, EndpointError> {
    let literal = host
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .ok_or(EndpointError::NotIpv6Literal)?;

    let (addr_str, interface) = match literal.split_once('%') {
        Some((addr_str, zone)) => {
            let id = zone
                .parse::<u16>()
                .map(InterfaceId::new)
                .map_err(|_| EndpointError::InvalidZone)?;
            if !interfaces.contains(id) {
                return Err(EndpointError::UnknownInterface(id));
            }
            (addr_str, Some(id))
        }
        None => {
            let implied = if interfaces.count() == 1 {
                interfaces.sole()
            } else {
                None
            };
            (literal, implied)
        }
    };

    let addr: Ipv6Addr = addr_str.parse().map_err(|_| EndpointError::InvalidAddress)?;
    if interface.is_none() && is_link_local(&addr) {
        return Err(EndpointError::LinkLocalWithoutInterface);
    }

    let port = match port.parse::<u16>() {
        Ok(0) | Err(_) => return Err(EndpointError::InvalidPort),
        Ok(port) => port,
    };

    Ok(Endpoint::v6(addr, interface, port))
}

/// Link-local unicast (`fe80::/10`) or link-local scoped multicast
/// (`ff02::/16`, `ff12::/16`, ...).
pub fn is_link_local(addr: &Ipv6Addr) -> bool {
    let first = addr.segments()[0];
    let unicast = (first & 0xffc0) == 0xfe80;
    let multicast = (first & 0xff0f) == 0xff02;
    unicast || multicast
}
