//! # Transport Endpoints
//!
//! Address family, address, optional interface (IPv6 zone) and port of a
//! UDP peer, plus the parser that turns a `Proxy-Uri` authority into one.

mod parser;

pub use parser::{is_link_local, parse_endpoint};

use std::fmt;
use std::net::{IpAddr, Ipv6Addr, SocketAddr, SocketAddrV6};

use thiserror::Error;

use crate::domain::InterfaceId;

/// A UDP peer: where a client request came from or where an origin lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Endpoint {
    /// IPv4 or IPv6 address.
    pub addr: IpAddr,
    /// Interface the address is scoped to; `None` means unspecified.
    pub interface: Option<InterfaceId>,
    /// UDP port.
    pub port: u16,
}

impl Endpoint {
    /// Create an endpoint without an interface.
    pub fn new(addr: IpAddr, port: u16) -> Self {
        Self {
            addr,
            interface: None,
            port,
        }
    }

    /// Create an IPv6 endpoint with an optional interface.
    pub fn v6(addr: Ipv6Addr, interface: Option<InterfaceId>, port: u16) -> Self {
        Self {
            addr: IpAddr::V6(addr),
            interface,
            port,
        }
    }

    /// `true` for IPv6 endpoints.
    pub fn is_ipv6(&self) -> bool {
        self.addr.is_ipv6()
    }

    /// Convert to a socket address; the interface becomes the IPv6 scope id.
    pub fn to_socket_addr(&self) -> SocketAddr {
        match self.addr {
            IpAddr::V4(v4) => SocketAddr::new(IpAddr::V4(v4), self.port),
            IpAddr::V6(v6) => {
                let scope = self.interface.map(|i| u32::from(i.get())).unwrap_or(0);
                SocketAddr::V6(SocketAddrV6::new(v6, self.port, 0, scope))
            }
        }
    }
}

impl From<SocketAddr> for Endpoint {
    fn from(addr: SocketAddr) -> Self {
        match addr {
            SocketAddr::V4(v4) => Self::new(IpAddr::V4(*v4.ip()), v4.port()),
            SocketAddr::V6(v6) => {
                let interface = u16::try_from(v6.scope_id())
                    .ok()
                    .filter(|scope| *scope != 0)
                    .map(InterfaceId::new);
                Self::v6(*v6.ip(), interface, v6.port())
            }
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.addr, self.interface) {
            (IpAddr::V6(v6), Some(iface)) => write!(f, "[{}%{}]:{}", v6, iface, self.port),
            (IpAddr::V6(v6), None) => write!(f, "[{}]:{}", v6, self.port),
            (IpAddr::V4(v4), _) => write!(f, "{}:{}", v4, self.port),
        }
    }
}

/// Why an authority could not be turned into an endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EndpointError {
    /// Host is not a bracketed IPv6 literal (`[...]`).
    #[error("host is not a bracketed IPv6 literal")]
    NotIpv6Literal,
    /// Zone suffix is not a decimal interface number.
    #[error("zone is not a numeric interface id")]
    InvalidZone,
    /// Zone names an interface that does not exist.
    #[error("interface {0} does not exist")]
    UnknownInterface(InterfaceId),
    /// Literal does not parse as an IPv6 address.
    #[error("invalid IPv6 address")]
    InvalidAddress,
    /// Link-local destination but no interface could be determined.
    #[error("link-local address requires an interface")]
    LinkLocalWithoutInterface,
    /// Port is missing, zero or not a decimal number.
    #[error("invalid port")]
    InvalidPort,
}
