//! Host endpoints
//!
//! Policy matching only cares about two predicates: address equality (the
//! port is ignored) and whether an address is the default route, i.e. the
//! unspecified address standing in for "any peer".

use crate::{Error, Result};
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};

/// IKEv2 UDP port
pub const IKEV2_UDP_PORT: u16 = 500;

/// Network endpoint used in init configs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Host {
    addr: SocketAddr,
}

impl Host {
    /// Parse an address string
    pub fn new(address: &str, port: u16) -> Result<Self> {
        let ip = address
            .parse::<IpAddr>()
            .map_err(|_| Error::InvalidHost(format!("not an IP address: {}", address)))?;
        Ok(Host {
            addr: SocketAddr::new(ip, port),
        })
    }

    /// IPv4 default route
    pub fn any_v4(port: u16) -> Self {
        Host::from(SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), port))
    }

    /// IPv6 default route
    pub fn any_v6(port: u16) -> Self {
        Host::from(SocketAddr::new(IpAddr::V6(Ipv6Addr::UNSPECIFIED), port))
    }

    /// IP address
    pub fn address(&self) -> IpAddr {
        self.addr.ip()
    }

    /// UDP port
    pub fn port(&self) -> u16 {
        self.addr.port()
    }

    /// Compare addresses only
    pub fn ip_is_equal(&self, other: &Host) -> bool {
        self.addr.ip() == other.addr.ip()
    }

    /// True for the unspecified (any) address
    pub fn is_default_route(&self) -> bool {
        self.addr.ip().is_unspecified()
    }
}

impl From<SocketAddr> for Host {
    fn from(addr: SocketAddr) -> Self {
        Host { addr }
    }
}

impl fmt::Display for Host {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.addr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ip_is_equal_ignores_port() {
        let a = Host::new("10.1.0.1", 500).unwrap();
        let b = Host::new("10.1.0.1", 4500).unwrap();
        let c = Host::new("10.1.0.2", 500).unwrap();

        assert!(a.ip_is_equal(&b));
        assert!(!a.ip_is_equal(&c));
        assert_ne!(a, b);
    }

    #[test]
    fn test_default_route() {
        assert!(Host::any_v4(IKEV2_UDP_PORT).is_default_route());
        assert!(Host::any_v6(IKEV2_UDP_PORT).is_default_route());
        assert!(Host::new("0.0.0.0", 500).unwrap().is_default_route());
        assert!(!Host::new("127.0.0.1", 500).unwrap().is_default_route());
    }

    #[test]
    fn test_invalid_host() {
        assert!(matches!(
            Host::new("gateway", 500),
            Err(Error::InvalidHost(_))
        ));
    }

    #[test]
    fn test_display() {
        let host = Host::new("192.168.1.1", 500).unwrap();
        assert_eq!(host.to_string(), "192.168.1.1:500");
        assert_eq!(host.port(), 500);
    }
}
