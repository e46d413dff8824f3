//! Traffic selectors (RFC 7296 Section 3.13.1)

use crate::{Error, Result};
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

/// Traffic selector type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TsType {
    /// IPv4 address range
    Ipv4AddrRange = 7,
    /// IPv6 address range
    Ipv6AddrRange = 8,
}

/// Address and port range with an IP protocol
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TrafficSelector {
    ts_type: TsType,
    /// IP protocol, 0 for any
    pub protocol: u8,
    start_addr: IpAddr,
    end_addr: IpAddr,
    /// First port in range
    pub start_port: u16,
    /// Last port in range
    pub end_port: u16,
}

impl TrafficSelector {
    /// Build a selector from address strings
    pub fn from_strings(
        protocol: u8,
        ts_type: TsType,
        start_addr: &str,
        start_port: u16,
        end_addr: &str,
        end_port: u16,
    ) -> Result<Self> {
        let start = parse_addr(ts_type, start_addr)?;
        let end = parse_addr(ts_type, end_addr)?;
        if start > end {
            return Err(Error::InvalidParameter(format!(
                "traffic selector range {} - {} is reversed",
                start_addr, end_addr
            )));
        }
        if start_port > end_port {
            return Err(Error::InvalidParameter(format!(
                "port range {} - {} is reversed",
                start_port, end_port
            )));
        }

        Ok(TrafficSelector {
            ts_type,
            protocol,
            start_addr: start,
            end_addr: end,
            start_port,
            end_port,
        })
    }

    /// Any IPv4 address, any port, any protocol
    pub fn ipv4_any() -> Self {
        TrafficSelector {
            ts_type: TsType::Ipv4AddrRange,
            protocol: 0,
            start_addr: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            end_addr: IpAddr::V4(Ipv4Addr::BROADCAST),
            start_port: 0,
            end_port: u16::MAX,
        }
    }

    /// Any IPv6 address, any port, any protocol
    pub fn ipv6_any() -> Self {
        TrafficSelector {
            ts_type: TsType::Ipv6AddrRange,
            protocol: 0,
            start_addr: IpAddr::V6(Ipv6Addr::UNSPECIFIED),
            end_addr: IpAddr::V6(Ipv6Addr::from(u128::MAX)),
            start_port: 0,
            end_port: u16::MAX,
        }
    }

    /// Selector type
    pub fn ts_type(&self) -> TsType {
        self.ts_type
    }

    /// Address range
    pub fn addresses(&self) -> (IpAddr, IpAddr) {
        (self.start_addr, self.end_addr)
    }

    /// True if the address and port fall inside this selector
    pub fn contains(&self, addr: IpAddr, port: u16) -> bool {
        let same_family = matches!(
            (self.ts_type, addr),
            (TsType::Ipv4AddrRange, IpAddr::V4(_)) | (TsType::Ipv6AddrRange, IpAddr::V6(_))
        );
        same_family
            && self.start_addr <= addr
            && addr <= self.end_addr
            && self.start_port <= port
            && port <= self.end_port
    }
}

fn parse_addr(ts_type: TsType, text: &str) -> Result<IpAddr> {
    let addr = text
        .parse::<IpAddr>()
        .map_err(|_| Error::InvalidParameter(format!("not an IP address: {}", text)))?;
    match (ts_type, addr) {
        (TsType::Ipv4AddrRange, IpAddr::V4(_)) | (TsType::Ipv6AddrRange, IpAddr::V6(_)) => Ok(addr),
        _ => Err(Error::InvalidParameter(format!(
            "address {} does not match selector type {:?}",
            text, ts_type
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ipv4_any_contains_everything_v4() {
        let ts = TrafficSelector::ipv4_any();
        assert!(ts.contains("10.0.0.1".parse().unwrap(), 80));
        assert!(ts.contains("255.255.255.255".parse().unwrap(), 65535));
        assert!(!ts.contains("::1".parse().unwrap(), 80));
    }

    #[test]
    fn test_from_strings_matches_any() {
        let ts = TrafficSelector::from_strings(
            1,
            TsType::Ipv4AddrRange,
            "0.0.0.0",
            0,
            "255.255.255.255",
            65535,
        )
        .unwrap();
        assert_eq!(ts.addresses(), TrafficSelector::ipv4_any().addresses());
        assert_eq!(ts.protocol, 1);
    }

    #[test]
    fn test_subnet_range() {
        let ts = TrafficSelector::from_strings(
            0,
            TsType::Ipv4AddrRange,
            "192.168.1.0",
            0,
            "192.168.1.255",
            1023,
        )
        .unwrap();
        assert!(ts.contains("192.168.1.77".parse().unwrap(), 22));
        assert!(!ts.contains("192.168.2.1".parse().unwrap(), 22));
        assert!(!ts.contains("192.168.1.77".parse().unwrap(), 8080));
    }

    #[test]
    fn test_invalid_ranges() {
        assert!(TrafficSelector::from_strings(0, TsType::Ipv4AddrRange, "10.0.0.9", 0, "10.0.0.1", 0).is_err());
        assert!(TrafficSelector::from_strings(0, TsType::Ipv4AddrRange, "10.0.0.1", 9, "10.0.0.9", 1).is_err());
        assert!(TrafficSelector::from_strings(0, TsType::Ipv6AddrRange, "10.0.0.1", 0, "10.0.0.9", 0).is_err());
    }

    #[test]
    fn test_ipv6_any() {
        let ts = TrafficSelector::ipv6_any();
        assert_eq!(ts.ts_type(), TsType::Ipv6AddrRange);
        assert!(ts.contains("fe80::1".parse().unwrap(), 500));
        assert!(!ts.contains("10.0.0.1".parse().unwrap(), 500));
    }
}
