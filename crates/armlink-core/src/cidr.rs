//! Subnet address arithmetic.
//!
//! Azure reserves the network address and the next three (gateway and two
//! DNS mappings) plus the broadcast address of every subnet, so the usable
//! range is `netaddr + 4 ..= broadcast - 1`. The last usable address is also
//! what the subnet reports as its gateway.

use std::net::Ipv4Addr;
use std::str::FromStr;

use serde::Serialize;

use crate::error::CoreError;

const MAX_LENGTH: u8 = 32;
const RESERVED_HEAD: u32 = 4;

/// Addresses derived from a subnet's `A/L` prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SubnetRange {
    pub network: Ipv4Addr,
    pub mask: u8,
    pub gateway: Ipv4Addr,
    pub ip_start: Ipv4Addr,
    pub ip_end: Ipv4Addr,
}

/// Netmask for a prefix length as a `u32`.
fn cidr_mask(len: u8) -> u32 {
    if len == 0 {
        0
    } else {
        u32::MAX << (MAX_LENGTH - len)
    }
}

impl SubnetRange {
    pub fn new(addr: Ipv4Addr, mask: u8) -> Result<Self, CoreError> {
        if mask > MAX_LENGTH {
            return Err(CoreError::InvalidInput {
                message: format!("prefix length {mask} is longer than {MAX_LENGTH}"),
            });
        }
        let bits = cidr_mask(mask);
        let network = u32::from(addr) & bits;
        let broadcast = network | !bits;
        let gateway = broadcast.saturating_sub(1).max(network);

        Ok(Self {
            network: Ipv4Addr::from(network),
            mask,
            gateway: Ipv4Addr::from(gateway),
            ip_start: Ipv4Addr::from(network.saturating_add(RESERVED_HEAD).min(broadcast)),
            ip_end: Ipv4Addr::from(gateway),
        })
    }

    pub fn broadcast(&self) -> Ipv4Addr {
        Ipv4Addr::from(u32::from(self.network) | !cidr_mask(self.mask))
    }

    pub fn contains(&self, addr: Ipv4Addr) -> bool {
        u32::from(addr) & cidr_mask(self.mask) == u32::from(self.network)
    }
}

impl FromStr for SubnetRange {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CoreError::InvalidInput {
            message: format!("'{s}' is not an IPv4 CIDR"),
        };
        let (addr, len) = s.trim().split_once('/').ok_or_else(invalid)?;
        let addr: Ipv4Addr = addr.parse().map_err(|_| invalid())?;
        let len: u8 = len.parse().map_err(|_| invalid())?;
        Self::new(addr, len)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn slash_24() {
        let r: SubnetRange = "10.0.0.0/24".parse().unwrap();
        assert_eq!(r.ip_start, Ipv4Addr::new(10, 0, 0, 4));
        assert_eq!(r.ip_end, Ipv4Addr::new(10, 0, 0, 254));
        assert_eq!(r.gateway, r.ip_end);
        assert_eq!(r.mask, 24);
    }

    #[test]
    fn slash_16() {
        let r: SubnetRange = "172.16.0.0/16".parse().unwrap();
        assert_eq!(r.ip_start, Ipv4Addr::new(172, 16, 0, 4));
        assert_eq!(r.ip_end, Ipv4Addr::new(172, 16, 255, 254));
        assert_eq!(r.broadcast(), Ipv4Addr::new(172, 16, 255, 255));
    }

    #[test]
    fn host_bits_are_ignored() {
        let a: SubnetRange = "192.168.1.77/26".parse().unwrap();
        let b: SubnetRange = "192.168.1.64/26".parse().unwrap();
        assert_eq!(a, b);
        assert!(a.contains(Ipv4Addr::new(192, 168, 1, 100)));
        assert!(!a.contains(Ipv4Addr::new(192, 168, 1, 128)));
    }

    #[test]
    fn gateway_is_penultimate_address() {
        for cidr in ["10.1.0.0/20", "10.2.3.0/28", "100.64.0.0/10"] {
            let r: SubnetRange = cidr.parse().unwrap();
            assert_eq!(u32::from(r.gateway), u32::from(r.broadcast()) - 1, "{cidr}");
            assert_eq!(u32::from(r.ip_start), u32::from(r.network) + 4, "{cidr}");
        }
    }

    #[test]
    fn rejects_garbage() {
        assert!("10.0.0.0".parse::<SubnetRange>().is_err());
        assert!("10.0.0.0/33".parse::<SubnetRange>().is_err());
        assert!("fe80::/64".parse::<SubnetRange>().is_err());
    }
}
