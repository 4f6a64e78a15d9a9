//! Interface addressing and subnet arithmetic.

use std::fmt;
use std::net::Ipv4Addr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// One IPv4 address bound to an interface.
///
/// An interface carries at most one primary address; every other address is
/// a secondary. Ordering within the interface's list is configuration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterfaceIp {
    /// Host address.
    pub address: Ipv4Addr,

    /// Dotted-decimal network mask.
    pub mask: Ipv4Addr,

    /// Whether this is a secondary address.
    pub secondary: bool,
}

impl InterfaceIp {
    /// Create a primary address.
    pub fn primary(address: Ipv4Addr, mask: Ipv4Addr) -> Self {
        Self {
            address,
            mask,
            secondary: false,
        }
    }

    /// Create a secondary address.
    pub fn secondary(address: Ipv4Addr, mask: Ipv4Addr) -> Self {
        Self {
            address,
            mask,
            secondary: true,
        }
    }

    /// Network address (host bits cleared).
    pub fn network(&self) -> Ipv4Addr {
        Ipv4Addr::from(u32::from(self.address) & u32::from(self.mask))
    }

    /// Broadcast address (host bits set).
    pub fn broadcast(&self) -> Ipv4Addr {
        Ipv4Addr::from(u32::from(self.address) | !u32::from(self.mask))
    }

    /// Mask length in bits.
    pub fn prefix_len(&self) -> u8 {
        u32::from(self.mask).count_ones() as u8
    }

    /// Whether this subnet and `other` share any addresses.
    pub fn overlaps(&self, other: &InterfaceIp) -> bool {
        u32::from(self.network()) <= u32::from(other.broadcast())
            && u32::from(other.network()) <= u32::from(self.broadcast())
    }
}

impl fmt::Display for InterfaceIp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.address, self.prefix_len())
    }
}

/// A static route: destination network plus next hop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaticRoute {
    /// Destination network address.
    pub destination: Ipv4Addr,

    /// Destination network mask.
    pub mask: Ipv4Addr,

    /// Next-hop address.
    pub next_hop: Ipv4Addr,
}

/// Parse a dotted-decimal IPv4 address token.
pub fn parse_addr(token: &str) -> Result<Ipv4Addr, ConfigError> {
    token
        .parse()
        .map_err(|_| ConfigError::InvalidValue(token.to_string()))
}

/// Parse a dotted-decimal mask token, requiring contiguous set bits.
pub fn parse_mask(token: &str) -> Result<Ipv4Addr, ConfigError> {
    let mask = parse_addr(token)?;
    let bits = u32::from(mask);
    // A valid mask is all ones followed by all zeros.
    if bits != 0 && (!bits).wrapping_add(1) & !bits != 0 {
        return Err(ConfigError::InvalidValue(token.to_string()));
    }
    Ok(mask)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ip(s: &str) -> Ipv4Addr {
        s.parse().unwrap()
    }

    #[test]
    fn test_network_and_broadcast() {
        let addr = InterfaceIp::primary(ip("2.2.2.2"), ip("255.255.255.0"));
        assert_eq!(addr.network(), ip("2.2.2.0"));
        assert_eq!(addr.broadcast(), ip("2.2.2.255"));
        assert_eq!(addr.prefix_len(), 24);
        assert_eq!(addr.to_string(), "2.2.2.2/24");
    }

    #[test]
    fn test_overlap_detection() {
        let wide = InterfaceIp::primary(ip("2.2.2.2"), ip("255.255.255.0"));
        let narrow = InterfaceIp::primary(ip("2.2.2.75"), ip("255.255.255.128"));
        let elsewhere = InterfaceIp::primary(ip("3.3.3.1"), ip("255.255.255.0"));

        // /25 sits inside the /24
        assert!(wide.overlaps(&narrow));
        assert!(narrow.overlaps(&wide));
        assert!(!wide.overlaps(&elsewhere));
    }

    #[test]
    fn test_parse_mask_rejects_holes() {
        assert!(parse_mask("255.255.255.0").is_ok());
        assert!(parse_mask("255.255.255.128").is_ok());
        assert!(parse_mask("255.0.255.0").is_err());
        assert!(parse_mask("not-a-mask").is_err());
    }
}
