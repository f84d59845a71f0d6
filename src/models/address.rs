//! Address codec and width-generic bit arithmetic.
//!
//! Both address families are carried as a canonical `u128` (IPv4 lives in the
//! low 32 bits) so the split/join arithmetic is written once against a single
//! integer type. Text conversion goes through [`std::net::Ipv4Addr`] and
//! [`std::net::Ipv6Addr`]; IPv6 formatting therefore always produces the
//! RFC 5952 compressed form (longest zero run of two or more groups, leftmost
//! on ties, single zero groups never compressed).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};

use crate::error::{Error, Result};

/// Maximum prefix length for an IPv4 block (32 bits).
pub const MAX_LENGTH_V4: u8 = 32;
/// Maximum prefix length for an IPv6 block (128 bits).
pub const MAX_LENGTH_V6: u8 = 128;

/// Address family of a block. Fixed per operation, never mixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AddressSpace {
    V4,
    V6,
}

impl AddressSpace {
    /// Width of the address space in bits.
    pub fn bits(&self) -> u8 {
        match self {
            AddressSpace::V4 => MAX_LENGTH_V4,
            AddressSpace::V6 => MAX_LENGTH_V6,
        }
    }

    /// Detect the family of a textual address by its separator.
    pub fn of_text(text: &str) -> AddressSpace {
        if text.contains(':') {
            AddressSpace::V6
        } else {
            AddressSpace::V4
        }
    }
}

impl fmt::Display for AddressSpace {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AddressSpace::V4 => write!(f, "IPv4"),
            AddressSpace::V6 => write!(f, "IPv6"),
        }
    }
}

/// Parse a textual address into its canonical integer form.
///
/// IPv4 accepts exactly four dot-separated decimal octets; IPv6 accepts
/// standard colon-hex groups with at most one `::` run. Anything else,
/// including an address of the wrong family, is rejected.
pub fn parse_address(text: &str, space: AddressSpace) -> Result<u128> {
    let text = text.trim();
    match space {
        AddressSpace::V4 => {
            let addr: Ipv4Addr = text
                .parse()
                .map_err(|_| Error::InvalidAddressFormat(format!("'{text}' is not a valid IPv4 address")))?;
            Ok(u32::from(addr) as u128)
        }
        AddressSpace::V6 => {
            let addr: Ipv6Addr = text
                .parse()
                .map_err(|_| Error::InvalidAddressFormat(format!("'{text}' is not a valid IPv6 address")))?;
            Ok(u128::from(addr))
        }
    }
}

/// Format a canonical address as text.
///
/// IPv4 produces dotted-quad; IPv6 produces the canonical compressed form.
pub fn format_address(addr: u128, space: AddressSpace) -> String {
    match space {
        AddressSpace::V4 => Ipv4Addr::from(addr as u32).to_string(),
        AddressSpace::V6 => Ipv6Addr::from(addr).to_string(),
    }
}

/// All-ones host span for a prefix: `2^(W - prefix) - 1`.
///
/// This is the distance from a network address to the last address of its
/// block, computed without overflow even for a /0 in the 128-bit space.
pub fn host_span(space: AddressSpace, prefix: u8) -> u128 {
    let bits = space.bits() - prefix;
    if bits >= 128 {
        u128::MAX
    } else {
        (1u128 << bits) - 1
    }
}

/// Network mask for a prefix, as a canonical integer.
pub fn network_mask(space: AddressSpace, prefix: u8) -> u128 {
    let width_mask = host_span(space, 0);
    width_mask & !host_span(space, prefix)
}

/// Number of addresses in one block of the given prefix, as displayable count.
pub fn address_count(space: AddressSpace, prefix: u8) -> HostCount {
    HostCount::from_span_bits(space.bits() - prefix)
}

/// An address count that may exceed what is sensible to print in full.
///
/// Counts of up to 53 bits render as the literal integer; anything larger
/// renders as a `2^n` magnitude instead of materializing dozens of digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostCount {
    Exact(u128),
    PowerOfTwo(u8),
}

impl HostCount {
    /// Count of `2^bits` addresses.
    pub fn from_span_bits(bits: u8) -> HostCount {
        if bits > 53 {
            HostCount::PowerOfTwo(bits)
        } else {
            HostCount::Exact(1u128 << bits)
        }
    }

    /// The literal value, when small enough to be represented exactly.
    pub fn exact(&self) -> Option<u128> {
        match self {
            HostCount::Exact(n) => Some(*n),
            HostCount::PowerOfTwo(_) => None,
        }
    }
}

impl fmt::Display for HostCount {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            HostCount::Exact(n) => write!(f, "{n}"),
            HostCount::PowerOfTwo(bits) => write!(f, "2^{bits}"),
        }
    }
}

impl Serialize for HostCount {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for HostCount {
    fn deserialize<D>(deserializer: D) -> std::result::Result<HostCount, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        if let Some(bits) = s.strip_prefix("2^") {
            let bits: u8 = bits
                .parse()
                .map_err(|_| serde::de::Error::custom(format!("invalid magnitude: {s}")))?;
            Ok(HostCount::PowerOfTwo(bits))
        } else {
            let n: u128 = s
                .parse()
                .map_err(|_| serde::de::Error::custom(format!("invalid count: {s}")))?;
            Ok(HostCount::Exact(n))
        }
    }
}

/// Classification of an IPv6 address, for display alongside a block.
pub fn classify_ipv6(addr: u128) -> &'static str {
    let ip = Ipv6Addr::from(addr);
    if ip.is_unspecified() {
        "Unspecified"
    } else if ip.is_loopback() {
        "Loopback"
    } else if (addr >> 118) == 0b1111_1110_10 {
        "Link-local unicast"
    } else if (addr >> 121) == 0b1111_110 {
        "Unique local"
    } else if (addr >> 120) == 0xff {
        "Multicast"
    } else if (addr >> 96) == 0x2001_0db8 {
        "Documentation"
    } else if ip.to_ipv4_mapped().is_some() {
        "IPv4-mapped"
    } else {
        "Global unicast"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_v4() {
        assert_eq!(
            parse_address("192.168.1.0", AddressSpace::V4).unwrap(),
            0xC0A80100
        );
        assert_eq!(parse_address("0.0.0.0", AddressSpace::V4).unwrap(), 0);
        assert_eq!(
            parse_address("255.255.255.255", AddressSpace::V4).unwrap(),
            0xFFFFFFFF
        );
    }

    #[test]
    fn test_parse_v4_rejects_garbage() {
        assert!(parse_address("192.168.1", AddressSpace::V4).is_err());
        assert!(parse_address("192.168.1.0.5", AddressSpace::V4).is_err());
        assert!(parse_address("192.168.1.256", AddressSpace::V4).is_err());
        assert!(parse_address("192.168.1.0 x", AddressSpace::V4).is_err());
        // wrong family
        assert!(parse_address("2001:db8::", AddressSpace::V4).is_err());
    }

    #[test]
    fn test_parse_v6() {
        assert_eq!(
            parse_address("2001:db8::", AddressSpace::V6).unwrap(),
            0x2001_0db8_0000_0000_0000_0000_0000_0000
        );
        assert_eq!(parse_address("::1", AddressSpace::V6).unwrap(), 1);
    }

    #[test]
    fn test_parse_v6_rejects_double_compression() {
        assert!(parse_address("2001::db8::1", AddressSpace::V6).is_err());
        assert!(parse_address("2001:db8:zzzz::", AddressSpace::V6).is_err());
        assert!(parse_address("1:2:3:4:5:6:7:8:9", AddressSpace::V6).is_err());
    }

    #[test]
    fn test_format_v6_compression() {
        // longest run compressed, leftmost wins ties
        let addr = parse_address("2001:0db8:0000:0000:0001:0000:0000:0001", AddressSpace::V6)
            .unwrap();
        assert_eq!(format_address(addr, AddressSpace::V6), "2001:db8::1:0:0:1");
        // single zero group is never compressed
        let addr = parse_address("2001:db8:0:1:1:1:1:1", AddressSpace::V6).unwrap();
        assert_eq!(format_address(addr, AddressSpace::V6), "2001:db8:0:1:1:1:1:1");
    }

    #[test]
    fn test_host_span() {
        assert_eq!(host_span(AddressSpace::V4, 24), 255);
        assert_eq!(host_span(AddressSpace::V4, 32), 0);
        assert_eq!(host_span(AddressSpace::V4, 0), 0xFFFFFFFF);
        assert_eq!(host_span(AddressSpace::V6, 0), u128::MAX);
        assert_eq!(host_span(AddressSpace::V6, 64), (1u128 << 64) - 1);
    }

    #[test]
    fn test_network_mask() {
        assert_eq!(network_mask(AddressSpace::V4, 24), 0xFFFFFF00);
        assert_eq!(network_mask(AddressSpace::V4, 0), 0);
        assert_eq!(network_mask(AddressSpace::V4, 32), 0xFFFFFFFF);
        assert_eq!(
            network_mask(AddressSpace::V6, 64),
            u128::MAX << 64
        );
    }

    #[test]
    fn test_host_count_display() {
        assert_eq!(HostCount::from_span_bits(8).to_string(), "256");
        assert_eq!(HostCount::from_span_bits(53).to_string(), (1u64 << 53).to_string());
        assert_eq!(HostCount::from_span_bits(64).to_string(), "2^64");
        assert_eq!(HostCount::from_span_bits(128).to_string(), "2^128");
    }

    #[test]
    fn test_classify_ipv6() {
        let parse = |s| parse_address(s, AddressSpace::V6).unwrap();
        assert_eq!(classify_ipv6(parse("::1")), "Loopback");
        assert_eq!(classify_ipv6(parse("::")), "Unspecified");
        assert_eq!(classify_ipv6(parse("fe80::1")), "Link-local unicast");
        assert_eq!(classify_ipv6(parse("fd00::1")), "Unique local");
        assert_eq!(classify_ipv6(parse("ff02::1")), "Multicast");
        assert_eq!(classify_ipv6(parse("2001:db8::1")), "Documentation");
        assert_eq!(classify_ipv6(parse("2607:f8b0::1")), "Global unicast");
    }
}
