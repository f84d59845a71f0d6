//! Network block representation and addressing facts.

use serde::de;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use super::address::{
    address_count, format_address, host_span, network_mask, parse_address, AddressSpace, HostCount,
};
use crate::error::{Error, Result};

/// A normalized network block: a network address plus prefix length.
///
/// Invariant: every bit of `network` beyond `prefix` is zero. Constructors
/// enforce this, so a `Block` is always a true network address and never an
/// arbitrary host address. Blocks are immutable; splits and joins produce new
/// blocks rather than resizing one in place.
// field order matters to the derived Ord: family first, then numeric network
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Block {
    space: AddressSpace,
    network: u128,
    prefix: u8,
}

impl Serialize for Block {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        // the canonical text form; a raw u128 network would not survive a
        // JSON round-trip for V6 addresses past u64
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Block {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Block, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Block::from_cidr(&s).map_err(|e| de::Error::custom(format!("invalid CIDR '{s}': {e}")))
    }
}

impl Block {
    /// Create a block, rejecting out-of-range prefixes and unaligned networks.
    pub fn new(space: AddressSpace, network: u128, prefix: u8) -> Result<Block> {
        if prefix > space.bits() {
            return Err(Error::InvalidBlock(format!(
                "prefix /{prefix} is out of range for {space} (0..={max})",
                max = space.bits()
            )));
        }
        let aligned = network & network_mask(space, prefix);
        if aligned != network {
            return Err(Error::InvalidBlock(format!(
                "{addr}/{prefix} is not aligned; the network address is {net}",
                addr = format_address(network, space),
                net = format_address(aligned, space),
            )));
        }
        Ok(Block {
            space,
            network,
            prefix,
        })
    }

    /// Create a block by masking host bits off, instead of rejecting them.
    pub fn normalized(space: AddressSpace, addr: u128, prefix: u8) -> Result<Block> {
        if prefix > space.bits() {
            return Err(Error::InvalidBlock(format!(
                "prefix /{prefix} is out of range for {space} (0..={max})",
                max = space.bits()
            )));
        }
        Block::new(space, addr & network_mask(space, prefix), prefix)
    }

    /// Parse a CIDR string (e.g. "10.0.0.0/24" or "2001:db8::/32").
    ///
    /// The family is detected from the address text. A host address with a
    /// shorter prefix is rejected as misaligned; use [`Block::from_cidr_normalized`]
    /// to mask instead.
    pub fn from_cidr(cidr: &str) -> Result<Block> {
        let (addr, prefix, space) = split_cidr(cidr)?;
        Block::new(space, addr, prefix)
    }

    /// Parse a CIDR string, masking host bits off the address.
    pub fn from_cidr_normalized(cidr: &str) -> Result<Block> {
        let (addr, prefix, space) = split_cidr(cidr)?;
        Block::normalized(space, addr, prefix)
    }

    /// Address family of this block.
    pub fn space(&self) -> AddressSpace {
        self.space
    }

    /// The canonical network address.
    pub fn network(&self) -> u128 {
        self.network
    }

    /// Prefix length.
    pub fn prefix(&self) -> u8 {
        self.prefix
    }

    /// The highest address in the block (the broadcast address for
    /// traditional IPv4 blocks; informational only for IPv6).
    pub fn last(&self) -> u128 {
        self.network | host_span(self.space, self.prefix)
    }

    /// Number of host bits.
    pub fn span_bits(&self) -> u8 {
        self.space.bits() - self.prefix
    }

    /// Total number of addresses in the block.
    pub fn total_addresses(&self) -> HostCount {
        address_count(self.space, self.prefix)
    }

    /// True if `other` falls entirely within this block.
    pub fn contains(&self, other: &Block) -> bool {
        self.space == other.space
            && self.prefix <= other.prefix
            && (other.network & network_mask(self.space, self.prefix)) == self.network
    }

    /// The network address as text.
    pub fn network_text(&self) -> String {
        format_address(self.network, self.space)
    }

    /// Full addressing facts for this block.
    pub fn facts(&self) -> BlockFacts {
        let fmt = |addr: u128| format_address(addr, self.space);
        let total = self.total_addresses();
        let last = self.last();

        let (first_host, last_host, usable) = match self.space {
            AddressSpace::V4 => match self.prefix {
                // host route: the single address is the host
                32 => (self.network, self.network, HostCount::Exact(1)),
                // RFC 3021 point-to-point: both addresses usable
                31 => (self.network, last, HostCount::Exact(2)),
                // traditional: network and broadcast reserved
                _ => {
                    let total_exact = total.exact().unwrap_or(0);
                    (
                        self.network + 1,
                        last - 1,
                        HostCount::Exact(total_exact.saturating_sub(2)),
                    )
                }
            },
            // no broadcast concept, no reservation
            AddressSpace::V6 => (self.network, last, total),
        };

        let (subnet_mask, wildcard_mask) = match self.space {
            AddressSpace::V4 => (
                Some(fmt(network_mask(self.space, self.prefix))),
                Some(fmt(host_span(self.space, self.prefix))),
            ),
            AddressSpace::V6 => (None, None),
        };

        BlockFacts {
            cidr: self.to_string(),
            network: fmt(self.network),
            last: fmt(last),
            first_host: fmt(first_host),
            last_host: fmt(last_host),
            subnet_mask,
            wildcard_mask,
            total_addresses: total,
            usable_addresses: usable,
        }
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}/{}", self.network_text(), self.prefix)
    }
}

/// Derived addressing facts, all addresses already in canonical text form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockFacts {
    pub cidr: String,
    pub network: String,
    pub last: String,
    pub first_host: String,
    pub last_host: String,
    /// Dotted-quad subnet mask; IPv4 only.
    pub subnet_mask: Option<String>,
    /// Dotted-quad wildcard mask; IPv4 only.
    pub wildcard_mask: Option<String>,
    pub total_addresses: HostCount,
    pub usable_addresses: HostCount,
}

fn split_cidr(cidr: &str) -> Result<(u128, u8, AddressSpace)> {
    let cidr = cidr.trim();
    let (addr_text, prefix_text) = cidr
        .split_once('/')
        .ok_or_else(|| Error::InvalidAddressFormat(format!("'{cidr}' is not in address/prefix form")))?;
    let space = AddressSpace::of_text(addr_text);
    let addr = parse_address(addr_text, space)?;
    let prefix: u8 = prefix_text
        .parse()
        .map_err(|_| Error::InvalidAddressFormat(format!("'{prefix_text}' is not a valid prefix length")))?;
    if prefix > space.bits() {
        return Err(Error::InvalidBlock(format!(
            "prefix /{prefix} is out of range for {space} (0..={max})",
            max = space.bits()
        )));
    }
    Ok((addr, prefix, space))
}
