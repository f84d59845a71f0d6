//! Cloud provider reservation overlays.
//!
//! AWS, Azure and GCP each reserve a fixed set of addresses in every subnet.
//! The overlay is stateless and idempotent: given a block and a provider it
//! computes the reserved addresses and the remaining usable-host count.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Error, Result};
use crate::models::{format_address, AddressSpace, Block, CloudReservation, HostCount};

/// Target environment for a subnet plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
pub enum CloudProvider {
    /// Plain RFC 950 / RFC 3021 semantics, no provider reservations.
    Standard,
    Aws,
    Azure,
    Gcp,
}

impl fmt::Display for CloudProvider {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CloudProvider::Standard => write!(f, "Standard"),
            CloudProvider::Aws => write!(f, "AWS"),
            CloudProvider::Azure => write!(f, "Azure"),
            CloudProvider::Gcp => write!(f, "GCP"),
        }
    }
}

/// Fixed reservation profile of one provider.
#[derive(Debug, Clone, Copy)]
pub struct ProviderProfile {
    /// Smallest (least specific) IPv4 prefix the provider accepts.
    pub min_prefix: u8,
    /// Largest (most specific) IPv4 prefix the provider accepts.
    pub max_prefix: u8,
    /// Number of addresses the provider reserves per subnet.
    pub reserved_count: u8,
    /// Offset of the first assignable host from the network address.
    pub first_usable_offset: u8,
}

const AWS_PROFILE: ProviderProfile = ProviderProfile {
    min_prefix: 16,
    max_prefix: 28,
    reserved_count: 5,
    first_usable_offset: 4,
};

const AZURE_PROFILE: ProviderProfile = ProviderProfile {
    min_prefix: 8,
    max_prefix: 29,
    reserved_count: 5,
    first_usable_offset: 4,
};

const GCP_PROFILE: ProviderProfile = ProviderProfile {
    min_prefix: 8,
    max_prefix: 29,
    reserved_count: 4,
    first_usable_offset: 2,
};

impl CloudProvider {
    /// The provider's IPv4 reservation profile; None for Standard.
    pub fn profile(&self) -> Option<&'static ProviderProfile> {
        match self {
            CloudProvider::Standard => None,
            CloudProvider::Aws => Some(&AWS_PROFILE),
            CloudProvider::Azure => Some(&AZURE_PROFILE),
            CloudProvider::Gcp => Some(&GCP_PROFILE),
        }
    }
}

/// Result of applying a provider overlay to one block.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CloudOverlay {
    /// Hosts assignable after the provider's reservations.
    pub usable_addresses: HostCount,
    /// First address a workload can actually take, past the reservations.
    /// None when the overlay defines no host layout (IPv6 advisory).
    pub first_usable_address: Option<String>,
    /// The reserved addresses, ascending.
    pub reservations: Vec<CloudReservation>,
    /// Advisory notes (currently only for IPv6 blocks).
    pub notes: Vec<String>,
}

/// Compute a provider's reserved addresses and usable-host count for a block.
///
/// Fails with [`Error::InsufficientAddressSpace`] when the block holds fewer
/// addresses than the provider reserves. The check runs before any offset
/// arithmetic so a first-usable address is never computed past the last
/// address of the block.
pub fn apply_provider(block: &Block, provider: CloudProvider) -> Result<CloudOverlay> {
    let profile = match provider.profile() {
        Some(p) => p,
        None => {
            let facts = block.facts();
            return Ok(CloudOverlay {
                usable_addresses: facts.usable_addresses,
                first_usable_address: Some(facts.first_host),
                reservations: Vec::new(),
                notes: Vec::new(),
            });
        }
    };

    // Providers define reservations against IPv4 subnets only; for IPv6 the
    // overlay is advisory and reserves nothing.
    if block.space() == AddressSpace::V6 {
        return Ok(CloudOverlay {
            usable_addresses: block.total_addresses(),
            first_usable_address: None,
            reservations: Vec::new(),
            notes: vec![format!(
                "{provider} reservations are not yet specialized for IPv6; the /64 per-subnet convention applies"
            )],
        });
    }

    // IPv4 only past this point, so the count fits comfortably in u128
    let total = 1u128 << block.span_bits();
    if total < u128::from(profile.reserved_count) {
        return Err(Error::InsufficientAddressSpace(format!(
            "a /{prefix} block holds only {total} addresses but {provider} reserves {reserved}; use a prefix between /{min} and /{max}",
            prefix = block.prefix(),
            reserved = profile.reserved_count,
            min = profile.min_prefix,
            max = profile.max_prefix,
        )));
    }

    let reservations = reservation_layout(block, provider);
    let first_usable = block.network() + u128::from(profile.first_usable_offset);
    Ok(CloudOverlay {
        usable_addresses: HostCount::Exact(total - u128::from(profile.reserved_count)),
        first_usable_address: Some(format_address(first_usable, block.space())),
        reservations,
        notes: Vec::new(),
    })
}

fn reservation_layout(block: &Block, provider: CloudProvider) -> Vec<CloudReservation> {
    let space = block.space();
    let net = block.network();
    let last = block.last();
    let at = |addr: u128, purpose: &str, description: &str| CloudReservation {
        address: format_address(addr, space),
        purpose: purpose.to_string(),
        description: description.to_string(),
    };

    match provider {
        CloudProvider::Aws => vec![
            at(net, "Network address", "Reserved by AWS: the network address"),
            at(net + 1, "VPC router", "Reserved by AWS for the VPC router"),
            at(net + 2, "DNS server", "Reserved by AWS for the Amazon-provided DNS"),
            at(net + 3, "Future use", "Reserved by AWS for future use"),
            at(last, "Broadcast", "Reserved by AWS: broadcast is not supported in a VPC"),
        ],
        CloudProvider::Azure => vec![
            at(net, "Network address", "Reserved by Azure: the network address"),
            at(net + 1, "Default gateway", "Reserved by Azure for the default gateway"),
            at(net + 2, "DNS mapping", "Reserved by Azure to map Azure DNS"),
            at(net + 3, "DNS mapping", "Reserved by Azure to map Azure DNS"),
            at(last, "Broadcast", "Reserved by Azure: the broadcast address"),
        ],
        CloudProvider::Gcp => vec![
            at(net, "Network address", "Reserved by GCP: the network address"),
            at(net + 1, "Default gateway", "Reserved by GCP for the subnet gateway"),
            at(last - 1, "Second-to-last", "Reserved by GCP for future use"),
            at(last, "Broadcast", "Reserved by GCP: the broadcast address"),
        ],
        CloudProvider::Standard => Vec::new(),
    }
}
