//! Subnet records produced by splits and joins.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::address::{classify_ipv6, AddressSpace};
use super::block::Block;

/// A block plus the lineage and presentation metadata the planner tracks.
///
/// Records are immutable once created: splitting or joining produces new
/// records and retires old ones from the live set. `parent_id` is a weak
/// reference by id; the tree structure itself is rebuilt on demand from the
/// flat set (see [`crate::processing::build_tree`]).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SplitSubnet {
    /// Stable unique id.
    pub id: String,
    /// Id of the block this one was split from, if any.
    pub parent_id: Option<String>,
    /// Depth below the originally entered block (root = 0).
    pub level: u32,
    /// The block itself.
    pub block: Block,
    /// Cloud provider reservations, when a provider overlay was applied.
    pub cloud_reserved: Option<Vec<CloudReservation>>,
    /// IPv6 classification and counts; None for IPv4 blocks.
    pub ipv6_info: Option<Ipv6Info>,
    /// Presentation-layer selection flag. Opaque to the engine: no
    /// arithmetic or validation ever reads it.
    #[serde(default)]
    pub selected: bool,
}

impl SplitSubnet {
    /// A root record (level 0, no parent) for a user-entered block.
    pub fn root(block: Block) -> SplitSubnet {
        SplitSubnet {
            id: Uuid::new_v4().to_string(),
            parent_id: None,
            level: 0,
            ipv6_info: Ipv6Info::for_block(&block),
            block,
            cloud_reserved: None,
            selected: false,
        }
    }

    /// A child record produced by splitting `parent`.
    pub fn child_of(parent: &SplitSubnet, block: Block) -> SplitSubnet {
        SplitSubnet {
            id: Uuid::new_v4().to_string(),
            parent_id: Some(parent.id.clone()),
            level: parent.level + 1,
            ipv6_info: Ipv6Info::for_block(&block),
            block,
            cloud_reserved: None,
            selected: false,
        }
    }

    /// Address family of the record.
    pub fn ip_version(&self) -> AddressSpace {
        self.block.space()
    }

    /// The block in CIDR text form.
    pub fn cidr(&self) -> String {
        self.block.to_string()
    }
}

/// One provider-reserved address inside a block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloudReservation {
    /// The reserved address, in canonical text form.
    pub address: String,
    /// Short purpose tag (e.g. "Network address", "VPC router").
    pub purpose: String,
    /// Human-readable description.
    pub description: String,
}

/// IPv6 presentation details attached to V6 records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ipv6Info {
    /// Address-type classification (e.g. "Global unicast", "Documentation").
    pub address_type: String,
    /// Total address count, formatted ("2^64" beyond display range).
    pub total_addresses: String,
}

impl Ipv6Info {
    /// Classification for a block; None for IPv4.
    pub fn for_block(block: &Block) -> Option<Ipv6Info> {
        match block.space() {
            AddressSpace::V4 => None,
            AddressSpace::V6 => Some(Ipv6Info {
                address_type: classify_ipv6(block.network()).to_string(),
                total_addresses: block.total_addresses().to_string(),
            }),
        }
    }
}

/// Kind of a recorded operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OperationKind {
    Split,
    Join,
}

/// Immutable audit record of one split or join.
///
/// Supports undo: undoing a Split removes `result_subnets` from the live set;
/// undoing a Join removes the single result and restores the sources.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubnetOperation {
    pub id: String,
    pub kind: OperationKind,
    pub timestamp: DateTime<Utc>,
    /// Ids of the records the operation consumed.
    pub source_subnet_ids: Vec<String>,
    /// Records the operation produced.
    pub result_subnets: Vec<SplitSubnet>,
    pub description: String,
}
