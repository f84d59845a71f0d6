//! Domain models for subnet planning.
//!
//! This module contains the core data structures used throughout the engine:
//! - [`AddressSpace`] and the address codec - canonical integer form of V4/V6 text
//! - [`Block`] - a normalized network address with prefix length
//! - [`SplitSubnet`] - a block plus lineage and presentation metadata
//! - [`SubnetOperation`] - the immutable audit record behind undo

mod address;
mod block;
mod subnet;

// Re-export public types
pub use address::{
    address_count, classify_ipv6, format_address, host_span, network_mask, parse_address,
    AddressSpace, HostCount, MAX_LENGTH_V4, MAX_LENGTH_V6,
};
pub use block::{Block, BlockFacts};
pub use subnet::{CloudReservation, Ipv6Info, OperationKind, SplitSubnet, SubnetOperation};
