//! Error types for subnet planning.
//!
//! Every failure in the engine is local and recoverable: bad input always comes
//! back as a typed [`Error`], never a panic, and validation runs before any
//! enumeration so there are no half-built result sets.

use thiserror::Error;

/// Result type for subnet planning operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Subnet planner errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Text could not be parsed as an address of the requested family.
    #[error("Invalid address format: {0}")]
    InvalidAddressFormat(String),

    /// A block with an out-of-range prefix or a network address that has
    /// host bits set.
    #[error("Invalid block: {0}")]
    InvalidBlock(String),

    /// A split request that can never succeed (count below 2, target prefix
    /// not more specific than the parent, target beyond the address width).
    #[error("Invalid split request: {0}")]
    InvalidSplitRequest(String),

    /// The split would produce more children than the configured cap.
    #[error("Too many results: splitting would create {requested} subnets, which exceeds the maximum of {max}")]
    TooManyResults { requested: String, max: usize },

    /// A candidate join set that is not one exact, gapless, aligned sibling
    /// group. The message names the specific violated rule.
    #[error("Invalid join group: {0}")]
    InvalidJoinGroup(String),

    /// A cloud overlay applied to a block too small to hold the provider's
    /// reserved addresses.
    #[error("Insufficient address space: {0}")]
    InsufficientAddressSpace(String),
}
