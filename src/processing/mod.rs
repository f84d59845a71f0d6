//! Partitioning and hierarchy logic.
//!
//! This module contains the engine's operations:
//! - [`split`] - dividing a block into equal children or down to a prefix
//! - [`join`] - recombining sibling blocks into their exact parent
//! - [`cloud`] - AWS/Azure/GCP reserved-address overlays
//! - [`tree`] - rebuilding the parent/child hierarchy from the flat set
//! - [`history`] - operation audit records and undo

mod cloud;
mod history;
mod join;
mod split;
mod tree;

// Re-export public functions
pub use cloud::{apply_provider, CloudOverlay, CloudProvider, ProviderProfile};
pub use history::OperationLog;
pub use join::{join_subnets, validate_join};
pub use split::{split_subnet, validate_split, SplitOptions, SplitOutcome, SplitRequest};
pub use tree::{build_tree, filter_tree, SubnetNode};
