//! subnet-planner: IPv4/IPv6 address-space partitioning.
//!
//! A pure, deterministic engine for working with network blocks: derive the
//! full addressing facts of a block, split it into smaller sibling blocks by
//! count or target prefix, join exact sibling groups back into their parent,
//! overlay AWS/Azure/GCP reserved-address rules, and rebuild the parent/child
//! hierarchy from the flat record set. No I/O, no shared state: every
//! operation is a function of its inputs, and the caller owns the live
//! subnet set.

pub mod cli;
pub mod error;
pub mod models;
pub mod output;
pub mod processing;
pub mod validation;

pub use error::{Error, Result};
pub use models::{AddressSpace, Block, BlockFacts, HostCount, SplitSubnet};
pub use processing::{
    apply_provider, build_tree, filter_tree, join_subnets, split_subnet, validate_join,
    validate_split, CloudProvider, OperationLog, SplitOptions, SplitRequest,
};
pub use validation::ValidationResult;

/// Parse a user-entered CIDR into a root record, normalizing host bits.
///
/// A host address with a shorter prefix (e.g. `10.0.0.5/24`) is accepted:
/// the network address is derived by masking and the adjustment is logged.
pub fn plan_root(cidr: &str) -> Result<SplitSubnet> {
    let block = match Block::from_cidr(cidr) {
        Ok(block) => block,
        Err(Error::InvalidBlock(_)) => {
            let block = Block::from_cidr_normalized(cidr)?;
            log::warn!("normalized '{cidr}' to its network address {block}");
            block
        }
        Err(err) => return Err(err),
    };
    Ok(SplitSubnet::root(block))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_root_accepts_host_address() {
        let root = plan_root("192.168.1.17/24").unwrap();
        assert_eq!(root.cidr(), "192.168.1.0/24");
        assert_eq!(root.level, 0);
    }

    #[test]
    fn test_plan_root_rejects_bad_prefix() {
        assert!(plan_root("192.168.1.0/40").is_err());
        assert!(plan_root("192.168.1.0").is_err());
        assert!(plan_root("not-an-address/24").is_err());
    }
}
