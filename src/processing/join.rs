//! Subnet recombination (join).
//!
//! A candidate set of sibling subnets is validated as one exact, gapless,
//! non-overlapping, equal-sized, power-of-two-count, bit-aligned group, and
//! collapsed into the single parent block that covers it. Input order does
//! not matter; the checks run against the set sorted by network address.
//!
//! Each rule failure carries its own message; callers display (and some
//! match on) these strings, so they are never collapsed into one generic
//! error.

use itertools::Itertools;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::{format_address, host_span, Block, Ipv6Info, SplitSubnet};
use crate::validation::ValidationResult;

/// Validate a candidate join group without building the parent.
///
/// Checks run in a fixed order and short-circuit on the first failure, so
/// `errors[0]` always names the first violated rule.
pub fn validate_join(subnets: &[SplitSubnet]) -> ValidationResult {
    match check_group(subnets) {
        Ok(_) => ValidationResult::ok(),
        Err(err) => {
            let mut v = ValidationResult::failed(err.to_string());
            if let Error::InvalidJoinGroup(msg) = &err {
                if msg.contains("power of 2") {
                    v.push_suggestion("select 2, 4, 8, ... subnets of equal size".to_string());
                }
            }
            v
        }
    }
}

/// Join sibling subnets into their exact parent.
///
/// On success the result covers precisely the union of the inputs: network =
/// the group minimum, prefix = child prefix - log2(count). The record is
/// tagged one level above the shallowest child, and inherits the children's
/// common `parent_id` when they share one.
pub fn join_subnets(subnets: &[SplitSubnet]) -> Result<SplitSubnet> {
    let (parent_block, sorted) = check_group(subnets)?;

    let level = sorted
        .iter()
        .map(|s| s.level)
        .min()
        .unwrap_or(1)
        .saturating_sub(1);
    let parent_id = common_parent_id(&sorted);

    log::debug!(
        "join {count} x /{prefix} -> {parent_block}",
        count = sorted.len(),
        prefix = sorted[0].block.prefix(),
    );

    Ok(SplitSubnet {
        id: Uuid::new_v4().to_string(),
        parent_id,
        level,
        ipv6_info: Ipv6Info::for_block(&parent_block),
        block: parent_block,
        cloud_reserved: None,
        selected: false,
    })
}

/// Run the join rules in order; on success returns the covering parent block
/// and the children sorted by network address.
fn check_group(subnets: &[SplitSubnet]) -> Result<(Block, Vec<&SplitSubnet>)> {
    // Rule 1: enough subnets, one address family.
    if subnets.len() < 2 {
        return Err(Error::InvalidJoinGroup(
            "At least 2 subnets are required to join".to_string(),
        ));
    }
    let space = subnets[0].block.space();
    if subnets.iter().any(|s| s.block.space() != space) {
        return Err(Error::InvalidJoinGroup(
            "All subnets must be the same IP version".to_string(),
        ));
    }

    // Rule 2: equal size.
    let prefix = subnets[0].block.prefix();
    if subnets.iter().any(|s| s.block.prefix() != prefix) {
        return Err(Error::InvalidJoinGroup(
            "All subnets must be the same size".to_string(),
        ));
    }

    // Rule 3: power-of-two count.
    let count = subnets.len();
    if !count.is_power_of_two() {
        return Err(Error::InvalidJoinGroup(format!(
            "The number of subnets must be a power of 2, got {count}"
        )));
    }
    let merge_bits = count.trailing_zeros() as u8;
    if merge_bits > prefix {
        // e.g. 8 x /2 blocks cannot merge into a /-1
        return Err(Error::InvalidJoinGroup(format!(
            "{count} subnets of /{prefix} cannot merge into a single {space} block"
        )));
    }

    let sorted: Vec<&SplitSubnet> = subnets
        .iter()
        .sorted_by_key(|s| s.block.network())
        .collect();

    // Rule 4: no two subnets overlap, anywhere in the group. This pass runs
    // to completion before any gap is reported, so a group carrying both
    // defects always names the overlap. Equal-sized blocks overlap exactly
    // when they coincide, so sorted neighbors are the only candidates.
    // checked: a block ending at the very top of the 128-bit space has no
    // successor, so anything sorting after it must overlap.
    let block_size = host_span(space, prefix) + 1;
    for pair in sorted.windows(2) {
        let (prev, next) = (pair[0], pair[1]);
        let expected = prev.block.network().checked_add(block_size);
        if expected.map_or(true, |e| next.block.network() < e) {
            return Err(Error::InvalidJoinGroup(format!(
                "Overlapping subnets detected: {prev} and {next}",
                prev = prev.cidr(),
                next = next.cidr(),
            )));
        }
    }

    // Rule 5: each consecutive pair is exactly adjacent.
    for pair in sorted.windows(2) {
        let (prev, next) = (pair[0], pair[1]);
        if next.block.network() > prev.block.network() + block_size {
            return Err(Error::InvalidJoinGroup(format!(
                "Gap detected between {prev} and {next}",
                prev = prev.cidr(),
                next = next.cidr(),
            )));
        }
    }

    // Rule 6: the group must sit on a true parent boundary. Count and
    // spacing can both hold while the group straddles two parents (e.g. the
    // 2nd and 3rd quarters of a 4-way split).
    let parent_prefix = prefix - merge_bits;
    let min_network = sorted[0].block.network();
    let parent_span = host_span(space, parent_prefix);
    if min_network & parent_span != 0 {
        let aligned = min_network & !parent_span;
        return Err(Error::InvalidJoinGroup(format!(
            "Subnets are adjacent but do not align to a /{parent_prefix} parent boundary; a valid group starts at {start}",
            start = format_address(aligned, space),
        )));
    }

    let parent_block = Block::new(space, min_network, parent_prefix)?;
    Ok((parent_block, sorted))
}

/// The children's shared `parent_id`, when every child agrees on one.
fn common_parent_id(sorted: &[&SplitSubnet]) -> Option<String> {
    let first = sorted[0].parent_id.as_ref()?;
    sorted
        .iter()
        .all(|s| s.parent_id.as_deref() == Some(first.as_str()))
        .then(|| first.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::split::{split_subnet, SplitOptions, SplitRequest};

    fn root(cidr: &str) -> SplitSubnet {
        SplitSubnet::root(Block::from_cidr(cidr).unwrap())
    }

    fn subnet(cidr: &str) -> SplitSubnet {
        root(cidr)
    }

    #[test]
    fn test_join_two_halves() {
        let joined = join_subnets(&[subnet("10.0.0.0/25"), subnet("10.0.0.128/25")]).unwrap();
        assert_eq!(joined.cidr(), "10.0.0.0/24");
    }

    #[test]
    fn test_join_is_order_independent() {
        let joined = join_subnets(&[
            subnet("10.0.0.192/26"),
            subnet("10.0.0.0/26"),
            subnet("10.0.0.128/26"),
            subnet("10.0.0.64/26"),
        ])
        .unwrap();
        assert_eq!(joined.cidr(), "10.0.0.0/24");
    }

    #[test]
    fn test_join_requires_two() {
        let err = join_subnets(&[subnet("10.0.0.0/25")]).unwrap_err();
        assert!(err.to_string().contains("At least 2 subnets"));
    }

    #[test]
    fn test_join_rejects_mixed_versions() {
        let err = join_subnets(&[subnet("10.0.0.0/25"), subnet("2001:db8::/64")]).unwrap_err();
        assert!(err.to_string().contains("same IP version"));
    }

    #[test]
    fn test_join_rejects_size_mismatch() {
        let err = join_subnets(&[subnet("10.0.0.0/25"), subnet("10.0.0.128/26")]).unwrap_err();
        assert!(err.to_string().contains("All subnets must be the same size"));
    }

    #[test]
    fn test_join_rejects_non_power_of_two_count() {
        let err = join_subnets(&[
            subnet("10.0.0.0/26"),
            subnet("10.0.0.64/26"),
            subnet("10.0.0.128/26"),
        ])
        .unwrap_err();
        assert!(err.to_string().contains("power of 2"));
        let v = validate_join(&[
            subnet("10.0.0.0/26"),
            subnet("10.0.0.64/26"),
            subnet("10.0.0.128/26"),
        ]);
        assert!(!v.is_valid);
        assert!(!v.suggestions.is_empty());
    }

    #[test]
    fn test_join_rejects_overlap_distinctly() {
        let err = join_subnets(&[subnet("10.0.0.0/25"), subnet("10.0.0.0/25")]).unwrap_err();
        assert!(err.to_string().contains("Overlapping subnets"));
        assert!(!err.to_string().contains("Gap"));
    }

    #[test]
    fn test_join_reports_overlap_before_gap() {
        // gap at .0 -> .128 and a duplicate .128: the overlap rule runs to
        // completion first, so it wins regardless of position
        let err = join_subnets(&[
            subnet("10.0.0.0/26"),
            subnet("10.0.0.128/26"),
            subnet("10.0.0.128/26"),
            subnet("10.0.0.192/26"),
        ])
        .unwrap_err();
        assert!(
            err.to_string().contains("Overlapping subnets"),
            "overlap must be named, not the earlier gap: {err}"
        );
    }

    #[test]
    fn test_join_rejects_gap() {
        // skipping 2001:db8:0:1::/64
        let err = join_subnets(&[subnet("2001:db8::/64"), subnet("2001:db8:0:2::/64")])
            .unwrap_err();
        assert!(err.to_string().contains("Gap detected"));
    }

    #[test]
    fn test_join_rejects_misaligned_group() {
        // 2nd and 3rd quarters of 10.0.0.0/24: right count, size and
        // adjacency, but not sitting on a /25 boundary.
        let err = join_subnets(&[subnet("10.0.0.64/26"), subnet("10.0.0.128/26")]).unwrap_err();
        assert!(err.to_string().contains("parent boundary"));
    }

    #[test]
    fn test_join_restores_lineage() {
        let parent = root("10.0.0.0/16");
        let outcome = split_subnet(
            &parent,
            &SplitRequest::Equal { count: 4 },
            &SplitOptions::default(),
        )
        .unwrap();
        let joined = join_subnets(&outcome.subnets).unwrap();
        assert_eq!(joined.block, parent.block);
        assert_eq!(joined.level, 0);
        assert_eq!(joined.parent_id.as_deref(), Some(parent.id.as_str()));
    }

    #[test]
    fn test_join_v6_sets_info() {
        let joined = join_subnets(&[subnet("2001:db8::/64"), subnet("2001:db8:0:1::/64")])
            .unwrap();
        assert_eq!(joined.cidr(), "2001:db8::/63");
        let info = joined.ipv6_info.unwrap();
        assert_eq!(info.address_type, "Documentation");
        assert_eq!(info.total_addresses, "2^65");
    }

    #[test]
    fn test_round_trip_across_depths() {
        // join(split(B, 2^k)) == B for k in 0..=8, both families
        for cidr in ["192.168.0.0/16", "2001:db8::/48"] {
            let parent = root(cidr);
            for k in 1..=8u32 {
                let outcome = split_subnet(
                    &parent,
                    &SplitRequest::Equal { count: 1u64 << k },
                    &SplitOptions::default(),
                )
                .unwrap();
                assert_eq!(outcome.subnets.len(), 1usize << k);
                let joined = join_subnets(&outcome.subnets).unwrap();
                assert_eq!(joined.block, parent.block, "round trip failed for {cidr} k={k}");
            }
        }
    }
}
