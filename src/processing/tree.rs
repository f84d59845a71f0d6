//! Hierarchy model over the flat subnet set.
//!
//! The tree is a pure function of the live `SplitSubnet` set: one pass
//! buckets records by `parent_id`, then each sibling group is sorted
//! numerically by network address. Nothing here is cached, so the tree can
//! never fall out of sync with the flat set it was built from.

use itertools::Itertools;
use std::collections::HashMap;

use crate::models::SplitSubnet;

/// One node of the rendered hierarchy.
#[derive(Debug, Clone)]
pub struct SubnetNode {
    pub subnet: SplitSubnet,
    pub children: Vec<SubnetNode>,
}

impl SubnetNode {
    /// Number of nodes in this subtree, itself included.
    pub fn size(&self) -> usize {
        1 + self.children.iter().map(SubnetNode::size).sum::<usize>()
    }
}

/// Build the parent/child tree from the flat set.
///
/// A record whose `parent_id` is unset, or names an id absent from the set,
/// becomes a root. Roots and every sibling group come back sorted ascending
/// by network address (numeric, not lexicographic on the text form).
pub fn build_tree(subnets: &[SplitSubnet]) -> Vec<SubnetNode> {
    let ids: HashMap<&str, &SplitSubnet> =
        subnets.iter().map(|s| (s.id.as_str(), s)).collect();

    let mut children_of: HashMap<&str, Vec<&SplitSubnet>> = HashMap::new();
    let mut roots: Vec<&SplitSubnet> = Vec::new();
    for subnet in subnets {
        match subnet.parent_id.as_deref().filter(|pid| ids.contains_key(pid)) {
            Some(pid) => children_of.entry(pid).or_default().push(subnet),
            None => roots.push(subnet),
        }
    }

    roots
        .into_iter()
        .sorted_by_key(|s| s.block)
        .map(|s| build_node(s, &children_of))
        .collect()
}

fn build_node(subnet: &SplitSubnet, children_of: &HashMap<&str, Vec<&SplitSubnet>>) -> SubnetNode {
    let children = children_of
        .get(subnet.id.as_str())
        .into_iter()
        .flatten()
        .copied()
        .sorted_by_key(|s| s.block)
        .map(|s| build_node(s, children_of))
        .collect();
    SubnetNode {
        subnet: subnet.clone(),
        children,
    }
}

/// Filter a tree, keeping every node that matches `predicate` or has a
/// surviving descendant. Ancestors of a match are always retained so the
/// path to it stays visible.
pub fn filter_tree<F>(nodes: &[SubnetNode], predicate: &F) -> Vec<SubnetNode>
where
    F: Fn(&SplitSubnet) -> bool,
{
    nodes
        .iter()
        .filter_map(|node| {
            let children = filter_tree(&node.children, predicate);
            if predicate(&node.subnet) || !children.is_empty() {
                Some(SubnetNode {
                    subnet: node.subnet.clone(),
                    children,
                })
            } else {
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Block;
    use crate::processing::split::{split_subnet, SplitOptions, SplitRequest};

    fn plan() -> Vec<SplitSubnet> {
        let root = SplitSubnet::root(Block::from_cidr("10.0.0.0/16").unwrap());
        let halves = split_subnet(
            &root,
            &SplitRequest::Equal { count: 2 },
            &SplitOptions::default(),
        )
        .unwrap()
        .subnets;
        let quarters = split_subnet(
            &halves[1],
            &SplitRequest::Equal { count: 2 },
            &SplitOptions::default(),
        )
        .unwrap()
        .subnets;
        let mut all = vec![root];
        all.extend(halves);
        all.extend(quarters);
        all
    }

    #[test]
    fn test_build_tree_shape() {
        let all = plan();
        let roots = build_tree(&all);
        assert_eq!(roots.len(), 1);
        assert_eq!(roots[0].subnet.cidr(), "10.0.0.0/16");
        assert_eq!(roots[0].children.len(), 2);
        assert_eq!(roots[0].children[1].children.len(), 2);
        assert_eq!(roots[0].size(), 5);
    }

    #[test]
    fn test_siblings_sorted_numerically() {
        let all = plan();
        let roots = build_tree(&all);
        let halves = &roots[0].children;
        assert_eq!(halves[0].subnet.cidr(), "10.0.0.0/17");
        assert_eq!(halves[1].subnet.cidr(), "10.0.128.0/17");
    }

    #[test]
    fn test_orphans_become_roots() {
        let mut all = plan();
        // drop the root; its children must surface as roots
        all.remove(0);
        let roots = build_tree(&all);
        assert_eq!(roots.len(), 2);
        assert_eq!(roots[0].subnet.cidr(), "10.0.0.0/17");
    }

    #[test]
    fn test_filter_keeps_ancestors_of_matches() {
        let all = plan();
        let roots = build_tree(&all);
        let filtered = filter_tree(&roots, &|s: &SplitSubnet| s.cidr() == "10.0.192.0/18");
        // path root -> 10.0.128.0/17 -> 10.0.192.0/18 survives
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].children.len(), 1);
        assert_eq!(filtered[0].children[0].subnet.cidr(), "10.0.128.0/17");
        assert_eq!(
            filtered[0].children[0].children[0].subnet.cidr(),
            "10.0.192.0/18"
        );
    }

    #[test]
    fn test_filter_drops_non_matching_subtrees() {
        let all = plan();
        let roots = build_tree(&all);
        let filtered = filter_tree(&roots, &|s: &SplitSubnet| s.level > 9);
        assert!(filtered.is_empty());
    }
}
