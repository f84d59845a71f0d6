//! Operation history and undo.
//!
//! The engine itself is stateless; the caller owns the live subnet set and
//! holds an [`OperationLog`] as a plain value beside it. Each split or join
//! appends one immutable [`SubnetOperation`]. Undo reverses the most recent
//! record against the live set the caller passes in: a Split's children are
//! removed, a Join's result is removed and its sources restored.

use chrono::Utc;
use std::collections::HashMap;
use uuid::Uuid;

use crate::models::{OperationKind, SplitSubnet, SubnetOperation};

/// Append-only log of split/join operations with undo support.
#[derive(Debug, Default)]
pub struct OperationLog {
    operations: Vec<SubnetOperation>,
    /// Records consumed by a join, kept so undo can restore them.
    retired: HashMap<String, SplitSubnet>,
}

impl OperationLog {
    pub fn new() -> OperationLog {
        OperationLog::default()
    }

    /// Recorded operations, oldest first.
    pub fn operations(&self) -> &[SubnetOperation] {
        &self.operations
    }

    /// Record a split of `parent` into `children`.
    pub fn record_split(&mut self, parent: &SplitSubnet, children: &[SplitSubnet]) {
        self.operations.push(SubnetOperation {
            id: Uuid::new_v4().to_string(),
            kind: OperationKind::Split,
            timestamp: Utc::now(),
            source_subnet_ids: vec![parent.id.clone()],
            result_subnets: children.to_vec(),
            description: format!(
                "Split {parent} into {count} subnets",
                parent = parent.cidr(),
                count = children.len()
            ),
        });
    }

    /// Record a join of `sources` into `result`.
    pub fn record_join(&mut self, sources: &[SplitSubnet], result: &SplitSubnet) {
        for source in sources {
            self.retired.insert(source.id.clone(), source.clone());
        }
        self.operations.push(SubnetOperation {
            id: Uuid::new_v4().to_string(),
            kind: OperationKind::Join,
            timestamp: Utc::now(),
            source_subnet_ids: sources.iter().map(|s| s.id.clone()).collect(),
            result_subnets: vec![result.clone()],
            description: format!(
                "Joined {count} subnets into {result}",
                count = sources.len(),
                result = result.cidr()
            ),
        });
    }

    /// Undo the most recent operation against `live`, returning the updated
    /// set. A no-op when the log is empty.
    pub fn undo_last(&mut self, mut live: Vec<SplitSubnet>) -> Vec<SplitSubnet> {
        let op = match self.operations.pop() {
            Some(op) => op,
            None => return live,
        };
        log::debug!("undo {kind:?}: {desc}", kind = op.kind, desc = op.description);

        match op.kind {
            OperationKind::Split => {
                let result_ids: Vec<&str> =
                    op.result_subnets.iter().map(|s| s.id.as_str()).collect();
                live.retain(|s| !result_ids.contains(&s.id.as_str()));
            }
            OperationKind::Join => {
                let result_ids: Vec<&str> =
                    op.result_subnets.iter().map(|s| s.id.as_str()).collect();
                live.retain(|s| !result_ids.contains(&s.id.as_str()));
                for source_id in &op.source_subnet_ids {
                    if let Some(source) = self.retired.remove(source_id) {
                        live.push(source);
                    }
                }
            }
        }
        live
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Block;
    use crate::processing::join::join_subnets;
    use crate::processing::split::{split_subnet, SplitOptions, SplitRequest};

    #[test]
    fn test_undo_split_removes_children() {
        let root = SplitSubnet::root(Block::from_cidr("10.0.0.0/24").unwrap());
        let outcome = split_subnet(
            &root,
            &SplitRequest::Equal { count: 2 },
            &SplitOptions::default(),
        )
        .unwrap();

        let mut log = OperationLog::new();
        log.record_split(&root, &outcome.subnets);

        let mut live = vec![root.clone()];
        live.extend(outcome.subnets);
        assert_eq!(live.len(), 3);

        let live = log.undo_last(live);
        assert_eq!(live.len(), 1);
        assert_eq!(live[0].id, root.id);
        assert!(log.operations().is_empty());
    }

    #[test]
    fn test_undo_join_restores_sources() {
        let root = SplitSubnet::root(Block::from_cidr("10.0.0.0/24").unwrap());
        let halves = split_subnet(
            &root,
            &SplitRequest::Equal { count: 2 },
            &SplitOptions::default(),
        )
        .unwrap()
        .subnets;
        let joined = join_subnets(&halves).unwrap();

        let mut log = OperationLog::new();
        log.record_join(&halves, &joined);

        let live = log.undo_last(vec![joined]);
        assert_eq!(live.len(), 2);
        let mut cidrs: Vec<String> = live.iter().map(|s| s.cidr()).collect();
        cidrs.sort();
        assert_eq!(cidrs, vec!["10.0.0.0/25", "10.0.0.128/25"]);
    }

    #[test]
    fn test_undo_on_empty_log_is_noop() {
        let root = SplitSubnet::root(Block::from_cidr("10.0.0.0/24").unwrap());
        let mut log = OperationLog::new();
        let live = log.undo_last(vec![root]);
        assert_eq!(live.len(), 1);
    }

    #[test]
    fn test_operations_record_descriptions() {
        let root = SplitSubnet::root(Block::from_cidr("10.0.0.0/24").unwrap());
        let outcome = split_subnet(
            &root,
            &SplitRequest::Equal { count: 4 },
            &SplitOptions::default(),
        )
        .unwrap();
        let mut log = OperationLog::new();
        log.record_split(&root, &outcome.subnets);
        let op = &log.operations()[0];
        assert_eq!(op.kind, OperationKind::Split);
        assert_eq!(op.source_subnet_ids, vec![root.id.clone()]);
        assert_eq!(op.result_subnets.len(), 4);
        assert!(op.description.contains("10.0.0.0/24"));
    }
}
