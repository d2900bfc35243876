//! Dependency-graph readiness resolution.
//!
//! # Overview
//!
//! This module partitions one snapshot of work items into *ready* and
//! *blocked* sets. An item is ready when it is open and every declared
//! dependency resolves; it is blocked when it is open and at least one
//! dependency does not resolve. Items that are not open are out of scope for
//! readiness entirely: a closed item is neither ready nor "blocked".
//!
//! # Resolution Semantics
//!
//! A dependency id resolves iff the referenced item is present in the
//! snapshot AND its status is `Closed`. Two consequences:
//!
//! - An id absent from the snapshot is unresolved and blocks its dependent.
//! - An id present but still open (or in progress) blocks its dependent.
//!
//! `blocked_by` lists every unresolved id, deduplicated, in declaration
//! order.
//!
//! # Explicitly Blocked
//!
//! A separate, narrower query, [`tag_blocked`], surfaces items carrying a
//! `blocked` tag regardless of dependency state. It is a tag filter, not a
//! graph computation, and reporting commands render it as its own section.

use std::collections::{HashMap, HashSet};

use serde::Serialize;
use tracing::debug;

use tether_core::model::{Status, WorkItem};

/// Tag that marks an item as manually blocked.
pub const BLOCKED_TAG: &str = "blocked";

/// Per-item readiness record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReadinessResult {
    pub id: String,
    pub ready: bool,
    /// Dependency ids that are unresolved (missing from the snapshot, or
    /// present but not closed). Empty iff `ready`.
    pub blocked_by: Vec<String>,
}

/// An open item held back by unresolved dependencies.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlockedItem {
    pub item: WorkItem,
    /// The unresolved dependency ids, in declaration order.
    pub reasons: Vec<String>,
}

/// The ready/blocked partition of one snapshot.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Readiness {
    pub ready: Vec<WorkItem>,
    pub blocked: Vec<BlockedItem>,
}

/// Compute a readiness record for every open item in the snapshot.
///
/// Non-open items produce no record. Order follows the snapshot.
#[must_use]
pub fn resolve(items: &[WorkItem]) -> Vec<ReadinessResult> {
    let by_id: HashMap<&str, &WorkItem> = items
        .iter()
        .map(|item| (item.id.as_str(), item))
        .collect();

    let results: Vec<ReadinessResult> = items
        .iter()
        .filter(|item| item.status == Status::Open)
        .map(|item| {
            let blocked_by = unresolved_dependencies(item, &by_id);
            ReadinessResult {
                id: item.id.clone(),
                ready: blocked_by.is_empty(),
                blocked_by,
            }
        })
        .collect();

    debug!(
        open = results.len(),
        ready = results.iter().filter(|r| r.ready).count(),
        "resolved snapshot readiness"
    );
    results
}

/// Partition the snapshot into ready items and blocked items with reasons.
///
/// The owned-item shape reporting commands and the recommender consume.
#[must_use]
pub fn resolve_readiness(items: &[WorkItem]) -> Readiness {
    let by_id: HashMap<&str, &WorkItem> = items
        .iter()
        .map(|item| (item.id.as_str(), item))
        .collect();

    let mut partition = Readiness::default();
    for item in items {
        if item.status != Status::Open {
            continue;
        }
        let reasons = unresolved_dependencies(item, &by_id);
        if reasons.is_empty() {
            partition.ready.push(item.clone());
        } else {
            partition.blocked.push(BlockedItem {
                item: item.clone(),
                reasons,
            });
        }
    }
    partition
}

/// Items carrying the `blocked` tag (case-insensitive), regardless of the
/// dependency graph. Closed items are excluded; they are already out of
/// scope for readiness.
#[must_use]
pub fn tag_blocked(items: &[WorkItem]) -> Vec<&WorkItem> {
    items
        .iter()
        .filter(|item| !item.status.is_closed() && item.has_tag(BLOCKED_TAG))
        .collect()
}

/// Every dependency id of `item` that does not resolve, deduplicated, in
/// declaration order.
fn unresolved_dependencies(item: &WorkItem, by_id: &HashMap<&str, &WorkItem>) -> Vec<String> {
    let mut seen = HashSet::new();
    item.dependencies
        .iter()
        .filter(|dep| seen.insert(dep.as_str()))
        .filter(|dep| !dependency_resolves(dep, by_id))
        .cloned()
        .collect()
}

fn dependency_resolves(dep: &str, by_id: &HashMap<&str, &WorkItem>) -> bool {
    by_id.get(dep).is_some_and(|item| item.status.is_closed())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tether_core::model::Status;

    fn open(id: &str) -> WorkItem {
        WorkItem::new(id, format!("Item {id}"))
    }

    fn with_deps(id: &str, deps: &[&str]) -> WorkItem {
        WorkItem {
            dependencies: deps.iter().map(ToString::to_string).collect(),
            ..open(id)
        }
    }

    fn with_status(mut item: WorkItem, status: Status) -> WorkItem {
        item.status = status;
        item
    }

    // -----------------------------------------------------------------------
    // resolve
    // -----------------------------------------------------------------------

    #[test]
    fn empty_snapshot_resolves_to_nothing() {
        assert!(resolve(&[]).is_empty());
        let partition = resolve_readiness(&[]);
        assert!(partition.ready.is_empty());
        assert!(partition.blocked.is_empty());
    }

    #[test]
    fn open_item_without_dependencies_is_ready() {
        // Property P1 / Scenario A.
        let items = vec![open("1")];
        let results = resolve(&items);

        assert_eq!(results.len(), 1);
        assert!(results[0].ready);
        assert!(results[0].blocked_by.is_empty());

        let partition = resolve_readiness(&items);
        assert_eq!(partition.ready.len(), 1);
        assert!(partition.blocked.is_empty());
    }

    #[test]
    fn missing_dependency_blocks_and_is_reported() {
        // Property P2 / Scenario B.
        let items = vec![with_deps("1", &["999"])];
        let results = resolve(&items);

        assert!(!results[0].ready);
        assert_eq!(results[0].blocked_by, vec!["999".to_string()]);

        let partition = resolve_readiness(&items);
        assert!(partition.ready.is_empty());
        assert_eq!(partition.blocked.len(), 1);
        assert_eq!(partition.blocked[0].reasons, vec!["999".to_string()]);
    }

    #[test]
    fn non_open_items_are_out_of_scope() {
        // Property P3: neither ready nor blocked.
        let items = vec![
            with_status(open("closed"), Status::Closed),
            with_status(with_deps("doing", &["999"]), Status::InProgress),
        ];

        assert!(resolve(&items).is_empty());
        let partition = resolve_readiness(&items);
        assert!(partition.ready.is_empty());
        assert!(partition.blocked.is_empty());
    }

    #[test]
    fn closed_dependency_resolves() {
        // Scenario C: dependency exists and is closed => dependent is ready.
        let items = vec![
            with_status(open("1"), Status::Closed),
            with_deps("2", &["1"]),
        ];

        let partition = resolve_readiness(&items);
        assert_eq!(partition.ready.len(), 1);
        assert_eq!(partition.ready[0].id, "2");
        assert!(partition.blocked.is_empty());
    }

    #[test]
    fn open_dependency_blocks() {
        // Status-checking resolution: a dependency that exists but is still
        // open does not resolve.
        let items = vec![open("1"), with_deps("2", &["1"])];

        let partition = resolve_readiness(&items);
        let ready_ids: Vec<&str> = partition.ready.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ready_ids, vec!["1"]);
        assert_eq!(partition.blocked.len(), 1);
        assert_eq!(partition.blocked[0].item.id, "2");
        assert_eq!(partition.blocked[0].reasons, vec!["1".to_string()]);
    }

    #[test]
    fn in_progress_dependency_blocks() {
        let items = vec![
            with_status(open("1"), Status::InProgress),
            with_deps("2", &["1"]),
        ];

        let partition = resolve_readiness(&items);
        assert!(partition.ready.is_empty());
        assert_eq!(partition.blocked[0].reasons, vec!["1".to_string()]);
    }

    #[test]
    fn all_dependencies_must_resolve() {
        let items = vec![
            with_status(open("a"), Status::Closed),
            open("b"),
            with_deps("c", &["a", "b", "ghost"]),
        ];

        let partition = resolve_readiness(&items);
        let blocked = &partition.blocked[0];
        assert_eq!(blocked.item.id, "c");
        assert_eq!(
            blocked.reasons,
            vec!["b".to_string(), "ghost".to_string()],
            "only unresolved ids appear, in declaration order"
        );
    }

    #[test]
    fn duplicate_dependency_ids_are_reported_once() {
        let items = vec![with_deps("1", &["x", "x", "x"])];
        let results = resolve(&items);
        assert_eq!(results[0].blocked_by, vec!["x".to_string()]);
    }

    #[test]
    fn chain_blocks_everything_after_the_first_open_item() {
        // 1 <- 2 <- 3: only 1 is ready until it closes.
        let items = vec![open("1"), with_deps("2", &["1"]), with_deps("3", &["2"])];

        let partition = resolve_readiness(&items);
        let ready_ids: Vec<&str> = partition.ready.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ready_ids, vec!["1"]);
        assert_eq!(partition.blocked.len(), 2);
    }

    #[test]
    fn self_dependency_blocks_the_item() {
        // A declared self-dependency never resolves while the item is open.
        let items = vec![with_deps("loop", &["loop"])];
        let results = resolve(&items);
        assert!(!results[0].ready);
        assert_eq!(results[0].blocked_by, vec!["loop".to_string()]);
    }

    #[test]
    fn partition_preserves_snapshot_order() {
        let items = vec![open("z"), open("a"), with_deps("m", &["ghost"]), open("k")];
        let partition = resolve_readiness(&items);
        let ready_ids: Vec<&str> = partition.ready.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ready_ids, vec!["z", "a", "k"]);
    }

    // -----------------------------------------------------------------------
    // tag_blocked
    // -----------------------------------------------------------------------

    #[test]
    fn tag_blocked_is_independent_of_the_graph() {
        let tagged = WorkItem {
            tags: vec!["Blocked".to_string()],
            ..open("tagged")
        };
        let items = vec![tagged, open("untagged")];

        let blocked = tag_blocked(&items);
        assert_eq!(blocked.len(), 1);
        assert_eq!(blocked[0].id, "tagged");

        // The tagged item still has no unresolved dependencies, so the graph
        // considers it ready. The two views are deliberately independent.
        let partition = resolve_readiness(&items);
        assert_eq!(partition.ready.len(), 2);
    }

    #[test]
    fn tag_blocked_includes_in_progress_but_not_closed() {
        let mut doing = WorkItem {
            tags: vec!["blocked".to_string()],
            ..open("doing")
        };
        doing.status = Status::InProgress;

        let mut closed = WorkItem {
            tags: vec!["blocked".to_string()],
            ..open("closed")
        };
        closed.status = Status::Closed;

        let items = vec![doing, closed];
        let blocked = tag_blocked(&items);
        assert_eq!(blocked.len(), 1);
        assert_eq!(blocked[0].id, "doing");
    }
}
