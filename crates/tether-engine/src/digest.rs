//! Aggregation shapes for reporting commands.
//!
//! Thin, presentation-adjacent layering over the resolver and recommender:
//! `tt digest` renders a [`StatusDigest`], `tt standup` renders a
//! [`StandupReport`]. No new semantics live here; every field is derived
//! from the other engine modules.

use std::collections::BTreeMap;

use serde::Serialize;

use tether_core::model::{Status, WorkItem};

use crate::readiness::{BlockedItem, resolve_readiness, tag_blocked};
use crate::recommend::{Recommendation, reasons, recommend_next};
use crate::score::is_quick_win;

/// Everything the daily workflow digest renders, from one snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct StatusDigest {
    pub total: usize,
    pub by_status: BTreeMap<String, usize>,
    pub by_kind: BTreeMap<String, usize>,
    pub ready: Vec<WorkItem>,
    pub blocked: Vec<BlockedItem>,
    /// Items manually tagged `blocked`, independent of the graph.
    pub tag_blocked: Vec<WorkItem>,
    /// Ready items with small remaining effort.
    pub quick_wins: Vec<WorkItem>,
    pub recommendation: Recommendation,
}

impl StatusDigest {
    #[must_use]
    pub fn build(items: &[WorkItem]) -> Self {
        let mut by_status = BTreeMap::new();
        let mut by_kind = BTreeMap::new();
        for item in items {
            *by_status.entry(item.status.to_string()).or_insert(0) += 1;
            *by_kind.entry(item.kind.to_string()).or_insert(0) += 1;
        }

        let partition = resolve_readiness(items);
        let quick_wins = partition
            .ready
            .iter()
            .filter(|item| is_quick_win(item))
            .cloned()
            .collect();

        Self {
            total: items.len(),
            by_status,
            by_kind,
            quick_wins,
            tag_blocked: tag_blocked(items).into_iter().cloned().collect(),
            recommendation: recommend_next(items),
            ready: partition.ready,
            blocked: partition.blocked,
        }
    }
}

/// The shapes the `tt standup` command renders.
#[derive(Debug, Clone, Serialize)]
pub struct StandupReport {
    /// Items currently in progress (the "what I'm doing" section).
    pub in_progress: Vec<WorkItem>,
    /// Recommended next item, with its reason lines.
    pub next: Option<WorkItem>,
    pub next_reasons: Vec<String>,
    /// Dependency-blocked items with their unresolved ids.
    pub blockers: Vec<BlockedItem>,
    /// Items manually tagged `blocked`.
    pub tag_blocked: Vec<WorkItem>,
}

impl StandupReport {
    /// Build the standup shapes, optionally scoped to one assignee.
    ///
    /// The assignee filter applies to the whole snapshot before resolution,
    /// so blockers and recommendations reflect only that person's items.
    #[must_use]
    pub fn build(items: &[WorkItem], assignee: Option<&str>) -> Self {
        let scoped: Vec<WorkItem> = match assignee {
            None => items.to_vec(),
            Some(who) => items
                .iter()
                .filter(|item| {
                    item.assigned_to
                        .as_deref()
                        .is_some_and(|a| a.eq_ignore_ascii_case(who))
                })
                .cloned()
                .collect(),
        };

        let in_progress = scoped
            .iter()
            .filter(|item| item.status == Status::InProgress)
            .cloned()
            .collect();

        let partition = resolve_readiness(&scoped);
        let recommendation = recommend_next(&scoped);
        let next_reasons = recommendation
            .best
            .as_ref()
            .map(reasons)
            .unwrap_or_default();

        Self {
            in_progress,
            next: recommendation.best,
            next_reasons,
            blockers: partition.blocked,
            tag_blocked: tag_blocked(&scoped).into_iter().cloned().collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
