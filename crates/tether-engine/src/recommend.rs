//! Best-next-task selection.
//!
//! Combines the readiness resolver and the scorer: filter to the ready set,
//! rank ascending, pick the minimum, and keep a bounded list of runners-up.
//! Reason strings are a pure presentation of the same predicates the scorer
//! uses, not a separate inference step.

use serde::Serialize;
use tracing::debug;

use tether_core::model::{Kind, WorkItem};
use tether_core::source::WorkItemSource;

use crate::readiness::resolve_readiness;
use crate::score::{self, score_and_rank};

/// Upper bound on the alternatives list.
pub const MAX_ALTERNATIVES: usize = 3;

/// The recommendation produced from one snapshot.
///
/// `best == None` means nothing is actionable; callers render a "no
/// available tasks" message. `alternatives` never contains the best item.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Recommendation {
    pub best: Option<WorkItem>,
    pub alternatives: Vec<WorkItem>,
}

/// Select the single best ready item, or `None` when nothing is ready.
///
/// Minimum score wins; ties keep snapshot order (stable sort, no secondary
/// key).
#[must_use]
pub fn find_best_task(items: &[WorkItem]) -> Option<WorkItem> {
    recommend_next(items).best
}

/// Select the best ready item plus up to [`MAX_ALTERNATIVES`] runners-up,
/// sorted ascending by score.
#[must_use]
pub fn recommend_next(items: &[WorkItem]) -> Recommendation {
    let ready = resolve_readiness(items).ready;
    recommendation_from_ranked(score_and_rank(&ready))
}

/// Like [`recommend_next`], but confirms each candidate against the backend
/// before selecting it.
///
/// Candidates are visited in rank order; one that still reports unresolved
/// dependency links on the backend is skipped. The probe is fail-open inside
/// the source (a transport failure reports "no dependency"), so a flaky
/// backend degrades to plain [`recommend_next`] behavior. A single failed
/// check never aborts the batch.
#[must_use]
pub fn recommend_next_confirmed<S: WorkItemSource + ?Sized>(
    items: &[WorkItem],
    source: &S,
) -> Recommendation {
    let ready = resolve_readiness(items).ready;
    let ranked = score_and_rank(&ready);

    let confirmed: Vec<_> = ranked
        .into_iter()
        .filter(|candidate| {
            let linked = source.check_dependency_links(&candidate.item.id);
            if linked {
                debug!(id = %candidate.item.id, "backend reports unresolved links, skipping");
            }
            !linked
        })
        .collect();

    recommendation_from_ranked(confirmed)
}

fn recommendation_from_ranked(ranked: Vec<score::ScoredCandidate>) -> Recommendation {
    let mut candidates = ranked.into_iter().map(|candidate| candidate.item);
    let best = candidates.next();

    let alternatives: Vec<WorkItem> = match &best {
        None => Vec::new(),
        Some(best) => candidates
            .filter(|item| item.id != best.id)
            .take(MAX_ALTERNATIVES)
            .collect(),
    };

    Recommendation { best, alternatives }
}

/// Human-readable reasons the given item was recommended.
///
/// Purely derived from the item's fields, mirroring the scoring predicates.
/// Always returns at least one line.
#[must_use]
pub fn reasons(item: &WorkItem) -> Vec<String> {
    let mut reasons = Vec::new();

    if item.kind == Kind::Bug {
        reasons.push("bug fixes need immediate attention".to_string());
    }
    if item.priority == Some(1) {
        reasons.push("highest priority".to_string());
    }
    if score::is_quick_win(item) {
        reasons.push(format!(
            "quick win ({}h or less remaining)",
            score::QUICK_WIN_HOURS
        ));
    }
    if score::has_critical_tag(item) {
        reasons.push("tagged as critical".to_string());
    }

    if reasons.is_empty() {
        reasons.push("next in priority order".to_string());
    }
    reasons
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
