//! Heuristic priority scoring.
//!
//! Lower score = recommend sooner. The score is a weighted linear
//! combination: the priority tier sets the base, and each qualifying bonus
//! pulls the score down independently:
//!
//! `score = priority * W_PRIORITY - bug - quick_win - critical_tag`
//!
//! `W_PRIORITY` exceeds the sum of all bonuses, so no combination of bonuses
//! can flip a full priority-tier comparison; priority stays the primary
//! sort key. Scores are comparable only within one snapshot; they are never
//! persisted or compared across runs.

use serde::Serialize;

use tether_core::model::{Kind, WorkItem};

/// Base weight per priority tier. Dominates every bonus combined.
pub const W_PRIORITY: f64 = 100.0;
/// Bonus for bugs: a bug outranks a same-priority task.
pub const B_BUG: f64 = 25.0;
/// Bonus for quick wins (small remaining effort).
pub const B_QUICK: f64 = 15.0;
/// Bonus for a critical/urgent tag.
pub const B_TAG: f64 = 10.0;
/// Remaining-work threshold (hours) under which an item is a quick win.
pub const QUICK_WIN_HOURS: f64 = 2.0;
/// Priority tier used when an item declares none (lowest urgency).
pub const DEFAULT_PRIORITY: u8 = 4;

// Bonuses must never flip a priority-tier comparison.
const _: () = assert!(W_PRIORITY > B_BUG + B_QUICK + B_TAG);

/// A work item paired with its snapshot-relative rank score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredCandidate {
    pub item: WorkItem,
    pub score: f64,
}

/// Score one item. Lower is better. Total: missing fields score with neutral
/// defaults, never an error.
#[must_use]
pub fn score(item: &WorkItem) -> f64 {
    let priority = item.priority.unwrap_or(DEFAULT_PRIORITY);
    let mut score = f64::from(priority) * W_PRIORITY;

    if item.kind == Kind::Bug {
        score -= B_BUG;
    }
    if is_quick_win(item) {
        score -= B_QUICK;
    }
    if has_critical_tag(item) {
        score -= B_TAG;
    }

    score
}

/// Score every given item and sort ascending.
///
/// The sort is stable, so equal scores keep snapshot order, the only
/// tie-break the engine guarantees. Callers that want readiness filtering
/// apply [`crate::readiness::resolve_readiness`] first.
#[must_use]
pub fn score_and_rank(items: &[WorkItem]) -> Vec<ScoredCandidate> {
    let mut ranked: Vec<ScoredCandidate> = items
        .iter()
        .map(|item| ScoredCandidate {
            item: item.clone(),
            score: score(item),
        })
        .collect();

    ranked.sort_by(|a, b| a.score.total_cmp(&b.score));
    ranked
}

/// Remaining work known and at or under the quick-win threshold.
///
/// Missing remaining work is neutral: no bonus.
#[must_use]
pub fn is_quick_win(item: &WorkItem) -> bool {
    item.remaining_work
        .is_some_and(|hours| hours <= QUICK_WIN_HOURS)
}

/// Tagged `critical` or `urgent` (case-insensitive).
#[must_use]
pub fn has_critical_tag(item: &WorkItem) -> bool {
    item.has_tag("critical") || item.has_tag("urgent")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tether_core::model::Kind;

    fn task(id: &str) -> WorkItem {
        WorkItem::new(id, format!("Item {id}"))
    }

    #[test]
    fn lower_priority_number_scores_lower() {
        // Property P4.
        let p1 = WorkItem {
            priority: Some(1),
            ..task("a")
        };
        let p3 = WorkItem {
            priority: Some(3),
            ..task("b")
        };
        assert!(score(&p1) < score(&p3));
    }

    #[test]
    fn bug_scores_lower_than_task() {
        // Property P5.
        let bug = WorkItem {
            kind: Kind::Bug,
            ..task("a")
        };
        assert!(score(&bug) < score(&task("b")));
    }

    #[test]
    fn smaller_remaining_work_scores_lower() {
        // Property P6: 1h is a quick win, 8h is not.
        let quick = WorkItem {
            remaining_work: Some(1.0),
            ..task("a")
        };
        let slow = WorkItem {
            remaining_work: Some(8.0),
            ..task("b")
        };
        assert!(score(&quick) < score(&slow));
    }

    #[test]
    fn critical_tag_scores_lower() {
        // Property P7; "urgent" counts too, and the bonus applies once.
        let critical = WorkItem {
            tags: vec!["critical".to_string()],
            ..task("a")
        };
        let both = WorkItem {
            tags: vec!["critical".to_string(), "urgent".to_string()],
            ..task("b")
        };
        let plain = task("c");

        assert!(score(&critical) < score(&plain));
        assert!((score(&both) - score(&critical)).abs() < f64::EPSILON);
    }

    #[test]
    fn missing_fields_default_to_lowest_urgency_and_neutral_effort() {
        let bare = task("bare");
        assert!((score(&bare) - f64::from(DEFAULT_PRIORITY) * W_PRIORITY).abs() < f64::EPSILON);

        // Zero remaining work is a quick win; absent remaining work is not.
        let zero = WorkItem {
            remaining_work: Some(0.0),
            ..task("zero")
        };
        assert!(score(&zero) < score(&bare));
    }

    #[test]
    fn bonuses_never_flip_a_priority_tier() {
        // A priority-2 item with every bonus still loses to a plain
        // priority-1 item.
        let stacked_p2 = WorkItem {
            kind: Kind::Bug,
            priority: Some(2),
            remaining_work: Some(0.5),
            tags: vec!["critical".to_string()],
            ..task("stacked")
        };
        let plain_p1 = WorkItem {
            priority: Some(1),
            ..task("plain")
        };
        assert!(score(&plain_p1) < score(&stacked_p2));
    }

    #[test]
    fn rank_is_ascending_and_stable_on_ties() {
        let first = task("first");
        let second = task("second");
        let urgent = WorkItem {
            priority: Some(1),
            ..task("urgent")
        };

        let ranked = score_and_rank(&[first, second, urgent]);
        let ids: Vec<&str> = ranked.iter().map(|c| c.item.id.as_str()).collect();

        assert_eq!(ids, vec!["urgent", "first", "second"]);
        assert!(ranked[0].score <= ranked[1].score);
        assert!(ranked[1].score <= ranked[2].score);
    }

    #[test]
    fn scenario_d_bug_beats_task() {
        // Bug{p1, 2h, critical+urgent} vs Task{p3, 8h, no tags}.
        let bug = WorkItem {
            kind: Kind::Bug,
            priority: Some(1),
            remaining_work: Some(2.0),
            tags: vec!["critical".to_string(), "urgent".to_string()],
            ..task("bug")
        };
        let plain = WorkItem {
            priority: Some(3),
            remaining_work: Some(8.0),
            ..task("task")
        };

        let ranked = score_and_rank(&[plain, bug]);
        assert_eq!(ranked[0].item.id, "bug");
    }
}
