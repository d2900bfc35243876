use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// The kinds of work item tether tracks.
///
/// Source trackers use a wider, open vocabulary; [`Kind::from_source`]
/// normalizes it. Unknown kinds coerce to `Task` at the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    Task,
    Bug,
    Story,
    Feature,
    Epic,
}

impl Kind {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Task => "task",
            Self::Bug => "bug",
            Self::Story => "story",
            Self::Feature => "feature",
            Self::Epic => "epic",
        }
    }

    /// Normalize a source-tracker kind label.
    ///
    /// Returns `None` for vocabulary tether does not recognize; callers log a
    /// data-quality warning and fall back to [`Kind::Task`].
    #[must_use]
    pub fn from_source(raw: &str) -> Option<Self> {
        match normalize(raw).as_str() {
            "task" => Some(Self::Task),
            "bug" | "defect" | "issue" => Some(Self::Bug),
            "story" | "user story" | "user_story" | "userstory" => Some(Self::Story),
            "feature" => Some(Self::Feature),
            "epic" => Some(Self::Epic),
            _ => None,
        }
    }
}

impl Default for Kind {
    fn default() -> Self {
        Self::Task
    }
}

/// Canonical lifecycle status.
///
/// Every backend vocabulary collapses into these three states; readiness only
/// ever looks at the canonical value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Open,
    InProgress,
    Closed,
}

impl Status {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::InProgress => "in_progress",
            Self::Closed => "closed",
        }
    }

    /// Normalize a source-tracker status label.
    ///
    /// Returns `None` for unknown vocabulary; callers warn and fall back to
    /// `Open` (anomalies degrade to "treat as available", never to an error).
    #[must_use]
    pub fn from_source(raw: &str) -> Option<Self> {
        match normalize(raw).as_str() {
            "open" | "new" | "to do" | "todo" | "to_do" | "proposed" | "backlog" => {
                Some(Self::Open)
            }
            "in_progress" | "in progress" | "inprogress" | "active" | "started" | "doing"
            | "committed" => Some(Self::InProgress),
            "closed" | "done" | "completed" | "finished" | "resolved" | "removed" => {
                Some(Self::Closed)
            }
            _ => None,
        }
    }

    /// Returns `true` for the canonical `Open` state.
    #[must_use]
    pub const fn is_open(self) -> bool {
        matches!(self, Self::Open)
    }

    /// Returns `true` for the canonical `Closed` state.
    #[must_use]
    pub const fn is_closed(self) -> bool {
        matches!(self, Self::Closed)
    }

    /// Validate whether a transition from self to `target` is allowed.
    ///
    /// Valid transitions:
    /// - `open -> in_progress`
    /// - `open -> closed`
    /// - `in_progress -> closed`
    /// - `in_progress -> open` (pause)
    /// - `closed -> open` (reopen)
    pub fn can_transition_to(self, target: Self) -> Result<(), InvalidTransition> {
        if self == target {
            return Err(InvalidTransition {
                from: self,
                to: target,
                reason: "no-op transition is not allowed",
            });
        }

        let allowed = matches!(
            (self, target),
            (Self::Open, Self::InProgress)
                | (Self::Open, Self::Closed)
                | (Self::InProgress, Self::Closed)
                | (Self::InProgress, Self::Open)
                | (Self::Closed, Self::Open)
        );

        if allowed {
            Ok(())
        } else {
            Err(InvalidTransition {
                from: self,
                to: target,
                reason: "transition not allowed by lifecycle rules",
            })
        }
    }
}

impl Default for Status {
    fn default() -> Self {
        Self::Open
    }
}

/// A normalized work item: one read-only snapshot record.
///
/// Snapshots are rebuilt from a backend on every command invocation; nothing
/// downstream mutates or persists them. `dependencies` may reference ids that
/// are absent from the snapshot; the readiness resolver treats those as
/// unresolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkItem {
    pub id: String,
    pub title: String,
    pub kind: Kind,
    pub status: Status,
    pub dependencies: Vec<String>,
    /// 1 = highest urgency. `None` scores as the lowest urgency tier.
    pub priority: Option<u8>,
    /// Remaining effort in hours. `None` scores as neutral.
    pub remaining_work: Option<f64>,
    pub tags: Vec<String>,
    /// Hint that the item can be worked concurrently with siblings.
    /// Informational only; never affects readiness.
    pub parallel: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Default for WorkItem {
    fn default() -> Self {
        Self {
            id: String::new(),
            title: String::new(),
            kind: Kind::Task,
            status: Status::Open,
            dependencies: Vec::new(),
            priority: None,
            remaining_work: None,
            tags: Vec::new(),
            parallel: false,
            assigned_to: None,
            description: None,
            updated_at: None,
        }
    }
}

impl WorkItem {
    /// Convenience constructor for an open task with the given id and title.
    #[must_use]
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            ..Self::default()
        }
    }

    /// Case-insensitive tag membership test.
    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }
}

/// Snapshot filter passed to [`crate::source::WorkItemSource::list_candidates`].
///
/// All fields are conjunctive; `None`/empty means "no constraint".
#[derive(Debug, Clone, Default)]
pub struct CandidateFilter {
    pub status: Option<Status>,
    pub kind: Option<Kind>,
    pub tags: Vec<String>,
    pub assigned_to: Option<String>,
    pub limit: Option<usize>,
}

impl CandidateFilter {
    /// Returns `true` if `item` satisfies every constraint in the filter.
    ///
    /// `limit` is not a per-item predicate; sources apply it after filtering.
    #[must_use]
    pub fn matches(&self, item: &WorkItem) -> bool {
        if self.status.is_some_and(|status| item.status != status) {
            return false;
        }
        if self.kind.is_some_and(|kind| item.kind != kind) {
            return false;
        }
        if !self.tags.iter().all(|tag| item.has_tag(tag)) {
            return false;
        }
        if let Some(assignee) = &self.assigned_to {
            let matches = item
                .assigned_to
                .as_deref()
                .is_some_and(|a| a.eq_ignore_ascii_case(assignee));
            if !matches {
                return false;
            }
        }
        true
    }
}

/// Error returned when a status transition is invalid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidTransition {
    pub from: Status,
    pub to: Status,
    pub reason: &'static str,
}

impl fmt::Display for InvalidTransition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cannot move {} -> {}: {}", self.from, self.to, self.reason)
    }
}

impl std::error::Error for InvalidTransition {}

/// Error returned when parsing an enum value from text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseEnumError {
    pub expected: &'static str,
    pub got: String,
}

impl fmt::Display for ParseEnumError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid {}: '{}'", self.expected, self.got)
    }
}

impl std::error::Error for ParseEnumError {}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn normalize(input: &str) -> String {
    input.trim().to_ascii_lowercase()
}

impl FromStr for Kind {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_source(s).ok_or_else(|| ParseEnumError {
            expected: "kind",
            got: s.to_string(),
        })
    }
}

impl FromStr for Status {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_source(s).ok_or_else(|| ParseEnumError {
            expected: "status",
            got: s.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{CandidateFilter, InvalidTransition, Kind, Status, WorkItem};
    use std::str::FromStr;

    #[test]
    fn enum_json_roundtrips() {
        assert_eq!(serde_json::to_string(&Kind::Task).unwrap(), "\"task\"");
        assert_eq!(serde_json::to_string(&Kind::Story).unwrap(), "\"story\"");
        assert_eq!(
            serde_json::to_string(&Status::InProgress).unwrap(),
            "\"in_progress\""
        );

        assert_eq!(serde_json::from_str::<Kind>("\"bug\"").unwrap(), Kind::Bug);
        assert_eq!(
            serde_json::from_str::<Status>("\"open\"").unwrap(),
            Status::Open
        );
    }

    #[test]
    fn display_parse_roundtrips() {
        for value in [Kind::Task, Kind::Bug, Kind::Story, Kind::Feature, Kind::Epic] {
            let rendered = value.to_string();
            let reparsed = Kind::from_str(&rendered).unwrap();
            assert_eq!(value, reparsed);
        }

        for value in [Status::Open, Status::InProgress, Status::Closed] {
            let rendered = value.to_string();
            let reparsed = Status::from_str(&rendered).unwrap();
            assert_eq!(value, reparsed);
        }
    }

    #[test]
    fn status_normalizes_source_vocabularies() {
        for raw in ["open", "New", "to do", "TODO", "proposed"] {
            assert_eq!(Status::from_source(raw), Some(Status::Open), "{raw}");
        }
        for raw in ["in_progress", "In Progress", "active", "started", "doing"] {
            assert_eq!(Status::from_source(raw), Some(Status::InProgress), "{raw}");
        }
        for raw in ["closed", "Done", "completed", "finished", "resolved"] {
            assert_eq!(Status::from_source(raw), Some(Status::Closed), "{raw}");
        }
        assert_eq!(Status::from_source("on fire"), None);
    }

    #[test]
    fn kind_normalizes_source_vocabularies() {
        assert_eq!(Kind::from_source("User Story"), Some(Kind::Story));
        assert_eq!(Kind::from_source("defect"), Some(Kind::Bug));
        assert_eq!(Kind::from_source("EPIC"), Some(Kind::Epic));
        assert_eq!(Kind::from_source("initiative"), None);
    }

    #[test]
    fn status_transition_rules() {
        assert!(Status::Open.can_transition_to(Status::InProgress).is_ok());
        assert!(Status::Open.can_transition_to(Status::Closed).is_ok());
        assert!(Status::InProgress.can_transition_to(Status::Closed).is_ok());
        assert!(Status::InProgress.can_transition_to(Status::Open).is_ok());
        assert!(Status::Closed.can_transition_to(Status::Open).is_ok());

        assert!(matches!(
            Status::Closed.can_transition_to(Status::InProgress),
            Err(InvalidTransition {
                from: Status::Closed,
                to: Status::InProgress,
                ..
            })
        ));

        assert!(Status::Open.can_transition_to(Status::Open).is_err());
    }

    #[test]
    fn work_item_default_is_open_task() {
        let item = WorkItem::default();
        assert_eq!(item.kind, Kind::Task);
        assert_eq!(item.status, Status::Open);
        assert!(item.dependencies.is_empty());
        assert!(item.priority.is_none());
        assert!(item.remaining_work.is_none());
        assert!(!item.parallel);
    }

    #[test]
    fn has_tag_is_case_insensitive() {
        let item = WorkItem {
            tags: vec!["Critical".to_string()],
            ..WorkItem::new("t-1", "Tagged")
        };
        assert!(item.has_tag("critical"));
        assert!(!item.has_tag("urgent"));
    }

    #[test]
    fn filter_matches_conjunctively() {
        let item = WorkItem {
            kind: Kind::Bug,
            tags: vec!["backend".to_string()],
            assigned_to: Some("alice".to_string()),
            ..WorkItem::new("t-1", "Fix login")
        };

        assert!(CandidateFilter::default().matches(&item));
        assert!(
            CandidateFilter {
                status: Some(Status::Open),
                kind: Some(Kind::Bug),
                tags: vec!["backend".to_string()],
                assigned_to: Some("Alice".to_string()),
                limit: None,
            }
            .matches(&item)
        );
        assert!(
            !CandidateFilter {
                status: Some(Status::Closed),
                ..CandidateFilter::default()
            }
            .matches(&item)
        );
        assert!(
            !CandidateFilter {
                tags: vec!["backend".to_string(), "frontend".to_string()],
                ..CandidateFilter::default()
            }
            .matches(&item)
        );
    }
}
