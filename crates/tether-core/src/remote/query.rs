//! WIQL query-string construction for the board backend.
//!
//! The board service is queried with a WIQL-style flat select over the
//! `WorkItems` table. Only the small surface tether needs is modeled:
//! conjunctive WHERE clauses derived from a [`CandidateFilter`] plus a
//! priority ordering.

use crate::model::{CandidateFilter, Kind, Status};

/// Composable WIQL builder. Conditions are ANDed in insertion order.
#[derive(Debug, Default, Clone)]
pub struct WiqlBuilder {
    conditions: Vec<String>,
    order_by: Option<&'static str>,
}

impl WiqlBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Derive a query from a snapshot filter: status, kind, tags, and
    /// assignee become WHERE clauses; `limit` is applied client-side after
    /// normalization.
    #[must_use]
    pub fn from_filter(filter: &CandidateFilter) -> Self {
        let mut builder = Self::new();
        if let Some(status) = filter.status {
            builder = builder.state_group(status);
        }
        if let Some(kind) = filter.kind {
            builder = builder.work_item_type(kind);
        }
        for tag in &filter.tags {
            builder = builder.tag(tag);
        }
        if let Some(assignee) = &filter.assigned_to {
            builder = builder.assigned_to(assignee);
        }
        builder.order_by_priority()
    }

    /// Constrain `[System.State]` to the board vocabulary for a canonical
    /// status.
    #[must_use]
    pub fn state_group(mut self, status: Status) -> Self {
        let states: &[&str] = match status {
            Status::Open => &["New", "To Do", "Proposed", "Open"],
            Status::InProgress => &["Active", "In Progress", "Doing", "Committed"],
            Status::Closed => &["Closed", "Done", "Completed", "Resolved"],
        };
        let list = states
            .iter()
            .map(|s| format!("'{}'", escape(s)))
            .collect::<Vec<_>>()
            .join(", ");
        self.conditions.push(format!("[System.State] IN ({list})"));
        self
    }

    #[must_use]
    pub fn work_item_type(mut self, kind: Kind) -> Self {
        let name = match kind {
            Kind::Task => "Task",
            Kind::Bug => "Bug",
            Kind::Story => "User Story",
            Kind::Feature => "Feature",
            Kind::Epic => "Epic",
        };
        self.conditions
            .push(format!("[System.WorkItemType] = '{name}'"));
        self
    }

    #[must_use]
    pub fn tag(mut self, tag: &str) -> Self {
        self.conditions
            .push(format!("[System.Tags] CONTAINS '{}'", escape(tag)));
        self
    }

    #[must_use]
    pub fn assigned_to(mut self, user: &str) -> Self {
        self.conditions
            .push(format!("[System.AssignedTo] = '{}'", escape(user)));
        self
    }

    #[must_use]
    pub fn order_by_priority(mut self) -> Self {
        self.order_by = Some("[Microsoft.VSTS.Common.Priority] ASC");
        self
    }

    /// Render the final query string.
    #[must_use]
    pub fn build(&self) -> String {
        let mut query = String::from("SELECT [System.Id] FROM WorkItems");
        if !self.conditions.is_empty() {
            query.push_str(" WHERE ");
            query.push_str(&self.conditions.join(" AND "));
        }
        if let Some(order) = self.order_by {
            query.push_str(" ORDER BY ");
            query.push_str(order);
        }
        query
    }
}

/// WIQL string literals escape single quotes by doubling them.
fn escape(value: &str) -> String {
    value.replace('\'', "''")
}
