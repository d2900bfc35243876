//! GitHub-like issue tracker client ("hub").
//!
//! Issues map onto [`WorkItem`]s: labels carry kind/priority/tags, the issue
//! state (refined by an "in progress" label) carries status, and `Depends-on:
//! #N` trailer lines in the body carry dependencies.

use anyhow::{Context, Result};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::config::HubRemote;
use crate::model::{CandidateFilter, Kind, Status, WorkItem};
use crate::source::WorkItemSource;

const PER_PAGE: usize = 100;
/// Upper bound on per-dependency probes in `check_dependency_links`.
const MAX_LINK_PROBES: usize = 10;

#[derive(Debug)]
pub struct HubClient {
    owner: String,
    repo: String,
    api_base: String,
    token: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct HubIssue {
    number: u64,
    title: String,
    #[serde(default)]
    body: Option<String>,
    state: String,
    #[serde(default)]
    labels: Vec<HubLabel>,
    #[serde(default)]
    assignees: Vec<HubUser>,
    #[serde(default)]
    updated_at: Option<String>,
    #[serde(default)]
    pull_request: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize)]
struct HubLabel {
    name: String,
}

#[derive(Debug, Clone, Deserialize)]
struct HubUser {
    login: String,
}

impl HubClient {
    #[must_use]
    pub fn new(
        owner: impl Into<String>,
        repo: impl Into<String>,
        api_base: impl Into<String>,
        token: Option<String>,
    ) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
            api_base: api_base.into(),
            token,
        }
    }

    /// Build a client from config, resolving the token environment variable
    /// once here at the boundary.
    #[must_use]
    pub fn from_remote(remote: &HubRemote) -> Self {
        Self::new(
            remote.owner.clone(),
            remote.repo.clone(),
            remote.api_base.clone(),
            remote.token(),
        )
    }

    fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let mut request = ureq::get(url)
            .set("Accept", "application/vnd.github+json")
            .set("User-Agent", "tether-cli");

        if let Some(token) = &self.token {
            request = request.set("Authorization", &format!("Bearer {token}"));
        }

        let response = request
            .call()
            .map_err(|err| anyhow::anyhow!("hub API request failed for {url}: {err}"))?;

        response
            .into_json::<T>()
            .context("failed to decode hub API JSON response")
    }

    fn fetch_issues(&self) -> Result<Vec<HubIssue>> {
        let mut issues = Vec::new();
        let mut page = 1_u32;

        loop {
            let url = format!(
                "{}/repos/{}/{}/issues?state=all&per_page={PER_PAGE}&page={page}&sort=created&direction=asc",
                self.api_base, self.owner, self.repo
            );

            let batch: Vec<HubIssue> = self
                .get_json(&url)
                .with_context(|| format!("failed to fetch issues page {page}"))?;

            if batch.is_empty() {
                break;
            }

            let raw_len = batch.len();
            issues.extend(
                batch
                    .into_iter()
                    .filter(|issue| issue.pull_request.is_none()),
            );

            if raw_len < PER_PAGE {
                break;
            }

            page += 1;
        }

        Ok(issues)
    }

    fn fetch_issue(&self, number: &str) -> Result<HubIssue> {
        let url = format!(
            "{}/repos/{}/{}/issues/{number}",
            self.api_base, self.owner, self.repo
        );
        self.get_json(&url)
    }
}

impl WorkItemSource for HubClient {
    fn list_candidates(&self, filter: &CandidateFilter) -> Result<Vec<WorkItem>> {
        let mut items: Vec<WorkItem> = self
            .fetch_issues()?
            .into_iter()
            .map(normalize_issue)
            .filter(|item| filter.matches(item))
            .collect();
        if let Some(limit) = filter.limit {
            items.truncate(limit);
        }
        Ok(items)
    }

    /// Probe the issue's `Depends-on:` trailers and the state of each
    /// referenced issue. Fails open: any request or decode failure reports
    /// "no dependency".
    fn check_dependency_links(&self, id: &str) -> bool {
        let issue = match self.fetch_issue(id) {
            Ok(issue) => issue,
            Err(err) => {
                warn!(id, error = %err, "hub dependency check failed, treating as unblocked");
                return false;
            }
        };

        let deps = parse_dependencies(issue.body.as_deref().unwrap_or_default());
        for dep in deps.iter().take(MAX_LINK_PROBES) {
            match self.fetch_issue(dep) {
                Ok(dep_issue) => {
                    if !dep_issue.state.eq_ignore_ascii_case("closed") {
                        return true;
                    }
                }
                Err(err) => {
                    warn!(
                        id,
                        dep, error = %err,
                        "hub dependency probe failed, treating as resolved"
                    );
                }
            }
        }
        false
    }
}

/// Normalize a hub issue into the shared model.
fn normalize_issue(issue: HubIssue) -> WorkItem {
    let labels: Vec<String> = issue
        .labels
        .iter()
        .map(|label| label.name.trim().to_string())
        .filter(|label| !label.is_empty())
        .collect();

    let kind = labels
        .iter()
        .find_map(|label| Kind::from_source(label))
        .unwrap_or(Kind::Task);

    let status = if issue.state.eq_ignore_ascii_case("closed") {
        Status::Closed
    } else if labels
        .iter()
        .any(|label| matches!(label.to_ascii_lowercase().as_str(), "in progress" | "in-progress" | "doing"))
    {
        Status::InProgress
    } else {
        Status::Open
    };

    let updated_at = issue
        .updated_at
        .as_deref()
        .and_then(|raw| chrono::DateTime::parse_from_rfc3339(raw).ok())
        .map(|ts| ts.with_timezone(&chrono::Utc));

    WorkItem {
        id: issue.number.to_string(),
        title: issue.title,
        kind,
        status,
        dependencies: parse_dependencies(issue.body.as_deref().unwrap_or_default()),
        priority: priority_from_labels(&labels),
        remaining_work: None,
        parallel: labels.iter().any(|l| l.eq_ignore_ascii_case("parallel")),
        tags: labels,
        assigned_to: issue.assignees.first().map(|user| user.login.clone()),
        description: issue.body,
        updated_at,
    }
}

/// Extract dependency issue numbers from `Depends-on:` trailer lines.
///
/// Recognized forms: `Depends-on: #12, #34` and `Depends on: #12`.
fn parse_dependencies(body: &str) -> Vec<String> {
    let mut deps = Vec::new();

    for line in body.lines() {
        let lower = line.trim().to_ascii_lowercase();
        let rest = if let Some(rest) = lower.strip_prefix("depends-on:") {
            rest
        } else if let Some(rest) = lower.strip_prefix("depends on:") {
            rest
        } else {
            continue;
        };

        for token in rest.split([',', ' ']) {
            if let Some(number) = token.trim().strip_prefix('#') {
                if !number.is_empty() && number.chars().all(|c| c.is_ascii_digit()) {
                    deps.push(number.to_string());
                }
            }
        }
    }

    deps
}

/// Map `p1`..`p9` and `priority:N` / `priority/N` labels to a priority tier.
fn priority_from_labels(labels: &[String]) -> Option<u8> {
    labels.iter().find_map(|label| {
        let lower = label.to_ascii_lowercase();
        let digits = lower
            .strip_prefix("p")
            .filter(|rest| rest.chars().all(|c| c.is_ascii_digit()))
            .or_else(|| lower.strip_prefix("priority:"))
            .or_else(|| lower.strip_prefix("priority/"))?;
        digits.trim().parse::<u8>().ok().filter(|p| *p >= 1)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issue(number: u64, state: &str, labels: &[&str], body: &str) -> HubIssue {
        HubIssue {
            number,
            title: format!("Issue {number}"),
            body: Some(body.to_string()),
            state: state.to_string(),
            labels: labels
                .iter()
                .map(|name| HubLabel {
                    name: (*name).to_string(),
                })
                .collect(),
            assignees: vec![HubUser {
                login: "alice".to_string(),
            }],
            updated_at: Some("2026-01-02T03:04:05Z".to_string()),
            pull_request: None,
        }
    }

    #[test]
    fn normalize_maps_labels_and_state() {
        let item = normalize_issue(issue(7, "open", &["bug", "p1", "critical"], ""));
        assert_eq!(item.id, "7");
        assert_eq!(item.kind, Kind::Bug);
        assert_eq!(item.status, Status::Open);
        assert_eq!(item.priority, Some(1));
        assert!(item.has_tag("critical"));
        assert_eq!(item.assigned_to.as_deref(), Some("alice"));
        assert!(item.updated_at.is_some());
    }

    #[test]
    fn in_progress_label_refines_open_state() {
        let item = normalize_issue(issue(8, "open", &["in progress"], ""));
        assert_eq!(item.status, Status::InProgress);

        let item = normalize_issue(issue(9, "closed", &["in progress"], ""));
        assert_eq!(item.status, Status::Closed, "closed state wins over labels");
    }

    #[test]
    fn dependencies_come_from_trailer_lines() {
        let body = "Fix the thing.\n\nDepends-on: #12, #34\nDepends on: #56\n";
        let item = normalize_issue(issue(10, "open", &[], body));
        assert_eq!(
            item.dependencies,
            vec!["12".to_string(), "34".to_string(), "56".to_string()]
        );
    }

    #[test]
    fn parse_dependencies_ignores_prose_and_bad_refs() {
        assert!(parse_dependencies("this depends on good weather").is_empty());
        assert!(parse_dependencies("Depends-on: #").is_empty());
        assert!(parse_dependencies("Depends-on: 12").is_empty());
    }

    #[test]
    fn priority_labels_parse_all_forms() {
        let labels = |name: &str| vec![name.to_string()];
        assert_eq!(priority_from_labels(&labels("p1")), Some(1));
        assert_eq!(priority_from_labels(&labels("P2")), Some(2));
        assert_eq!(priority_from_labels(&labels("priority:3")), Some(3));
        assert_eq!(priority_from_labels(&labels("priority/4")), Some(4));
        assert_eq!(priority_from_labels(&labels("p0")), None, "tiers start at 1");
        assert_eq!(priority_from_labels(&labels("parallel")), None);
    }

    #[test]
    fn unknown_kind_defaults_to_task() {
        let item = normalize_issue(issue(11, "open", &["backend"], ""));
        assert_eq!(item.kind, Kind::Task);
    }
}
