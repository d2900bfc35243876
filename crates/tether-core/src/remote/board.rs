//! Azure-DevOps-like work-item service client ("board").
//!
//! Listing is two-phase: a WIQL query returns matching ids, then details are
//! fetched in batches with relations expanded. Field names follow the board's
//! `System.*` / `Microsoft.VSTS.*` reference names; `Dependency-Reverse`
//! relations (predecessors) become the item's dependency list.

use anyhow::{Context, Result};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::config::BoardRemote;
use crate::model::{CandidateFilter, Kind, Status, WorkItem};
use crate::remote::query::WiqlBuilder;
use crate::source::WorkItemSource;

const API_VERSION: &str = "7.0";
const BATCH_SIZE: usize = 200;
const DEPENDENCY_REVERSE: &str = "System.LinkTypes.Dependency-Reverse";

#[derive(Debug)]
pub struct BoardClient {
    organization: String,
    project: String,
    api_base: String,
    token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WiqlResponse {
    #[serde(default)]
    work_items: Vec<WiqlRef>,
}

#[derive(Debug, Deserialize)]
struct WiqlRef {
    id: u64,
}

#[derive(Debug, Deserialize)]
struct BatchResponse {
    #[serde(default)]
    value: Vec<BoardWorkItem>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct BoardWorkItem {
    id: u64,
    fields: BoardFields,
    #[serde(default)]
    relations: Vec<BoardRelation>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct BoardFields {
    #[serde(rename = "System.Title", default)]
    title: Option<String>,
    #[serde(rename = "System.State", default)]
    state: Option<String>,
    #[serde(rename = "System.WorkItemType", default)]
    work_item_type: Option<String>,
    #[serde(rename = "Microsoft.VSTS.Common.Priority", default)]
    priority: Option<u8>,
    #[serde(rename = "Microsoft.VSTS.Scheduling.RemainingWork", default)]
    remaining_work: Option<f64>,
    #[serde(rename = "System.Tags", default)]
    tags: Option<String>,
    #[serde(rename = "System.AssignedTo", default)]
    assigned_to: Option<BoardIdentity>,
    #[serde(rename = "System.ChangedDate", default)]
    changed_date: Option<String>,
}

#[derive(Debug, Deserialize)]
struct BoardIdentity {
    #[serde(rename = "uniqueName", default)]
    unique_name: Option<String>,
    #[serde(rename = "displayName", default)]
    display_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct BoardRelation {
    rel: String,
    url: String,
}

impl BoardClient {
    #[must_use]
    pub fn new(
        organization: impl Into<String>,
        project: impl Into<String>,
        api_base: impl Into<String>,
        token: Option<String>,
    ) -> Self {
        Self {
            organization: organization.into(),
            project: project.into(),
            api_base: api_base.into(),
            token,
        }
    }

    /// Build a client from config, resolving the token environment variable
    /// once here at the boundary.
    #[must_use]
    pub fn from_remote(remote: &BoardRemote) -> Self {
        Self::new(
            remote.organization.clone(),
            remote.project.clone(),
            remote.api_base.clone(),
            remote.token(),
        )
    }

    fn project_url(&self, path: &str) -> String {
        format!(
            "{}/{}/{}/_apis/{path}",
            self.api_base, self.organization, self.project
        )
    }

    fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let mut request = ureq::get(url)
            .set("Accept", "application/json")
            .set("User-Agent", "tether-cli");

        if let Some(token) = &self.token {
            request = request.set("Authorization", &format!("Bearer {token}"));
        }

        let response = request
            .call()
            .map_err(|err| anyhow::anyhow!("board API request failed for {url}: {err}"))?;

        response
            .into_json::<T>()
            .context("failed to decode board API JSON response")
    }

    fn run_wiql(&self, query: &str) -> Result<Vec<u64>> {
        let url = self.project_url(&format!("wit/wiql?api-version={API_VERSION}"));
        let mut request = ureq::post(&url)
            .set("Accept", "application/json")
            .set("User-Agent", "tether-cli");

        if let Some(token) = &self.token {
            request = request.set("Authorization", &format!("Bearer {token}"));
        }

        let response = request
            .send_json(serde_json::json!({ "query": query }))
            .map_err(|err| anyhow::anyhow!("board WIQL query failed: {err}"))?;

        let parsed: WiqlResponse = response
            .into_json()
            .context("failed to decode board WIQL response")?;
        Ok(parsed.work_items.into_iter().map(|r| r.id).collect())
    }

    fn fetch_details(&self, ids: &[u64]) -> Result<Vec<BoardWorkItem>> {
        let mut details = Vec::with_capacity(ids.len());

        for chunk in ids.chunks(BATCH_SIZE) {
            let id_list = chunk
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(",");
            let url = self.project_url(&format!(
                "wit/workitems?ids={id_list}&$expand=relations&api-version={API_VERSION}"
            ));

            let batch: BatchResponse = self
                .get_json(&url)
                .with_context(|| format!("failed to fetch work item batch ({id_list})"))?;
            details.extend(batch.value);
        }

        Ok(details)
    }

    fn fetch_detail(&self, id: &str) -> Result<BoardWorkItem> {
        let url = self.project_url(&format!(
            "wit/workitems/{id}?$expand=relations&api-version={API_VERSION}"
        ));
        self.get_json(&url)
    }
}

impl WorkItemSource for BoardClient {
    fn list_candidates(&self, filter: &CandidateFilter) -> Result<Vec<WorkItem>> {
        let wiql = WiqlBuilder::from_filter(filter).build();
        let ids = self.run_wiql(&wiql)?;
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        // The WIQL translation is best-effort; re-apply the filter over the
        // normalized items so in-memory semantics always win.
        let mut items: Vec<WorkItem> = self
            .fetch_details(&ids)?
            .into_iter()
            .map(normalize_work_item)
            .filter(|item| filter.matches(item))
            .collect();
        if let Some(limit) = filter.limit {
            items.truncate(limit);
        }
        Ok(items)
    }

    /// Probe the item's predecessor relations. Fails open: any request or
    /// decode failure reports "no dependency".
    fn check_dependency_links(&self, id: &str) -> bool {
        match self.fetch_detail(id) {
            Ok(detail) => detail
                .relations
                .iter()
                .any(|relation| relation.rel == DEPENDENCY_REVERSE),
            Err(err) => {
                warn!(id, error = %err, "board dependency check failed, treating as unblocked");
                false
            }
        }
    }
}

/// Normalize a board work item into the shared model.
fn normalize_work_item(raw: BoardWorkItem) -> WorkItem {
    let id = raw.id.to_string();
    let fields = raw.fields;

    let status = match fields.state.as_deref() {
        None => Status::Open,
        Some(state) => Status::from_source(state).unwrap_or_else(|| {
            warn!(id = %id, state, "unknown board state, treating as open");
            Status::Open
        }),
    };

    let kind = match fields.work_item_type.as_deref() {
        None => Kind::Task,
        Some(raw_kind) => Kind::from_source(raw_kind).unwrap_or_else(|| {
            warn!(id = %id, kind = raw_kind, "unknown board work item type, treating as task");
            Kind::Task
        }),
    };

    let tags: Vec<String> = fields
        .tags
        .as_deref()
        .unwrap_or_default()
        .split(';')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(ToString::to_string)
        .collect();

    let dependencies: Vec<String> = raw
        .relations
        .iter()
        .filter(|relation| relation.rel == DEPENDENCY_REVERSE)
        .filter_map(|relation| relation_target_id(&relation.url))
        .collect();

    let updated_at = fields
        .changed_date
        .as_deref()
        .and_then(|raw_ts| chrono::DateTime::parse_from_rfc3339(raw_ts).ok())
        .map(|ts| ts.with_timezone(&chrono::Utc));

    WorkItem {
        title: fields.title.unwrap_or_else(|| id.clone()),
        id,
        kind,
        status,
        dependencies,
        priority: fields.priority,
        remaining_work: fields.remaining_work,
        parallel: tags.iter().any(|tag| tag.eq_ignore_ascii_case("parallel")),
        tags,
        assigned_to: fields
            .assigned_to
            .and_then(|identity| identity.unique_name.or(identity.display_name)),
        description: None,
        updated_at,
    }
}

/// Relation URLs end in `/workItems/{id}`; pull the trailing id.
fn relation_target_id(url: &str) -> Option<String> {
    let tail = url.rsplit('/').next()?;
    if !tail.is_empty() && tail.chars().all(|c| c.is_ascii_digit()) {
        Some(tail.to_string())
    } else {
        None
    }
}
