//! YAML front-matter parsing and rendering for item files.
//!
//! An item file looks like:
//!
//! ```markdown
//! ---
//! id: fix-login-timeout
//! title: Fix login timeout
//! kind: bug
//! status: open
//! priority: 1
//! remaining_work: 2.0
//! depends_on:
//! - refresh-token-rotation
//! tags:
//! - critical
//! ---
//!
//! Login sessions expire after 30s under load.
//! ```
//!
//! Reading is permissive: status/kind accept any source vocabulary, a
//! malformed `depends_on` coerces to "no dependencies" with a warning, and
//! missing optional fields default to neutral values. Writing always emits
//! the canonical vocabulary.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::warn;

use crate::error::StoreError;
use crate::model::{Kind, Status, WorkItem};

/// Split `content` into the YAML between the first pair of `---` fences and
/// the remaining body. Returns `None` when there is no front-matter block.
#[must_use]
pub fn extract(content: &str) -> Option<(&str, &str)> {
    let rest = content.strip_prefix("---")?;
    let rest = if let Some(r) = rest.strip_prefix('\n') {
        r
    } else if let Some(r) = rest.strip_prefix("\r\n") {
        r
    } else {
        return None;
    };
    let end = rest.find("\n---")?;
    let fm = &rest[..end];
    let body = rest[end + 4..].trim_start_matches(['\r', '\n']);
    Some((fm, body))
}

/// Permissive read shape. Field-level coercions happen in
/// [`RawFrontMatter::into_work_item`], not in serde.
#[derive(Debug, Deserialize)]
struct RawFrontMatter {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    kind: Option<String>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    priority: Option<u8>,
    #[serde(default)]
    remaining_work: Option<f64>,
    #[serde(default)]
    depends_on: Option<serde_yaml::Value>,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    parallel: bool,
    #[serde(default)]
    assigned_to: Option<String>,
    #[serde(default)]
    updated_at: Option<DateTime<Utc>>,
}

impl RawFrontMatter {
    fn into_work_item(self, fallback_id: &str, path: &Path) -> WorkItem {
        let id = self
            .id
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(|| fallback_id.to_string());

        let status = match self.status.as_deref() {
            None => Status::Open,
            Some(raw) => Status::from_source(raw).unwrap_or_else(|| {
                warn!(path = %path.display(), status = raw, "unknown status, treating as open");
                Status::Open
            }),
        };

        let kind = match self.kind.as_deref() {
            None => Kind::Task,
            Some(raw) => Kind::from_source(raw).unwrap_or_else(|| {
                warn!(path = %path.display(), kind = raw, "unknown kind, treating as task");
                Kind::Task
            }),
        };

        WorkItem {
            title: self.title.unwrap_or_else(|| id.clone()),
            id,
            kind,
            status,
            dependencies: coerce_dependencies(self.depends_on, path),
            priority: self.priority,
            remaining_work: self.remaining_work,
            tags: self.tags,
            parallel: self.parallel,
            assigned_to: self.assigned_to,
            description: None,
            updated_at: self.updated_at,
        }
    }
}

/// Coerce a `depends_on` value into a list of ids.
///
/// Accepted shapes: absent/null, a sequence of scalars, or a single scalar.
/// Anything else is a malformed declaration and coerces to "no dependencies"
/// with a data-quality warning, never an error.
fn coerce_dependencies(value: Option<serde_yaml::Value>, path: &Path) -> Vec<String> {
    use serde_yaml::Value;

    let Some(value) = value else {
        return Vec::new();
    };

    match value {
        Value::Null => Vec::new(),
        Value::String(id) => vec![id],
        Value::Number(n) => vec![n.to_string()],
        Value::Sequence(entries) => {
            let mut ids = Vec::with_capacity(entries.len());
            for entry in &entries {
                match entry {
                    Value::String(id) => ids.push(id.clone()),
                    Value::Number(n) => ids.push(n.to_string()),
                    _ => {
                        warn!(
                            path = %path.display(),
                            "malformed depends_on entry, ignoring dependency list"
                        );
                        return Vec::new();
                    }
                }
            }
            ids
        }
        _ => {
            warn!(
                path = %path.display(),
                "malformed depends_on declaration, ignoring dependency list"
            );
            Vec::new()
        }
    }
}

/// Parse one item file's content into a [`WorkItem`] plus its body.
///
/// `fallback_id` (usually the file stem) is used when the front-matter has no
/// `id` field. The body becomes the item description when non-empty.
pub fn parse_item(
    content: &str,
    fallback_id: &str,
    path: &Path,
) -> Result<WorkItem, StoreError> {
    let Some((fm, body)) = extract(content) else {
        return Err(StoreError::MissingFrontMatter {
            path: path.to_path_buf(),
        });
    };

    let raw: RawFrontMatter =
        serde_yaml::from_str(fm).map_err(|source| StoreError::FrontMatter {
            path: path.to_path_buf(),
            source,
        })?;

    let mut item = raw.into_work_item(fallback_id, path);
    let body = body.trim_end();
    if !body.is_empty() {
        item.description = Some(body.to_string());
    }
    Ok(item)
}

/// Canonical write shape. Neutral values are omitted so files stay tidy.
#[derive(Debug, Serialize)]
struct ItemFrontMatter<'a> {
    id: &'a str,
    title: &'a str,
    kind: Kind,
    status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    priority: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    remaining_work: Option<f64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    depends_on: &'a Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tags: &'a Vec<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    parallel: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    assigned_to: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    updated_at: Option<DateTime<Utc>>,
}

/// Render an item back to file content: canonical front-matter, then the
/// description as the body.
pub fn render_item(item: &WorkItem) -> Result<String, serde_yaml::Error> {
    let fm = ItemFrontMatter {
        id: &item.id,
        title: &item.title,
        kind: item.kind,
        status: item.status,
        priority: item.priority,
        remaining_work: item.remaining_work,
        depends_on: &item.dependencies,
        tags: &item.tags,
        parallel: item.parallel,
        assigned_to: item.assigned_to.as_deref(),
        updated_at: item.updated_at,
    };

    let yaml = serde_yaml::to_string(&fm)?;
    let mut out = format!("---\n{yaml}---\n");
    if let Some(description) = &item.description {
        out.push('\n');
        out.push_str(description);
        out.push('\n');
    }
    Ok(out)
}
