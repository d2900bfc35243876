//! `tt show` — display full details of a single work item.
//!
//! Supports partial ID resolution: a unique prefix is accepted in place of
//! the full id. Readiness is computed against the current snapshot so the
//! output can say *why* an item is blocked.

use std::io::Write;
use std::path::Path;

use clap::Args;
use serde::Serialize;

use tether_core::model::WorkItem;
use tether_engine::readiness::resolve;

use crate::output::{CliError, OutputMode, pretty_kv, pretty_section, render_error, render_mode};

/// Arguments for `tt show`.
#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Item ID to display. A unique prefix is accepted.
    pub id: String,
}

/// Full item detail as returned in JSON output.
#[derive(Debug, Serialize)]
struct ShowItem {
    #[serde(flatten)]
    item: WorkItem,
    ready: bool,
    blocked_by: Vec<String>,
}

/// Execute `tt show <id>`.
pub fn run_show(args: &ShowArgs, output: OutputMode, project_root: &Path) -> anyhow::Result<()> {
    let store = match crate::cmd::open_store(project_root) {
        Ok(store) => store,
        Err(cli_err) => {
            render_error(output, &cli_err)?;
            anyhow::bail!(cli_err.message);
        }
    };

    let item = match store.read_item(&args.id) {
        Ok(item) => item,
        Err(err) => {
            let cli_err = CliError::from(&err);
            render_error(output, &cli_err)?;
            anyhow::bail!(cli_err.message);
        }
    };

    // Readiness is snapshot-relative: compute it over the whole store.
    let snapshot = store.load_items()?;
    let readiness = resolve(&snapshot)
        .into_iter()
        .find(|result| result.id == item.id);

    let detail = ShowItem {
        ready: readiness.as_ref().is_some_and(|r| r.ready),
        blocked_by: readiness.map(|r| r.blocked_by).unwrap_or_default(),
        item,
    };

    render_mode(
        output,
        &detail,
        |detail, w| render_show_text(detail, w),
        |detail, w| render_show_pretty(detail, w),
    )
}

fn render_show_text(detail: &ShowItem, w: &mut dyn Write) -> std::io::Result<()> {
    writeln!(
        w,
        "{}  {}  {}  ready={}  blocked_by={}  {}",
        detail.item.id,
        detail.item.status,
        detail.item.kind,
        detail.ready,
        detail.blocked_by.join(","),
        detail.item.title
    )
}

fn render_show_pretty(detail: &ShowItem, w: &mut dyn Write) -> std::io::Result<()> {
    let item = &detail.item;

    pretty_section(w, &format!("{}  {}", item.id, item.title))?;
    pretty_kv(w, "Kind", item.kind.to_string())?;
    pretty_kv(w, "Status", item.status.to_string())?;
    pretty_kv(
        w,
        "Priority",
        item.priority
            .map_or_else(|| "-".to_string(), |p| p.to_string()),
    )?;
    pretty_kv(
        w,
        "Remaining",
        item.remaining_work
            .map_or_else(|| "-".to_string(), |h| format!("{h}h")),
    )?;
    if !item.tags.is_empty() {
        pretty_kv(w, "Tags", item.tags.join(", "))?;
    }
    if let Some(assignee) = &item.assigned_to {
        pretty_kv(w, "Assignee", assignee)?;
    }
    if item.parallel {
        pretty_kv(w, "Parallel", "yes")?;
    }
    if !item.dependencies.is_empty() {
        pretty_kv(w, "Depends on", item.dependencies.join(", "))?;
    }

    if item.status.is_open() {
        if detail.ready {
            pretty_kv(w, "Ready", "yes")?;
        } else {
            pretty_kv(w, "Ready", format!("no (waiting on {})", detail.blocked_by.join(", ")))?;
        }
    }

    if let Some(description) = &item.description {
        writeln!(w)?;
        writeln!(w, "{description}")?;
    }
    Ok(())
}
