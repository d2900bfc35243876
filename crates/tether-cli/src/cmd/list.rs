//! `tt list` — list work items with filtering.

use std::io::Write;
use std::path::Path;

use clap::Args;
use serde::Serialize;

use tether_core::model::{CandidateFilter, Kind, Status, WorkItem};
use tether_core::source::WorkItemSource;

use crate::cmd::{open_store, summary_line};
use crate::output::{OutputMode, pretty_rule, render_error, render_mode};

/// Arguments for `tt list`.
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Filter by status: open, in_progress, closed.
    #[arg(short, long)]
    pub status: Option<Status>,

    /// Filter by kind: task, bug, story, feature, epic.
    #[arg(short, long)]
    pub kind: Option<Kind>,

    /// Filter by tag (repeatable; all must match).
    #[arg(short, long)]
    pub tag: Vec<String>,

    /// Filter by assignee.
    #[arg(long)]
    pub assignee: Option<String>,

    /// Maximum items to show.
    #[arg(short = 'n', long, default_value = "50")]
    pub limit: usize,
}

#[derive(Debug, Serialize)]
struct ListReport {
    count: usize,
    items: Vec<WorkItem>,
}

/// Execute `tt list`.
pub fn run_list(args: &ListArgs, output: OutputMode, project_root: &Path) -> anyhow::Result<()> {
    let store = match open_store(project_root) {
        Ok(store) => store,
        Err(cli_err) => {
            render_error(output, &cli_err)?;
            anyhow::bail!(cli_err.message);
        }
    };

    let filter = CandidateFilter {
        status: args.status,
        kind: args.kind,
        tags: args.tag.clone(),
        assigned_to: args.assignee.clone(),
        limit: Some(args.limit),
    };
    let items = store.list_candidates(&filter)?;

    let report = ListReport {
        count: items.len(),
        items,
    };

    render_mode(
        output,
        &report,
        |report, w| {
            for item in &report.items {
                writeln!(w, "{}", summary_line(item))?;
            }
            Ok(())
        },
        |report, w| render_list_pretty(report, w),
    )
}

fn render_list_pretty(report: &ListReport, w: &mut dyn Write) -> std::io::Result<()> {
    if report.items.is_empty() {
        return writeln!(w, "No items found.");
    }

    writeln!(
        w,
        "{:<24}  {:<12}  {:<8}  {:>3}  TITLE",
        "ID", "STATUS", "KIND", "PRI"
    )?;
    pretty_rule(w)?;
    for item in &report.items {
        writeln!(w, "{}", summary_line(item))?;
    }
    writeln!(w, "({} item(s))", report.count)
}
