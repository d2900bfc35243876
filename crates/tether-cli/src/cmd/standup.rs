//! `tt standup` — daily summary: doing / next / blocked.

use std::io::Write;
use std::path::Path;

use clap::Args;
use serde::Serialize;

use tether_core::model::CandidateFilter;
use tether_core::source::WorkItemSource;
use tether_engine::digest::StandupReport;

use crate::cmd::{open_store, summary_line};
use crate::output::{OutputMode, pretty_section, render_error, render_mode};

/// Arguments for `tt standup`.
#[derive(Args, Debug, Default)]
pub struct StandupArgs {
    /// Scope the standup to one assignee.
    #[arg(long)]
    pub assignee: Option<String>,
}

#[derive(Debug, Serialize)]
struct StandupPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    assignee: Option<String>,
    #[serde(flatten)]
    report: StandupReport,
}

/// Execute `tt standup`.
pub fn run_standup(
    args: &StandupArgs,
    output: OutputMode,
    project_root: &Path,
) -> anyhow::Result<()> {
    let store = match open_store(project_root) {
        Ok(store) => store,
        Err(cli_err) => {
            render_error(output, &cli_err)?;
            anyhow::bail!(cli_err.message);
        }
    };

    let items = store.list_candidates(&CandidateFilter::default())?;
    let report = StandupReport::build(&items, args.assignee.as_deref());
    let payload = StandupPayload {
        assignee: args.assignee.clone(),
        report,
    };

    render_mode(
        output,
        &payload,
        |payload, w| render_standup_text(payload, w),
        |payload, w| render_standup_pretty(payload, w),
    )
}

fn render_standup_text(payload: &StandupPayload, w: &mut dyn Write) -> std::io::Result<()> {
    for item in &payload.report.in_progress {
        writeln!(w, "{}  doing  {}", item.id, item.title)?;
    }
    if let Some(next) = &payload.report.next {
        writeln!(
            w,
            "{}  next  {}  why={}",
            next.id,
            next.title,
            payload.report.next_reasons.join("; ")
        )?;
    }
    for blocked in &payload.report.blockers {
        writeln!(
            w,
            "{}  blocked  waiting_on={}",
            blocked.item.id,
            blocked.reasons.join(",")
        )?;
    }
    for item in &payload.report.tag_blocked {
        writeln!(w, "{}  tagged-blocked  {}", item.id, item.title)?;
    }
    Ok(())
}

fn render_standup_pretty(payload: &StandupPayload, w: &mut dyn Write) -> std::io::Result<()> {
    let heading = payload.assignee.as_ref().map_or_else(
        || "Standup".to_string(),
        |assignee| format!("Standup ({assignee})"),
    );
    pretty_section(w, &heading)?;

    writeln!(w, "In progress:")?;
    if payload.report.in_progress.is_empty() {
        writeln!(w, "  (nothing in progress)")?;
    }
    for item in &payload.report.in_progress {
        writeln!(w, "  {}", summary_line(item))?;
    }

    writeln!(w)?;
    writeln!(w, "Up next:")?;
    match &payload.report.next {
        Some(next) => {
            writeln!(w, "  {}", summary_line(next))?;
            writeln!(w, "      why: {}", payload.report.next_reasons.join("; "))?;
        }
        None => writeln!(w, "  No available tasks found")?,
    }

    if !payload.report.blockers.is_empty() || !payload.report.tag_blocked.is_empty() {
        writeln!(w)?;
        writeln!(w, "Blocked:")?;
        for blocked in &payload.report.blockers {
            writeln!(
                w,
                "  {}  (waiting on {})",
                summary_line(&blocked.item),
                blocked.reasons.join(", ")
            )?;
        }
        for item in &payload.report.tag_blocked {
            writeln!(w, "  {}  (tagged blocked)", summary_line(item))?;
        }
    }
    Ok(())
}
