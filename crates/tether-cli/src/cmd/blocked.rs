//! `tt blocked` — enumerate blocked items and why.
//!
//! Two independent sections: dependency-blocked items (from the readiness
//! resolver, with their unresolved ids) and items manually tagged `blocked`
//! (a plain tag filter, not gated by the graph).

use std::io::Write;
use std::path::Path;

use clap::Args;
use serde::Serialize;

use tether_core::model::{CandidateFilter, WorkItem};
use tether_core::source::WorkItemSource;
use tether_engine::readiness::{BlockedItem, resolve_readiness, tag_blocked};

use crate::cmd::{open_store, remote_source, summary_line};
use crate::output::{OutputMode, pretty_section, render_error, render_mode};

/// Arguments for `tt blocked`.
#[derive(Args, Debug, Default)]
pub struct BlockedArgs {
    /// Inspect the configured remote tracker instead of the local store.
    #[arg(long)]
    pub remote: bool,
}

#[derive(Debug, Serialize)]
struct BlockedReport {
    blocked: Vec<BlockedItem>,
    tag_blocked: Vec<WorkItem>,
}

/// Execute `tt blocked`.
pub fn run_blocked(
    args: &BlockedArgs,
    output: OutputMode,
    project_root: &Path,
) -> anyhow::Result<()> {
    let items: Vec<WorkItem> = if args.remote {
        let source = match remote_source(project_root) {
            Ok(source) => source,
            Err(cli_err) => {
                render_error(output, &cli_err)?;
                anyhow::bail!(cli_err.message);
            }
        };
        source.list_candidates(&CandidateFilter::default())?
    } else {
        let store = match open_store(project_root) {
            Ok(store) => store,
            Err(cli_err) => {
                render_error(output, &cli_err)?;
                anyhow::bail!(cli_err.message);
            }
        };
        store.list_candidates(&CandidateFilter::default())?
    };

    let report = BlockedReport {
        blocked: resolve_readiness(&items).blocked,
        tag_blocked: tag_blocked(&items).into_iter().cloned().collect(),
    };

    render_mode(
        output,
        &report,
        |report, w| render_blocked_text(report, w),
        |report, w| render_blocked_pretty(report, w),
    )
}

fn render_blocked_text(report: &BlockedReport, w: &mut dyn Write) -> std::io::Result<()> {
    for blocked in &report.blocked {
        writeln!(
            w,
            "{}  blocked  waiting_on={}  {}",
            blocked.item.id,
            blocked.reasons.join(","),
            blocked.item.title
        )?;
    }
    for item in &report.tag_blocked {
        writeln!(w, "{}  tagged-blocked  {}", item.id, item.title)?;
    }
    Ok(())
}

fn render_blocked_pretty(report: &BlockedReport, w: &mut dyn Write) -> std::io::Result<()> {
    if report.blocked.is_empty() && report.tag_blocked.is_empty() {
        return writeln!(w, "No blocked items.");
    }

    if !report.blocked.is_empty() {
        pretty_section(w, "Blocked by dependencies")?;
        for blocked in &report.blocked {
            writeln!(w, "{}", summary_line(&blocked.item))?;
            writeln!(w, "      waiting on: {}", blocked.reasons.join(", "))?;
        }
    }

    if !report.tag_blocked.is_empty() {
        if !report.blocked.is_empty() {
            writeln!(w)?;
        }
        pretty_section(w, "Tagged as blocked")?;
        for item in &report.tag_blocked {
            writeln!(w, "{}", summary_line(item))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pretty_rendering_separates_the_two_sections() {
        let blocked_item = WorkItem {
            dependencies: vec!["ghost".to_string()],
            ..WorkItem::new("stuck", "Stuck item")
        };
        let tagged = WorkItem {
            tags: vec!["blocked".to_string()],
            ..WorkItem::new("flagged", "Flagged item")
        };

        let report = BlockedReport {
            blocked: vec![BlockedItem {
                item: blocked_item,
                reasons: vec!["ghost".to_string()],
            }],
            tag_blocked: vec![tagged],
        };

        let mut buf = Vec::new();
        render_blocked_pretty(&report, &mut buf).expect("render");
        let text = String::from_utf8(buf).expect("utf8");

        assert!(text.contains("Blocked by dependencies"));
        assert!(text.contains("waiting on: ghost"));
        assert!(text.contains("Tagged as blocked"));
        assert!(text.contains("flagged"));
    }

    #[test]
    fn empty_report_renders_a_friendly_line() {
        let report = BlockedReport {
            blocked: Vec::new(),
            tag_blocked: Vec::new(),
        };

        let mut buf = Vec::new();
        render_blocked_pretty(&report, &mut buf).expect("render");
        assert_eq!(String::from_utf8(buf).expect("utf8"), "No blocked items.\n");
    }
}
