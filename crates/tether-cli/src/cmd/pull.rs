//! `tt pull` — mirror a remote snapshot into the local markdown store.
//!
//! Remote items land as `.tether/items/<backend>-<id>.md`. Existing local
//! files are skipped unless `--overwrite`, so local edits survive repeated
//! pulls by default.

use std::io::Write;
use std::path::Path;

use clap::Args;
use serde::Serialize;

use tether_core::model::{CandidateFilter, WorkItem};
use tether_core::source::WorkItemSource;

use crate::cmd::{open_store, remote_source};
use crate::output::{CliError, OutputMode, render, render_error};

/// Arguments for `tt pull`.
#[derive(Args, Debug, Default)]
pub struct PullArgs {
    /// Overwrite local items that already exist.
    #[arg(long)]
    pub overwrite: bool,

    /// Maximum number of remote items to fetch.
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,
}

#[derive(Debug, Default, Serialize)]
struct PullReport {
    source: String,
    fetched: usize,
    written: usize,
    skipped_existing: usize,
}

/// Execute `tt pull`.
pub fn run_pull(args: &PullArgs, output: OutputMode, project_root: &Path) -> anyhow::Result<()> {
    let store = match open_store(project_root) {
        Ok(store) => store,
        Err(cli_err) => {
            render_error(output, &cli_err)?;
            anyhow::bail!(cli_err.message);
        }
    };

    let source = match remote_source(project_root) {
        Ok(source) => source,
        Err(cli_err) => {
            render_error(output, &cli_err)?;
            anyhow::bail!(cli_err.message);
        }
    };

    let filter = CandidateFilter {
        limit: args.limit,
        ..CandidateFilter::default()
    };
    let fetched = source.list_candidates(&filter)?;

    let mut report = PullReport {
        source: source.label().to_string(),
        fetched: fetched.len(),
        ..PullReport::default()
    };

    for remote_item in fetched {
        let local = localize(remote_item, source.label());

        if store.contains(&local.id) && !args.overwrite {
            report.skipped_existing += 1;
            continue;
        }

        match store.write_item(&local) {
            Ok(_) => report.written += 1,
            Err(err) => {
                let cli_err = CliError::from(&err);
                render_error(output, &cli_err)?;
                anyhow::bail!(cli_err.message);
            }
        }
    }

    render(output, &report, |report, w| print_report(report, w))
}

/// Re-home a remote item under a backend-prefixed local id, rewriting its
/// dependency ids to match so readiness still resolves after the mirror.
fn localize(mut item: WorkItem, backend: &str) -> WorkItem {
    item.dependencies = item
        .dependencies
        .iter()
        .map(|dep| format!("{backend}-{dep}"))
        .collect();
    item.id = format!("{backend}-{}", item.id);
    item
}

fn print_report(report: &PullReport, w: &mut dyn Write) -> std::io::Result<()> {
    writeln!(w, "tt pull ({})", report.source)?;
    writeln!(w, "  fetched items:    {}", report.fetched)?;
    writeln!(w, "  written:          {}", report.written)?;
    writeln!(w, "  skipped existing: {}", report.skipped_existing)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn localize_prefixes_item_and_dependency_ids() {
        let remote = WorkItem {
            dependencies: vec!["41".to_string(), "42".to_string()],
            ..WorkItem::new("17", "Remote item")
        };

        let local = localize(remote, "board");
        assert_eq!(local.id, "board-17");
        assert_eq!(
            local.dependencies,
            vec!["board-41".to_string(), "board-42".to_string()]
        );
    }

    #[test]
    fn report_renders_counts() {
        let report = PullReport {
            source: "hub".to_string(),
            fetched: 5,
            written: 3,
            skipped_existing: 2,
        };

        let mut buf = Vec::new();
        print_report(&report, &mut buf).expect("render");
        let text = String::from_utf8(buf).expect("utf8");
        assert!(text.contains("tt pull (hub)"));
        assert!(text.contains("fetched items:    5"));
        assert!(text.contains("skipped existing: 2"));
    }
}
