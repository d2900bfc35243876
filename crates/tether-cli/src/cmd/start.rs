//! `tt start` — transition an item to in_progress.

use std::io::Write;
use std::path::Path;

use clap::Args;
use serde::Serialize;

use tether_core::model::Status;

use crate::cmd::open_store;
use crate::output::{CliError, OutputMode, render, render_error};

/// Arguments for `tt start`.
#[derive(Args, Debug)]
pub struct StartArgs {
    /// Item ID. A unique prefix is accepted.
    pub id: String,
}

#[derive(Debug, Serialize)]
struct TransitionReport {
    id: String,
    status: Status,
}

/// Execute `tt start <id>`.
pub fn run_start(args: &StartArgs, output: OutputMode, project_root: &Path) -> anyhow::Result<()> {
    transition(&args.id, Status::InProgress, output, project_root)
}

/// Shared transition runner for `tt start` / `tt done`.
pub(crate) fn transition(
    idish: &str,
    target: Status,
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

    let item = match store.update_status(idish, target) {
        Ok(item) => item,
        Err(err) => {
            let cli_err = CliError::from(&err);
            render_error(output, &cli_err)?;
            anyhow::bail!(cli_err.message);
        }
    };

    let report = TransitionReport {
        id: item.id,
        status: item.status,
    };

    render(output, &report, |report, w| {
        writeln!(w, "✓ {} -> {}", report.id, report.status)
    })
}
