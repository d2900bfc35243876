//! `tt init` — scaffold the `.tether/` directory.

use std::io::Write;
use std::path::Path;

use clap::Args;
use serde::Serialize;

use tether_core::store::MarkdownStore;

use crate::output::{CliError, OutputMode, render, render_error};

/// Arguments for `tt init`.
#[derive(Args, Debug, Default)]
pub struct InitArgs {}

#[derive(Debug, Serialize)]
struct InitReport {
    created: bool,
    path: String,
}

/// Execute `tt init`. Idempotent: re-running on an initialized project is a
/// no-op that reports `created: false`.
pub fn run_init(_args: &InitArgs, output: OutputMode, project_root: &Path) -> anyhow::Result<()> {
    let (_store, created) = match MarkdownStore::init(project_root) {
        Ok(result) => result,
        Err(err) => {
            let cli_err = CliError::from(&err);
            render_error(output, &cli_err)?;
            anyhow::bail!(cli_err.message);
        }
    };

    let report = InitReport {
        created,
        path: project_root.join(".tether").display().to_string(),
    };

    render(output, &report, |report, w| {
        if report.created {
            writeln!(w, "✓ Initialized tether project in {}", report.path)
        } else {
            writeln!(w, "✓ Project already initialized at {}", report.path)
        }
    })
}
