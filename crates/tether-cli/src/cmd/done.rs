//! `tt done` — transition an item to closed.

use std::path::Path;

use clap::Args;

use tether_core::model::Status;

use crate::cmd::start::transition;
use crate::output::OutputMode;

/// Arguments for `tt done`.
#[derive(Args, Debug)]
pub struct DoneArgs {
    /// Item ID. A unique prefix is accepted.
    pub id: String,
}

/// Execute `tt done <id>`.
pub fn run_done(args: &DoneArgs, output: OutputMode, project_root: &Path) -> anyhow::Result<()> {
    transition(&args.id, Status::Closed, output, project_root)
}
