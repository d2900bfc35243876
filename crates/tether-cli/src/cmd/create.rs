//! `tt create` — write a new work item file.

use std::io::Write;
use std::path::Path;

use clap::Args;
use serde::Serialize;

use tether_core::model::{Kind, WorkItem};

use crate::cmd::open_store;
use crate::output::{CliError, OutputMode, render, render_error};

/// Arguments for `tt create`.
#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Item title.
    #[arg(long)]
    pub title: String,

    /// Kind: task, bug, story, feature, epic.
    #[arg(short, long, default_value = "task")]
    pub kind: Kind,

    /// Priority tier, 1 = highest urgency.
    #[arg(short, long)]
    pub priority: Option<u8>,

    /// Remaining effort in hours.
    #[arg(long, value_name = "HOURS")]
    pub remaining: Option<f64>,

    /// Dependency item ids (repeat or comma-separate).
    #[arg(long, value_delimiter = ',')]
    pub depends_on: Vec<String>,

    /// Free-text tags (repeat or comma-separate).
    #[arg(short, long, value_delimiter = ',')]
    pub tag: Vec<String>,

    /// Mark the item as safe to work in parallel with siblings.
    #[arg(long)]
    pub parallel: bool,

    /// Assignee.
    #[arg(long)]
    pub assignee: Option<String>,

    /// Item description (the markdown body).
    #[arg(long)]
    pub description: Option<String>,
}

#[derive(Debug, Serialize)]
struct CreateReport {
    id: String,
    title: String,
    path: String,
}

/// Execute `tt create`.
pub fn run_create(
    args: &CreateArgs,
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

    let item = WorkItem {
        id: store.allocate_id(&args.title),
        title: args.title.clone(),
        kind: args.kind,
        dependencies: args.depends_on.clone(),
        priority: args.priority,
        remaining_work: args.remaining,
        tags: args.tag.clone(),
        parallel: args.parallel,
        assigned_to: args.assignee.clone(),
        description: args.description.clone(),
        updated_at: Some(chrono::Utc::now()),
        ..WorkItem::default()
    };

    let path = match store.write_new(&item) {
        Ok(path) => path,
        Err(err) => {
            let cli_err = CliError::from(&err);
            render_error(output, &cli_err)?;
            anyhow::bail!(cli_err.message);
        }
    };

    let report = CreateReport {
        id: item.id,
        title: item.title,
        path: path.display().to_string(),
    };

    render(output, &report, |report, w| {
        writeln!(w, "✓ Created {} ({})", report.id, report.title)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Wrapper {
        #[command(flatten)]
        args: CreateArgs,
    }

    #[test]
    fn create_args_parse_defaults() {
        let wrapper = Wrapper::parse_from(["test", "--title", "Fix login"]);
        assert_eq!(wrapper.args.title, "Fix login");
        assert_eq!(wrapper.args.kind, Kind::Task);
        assert!(wrapper.args.priority.is_none());
        assert!(wrapper.args.depends_on.is_empty());
        assert!(!wrapper.args.parallel);
    }

    #[test]
    fn create_args_split_comma_separated_lists() {
        let wrapper = Wrapper::parse_from([
            "test",
            "--title",
            "X",
            "--depends-on",
            "a,b",
            "--tag",
            "critical,backend",
        ]);
        assert_eq!(wrapper.args.depends_on, vec!["a", "b"]);
        assert_eq!(wrapper.args.tag, vec!["critical", "backend"]);
    }

    #[test]
    fn create_args_parse_kind_vocabulary() {
        let wrapper = Wrapper::parse_from(["test", "--title", "X", "--kind", "bug"]);
        assert_eq!(wrapper.args.kind, Kind::Bug);
    }
}
