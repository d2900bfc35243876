//! Command handlers for the `tt` binary.
//!
//! Each module is a thin wrapper: parse args, build a snapshot from the
//! store or a remote source, call into `tether-engine`, render.

pub mod blocked;
pub mod completions;
pub mod create;
pub mod digest;
pub mod done;
pub mod init;
pub mod list;
pub mod next;
pub mod pull;
pub mod show;
pub mod standup;
pub mod start;

use std::path::Path;

use tether_core::config::{self, Provider};
use tether_core::error::ErrorCode;
use tether_core::model::WorkItem;
use tether_core::remote::board::BoardClient;
use tether_core::remote::hub::HubClient;
use tether_core::source::Source;
use tether_core::store::MarkdownStore;

use crate::output::CliError;

/// Open the local store, or produce the standard "not initialized" error.
pub(crate) fn open_store(project_root: &Path) -> Result<MarkdownStore, CliError> {
    MarkdownStore::open(project_root).map_err(|err| CliError::from(&err))
}

/// Build the configured remote source.
///
/// Picks the `provider` from config when set, otherwise whichever remote
/// section is present. Tokens resolve from the configured env var here, at
/// the CLI boundary.
pub(crate) fn remote_source(project_root: &Path) -> Result<Source, CliError> {
    let project = config::load_project_config(project_root).map_err(|err| {
        CliError::with_details(
            format!("{err:#}"),
            ErrorCode::ConfigParseError
                .hint()
                .unwrap_or_default()
                .to_string(),
            ErrorCode::ConfigParseError.code().to_string(),
        )
    })?;

    let remote = project.remote;
    let provider = remote.provider.or_else(|| {
        if remote.hub.is_some() {
            Some(Provider::Hub)
        } else if remote.board.is_some() {
            Some(Provider::Board)
        } else {
            None
        }
    });

    let not_configured = || {
        CliError::with_details(
            ErrorCode::RemoteNotConfigured.message().to_string(),
            ErrorCode::RemoteNotConfigured
                .hint()
                .unwrap_or_default()
                .to_string(),
            ErrorCode::RemoteNotConfigured.code().to_string(),
        )
    };

    match provider {
        Some(Provider::Hub) => remote
            .hub
            .as_ref()
            .map(|hub| Source::Hub(HubClient::from_remote(hub)))
            .ok_or_else(not_configured),
        Some(Provider::Board) => remote
            .board
            .as_ref()
            .map(|board| Source::Board(BoardClient::from_remote(board)))
            .ok_or_else(not_configured),
        None => Err(not_configured()),
    }
}

/// One row in list-style output, shared by `list` and the report sections.
pub(crate) fn summary_line(item: &WorkItem) -> String {
    format!(
        "{:<24}  {:<12}  {:<8}  {:>3}  {}",
        item.id,
        item.status.to_string(),
        item.kind.to_string(),
        item.priority
            .map_or_else(|| "-".to_string(), |p| p.to_string()),
        item.title
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tether_core::model::{Kind, Status};

    #[test]
    fn remote_source_without_config_reports_stable_code() {
        let dir = tempfile::tempdir().expect("temp dir");
        let err = remote_source(dir.path()).expect_err("no remote configured");
        assert_eq!(err.error_code.as_deref(), Some("E1003"));
        assert!(err.suggestion.is_some());
    }

    #[test]
    fn remote_source_prefers_explicit_provider() {
        let dir = tempfile::tempdir().expect("temp dir");
        std::fs::create_dir_all(dir.path().join(".tether")).expect("mkdir");
        std::fs::write(
            dir.path().join(".tether/config.toml"),
            r#"
[remote]
provider = "board"

[remote.hub]
owner = "acme"
repo = "widget"

[remote.board]
organization = "acme"
project = "widget"
"#,
        )
        .expect("write config");

        let source = remote_source(dir.path()).expect("source");
        assert_eq!(source.label(), "board");
    }

    #[test]
    fn remote_source_falls_back_to_the_configured_section() {
        let dir = tempfile::tempdir().expect("temp dir");
        std::fs::create_dir_all(dir.path().join(".tether")).expect("mkdir");
        std::fs::write(
            dir.path().join(".tether/config.toml"),
            "[remote.hub]\nowner = \"acme\"\nrepo = \"widget\"\n",
        )
        .expect("write config");

        let source = remote_source(dir.path()).expect("source");
        assert_eq!(source.label(), "hub");
    }

    #[test]
    fn summary_line_renders_missing_priority_as_dash() {
        let mut item = WorkItem::new("fix-login", "Fix login");
        item.kind = Kind::Bug;
        item.status = Status::Open;

        let line = summary_line(&item);
        assert!(line.contains("fix-login"));
        assert!(line.contains("bug"));
        assert!(line.contains('-'));
    }
}
