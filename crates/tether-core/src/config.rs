use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

/// Project configuration, read from `.tether/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectConfig {
    #[serde(default)]
    pub remote: RemoteConfig,
}

/// Remote tracker declarations.
///
/// Credentials are never stored here: each remote names the environment
/// variable that holds its token, and the CLI resolves it once when building
/// the client. Nothing below the CLI boundary reads ambient state.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// Which remote `--remote` commands use when both are configured.
    #[serde(default)]
    pub provider: Option<Provider>,
    #[serde(default)]
    pub hub: Option<HubRemote>,
    #[serde(default)]
    pub board: Option<BoardRemote>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Hub,
    Board,
}

/// A GitHub-like issue tracker remote.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HubRemote {
    pub owner: String,
    pub repo: String,
    #[serde(default = "default_hub_api_base")]
    pub api_base: String,
    #[serde(default = "default_hub_token_env")]
    pub token_env: String,
}

/// An Azure-DevOps-like work-item tracker remote.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardRemote {
    pub organization: String,
    pub project: String,
    #[serde(default = "default_board_api_base")]
    pub api_base: String,
    #[serde(default = "default_board_token_env")]
    pub token_env: String,
}

impl HubRemote {
    /// Resolve the token from the configured environment variable.
    /// Called once at the CLI boundary when constructing the client.
    #[must_use]
    pub fn token(&self) -> Option<String> {
        env::var(&self.token_env).ok()
    }
}

impl BoardRemote {
    /// Resolve the token from the configured environment variable.
    /// Called once at the CLI boundary when constructing the client.
    #[must_use]
    pub fn token(&self) -> Option<String> {
        env::var(&self.token_env).ok()
    }
}

/// Per-user configuration, read from `<config_dir>/tether/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserConfig {
    /// Preferred output mode: `pretty`, `text`, or `json`.
    #[serde(default)]
    pub output: Option<String>,
}

pub fn load_project_config(project_root: &Path) -> Result<ProjectConfig> {
    let path = project_root.join(".tether/config.toml");
    if !path.exists() {
        return Ok(ProjectConfig::default());
    }

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<ProjectConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

pub fn load_user_config() -> Result<UserConfig> {
    let Some(config_dir) = dirs::config_dir() else {
        return Ok(UserConfig::default());
    };

    let path = config_dir.join("tether/config.toml");
    if !path.exists() {
        return Ok(UserConfig::default());
    }

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<UserConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

/// Template written by `tt init` when no config exists yet.
#[must_use]
pub fn default_config_toml() -> String {
    "\
# tether project configuration.
#
# Uncomment one of the remote sections to enable `--remote` commands and
# `tt pull`. Tokens are read from the named environment variable.

# [remote]
# provider = \"hub\"

# [remote.hub]
# owner = \"acme\"
# repo = \"widget\"
# api_base = \"https://api.github.com\"
# token_env = \"TETHER_HUB_TOKEN\"

# [remote.board]
# organization = \"acme\"
# project = \"widget\"
# api_base = \"https://dev.azure.com\"
# token_env = \"TETHER_BOARD_TOKEN\"
"
    .to_string()
}

fn default_hub_api_base() -> String {
    "https://api.github.com".to_string()
}

fn default_hub_token_env() -> String {
    "TETHER_HUB_TOKEN".to_string()
}

fn default_board_api_base() -> String {
    "https://dev.azure.com".to_string()
}

fn default_board_token_env() -> String {
    "TETHER_BOARD_TOKEN".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_project_config_uses_defaults() {
        let dir = tempfile::tempdir().expect("temp dir");
        let cfg = load_project_config(dir.path()).expect("load should succeed");
        assert!(cfg.remote.provider.is_none());
        assert!(cfg.remote.hub.is_none());
        assert!(cfg.remote.board.is_none());
    }

    #[test]
    fn hub_remote_parses_with_defaults() {
        let cfg: ProjectConfig = toml::from_str(
            r#"
[remote]
provider = "hub"

[remote.hub]
owner = "acme"
repo = "widget"
"#,
        )
        .expect("parse");

        assert_eq!(cfg.remote.provider, Some(Provider::Hub));
        let hub = cfg.remote.hub.expect("hub section");
        assert_eq!(hub.owner, "acme");
        assert_eq!(hub.repo, "widget");
        assert_eq!(hub.api_base, "https://api.github.com");
        assert_eq!(hub.token_env, "TETHER_HUB_TOKEN");
    }

    #[test]
    fn board_remote_parses_with_overrides() {
        let cfg: ProjectConfig = toml::from_str(
            r#"
[remote.board]
organization = "acme"
project = "widget"
api_base = "https://board.internal"
token_env = "ACME_BOARD_PAT"
"#,
        )
        .expect("parse");

        let board = cfg.remote.board.expect("board section");
        assert_eq!(board.api_base, "https://board.internal");
        assert_eq!(board.token_env, "ACME_BOARD_PAT");
    }

    #[test]
    fn default_config_template_parses() {
        // Everything is commented out, so it must parse to an empty config.
        let cfg: ProjectConfig = toml::from_str(&default_config_toml()).expect("parse template");
        assert!(cfg.remote.hub.is_none());
    }

    #[test]
    fn bad_toml_reports_path_in_context() {
        let dir = tempfile::tempdir().expect("temp dir");
        std::fs::create_dir_all(dir.path().join(".tether")).expect("mkdir");
        std::fs::write(dir.path().join(".tether/config.toml"), "remote = 3")
            .expect("write config");

        let err = load_project_config(dir.path()).expect_err("parse must fail");
        assert!(err.to_string().contains("config.toml"));
    }
}
