use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Machine-readable error codes for agent-friendly decision making.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    NotInitialized,
    ConfigParseError,
    RemoteNotConfigured,
    ItemNotFound,
    AmbiguousId,
    DuplicateItem,
    InvalidStateTransition,
    InvalidEnumValue,
    FrontMatterMissing,
    FrontMatterParseError,
    ItemFileWriteFailed,
    RemoteRequestFailed,
    InternalUnexpected,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::NotInitialized => "E1001",
            Self::ConfigParseError => "E1002",
            Self::RemoteNotConfigured => "E1003",
            Self::ItemNotFound => "E2001",
            Self::AmbiguousId => "E2002",
            Self::DuplicateItem => "E2003",
            Self::InvalidStateTransition => "E2004",
            Self::InvalidEnumValue => "E2005",
            Self::FrontMatterMissing => "E3001",
            Self::FrontMatterParseError => "E3002",
            Self::ItemFileWriteFailed => "E5001",
            Self::RemoteRequestFailed => "E6001",
            Self::InternalUnexpected => "E9001",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::NotInitialized => "Project not initialized",
            Self::ConfigParseError => "Config file parse error",
            Self::RemoteNotConfigured => "No remote tracker configured",
            Self::ItemNotFound => "Item not found",
            Self::AmbiguousId => "Ambiguous item ID",
            Self::DuplicateItem => "Item already exists",
            Self::InvalidStateTransition => "Invalid status transition",
            Self::InvalidEnumValue => "Invalid kind/status value",
            Self::FrontMatterMissing => "Item file has no front-matter",
            Self::FrontMatterParseError => "Item front-matter parse error",
            Self::ItemFileWriteFailed => "Item file write failed",
            Self::RemoteRequestFailed => "Remote tracker request failed",
            Self::InternalUnexpected => "Internal unexpected error",
        }
    }

    /// Optional remediation hint that can be surfaced to operators and agents.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::NotInitialized => Some("Run `tt init` to initialize this directory."),
            Self::ConfigParseError => Some("Fix syntax in .tether/config.toml and retry."),
            Self::RemoteNotConfigured => {
                Some("Add a [remote.hub] or [remote.board] section to .tether/config.toml.")
            }
            Self::ItemNotFound => Some("Use `tt list` to see available items."),
            Self::AmbiguousId => Some("Use a longer ID prefix to disambiguate."),
            Self::DuplicateItem => None,
            Self::InvalidStateTransition => {
                Some("Follow valid transitions: open -> in_progress -> closed.")
            }
            Self::InvalidEnumValue => Some("Use one of the documented kind/status values."),
            Self::FrontMatterMissing => {
                Some("Item files start with a `---` fenced YAML front-matter block.")
            }
            Self::FrontMatterParseError => Some("Fix the YAML front-matter and retry."),
            Self::ItemFileWriteFailed => Some("Check disk space and write permissions."),
            Self::RemoteRequestFailed => {
                Some("Check network access and the configured token environment variable.")
            }
            Self::InternalUnexpected => Some("Retry once. If persistent, report a bug with logs."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Typed errors raised by the markdown store layer.
///
/// Command handlers convert these into CLI errors with a stable
/// [`ErrorCode`]; everything else flows through `anyhow` contexts.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("project not initialized (missing .tether directory)")]
    NotInitialized,

    #[error("item file has no front-matter: {path}")]
    MissingFrontMatter { path: PathBuf },

    #[error("invalid front-matter in {path}: {source}")]
    FrontMatter {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("item not found: {id}")]
    ItemNotFound { id: String },

    #[error("ambiguous item id '{prefix}': matches {matches:?}")]
    AmbiguousId { prefix: String, matches: Vec<String> },

    #[error("item already exists: {id}")]
    DuplicateItem { id: String },

    #[error("invalid status transition: {from} -> {to}")]
    InvalidTransition { from: String, to: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl StoreError {
    /// Map to the stable machine-readable code for CLI surfaces.
    #[must_use]
    pub const fn error_code(&self) -> ErrorCode {
        match self {
            Self::NotInitialized => ErrorCode::NotInitialized,
            Self::MissingFrontMatter { .. } => ErrorCode::FrontMatterMissing,
            Self::FrontMatter { .. } => ErrorCode::FrontMatterParseError,
            Self::ItemNotFound { .. } => ErrorCode::ItemNotFound,
            Self::AmbiguousId { .. } => ErrorCode::AmbiguousId,
            Self::DuplicateItem { .. } => ErrorCode::DuplicateItem,
            Self::InvalidTransition { .. } => ErrorCode::InvalidStateTransition,
            Self::Io(_) => ErrorCode::ItemFileWriteFailed,
        }
    }
}
