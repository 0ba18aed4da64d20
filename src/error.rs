//! Error types for RuleBased.
//!
//! [`RuleError`] covers hard failures that abort the current command
//! (missing or corrupt configuration, refused initialization, I/O).
//! [`SourceError`] is reported per source and never aborts a command:
//! the remaining sources are still resolved.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for RuleBased operations.
pub type Result<T> = std::result::Result<T, RuleError>;

/// Command-level error.
#[derive(Error, Debug)]
pub enum RuleError {
    #[error("No .rulebased/config.json found at {}. Run \"rulebased init\" first.", .path.display())]
    ConfigNotFound { path: PathBuf },

    #[error("Failed to parse config file {}: {source}", .path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Project already initialized ({} exists)", .path.display())]
    AlreadyInitialized { path: PathBuf },

    #[error("A git source requires a repository URL (use --repo)")]
    MissingRepository,

    #[error("I/O error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl RuleError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        RuleError::Io {
            path: path.into(),
            source,
        }
    }

    /// True when the caller should run `init` before retrying.
    pub fn is_not_initialized(&self) -> bool {
        matches!(self, RuleError::ConfigNotFound { .. })
    }
}

/// Per-source resolution error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    #[error("source '{source_name}': path not found: {}", .path.display())]
    PathNotFound { source_name: String, path: PathBuf },
}

impl SourceError {
    pub fn source_name(&self) -> &str {
        match self {
            SourceError::PathNotFound { source_name, .. } => source_name,
        }
    }
}
