//! Source synchronization report.
//!
//! No transport exists yet: git sources are only reported as what would
//! be synced, and local sources are checked for availability. A git
//! source whose checkout path already exists also reports the rule files
//! search would see there. Nothing
//! on disk or on the network is modified, with or without `force`.

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

use crate::config::{Source, SourceKind};
use crate::error::Result;
use crate::resolver::{resolve_path, resolve_source};
use crate::workspace::Workspace;

/// Status of one configured source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SourceSync {
    /// Git source; a real sync would fetch `repository` at `branch`.
    Pending {
        name: String,
        repository: Option<String>,
        branch: Option<String>,
        /// Rule files in an existing checkout path.
        #[serde(skip_serializing_if = "Option::is_none")]
        rule_count: Option<usize>,
    },
    /// Local source whose directory exists.
    Available {
        name: String,
        path: PathBuf,
        rule_count: usize,
    },
    /// Local source whose directory does not exist or cannot be read.
    NotFound { name: String, path: PathBuf },
}

impl SourceSync {
    pub fn name(&self) -> &str {
        match self {
            SourceSync::Pending { name, .. }
            | SourceSync::Available { name, .. }
            | SourceSync::NotFound { name, .. } => name,
        }
    }
}

impl fmt::Display for SourceSync {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceSync::Pending {
                name,
                repository,
                branch,
                rule_count,
            } => {
                write!(
                    f,
                    "Would sync {} from {}",
                    name,
                    repository.as_deref().unwrap_or("<unset>")
                )?;
                if let Some(branch) = branch {
                    write!(f, " ({})", branch)?;
                }
                if let Some(count) = rule_count {
                    write!(f, " ({} rule files)", count)?;
                }
                Ok(())
            }
            SourceSync::Available {
                name,
                path,
                rule_count,
            } => write!(
                f,
                "Local source {} at {} is available with {} rule files",
                name,
                path.display(),
                rule_count
            ),
            SourceSync::NotFound { name, path } => {
                write!(f, "Local source {} at {} not found", name, path.display())
            }
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SyncReport {
    pub force: bool,
    pub sources: Vec<SourceSync>,
}

impl fmt::Display for SyncReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lines: Vec<String> = self.sources.iter().map(|s| s.to_string()).collect();
        f.write_str(&lines.join("\n"))
    }
}

fn check_source(source: &Source, workspace: &Workspace) -> SourceSync {
    match source.kind {
        SourceKind::Git => SourceSync::Pending {
            name: source.name.clone(),
            repository: source.repository.clone(),
            branch: source.branch.clone(),
            rule_count: resolve_source(source, workspace.root())
                .ok()
                .map(|docs| docs.len()),
        },
        SourceKind::Local => match resolve_source(source, workspace.root()) {
            Ok(docs) => SourceSync::Available {
                name: source.name.clone(),
                path: resolve_path(workspace.root(), &source.path),
                rule_count: docs.len(),
            },
            Err(e) => {
                tracing::debug!("{}", e);
                SourceSync::NotFound {
                    name: source.name.clone(),
                    path: resolve_path(workspace.root(), &source.path),
                }
            }
        },
    }
}

/// Report the sync status of every configured source, in order.
pub fn sync_sources(workspace: &Workspace, force: bool) -> Result<SyncReport> {
    let config = workspace.config_store().load()?;
    let sources = config
        .sources
        .iter()
        .map(|s| check_source(s, workspace))
        .collect();
    Ok(SyncReport { force, sources })
}
