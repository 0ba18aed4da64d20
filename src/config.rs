//! Project configuration: `.rulebased/config.json`.
//!
//! The file is the only persisted state of a project. It is re-read on
//! every command and every MCP tool call; nothing is cached in memory.
//!
//! ```json
//! {
//!   "version": "1.0",
//!   "sources": [
//!     { "name": "default", "type": "local", "path": "./rule-sets",
//!       "description": "Local rule sets for this project" }
//!   ],
//!   "cache": { "enabled": true, "ttl": 3600 },
//!   "settings": { "autoSync": false, "defaultFormat": "markdown" }
//! }
//! ```
//!
//! `cache` and `settings.autoSync` are carried through read-modify-write
//! unchanged; no code path acts on them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{Result, RuleError};

/// Directory holding the project configuration, relative to the project root.
pub const CONFIG_DIR: &str = ".rulebased";
/// Configuration file name inside [`CONFIG_DIR`].
pub const CONFIG_FILE: &str = "config.json";
/// Schema version written by `init`.
pub const CONFIG_VERSION: &str = "1.0";
/// Branch attached to git sources created by `init`.
pub const DEFAULT_BRANCH: &str = "main";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectConfig {
    pub version: String,
    #[serde(default)]
    pub sources: Vec<Source>,
    pub cache: CacheConfig,
    pub settings: Settings,
}

/// One rule provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: SourceKind,
    pub path: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Local,
    Git,
}

impl SourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Local => "local",
            SourceKind::Git => "git",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "local" => Ok(SourceKind::Local),
            "git" => Ok(SourceKind::Git),
            other => Err(format!(
                "unknown source type '{}'. Must be local or git.",
                other
            )),
        }
    }
}

/// Declared cache policy. Inert: preserved, never enforced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    pub enabled: bool,
    pub ttl: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl: 3600,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub auto_sync: bool,
    pub default_format: OutputFormat,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            auto_sync: false,
            default_format: OutputFormat::Markdown,
        }
    }
}

/// Rendering of search results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Markdown,
    Json,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Markdown => "markdown",
            OutputFormat::Json => "json",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "markdown" => Ok(OutputFormat::Markdown),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!(
                "unknown format '{}'. Must be markdown or json.",
                other
            )),
        }
    }
}

impl ProjectConfig {
    /// Configuration produced by `init`: a single `default` source.
    pub fn with_source(source: Source) -> Self {
        Self {
            version: CONFIG_VERSION.to_string(),
            sources: vec![source],
            cache: CacheConfig::default(),
            settings: Settings::default(),
        }
    }
}

/// Reads and writes the configuration file of one project root.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    /// Store for the project rooted at `root` (`<root>/.rulebased/config.json`).
    pub fn new(root: &Path) -> Self {
        Self {
            path: root.join(CONFIG_DIR).join(CONFIG_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    pub fn load(&self) -> Result<ProjectConfig> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(RuleError::ConfigNotFound {
                    path: self.path.clone(),
                })
            }
            Err(e) => return Err(RuleError::io(&self.path, e)),
        };

        serde_json::from_str(&content).map_err(|source| RuleError::ConfigParse {
            path: self.path.clone(),
            source,
        })
    }

    /// Write `config` with 2-space indentation.
    ///
    /// The JSON goes to a temporary file next to the target which is then
    /// renamed over it, so an interrupted save never leaves a truncated file.
    pub fn save(&self, config: &ProjectConfig) -> Result<()> {
        let dir = self
            .path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        std::fs::create_dir_all(&dir).map_err(|e| RuleError::io(&dir, e))?;

        let mut json = serde_json::to_string_pretty(config)?;
        json.push('\n');

        let mut tmp = tempfile::NamedTempFile::new_in(&dir).map_err(|e| RuleError::io(&dir, e))?;
        tmp.write_all(json.as_bytes())
            .map_err(|e| RuleError::io(tmp.path(), e))?;
        tmp.as_file()
            .sync_all()
            .map_err(|e| RuleError::io(tmp.path(), e))?;
        tmp.persist(&self.path)
            .map_err(|e| RuleError::io(&self.path, e.error))?;

        tracing::debug!(path = %self.path.display(), "configuration saved");
        Ok(())
    }
}
