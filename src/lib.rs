//! # RuleBased
//!
//! **Manage and search project rule documents from a CLI or an MCP client.**
//!
//! A project keeps `.rulebased/config.json`, listing rule *sources*: local
//! directories, or git repositories with a local checkout path. Each
//! source contributes the markdown files directly inside its path. Rules
//! are searched by a case-insensitive phrase match and rendered as
//! markdown or JSON.
//!
//! ## Data Flow
//!
//! ```text
//! front end ──▶ ConfigStore::load ──▶ resolve_all ──▶ search ──▶ render
//! (CLI / MCP)     (config)            (resolver)     (search)   (format)
//! ```
//!
//! Nothing is cached: every CLI run and every MCP tool call re-reads the
//! configuration and the rule files.
//!
//! ## Quick Start
//!
//! ```bash
//! rulebased init                         # ./rule-sets with example.md
//! rulebased get "indentation"            # markdown report
//! rulebased get "commit" --format json   # JSON records
//! rulebased sync                         # source availability
//! rulebased mcp                          # MCP server on stdio
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | `ProjectConfig` shape and the JSON `ConfigStore` |
//! | [`models`] | `RuleDocument` |
//! | [`resolver`] | Source → rule documents |
//! | [`search`] | Keyword matching |
//! | [`format`] | Markdown and JSON rendering |
//! | [`init`] | Project initialization and the seed rule |
//! | [`sync`] | Source sync report |
//! | [`workspace`] | Project root shared by all components |
//! | [`traits`] | `Tool` trait, `ToolRegistry`, built-in MCP tools |
//! | [`mcp`] | rmcp stdio server |
//! | [`error`] | `RuleError` and `SourceError` |
//! | [`logging`] | `tracing` subscriber setup |

pub mod config;
pub mod error;
pub mod format;
pub mod init;
pub mod logging;
pub mod mcp;
pub mod models;
pub mod resolver;
pub mod search;
pub mod sync;
pub mod traits;
pub mod workspace;

pub use config::{ConfigStore, OutputFormat, ProjectConfig, Source, SourceKind};
pub use error::{RuleError, SourceError};
pub use models::RuleDocument;
pub use traits::{Tool, ToolContext, ToolRegistry};
pub use workspace::Workspace;
