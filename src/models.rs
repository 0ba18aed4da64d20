//! Core data models.
//!
//! Rule documents are produced fresh by the resolver on every call and
//! are never persisted.

use serde::Serialize;
use std::path::PathBuf;

/// A markdown file discovered under a source's resolved path.
///
/// Serializes as `{ "source", "file", "path", "content" }`, the shape
/// returned by JSON output on both the CLI and the MCP server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleDocument {
    #[serde(rename = "source")]
    pub source_name: String,
    #[serde(rename = "file")]
    pub file_name: String,
    #[serde(rename = "path")]
    pub absolute_path: PathBuf,
    pub content: String,
}
