//! Keyword search over rule documents.
//!
//! Matching is a single case-insensitive substring test of the whole
//! keyword string against each document's content. There is no
//! tokenization, no ranking, and no result limit. An empty keyword
//! string matches every document.

use crate::config::OutputFormat;
use crate::error::Result;
use crate::models::RuleDocument;
use crate::resolver::{resolve_all, Resolution};
use crate::workspace::Workspace;

/// True when `keywords` occurs in `content`, ignoring case.
pub fn matches(content: &str, keywords: &str) -> bool {
    content.to_lowercase().contains(&keywords.to_lowercase())
}

/// Stable filter of `documents` by [`matches`].
pub fn search(documents: Vec<RuleDocument>, keywords: &str) -> Vec<RuleDocument> {
    documents
        .into_iter()
        .filter(|doc| matches(&doc.content, keywords))
        .collect()
}

/// Result of a project-wide search.
#[derive(Debug)]
pub struct SearchOutcome {
    pub matches: Vec<RuleDocument>,
    /// Sources that could not be resolved; they contribute no documents.
    pub unavailable: Vec<crate::error::SourceError>,
    /// `settings.defaultFormat` of the loaded configuration.
    pub default_format: OutputFormat,
}

/// Load the project configuration, resolve all sources, and search them.
pub fn search_rules(workspace: &Workspace, keywords: &str) -> Result<SearchOutcome> {
    let config = workspace.config_store().load()?;
    let Resolution { documents, errors } = resolve_all(&config, workspace.root());
    for e in &errors {
        tracing::debug!("skipping unavailable source: {}", e);
    }

    Ok(SearchOutcome {
        matches: search(documents, keywords),
        unavailable: errors,
        default_format: config.settings.default_format,
    })
}
