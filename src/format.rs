//! Rendering of search results for the CLI and the MCP server.

use crate::config::OutputFormat;
use crate::error::Result;
use crate::models::RuleDocument;

/// Markdown output when nothing matched.
pub const NO_MATCHES: &str = "No rules found matching the keywords.";

pub fn render(documents: &[RuleDocument], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => render_json(documents),
        OutputFormat::Markdown => Ok(render_markdown(documents)),
    }
}

/// Pretty-printed array of `{source, file, path, content}` records.
pub fn render_json(documents: &[RuleDocument]) -> Result<String> {
    Ok(serde_json::to_string_pretty(documents)?)
}

/// Count heading, then one `## <file> (<source>)` section per document
/// with the content verbatim and a `---` separator.
pub fn render_markdown(documents: &[RuleDocument]) -> String {
    if documents.is_empty() {
        return NO_MATCHES.to_string();
    }

    let mut out = format!("# Found {} rule(s)\n\n", documents.len());
    for doc in documents {
        out.push_str(&format!("## {} ({})\n\n", doc.file_name, doc.source_name));
        out.push_str(&doc.content);
        out.push_str("\n\n---\n\n");
    }
    out
}
