//! Tool trait and the built-in MCP tools.
//!
//! Every MCP tool implements [`Tool`] and is registered in a
//! [`ToolRegistry`]. The MCP bridge ([`crate::mcp`]) lists and dispatches
//! tools through the registry, so custom Rust tools can be served next to
//! the built-ins.
//!
//! ```text
//! ┌──────────────────────────────────────────┐
//! │              ToolRegistry                │
//! │  ┌──────────┐ ┌──────────┐ ┌───────────┐ │
//! │  │ getRules │ │syncRules │ │initProject│ │
//! │  └──────────┘ └──────────┘ └───────────┘ │
//! └──────────────┬───────────────────────────┘
//!                ▼
//!        McpBridge → rmcp stdio server
//! ```
//!
//! # Usage
//!
//! ```rust
//! use rulebased::traits::ToolRegistry;
//!
//! let tools = ToolRegistry::with_builtins();
//! assert_eq!(tools.len(), 3);
//! ```

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

use crate::config::{OutputFormat, SourceKind};
use crate::format::render;
use crate::init::{init_project, InitOptions, InitOutcome, DEFAULT_RULES_PATH};
use crate::search::{search_rules, SearchOutcome};
use crate::sync::{sync_sources, SyncReport};
use crate::workspace::Workspace;

// ═══════════════════════════════════════════════════════════════════════
// Tool Trait
// ═══════════════════════════════════════════════════════════════════════

/// A tool that MCP clients can discover and call.
///
/// # Example
///
/// ```rust
/// use async_trait::async_trait;
/// use anyhow::Result;
/// use serde_json::{json, Value};
/// use rulebased::traits::{Tool, ToolContext};
///
/// pub struct CountRulesTool;
///
/// #[async_trait]
/// impl Tool for CountRulesTool {
///     fn name(&self) -> &str { "countRules" }
///     fn description(&self) -> &str { "Count all rule documents" }
///
///     fn parameters_schema(&self) -> Value {
///         json!({ "type": "object", "properties": {} })
///     }
///
///     async fn execute(&self, _params: Value, ctx: &ToolContext) -> Result<String> {
///         let outcome = ctx.search("")?;
///         Ok(outcome.matches.len().to_string())
///     }
/// }
/// ```
#[async_trait]
pub trait Tool: Send + Sync {
    /// Name used by `tools/call`.
    fn name(&self) -> &str;

    /// One-line description for client discovery.
    fn description(&self) -> &str;

    /// Whether this tool ships with RuleBased. Defaults to `false`.
    fn is_builtin(&self) -> bool {
        false
    }

    /// JSON Schema object describing the call arguments.
    fn parameters_schema(&self) -> Value;

    /// Whether the tool only reads state. Defaults to `true`.
    fn read_only(&self) -> bool {
        true
    }

    /// Run the tool. The returned text becomes the response content.
    ///
    /// Errors are reported to the client as a normal tool result
    /// flagged as an error, never as a protocol fault.
    async fn execute(&self, params: Value, ctx: &ToolContext) -> Result<String>;
}

// ═══════════════════════════════════════════════════════════════════════
// ToolContext
// ═══════════════════════════════════════════════════════════════════════

/// Access to the project for tool execution.
///
/// Every call re-reads the configuration file; nothing is cached between
/// calls.
#[derive(Clone)]
pub struct ToolContext {
    workspace: Arc<Workspace>,
}

impl ToolContext {
    pub fn new(workspace: Arc<Workspace>) -> Self {
        Self { workspace }
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    /// Search all configured sources. Equivalent to `rulebased get`.
    pub fn search(&self, keywords: &str) -> Result<SearchOutcome> {
        Ok(search_rules(&self.workspace, keywords)?)
    }

    /// Report source sync status. Equivalent to `rulebased sync`.
    pub fn sync(&self, force: bool) -> Result<SyncReport> {
        Ok(sync_sources(&self.workspace, force)?)
    }

    /// Initialize the project. Equivalent to `rulebased init`.
    pub fn init(&self, opts: &InitOptions) -> Result<InitOutcome> {
        Ok(init_project(&self.workspace, opts)?)
    }
}

fn parse_params<T: for<'de> Deserialize<'de>>(params: Value) -> Result<T> {
    let params = if params.is_null() {
        Value::Object(Default::default())
    } else {
        params
    };
    serde_json::from_value(params).context("invalid parameters")
}

// ═══════════════════════════════════════════════════════════════════════
// Built-in Tool Implementations
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Deserialize)]
struct GetRulesParams {
    keywords: String,
    #[serde(default)]
    format: Option<OutputFormat>,
}

/// Keyword search over rule documents.
pub struct GetRulesTool;

#[async_trait]
impl Tool for GetRulesTool {
    fn name(&self) -> &str {
        "getRules"
    }

    fn description(&self) -> &str {
        "Search and retrieve rules based on keywords from configured rule sources"
    }

    fn is_builtin(&self) -> bool {
        true
    }

    fn parameters_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "keywords": {
                    "type": "string",
                    "description": "Keywords to search for in rules (e.g., 'typescript style', 'git commit')"
                },
                "format": {
                    "type": "string",
                    "enum": ["markdown", "json"],
                    "description": "Output format for the rules"
                }
            },
            "required": ["keywords"]
        })
    }

    async fn execute(&self, params: Value, ctx: &ToolContext) -> Result<String> {
        let run = || -> Result<String> {
            let params: GetRulesParams = parse_params(params)?;
            let outcome = ctx.search(&params.keywords)?;
            let format = params.format.unwrap_or(outcome.default_format);
            Ok(render(&outcome.matches, format)?)
        };
        run().context("Error searching rules")
    }
}

#[derive(Debug, Default, Deserialize)]
struct SyncRulesParams {
    #[serde(default)]
    force: bool,
}

/// Source availability report.
pub struct SyncRulesTool;

#[async_trait]
impl Tool for SyncRulesTool {
    fn name(&self) -> &str {
        "syncRules"
    }

    fn description(&self) -> &str {
        "Synchronize rules from configured Git repositories or local sources"
    }

    fn is_builtin(&self) -> bool {
        true
    }

    fn parameters_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "force": {
                    "type": "boolean",
                    "description": "Force sync even if local changes exist"
                }
            }
        })
    }

    async fn execute(&self, params: Value, ctx: &ToolContext) -> Result<String> {
        let run = || -> Result<String> {
            let params: SyncRulesParams = parse_params(params)?;
            let report = ctx.sync(params.force)?;
            if report.force {
                tracing::warn!("force sync requested; no source transport is available");
            }
            Ok(report.to_string())
        };
        run().context("Error syncing rules")
    }
}

#[derive(Debug, Deserialize)]
struct InitProjectParams {
    #[serde(default, rename = "type")]
    kind: Option<SourceKind>,
    #[serde(default)]
    repository: Option<String>,
    #[serde(default)]
    path: Option<String>,
}

/// Project initialization.
pub struct InitProjectTool;

#[async_trait]
impl Tool for InitProjectTool {
    fn name(&self) -> &str {
        "initProject"
    }

    fn description(&self) -> &str {
        "Initialize .rulebased directory and configuration for a project"
    }

    fn is_builtin(&self) -> bool {
        true
    }

    fn read_only(&self) -> bool {
        false
    }

    fn parameters_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "type": {
                    "type": "string",
                    "enum": ["local", "git"],
                    "description": "Configuration type"
                },
                "repository": {
                    "type": "string",
                    "description": "Git repository URL for rules"
                },
                "path": {
                    "type": "string",
                    "description": "Local path for rules"
                }
            }
        })
    }

    async fn execute(&self, params: Value, ctx: &ToolContext) -> Result<String> {
        let run = || -> Result<String> {
            let params: InitProjectParams = parse_params(params)?;
            let opts = InitOptions {
                kind: params.kind.unwrap_or(SourceKind::Local),
                path: params
                    .path
                    .unwrap_or_else(|| DEFAULT_RULES_PATH.to_string()),
                repository: params.repository,
            };
            Ok(ctx.init(&opts)?.to_string())
        };
        run().context("Error initializing project")
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Registry
// ═══════════════════════════════════════════════════════════════════════

/// Registry for tools (built-in and custom Rust).
pub struct ToolRegistry {
    tools: Vec<Box<dyn Tool>>,
}

impl ToolRegistry {
    /// Create an empty tool registry.
    pub fn new() -> Self {
        Self { tools: Vec::new() }
    }

    /// Create a tool registry pre-loaded with `getRules`, `syncRules`, and `initProject`.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(GetRulesTool));
        registry.register(Box::new(SyncRulesTool));
        registry.register(Box::new(InitProjectTool));
        registry
    }

    pub fn register(&mut self, tool: Box<dyn Tool>) {
        self.tools.push(tool);
    }

    pub fn tools(&self) -> &[Box<dyn Tool>] {
        &self.tools
    }

    /// Find a tool by name.
    pub fn find(&self, name: &str) -> Option<&dyn Tool> {
        self.tools
            .iter()
            .find(|t| t.name() == name)
            .map(|t| t.as_ref())
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}
