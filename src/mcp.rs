//! MCP server over stdio.
//!
//! Adapts the [`ToolRegistry`] to the MCP JSON-RPC protocol via `rmcp`.
//! stdout carries the protocol; all logging goes to stderr.
//!
//! Domain failures (missing configuration, refused initialization, bad
//! arguments) come back as ordinary tool results flagged `isError`, with
//! the error text as content. Only an unknown tool name is a protocol
//! error.
//!
//! # Client configuration
//!
//! ```json
//! {
//!   "mcpServers": {
//!     "rulebased": {
//!       "command": "rulebased",
//!       "args": ["--dir", "/path/to/project", "mcp"]
//!     }
//!   }
//! }
//! ```

use std::borrow::Cow;
use std::sync::Arc;

use rmcp::model::*;
use rmcp::{ErrorData as McpError, ServerHandler, ServiceExt};

use crate::traits::{ToolContext, ToolRegistry};
use crate::workspace::Workspace;

/// Bridges the tool registry to the MCP protocol.
#[derive(Clone)]
pub struct McpBridge {
    workspace: Arc<Workspace>,
    tools: Arc<ToolRegistry>,
}

impl McpBridge {
    pub fn new(workspace: Arc<Workspace>, tools: Arc<ToolRegistry>) -> Self {
        Self { workspace, tools }
    }

    /// Bridge serving the built-in tools.
    pub fn with_builtins(workspace: Workspace) -> Self {
        Self::new(Arc::new(workspace), Arc::new(ToolRegistry::with_builtins()))
    }

    /// Convert a registry tool into an rmcp `Tool` descriptor.
    fn to_mcp_tool(tool: &dyn crate::traits::Tool) -> Tool {
        let input_schema: Arc<serde_json::Map<String, serde_json::Value>> =
            match tool.parameters_schema() {
                serde_json::Value::Object(map) => Arc::new(map),
                _ => Arc::new(serde_json::Map::new()),
            };

        Tool {
            name: Cow::Owned(tool.name().to_string()),
            title: None,
            description: Some(Cow::Owned(tool.description().to_string())),
            input_schema,
            output_schema: None,
            annotations: Some(ToolAnnotations::new().read_only(tool.read_only())),
            execution: None,
            icons: None,
            meta: None,
        }
    }

    /// Run one tool call and wrap the outcome as a tool result.
    pub async fn dispatch(
        &self,
        name: &str,
        arguments: Option<serde_json::Map<String, serde_json::Value>>,
    ) -> Result<CallToolResult, McpError> {
        let tool = self.tools.find(name).ok_or_else(|| {
            McpError::new(
                ErrorCode::METHOD_NOT_FOUND,
                format!("no tool registered with name: {}", name),
                None,
            )
        })?;

        let params = arguments
            .map(serde_json::Value::Object)
            .unwrap_or(serde_json::Value::Object(serde_json::Map::new()));

        let ctx = ToolContext::new(self.workspace.clone());
        match tool.execute(params, &ctx).await {
            Ok(text) => Ok(CallToolResult::success(vec![Content::text(text)])),
            Err(e) => {
                tracing::warn!(tool = name, "{:#}", e);
                Ok(CallToolResult::error(vec![Content::text(format!("{:#}", e))]))
            }
        }
    }
}

impl ServerHandler for McpBridge {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "RuleBased".to_string(),
                title: Some("RuleBased".to_string()),
                version: env!("CARGO_PKG_VERSION").to_string(),
                description: None,
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "RuleBased serves project rule documents (markdown). Use getRules to search \
                 rules by keyword, syncRules to check configured sources, and initProject to \
                 create the .rulebased configuration."
                    .to_string(),
            ),
        }
    }

    fn list_tools(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: rmcp::service::RequestContext<rmcp::RoleServer>,
    ) -> impl std::future::Future<Output = Result<ListToolsResult, McpError>> + Send + '_ {
        let tools: Vec<Tool> = self
            .tools
            .tools()
            .iter()
            .map(|t| Self::to_mcp_tool(t.as_ref()))
            .collect();
        std::future::ready(Ok(ListToolsResult::with_all_items(tools)))
    }

    fn get_tool(&self, name: &str) -> Option<Tool> {
        self.tools.find(name).map(Self::to_mcp_tool)
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParams,
        _context: rmcp::service::RequestContext<rmcp::RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        tracing::debug!(tool = %request.name, "tool call");
        self.dispatch(&request.name, request.arguments).await
    }
}

/// Serve the built-in tools over stdin/stdout until the client disconnects.
pub async fn run_stdio_server(workspace: Workspace) -> anyhow::Result<()> {
    tracing::info!(root = %workspace.root().display(), "starting MCP server on stdio");
    let service = McpBridge::with_builtins(workspace)
        .serve(rmcp::transport::stdio())
        .await?;
    let reason = service.waiting().await?;
    tracing::info!("MCP server stopped: {:?}", reason);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn bridge(tmp: &TempDir) -> McpBridge {
        McpBridge::with_builtins(Workspace::new(tmp.path()))
    }

    fn text_of(result: &CallToolResult) -> String {
        result
            .content
            .iter()
            .filter_map(|c| c.as_text().map(|t| t.text.clone()))
            .collect::<Vec<_>>()
            .join("")
    }

    #[test]
    fn descriptors_carry_schema() {
        let tmp = TempDir::new().unwrap();
        let tool = bridge(&tmp).get_tool("getRules").unwrap();
        assert_eq!(tool.name, "getRules");
        assert_eq!(tool.input_schema["required"], serde_json::json!(["keywords"]));
        assert!(bridge(&tmp).get_tool("nope").is_none());
    }

    #[tokio::test]
    async fn domain_errors_are_tool_results() {
        let tmp = TempDir::new().unwrap();
        let mut args = serde_json::Map::new();
        args.insert("keywords".to_string(), serde_json::json!("style"));

        let result = bridge(&tmp).dispatch("getRules", Some(args)).await.unwrap();
        assert_eq!(result.is_error, Some(true));
        assert!(text_of(&result).starts_with("Error searching rules: "));
    }

    #[tokio::test]
    async fn unknown_tool_is_protocol_error() {
        let tmp = TempDir::new().unwrap();
        let err = bridge(&tmp).dispatch("deleteRules", None).await.unwrap_err();
        assert_eq!(err.code.0, ErrorCode::METHOD_NOT_FOUND.0);
    }

    #[tokio::test]
    async fn init_through_bridge_succeeds() {
        let tmp = TempDir::new().unwrap();
        let result = bridge(&tmp).dispatch("initProject", None).await.unwrap();
        assert_eq!(result.is_error, Some(false));
        assert!(text_of(&result).contains("- Type: local"));
        assert!(tmp.path().join("rule-sets").join("example.md").is_file());
    }
}
