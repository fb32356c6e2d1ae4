use rmcp::model::{
    CallToolRequestParam, CallToolResult, Content, Implementation, ListResourcesResult,
    ListToolsResult, PaginatedRequestParam, ReadResourceRequestParam, ReadResourceResult,
    ResourceContents, ServerCapabilities, ServerInfo,
};
use rmcp::service::RequestContext;
use rmcp::{ErrorData as McpError, RoleServer, ServerHandler};
use serde_json::Value;
use tracing::{info, warn};

use super::{SERVER_NAME, call_tool, registry, resources};
use crate::handlers::ToolContext;

const INSTRUCTIONS: &str = "Search, inspect and download music from TIDAL. \
Every tool needs a login made with `tidal-dl-ng login`; \
read tidal://auth/status to check it.";

/// MCP handler shared by every transport
#[derive(Clone)]
pub struct TidalServer {
    ctx: ToolContext,
}

impl TidalServer {
    pub fn new(ctx: ToolContext) -> Self {
        Self { ctx }
    }
}

impl ServerHandler for TidalServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(INSTRUCTIONS.to_string()),
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_resources()
                .build(),
            server_info: Implementation {
                name: SERVER_NAME.to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        Ok(ListToolsResult::with_all_items(registry::tools()))
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        let name = request.name;
        let arguments = request.arguments.map(Value::Object).unwrap_or(Value::Null);

        info!(tool = %name, "Tool call");

        match call_tool(&self.ctx, &name, arguments).await {
            Ok(text) => Ok(CallToolResult::success(vec![Content::text(text)])),
            Err(e) if e.is_tool_result() => {
                warn!("Tool {} refused: {}", name, e);
                Ok(CallToolResult::error(vec![Content::text(e.to_string())]))
            }
            Err(e) => Err(McpError::invalid_params(e.to_string(), None)),
        }
    }

    async fn list_resources(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourcesResult, McpError> {
        Ok(ListResourcesResult::with_all_items(resources::list_resources()))
    }

    async fn read_resource(
        &self,
        request: ReadResourceRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<ReadResourceResult, McpError> {
        let text = resources::read(&self.ctx, &request.uri)
            .await
            .map_err(|e| McpError::resource_not_found(e.to_string(), None))?;

        Ok(ReadResourceResult {
            contents: vec![ResourceContents::text(text, request.uri)],
        })
    }
}
