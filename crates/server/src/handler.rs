//! MCP server handler implementation.
//!
//! This module defines the main server handler that
//! routes tool calls to the appropriate implementations.
use std::sync::Arc;

use crate::tools::{
    ServerState,
    cache::cache_clear_impl,
    discover::{WebmentionDiscoverParams, discover_impl},
    send::{WebmentionSendParams, send_impl},
};
use mention_core::{AppConfig, Error};

use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{
        tool::{ToolCallContext, ToolRouter},
        wrapper::Parameters,
    },
    model::{
        CallToolRequestParam, CallToolResult, Implementation, ListToolsResult, PaginatedRequestParam, ProtocolVersion,
        ServerCapabilities, ServerInfo,
    },
    service::{RequestContext, RoleServer},
    tool, tool_router,
};

/// The main MCP server handler for mcp-webmention.
#[derive(Clone)]
pub struct WebmentionServer {
    tool_router: ToolRouter<Self>,
    state: Arc<ServerState>,
}

/// Tool router implementation using the #[tool_router] macro.
///
/// This macro generates the routing logic that maps tool names to handler methods.
#[tool_router]
impl WebmentionServer {
    /// Create a new server handler sharing one HTTP client and endpoint cache.
    pub fn new(config: AppConfig) -> Result<Self, Error> {
        let state = ServerState::new(config)?;
        Ok(Self { tool_router: Self::tool_router(), state: Arc::new(state) })
    }

    /// Discover a URL's webmention endpoint.
    #[tool(
        description = "Discover the webmention endpoint of a URL from its Link headers or HTML. Returns the endpoint (or null) and whether the answer came from cache."
    )]
    async fn webmention_discover(
        &self, params: Parameters<WebmentionDiscoverParams>,
    ) -> Result<CallToolResult, McpError> {
        discover_impl(&self.state, params.0).await
    }

    /// Send a webmention.
    #[tool(
        description = "Send a webmention: POST source and target to an endpoint. Redirects are returned, not followed, unless follow_redirects is set."
    )]
    async fn webmention_send(&self, params: Parameters<WebmentionSendParams>) -> Result<CallToolResult, McpError> {
        send_impl(&self.state, params.0).await
    }

    /// Clear the endpoint cache.
    #[tool(description = "Forget every cached webmention endpoint discovery result.")]
    async fn endpoint_cache_clear(&self) -> Result<CallToolResult, McpError> {
        cache_clear_impl(&self.state).await
    }
}

impl ServerHandler for WebmentionServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "mcp-webmention".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self, _request: Option<PaginatedRequestParam>, _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, rmcp::model::ErrorData> {
        Ok(ListToolsResult { meta: None, tools: self.tool_router.list_all(), next_cursor: None })
    }

    async fn call_tool(
        &self, request: CallToolRequestParam, context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, rmcp::model::ErrorData> {
        self.tool_router
            .call(ToolCallContext::new(self, request, context))
            .await
    }
}
