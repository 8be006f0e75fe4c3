//! MCP server handler implementation.
//!
//! This module defines the main server handler that
//! routes tool calls to the appropriate implementations.

use crate::tools::cache::clear::clear_impl;
use crate::tools::product_details::details_impl;
use crate::tools::product_search::search_impl;
use crate::tools::{ProductDetailsParams, ProductSearchParams};
use cartscout_client::ScrapeEngine;
use std::sync::Arc;

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

/// The main MCP server handler for mcp-shop.
#[derive(Clone)]
pub struct ShopServer {
    engine: Arc<ScrapeEngine>,
    tool_router: ToolRouter<Self>,
}

/// Tool router implementation using the #[tool_router] macro.
///
/// This macro generates the routing logic that maps tool names to handler methods.
#[tool_router]
impl ShopServer {
    /// Create a new server handler around a shared engine.
    pub fn new(engine: Arc<ScrapeEngine>) -> Self {
        Self { engine, tool_router: Self::tool_router() }
    }

    /// Search an e-commerce site for products.
    #[tool(
        description = "Search an e-commerce site using a declarative site configuration (URL template plus CSS selectors). Returns normalized product records; repeat queries are served from a one-hour cache."
    )]
    async fn product_search(&self, params: Parameters<ProductSearchParams>) -> Result<CallToolResult, McpError> {
        search_impl(&self.engine, params.0).await
    }

    /// Extract a single product's details from its page.
    #[tool(
        description = "Extract one product's details (title, price, description, gallery images, availability) from its page using caller-supplied CSS selectors. Not cached."
    )]
    async fn product_details(&self, params: Parameters<ProductDetailsParams>) -> Result<CallToolResult, McpError> {
        details_impl(&self.engine, params.0).await
    }

    /// Drop every cached search result.
    #[tool(description = "Clear the in-memory search-result cache. Returns how many entries were dropped.")]
    async fn cache_clear(&self) -> Result<CallToolResult, McpError> {
        clear_impl(&self.engine).await
    }
}

impl ServerHandler for ShopServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "mcp-shop".into(),
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
