//! MCP server handler implementation.
//!
//! Routes tool calls to the implementations in [`crate::tools`].
use crate::tools::{
    AssetPurgeParams, AssetResolveParams, AssetStoreParams, list_impl, purge_impl, resolve_impl, store_impl,
};

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
use siteasset_core::{CacheDb, Resolver};

/// The MCP server handler for siteasset.
#[derive(Clone)]
pub struct AssetServer {
    tool_router: ToolRouter<Self>,
    resolver: Resolver,
    cache: CacheDb,
    high_density: bool,
}

#[tool_router]
impl AssetServer {
    /// Create a new server handler.
    ///
    /// `high_density` is the default for resolutions that don't specify one.
    pub fn new(resolver: Resolver, cache: CacheDb, high_density: bool) -> Self {
        Self { tool_router: Self::tool_router(), resolver, cache, high_density }
    }

    #[tool(description = "Resolve an asset:<kind>[-<size>]:<locator> reference to an image. \
                          Falls back to a default image when the site has none.")]
    async fn asset_resolve(&self, params: Parameters<AssetResolveParams>) -> Result<CallToolResult, McpError> {
        resolve_impl(&self.resolver, self.high_density, params.0).await
    }

    #[tool(description = "Store a site's favicon, thumb or cover image given as a base64 data: URL \
                          or as raw base64 bytes with an optional media type.")]
    async fn asset_store(&self, params: Parameters<AssetStoreParams>) -> Result<CallToolResult, McpError> {
        store_impl(&self.cache, params.0).await
    }

    #[tool(description = "Purge cached site images for one site, or down to the newest N entries.")]
    async fn asset_purge(&self, params: Parameters<AssetPurgeParams>) -> Result<CallToolResult, McpError> {
        purge_impl(&self.cache, params.0).await
    }

    #[tool(description = "List the names of the built-in favicons served for internal pages.")]
    async fn builtin_list(&self) -> Result<CallToolResult, McpError> {
        list_impl(self.resolver.source()).await
    }
}

impl ServerHandler for AssetServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "siteasset".into(),
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
