//! rmcp server handler backed by the [`ToolRegistry`]

use rmcp::{
    model::{
        CallToolRequestParam, CallToolResult, Implementation, ListToolsResult,
        PaginatedRequestParam, ServerCapabilities, ServerInfo,
    },
    service::RequestContext,
    Error as McpError, RoleServer, ServerHandler,
};
use std::sync::Arc;
use tracing::{info, instrument};

use super::{register_tools, ToolRegistry};
use crate::orchestrator::Orchestrator;
use crate::sanitize::TextSanitizer;

/// Name advertised in the initialize reply
pub const SERVER_NAME: &str = "mcp-web-crawler";

const INSTRUCTIONS: &str = "Use the crawl tool to crawl a website breadth-first and save every \
usable page as one structured markdown file. The reply names the file and counts the pages \
that were kept, empty, not found (404) or forbidden (403).";

/// MCP server exposing the registered tools
#[derive(Debug, Clone)]
pub struct CrawlServer {
    registry: Arc<ToolRegistry>,
}

impl CrawlServer {
    pub fn new(registry: ToolRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
        }
    }

    /// Server with the standard tool set
    pub fn with_orchestrator(orchestrator: Orchestrator, sanitizer: TextSanitizer) -> Self {
        let mut registry = ToolRegistry::new();
        register_tools(&mut registry, orchestrator, sanitizer);
        Self::new(registry)
    }
}

impl ServerHandler for CrawlServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(INSTRUCTIONS.to_string()),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: SERVER_NAME.to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            ..Default::default()
        }
    }

    async fn list_tools(
        &self,
        _request: PaginatedRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        Ok(ListToolsResult {
            next_cursor: None,
            tools: self.registry.tools(),
        })
    }

    #[instrument(skip_all, fields(tool = %request.name))]
    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        info!("Tool call received");
        Ok(self.registry.call(&request.name, request.arguments).await?)
    }
}
