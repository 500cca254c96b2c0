//! Model Context Protocol (MCP) server implementation
//!
//! Exposes the crawler as a single MCP tool, `crawl`. It implements:
//!
//! - A tool registry that maps tool names to async handlers
//! - Argument validation that rejects malformed calls as protocol errors
//! - Reply mapping: every accepted call answers with one text item, even when
//!   the crawl itself fails
//! - Stdio and SSE transports
//!
//! The handler side is plain Rust (`ToolRegistry`), and `CrawlServer` adapts it
//! to rmcp's `ServerHandler`.

mod config;
mod error;
mod registry;
mod server;
mod tools;

pub use config::{TransportConfig, DEFAULT_SSE_PORT};
pub use error::ToolError;
pub use registry::{ToolHandler, ToolRegistry};
pub use server::{CrawlServer, SERVER_NAME};
pub use tools::{
    crawl_tool, format_summary, parse_crawl_request, register_tools, result_text, tools,
    CRAWL_TOOL_NAME,
};

use crate::orchestrator::Orchestrator;
use crate::sanitize::TextSanitizer;
use tracing::{info, instrument};

/// Run the MCP server over the given transport
///
/// # Arguments
///
/// * `orchestrator` - Runs the crawl requests
/// * `sanitizer` - Applied to unexpected fault messages before they reach the client
/// * `transport` - Where the server listens
#[instrument(skip(orchestrator, sanitizer))]
pub async fn run(
    orchestrator: Orchestrator,
    sanitizer: TextSanitizer,
    transport: TransportConfig,
) -> anyhow::Result<()> {
    info!(
        "Starting {} MCP server v{}",
        SERVER_NAME,
        env!("CARGO_PKG_VERSION")
    );
    let server = CrawlServer::with_orchestrator(orchestrator, sanitizer);
    transport.serve(server).await
}
