//! # crawl-mcp - Website crawling as an MCP tool
//!
//! This crate exposes a single Model Context Protocol tool, `crawl`, that crawls
//! a website breadth-first and saves every usable page into one structured
//! markdown file.
//!
//! ## Features
//!
//! - Depth-limited crawling through a pluggable [`crawler::CrawlEngine`]
//!   (backed by `spider` in production)
//! - Error page detection for origins that answer 200 with a 404/403 body
//! - Link and image stripping that leaves fenced code untouched
//! - Per-run statistics returned to the caller
//! - Stdio and SSE transports via `rmcp`
//! - Output sanitizing for consoles that cannot carry unicode
//!
//! ## Example
//!
//! ```rust,no_run
//! use crawl_mcp::crawler::SpiderEngine;
//! use crawl_mcp::orchestrator::{CrawlRequest, Orchestrator, OrchestratorConfig};
//! use crawl_mcp::processor::CrawlOutcome;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let orchestrator = Orchestrator::new(
//!         Arc::new(SpiderEngine),
//!         OrchestratorConfig::builder().results_dir("crawl_results").build(),
//!     );
//!
//!     let mut request = CrawlRequest::new("https://example.com".parse()?);
//!     request.max_depth = 1;
//!
//!     match orchestrator.run(request).await {
//!         CrawlOutcome::Success { file_path, stats } => {
//!             println!("{} pages saved to {}", stats.successful_pages, file_path.display());
//!         }
//!         CrawlOutcome::Failure { error, .. } => eprintln!("{error}"),
//!     }
//!     Ok(())
//! }
//! ```

pub mod markdown;
pub mod sanitize;

pub mod crawler;
pub mod mcp;
pub mod orchestrator;
pub mod processor;

pub use markdown::strip_links_and_images;

/// Re-export of commonly used types
pub mod prelude {
    pub use crate::crawler::{CrawlEngine, PageResult, SpiderEngine};
    pub use crate::orchestrator::{CrawlRequest, Orchestrator, OrchestratorConfig};
    pub use crate::processor::{CrawlOutcome, CrawlStats};
    pub use crate::sanitize::{OutputEncoding, TextSanitizer};
}
