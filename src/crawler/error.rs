//! Error types for the crawler module

use std::time::Duration;
use thiserror::Error;

/// Error type for crawler operations
#[derive(Debug, Error)]
pub enum CrawlError {
    /// The engine refused or failed the crawl
    #[error("Engine error: {0}")]
    Engine(String),

    /// The crawl did not finish within the configured limit
    #[error("Crawl timed out after {}s", .0.as_secs_f64())]
    Timeout(Duration),
}
