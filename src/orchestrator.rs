//! # Crawl Orchestrator
//!
//! Runs one crawl request end to end: pick the artifact path, drive the
//! [`CrawlEngine`] once, then hand the pages to the [`Aggregator`].
//!
//! ## Failure handling
//!
//! `run` never returns an error. An engine fault (including a timeout) comes
//! back as a [`CrawlOutcome::Failure`] prefixed `Crawling error:` with zeroed
//! stats, and an artifact write fault as `Writing error:` with whatever was
//! counted before it happened.

mod config;
mod output;

pub use config::{default_results_dir, OrchestratorConfig, OrchestratorConfigBuilder, RESULTS_DIR_NAME};
pub use output::generated_output_path;

use crate::crawler::{CrawlEngine, CrawlError, CrawlerConfig, PageResult};
use crate::processor::{Aggregator, CrawlOutcome, CrawlStats};
use chrono::Local;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, instrument};
use url::Url;

/// Default link depth for a request
pub const DEFAULT_MAX_DEPTH: u32 = 2;

/// One crawl as asked for by a caller
#[derive(Debug, Clone, PartialEq)]
pub struct CrawlRequest {
    pub start_url: Url,
    pub max_depth: u32,
    pub include_external: bool,
    pub verbose: bool,
    /// Artifact path; generated under the results directory when absent
    pub output_file: Option<PathBuf>,
}

impl CrawlRequest {
    /// A request with default options
    pub fn new(start_url: Url) -> Self {
        Self {
            start_url,
            max_depth: DEFAULT_MAX_DEPTH,
            include_external: false,
            verbose: true,
            output_file: None,
        }
    }
}

/// Drives crawl requests through an engine and the aggregator
#[derive(Clone)]
pub struct Orchestrator {
    engine: Arc<dyn CrawlEngine>,
    config: OrchestratorConfig,
}

impl std::fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Orchestrator {
    pub fn new(engine: Arc<dyn CrawlEngine>, config: OrchestratorConfig) -> Self {
        Self { engine, config }
    }

    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    /// Where the artifact of `request` will be written if it starts now
    pub fn output_path(&self, request: &CrawlRequest) -> PathBuf {
        match &request.output_file {
            Some(path) => path.clone(),
            None => generated_output_path(
                &self.config.results_dir,
                &request.start_url,
                &Local::now(),
            ),
        }
    }

    /// Run one crawl request to completion
    #[instrument(skip(self, request), fields(url = %request.start_url, max_depth = request.max_depth))]
    pub async fn run(&self, request: CrawlRequest) -> CrawlOutcome {
        let output_path = self.output_path(&request);
        let crawler_config = self.crawler_config(&request);
        info!("Crawling {} into {}", request.start_url, output_path.display());

        let pages = match self.crawl(&request.start_url, &crawler_config).await {
            Ok(pages) => pages,
            Err(e) => {
                error!("Crawl of {} failed: {}", request.start_url, e);
                return CrawlOutcome::Failure {
                    error: format!("Crawling error: {e}"),
                    stats: CrawlStats::empty(),
                };
            }
        };
        info!("Total pages crawled: {}", pages.len());

        if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            if let Err(e) = tokio::fs::create_dir_all(parent).await {
                error!("Failed to create {}: {}", parent.display(), e);
                return CrawlOutcome::Failure {
                    error: format!("Writing error: {e}"),
                    stats: CrawlStats::empty(),
                };
            }
        }

        Aggregator::new(request.verbose)
            .aggregate(&pages, &output_path)
            .await
    }

    fn crawler_config(&self, request: &CrawlRequest) -> CrawlerConfig {
        CrawlerConfig::builder()
            .max_depth(request.max_depth)
            .include_external(request.include_external)
            .verbose(request.verbose)
            .build()
    }

    async fn crawl(
        &self,
        start_url: &Url,
        config: &CrawlerConfig,
    ) -> Result<Vec<PageResult>, CrawlError> {
        let crawl = self.engine.crawl(start_url, config);
        match self.config.crawl_timeout {
            Some(limit) => tokio::time::timeout(limit, crawl)
                .await
                .map_err(|_| CrawlError::Timeout(limit))?,
            None => crawl.await,
        }
    }
}
