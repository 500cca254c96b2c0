//! # Orchestrator Configuration
//!
//! Server-wide settings that apply to every crawl request: where generated
//! artifacts go and how long the engine may run. Per-request knobs live in
//! [`CrawlRequest`](super::CrawlRequest).

use std::path::PathBuf;
use std::time::Duration;

/// Directory name for generated artifacts
pub const RESULTS_DIR_NAME: &str = "crawl_results";

/// Configuration shared by all crawl runs
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Directory receiving artifacts when a request names no output file
    pub results_dir: PathBuf,

    /// Upper bound on one engine call, unbounded when `None`
    pub crawl_timeout: Option<Duration>,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            results_dir: default_results_dir(),
            crawl_timeout: None,
        }
    }
}

/// `crawl_results` next to the running executable, or in the working
/// directory when the executable path is unknown
pub fn default_results_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(RESULTS_DIR_NAME)))
        .unwrap_or_else(|| PathBuf::from(RESULTS_DIR_NAME))
}

/// Builder for OrchestratorConfig
#[derive(Debug, Default)]
pub struct OrchestratorConfigBuilder {
    config: OrchestratorConfig,
}

impl OrchestratorConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the directory for generated artifacts
    pub fn results_dir(mut self, results_dir: impl Into<PathBuf>) -> Self {
        self.config.results_dir = results_dir.into();
        self
    }

    /// Bound every engine call by `timeout`
    pub fn crawl_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.config.crawl_timeout = timeout;
        self
    }

    pub fn build(self) -> OrchestratorConfig {
        self.config
    }
}

impl OrchestratorConfig {
    pub fn builder() -> OrchestratorConfigBuilder {
        OrchestratorConfigBuilder::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = OrchestratorConfig::default();
        assert!(config.results_dir.ends_with(RESULTS_DIR_NAME));
        assert_eq!(config.crawl_timeout, None);
    }

    #[test]
    fn test_builder() {
        let config = OrchestratorConfig::builder()
            .results_dir("/tmp/out")
            .crawl_timeout(Some(Duration::from_secs(30)))
            .build();

        assert_eq!(config.results_dir, PathBuf::from("/tmp/out"));
        assert_eq!(config.crawl_timeout, Some(Duration::from_secs(30)));
    }
}
