//! # Crawler Configuration Module
//!
//! Run configuration handed to a [`CrawlEngine`](super::CrawlEngine) for one
//! crawl: how deep to go, whether to leave the start host, and how page
//! content is extracted. It uses a builder pattern like the rest of the
//! crate's configuration.
//!
//! Traversal is always breadth-first and depth-limited; only the limit and the
//! external-link policy vary per request.

/// How page HTML is turned into text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentExtraction {
    /// Run a readability pass before converting
    pub readability: bool,

    /// Keep only the main content region of the page
    pub main_content: bool,
}

impl Default for ContentExtraction {
    fn default() -> Self {
        Self {
            readability: false,
            main_content: true,
        }
    }
}

/// Configuration for a single crawl
#[derive(Debug, Clone)]
pub struct CrawlerConfig {
    /// Maximum link depth from the start URL (0 crawls only the start page)
    pub max_depth: u32,

    /// Whether links to other hosts are followed
    pub include_external: bool,

    /// Log every page decision at info level
    pub verbose: bool,

    /// User agent to use for requests
    pub user_agent: String,

    /// Content extraction applied to every page
    pub extraction: ContentExtraction,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_depth: 2,
            include_external: false,
            verbose: true,
            user_agent: format!("crawl-mcp/{}", env!("CARGO_PKG_VERSION")),
            extraction: ContentExtraction::default(),
        }
    }
}

/// Builder for CrawlerConfig
#[derive(Debug, Default)]
pub struct CrawlerConfigBuilder {
    config: CrawlerConfig,
}

impl CrawlerConfigBuilder {
    /// Create a new builder with default configuration
    pub fn new() -> Self {
        Self {
            config: CrawlerConfig::default(),
        }
    }

    /// Set the maximum depth to crawl
    pub fn max_depth(mut self, max_depth: u32) -> Self {
        self.config.max_depth = max_depth;
        self
    }

    /// Set whether external links are followed
    pub fn include_external(mut self, include_external: bool) -> Self {
        self.config.include_external = include_external;
        self
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.config.verbose = verbose;
        self
    }

    /// Set the user agent to use for requests
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    pub fn extraction(mut self, extraction: ContentExtraction) -> Self {
        self.config.extraction = extraction;
        self
    }

    /// Build the configuration
    pub fn build(self) -> CrawlerConfig {
        self.config
    }
}

impl CrawlerConfig {
    /// Create a new builder
    pub fn builder() -> CrawlerConfigBuilder {
        CrawlerConfigBuilder::new()
    }
}
