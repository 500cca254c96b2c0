//! # Crawl Engine Boundary
//!
//! This module defines what the rest of the crate knows about crawling: a
//! [`CrawlEngine`] that, given a start URL and a [`CrawlerConfig`], yields an
//! ordered list of [`PageResult`]s. Fetching, link discovery and traversal all
//! live behind that trait.
//!
//! ## Key Components
//!
//! - `CrawlEngine`: the trait the orchestrator drives, one call per request
//! - `PageResult`: a page as delivered by the engine, with optional content
//! - `SpiderEngine`: the production engine backed by the `spider` crate
//! - `CrawlerConfig`: depth, external-link policy and extraction settings
//!
//! Pages are immutable once produced. An engine reports content as optional
//! fields rather than failing per page; deciding what a page is worth is the
//! processor's job.

mod config;
mod content_extraction;
mod error;
mod spider_integration;

pub use config::{ContentExtraction, CrawlerConfig, CrawlerConfigBuilder};
pub use content_extraction::{extract_links, extract_title, Frontier};
pub use error::CrawlError;
pub use spider_integration::{crawl_website, SpiderEngine};

use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

/// Title used when the engine could not extract one
pub const UNTITLED_PAGE: &str = "Untitled page";

/// Something that can crawl a site from a start URL
///
/// Implementations are invoked exactly once per crawl request and own any
/// retry or concurrency policy they need.
pub trait CrawlEngine: Send + Sync {
    fn crawl<'a>(
        &'a self,
        start_url: &'a Url,
        config: &'a CrawlerConfig,
    ) -> BoxFuture<'a, Result<Vec<PageResult>, CrawlError>>;
}

/// Link distance of a page from the start URL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Depth {
    Level(u32),
    /// The engine could not place the page in the link graph
    Unknown,
}

impl fmt::Display for Depth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Depth::Level(level) => write!(f, "{level}"),
            Depth::Unknown => f.write_str("N/A"),
        }
    }
}

/// Metadata reported for a crawled page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageMetadata {
    pub depth: Depth,

    /// Title of the page, if one was found
    pub title: Option<String>,
}

impl Default for PageMetadata {
    fn default() -> Self {
        Self {
            depth: Depth::Unknown,
            title: None,
        }
    }
}

impl PageMetadata {
    /// The page title, falling back to [`UNTITLED_PAGE`]
    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or(UNTITLED_PAGE)
    }
}

/// A single page produced by a crawl
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageResult {
    /// URL of the page
    pub url: String,

    /// Rendered markdown, absent when rendering failed
    pub markdown: Option<String>,

    /// Plain-text extraction, used when there is no markdown
    pub text: Option<String>,

    pub metadata: PageMetadata,
}

impl PageResult {
    /// A page with no content yet
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            markdown: None,
            text: None,
            metadata: PageMetadata::default(),
        }
    }

    pub fn with_markdown(mut self, markdown: impl Into<String>) -> Self {
        self.markdown = Some(markdown.into());
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.metadata.title = Some(title.into());
        self
    }

    pub fn with_depth(mut self, depth: u32) -> Self {
        self.metadata.depth = Depth::Level(depth);
        self
    }

    /// Usable content: non-empty markdown first, then non-empty plain text
    pub fn content(&self) -> Option<&str> {
        self.markdown
            .as_deref()
            .filter(|markdown| !markdown.is_empty())
            .or_else(|| self.text.as_deref().filter(|text| !text.is_empty()))
    }
}
