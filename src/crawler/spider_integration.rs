//! Integration with spider library for web crawling

use futures::future::BoxFuture;
use futures::stream::{self, StreamExt};
use spider::page::Page;
use spider::website::Website;
use spider::Client;
use spider_utils::spider_transformations::transformation::content::{
    transform_content, ReturnFormat, TransformConfig,
};
use tracing::{debug, info, instrument};
use url::Url;

use crate::crawler::content_extraction::{extract_title, Frontier};
use crate::crawler::error::CrawlError;
use crate::crawler::{
    ContentExtraction, CrawlEngine, CrawlerConfig, Depth, PageMetadata, PageResult,
};

/// Pages of one level fetched at the same time
const FETCH_CONCURRENCY: usize = 8;

/// [`CrawlEngine`] backed by the `spider` crate
#[derive(Debug, Clone, Copy, Default)]
pub struct SpiderEngine;

impl CrawlEngine for SpiderEngine {
    fn crawl<'a>(
        &'a self,
        start_url: &'a Url,
        config: &'a CrawlerConfig,
    ) -> BoxFuture<'a, Result<Vec<PageResult>, CrawlError>> {
        Box::pin(crawl_website(start_url, config))
    }
}

/// Crawl a website breadth-first and collect every fetched page
///
/// Levels are fetched one after another, so no page deeper than
/// `config.max_depth` link hops is ever requested. Within a level pages keep
/// the order in which their links were discovered.
///
/// # Arguments
///
/// * `start_url` - The URL to start from
/// * `config` - The crawler configuration
///
/// # Returns
///
/// The pages in breadth-first order, or [`CrawlError::Engine`] when the
/// start page could not be fetched at all
#[instrument(skip(config), fields(url = %start_url))]
pub async fn crawl_website(
    start_url: &Url,
    config: &CrawlerConfig,
) -> Result<Vec<PageResult>, CrawlError> {
    info!("Starting crawl for {}", start_url);
    debug!("Crawler config: {:?}", config);

    let client = http_client(start_url, config);
    let collector = PageCollector {
        verbose: config.verbose,
        extraction: config.extraction.clone(),
    };
    let mut frontier = Frontier::new(start_url, config.include_external);
    let mut pages = Vec::new();

    for level in 0..=config.max_depth {
        let batch = frontier.take_level();
        if batch.is_empty() {
            break;
        }
        debug!(level, pages = batch.len(), "Fetching level");

        let client = &client;
        let fetched: Vec<(Url, Page)> = stream::iter(batch)
            .map(move |url| async move {
                let page = Page::new_page(url.as_str(), client).await;
                (url, page)
            })
            .buffered(FETCH_CONCURRENCY)
            .collect()
            .await;

        for (url, page) in fetched {
            let html = page.get_html();
            if level == 0 && html.is_empty() && !page.status_code.is_success() {
                return Err(CrawlError::Engine(format!(
                    "Failed to fetch {}: {}",
                    url, page.status_code
                )));
            }
            if level < config.max_depth {
                frontier.push_links(&url, &html);
            }
            pages.push(collector.collect(&url, &page, &html, level));
        }
    }

    info!("Crawled {} pages in total", pages.len());
    Ok(pages)
}

/// HTTP client carrying the configured user agent
fn http_client(start_url: &Url, config: &CrawlerConfig) -> Client {
    let mut website = Website::new(start_url.as_str());
    website.with_user_agent(Some(config.user_agent.as_str()));
    website.configure_http_client()
}

/// Turns spider pages into [`PageResult`]s
struct PageCollector {
    verbose: bool,
    extraction: ContentExtraction,
}

impl PageCollector {
    fn collect(&self, url: &Url, page: &Page, html: &str, level: u32) -> PageResult {
        let depth = Depth::Level(level);
        if self.verbose {
            info!(url = %url, depth = %depth, status = %page.status_code, "Received page");
        } else {
            debug!(url = %url, depth = %depth, status = %page.status_code, "Received page");
        }

        PageResult {
            url: url.to_string(),
            markdown: self.render(page, ReturnFormat::Markdown),
            text: self.render(page, ReturnFormat::Text),
            metadata: PageMetadata {
                depth,
                title: extract_title(html),
            },
        }
    }

    fn render(&self, page: &Page, return_format: ReturnFormat) -> Option<String> {
        let transform_config = TransformConfig {
            return_format,
            readability: self.extraction.readability,
            main_content: self.extraction.main_content,
            ..Default::default()
        };

        let rendered = transform_content(page, &transform_config, &None, &None, &None);
        (!rendered.trim().is_empty()).then_some(rendered)
    }
}
