//! Content extraction functionality for the crawler module

use scraper::{Html, Selector};
use std::collections::HashSet;
use tracing::warn;
use url::Url;

/// Extract the `<title>` of a page
///
/// Whitespace is normalized; an empty title counts as no title.
pub fn extract_title(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let selector = Selector::parse("title").ok()?;

    let title = document
        .select(&selector)
        .next()?
        .text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");

    (!title.is_empty()).then_some(title)
}

/// Extract every http(s) link target of a page, resolved against `base`
pub fn extract_links(base: &Url, html: &str) -> Vec<Url> {
    let document = Html::parse_document(html);
    let selector = match Selector::parse("a[href]") {
        Ok(selector) => selector,
        Err(e) => {
            warn!("Failed to parse link selector: {}", e);
            return Vec::new();
        }
    };

    document
        .select(&selector)
        .filter_map(|element| element.value().attr("href"))
        .filter_map(|href| base.join(href).ok())
        .filter(|url| matches!(url.scheme(), "http" | "https"))
        .collect()
}

/// Breadth-first queue of pages still to fetch, one link level at a time
///
/// The start page forms level 0. Links found on level `d` that were never
/// queued before form level `d + 1`. Unless external links are allowed, only
/// links on the start host are queued.
#[derive(Debug, Clone)]
pub struct Frontier {
    origin_host: Option<String>,
    include_external: bool,
    seen: HashSet<String>,
    next: Vec<Url>,
}

impl Frontier {
    pub fn new(start_url: &Url, include_external: bool) -> Self {
        let mut start = start_url.clone();
        start.set_fragment(None);

        let mut seen = HashSet::new();
        seen.insert(page_key(&start));
        Self {
            origin_host: start_url.host_str().map(str::to_string),
            include_external,
            seen,
            next: vec![start],
        }
    }

    /// Pages of the next level, leaving the frontier empty
    pub fn take_level(&mut self) -> Vec<Url> {
        std::mem::take(&mut self.next)
    }

    /// Queue the unseen links of a fetched page for the following level
    pub fn push_links(&mut self, page_url: &Url, html: &str) {
        for mut link in extract_links(page_url, html) {
            if !self.include_external && link.host_str() != self.origin_host.as_deref() {
                continue;
            }
            link.set_fragment(None);
            if self.seen.insert(page_key(&link)) {
                self.next.push(link);
            }
        }
    }
}

/// Identity of a page for depth bookkeeping: no fragment, no trailing slash
fn page_key(url: &Url) -> String {
    let mut url = url.clone();
    url.set_fragment(None);
    url.as_str().trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<html>
        <head><title>
            Example   Domain
        </title></head>
        <body>
            <a href="/about">About</a>
            <a href="https://other.org/x#frag">Other</a>
            <a href="mailto:someone@example.com">Mail</a>
            <a>No target</a>
        </body>
    </html>"#;

    #[test]
    fn test_extract_title() {
        assert_eq!(extract_title(PAGE).as_deref(), Some("Example Domain"));
        assert_eq!(extract_title("<html><body>none</body></html>"), None);
        assert_eq!(extract_title("<title>   </title>"), None);
    }

    #[test]
    fn test_extract_links() {
        let base = Url::parse("https://example.com/docs/").unwrap();
        let links = extract_links(&base, PAGE);
        let links: Vec<&str> = links.iter().map(Url::as_str).collect();
        assert_eq!(
            links,
            vec!["https://example.com/about", "https://other.org/x#frag"]
        );
    }

    #[test]
    fn test_frontier_levels() {
        let start = Url::parse("https://example.com/").unwrap();
        let mut frontier = Frontier::new(&start, false);

        let level0 = frontier.take_level();
        assert_eq!(level0, vec![start.clone()]);
        assert!(frontier.take_level().is_empty());

        let root = r#"<a href="/a">A</a><a href="/b/">B</a><a href="/a#top">A again</a>
            <a href="https://other.org/x">Other</a><a href="/">Home</a>"#;
        frontier.push_links(&start, root);
        let level1: Vec<String> = frontier.take_level().iter().map(Url::to_string).collect();
        assert_eq!(level1, vec!["https://example.com/a", "https://example.com/b/"]);

        let page_b = Url::parse("https://example.com/b/").unwrap();
        frontier.push_links(&page_b, r#"<a href="c">C</a><a href="/b">B</a>"#);
        let level2: Vec<String> = frontier.take_level().iter().map(Url::to_string).collect();
        assert_eq!(level2, vec!["https://example.com/b/c"]);
    }

    #[test]
    fn test_frontier_external_links() {
        let start = Url::parse("https://example.com/").unwrap();
        let mut frontier = Frontier::new(&start, true);
        frontier.take_level();

        frontier.push_links(&start, r#"<a href="https://other.org/x#frag">Other</a>"#);
        let level1: Vec<String> = frontier.take_level().iter().map(Url::to_string).collect();
        assert_eq!(level1, vec!["https://other.org/x"]);
    }
}
