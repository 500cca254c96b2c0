//! Markdown clean-up for crawled pages
//!
//! Crawled markdown is full of navigation links and decorative images that add
//! noise to the saved artifact. [`strip_links_and_images`] keeps the visible
//! link text, drops images entirely and tidies the whitespace left behind,
//! while fenced code blocks pass through byte for byte.

use regex::{Captures, Regex};
use std::sync::LazyLock;

static FENCED_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```[\s\S]*?```").expect("fenced code pattern is valid"));

/// Links and images in one alternation so an image is never consumed as a link
static LINK_OR_IMAGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(!?)\[([^\]]*)\]\([^)]+\)").expect("link pattern is valid")
});

static IMAGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"!\[[^\]]*\]\([^)]+\)").expect("image pattern is valid"));

static BLANK_LINES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n\s*\n").expect("blank line pattern is valid"));

static SPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r" {2,}").expect("space run pattern is valid"));

/// Remove links and images from markdown, preserving fenced code blocks
///
/// - `[text](url)` becomes `text`
/// - `![alt](url)` is removed
/// - whitespace-only lines between paragraphs collapse to one blank line
/// - runs of spaces collapse to a single space
///
/// Code blocks are swapped for placeholders before any rewriting and restored
/// afterwards, so nothing inside them changes.
pub fn strip_links_and_images(markdown: &str) -> String {
    let mut protected = ProtectedCode::new(markdown);
    let text = protected.extract(markdown);

    let text = LINK_OR_IMAGE.replace_all(&text, |caps: &Captures| {
        let is_image = !caps[1].is_empty();
        let label = &caps[2];
        if is_image {
            String::new()
        } else if label.is_empty() {
            // `[](url)` carries no text to keep
            caps[0].to_string()
        } else {
            label.to_string()
        }
    });
    // A linked image `[![alt](src)](href)` only becomes an image once its
    // outer link is unwrapped.
    let text = IMAGE.replace_all(&text, "");
    let text = BLANK_LINES.replace_all(&text, "\n\n");
    let text = SPACE_RUN.replace_all(&text, " ");

    protected.restore(&text)
}

/// Fenced code blocks lifted out of a document while it is rewritten
struct ProtectedCode {
    sentinel: char,
    blocks: Vec<String>,
    placeholder: Regex,
}

impl ProtectedCode {
    /// Pick a private-use sentinel that does not occur in `source`, so a
    /// placeholder can never collide with page text.
    fn new(source: &str) -> Self {
        let sentinel = ('\u{E000}'..='\u{F8FF}')
            .find(|c| !source.contains(*c))
            .unwrap_or('\u{F0000}');
        let escaped = regex::escape(&sentinel.to_string());
        let placeholder = Regex::new(&format!("{escaped}CODE_BLOCK_([0-9]+){escaped}"))
            .expect("placeholder pattern is valid");

        Self {
            sentinel,
            blocks: Vec::new(),
            placeholder,
        }
    }

    fn extract(&mut self, source: &str) -> String {
        FENCED_CODE
            .replace_all(source, |caps: &Captures| {
                let index = self.blocks.len();
                self.blocks.push(caps[0].to_string());
                format!("{s}CODE_BLOCK_{index}{s}", s = self.sentinel)
            })
            .into_owned()
    }

    fn restore(&self, text: &str) -> String {
        self.placeholder
            .replace_all(text, |caps: &Captures| {
                caps[1]
                    .parse::<usize>()
                    .ok()
                    .and_then(|index| self.blocks.get(index))
                    .cloned()
                    .unwrap_or_else(|| caps[0].to_string())
            })
            .into_owned()
    }
}
