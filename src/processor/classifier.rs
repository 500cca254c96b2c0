//! Page classification
//!
//! Origin proxies often answer with an HTTP 200 that wraps an error page, and
//! the engine does not always surface the real status code. Pages are therefore
//! judged by textual signatures in the body and the title.

use crate::crawler::PageResult;
use crate::markdown::strip_links_and_images;
use std::fmt;

const NOT_FOUND_BODY: &str = "404 Not Found";
const FORBIDDEN_BODY: &str = "403 Forbidden";
const SERVER_SIGNATURE: &str = "nginx";

const TITLE_NOT_FOUND: [&str; 2] = ["404", "Not Found"];
const TITLE_FORBIDDEN: [&str; 2] = ["403", "Forbidden"];

/// Kind of error page detected in a crawl result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorPageKind {
    NotFound,
    Forbidden,
}

impl ErrorPageKind {
    /// HTTP status the error page stands for
    pub fn status_code(&self) -> u16 {
        match self {
            ErrorPageKind::NotFound => 404,
            ErrorPageKind::Forbidden => 403,
        }
    }
}

impl fmt::Display for ErrorPageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.status_code())
    }
}

/// What to do with one crawl result
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// Usable page, carrying its content with links and images stripped
    Accepted(String),
    /// The engine delivered no text for the page
    SkippedNoContent,
    /// The page is an error page dressed up as content
    SkippedErrorPage(ErrorPageKind),
}

/// Classify a crawl result. First matching rule wins:
///
/// 1. no markdown and no text: [`Classification::SkippedNoContent`]
/// 2. body has `404 Not Found` and `nginx`: not found
/// 3. body has `403 Forbidden` and `nginx`: forbidden
/// 4. title mentions `404`/`Not Found` (not found) or `403`/`Forbidden` (forbidden)
/// 5. otherwise accepted, with links and images stripped from the body
pub fn classify(page: &PageResult) -> Classification {
    let Some(body) = page.content() else {
        return Classification::SkippedNoContent;
    };

    if let Some(kind) = body_error_signature(body) {
        return Classification::SkippedErrorPage(kind);
    }

    if let Some(kind) = title_error_signature(page.metadata.title()) {
        return Classification::SkippedErrorPage(kind);
    }

    Classification::Accepted(strip_links_and_images(body))
}

fn body_error_signature(body: &str) -> Option<ErrorPageKind> {
    if !body.contains(SERVER_SIGNATURE) {
        return None;
    }
    if body.contains(NOT_FOUND_BODY) {
        Some(ErrorPageKind::NotFound)
    } else if body.contains(FORBIDDEN_BODY) {
        Some(ErrorPageKind::Forbidden)
    } else {
        None
    }
}

fn title_error_signature(title: &str) -> Option<ErrorPageKind> {
    if TITLE_NOT_FOUND.iter().any(|marker| title.contains(marker)) {
        Some(ErrorPageKind::NotFound)
    } else if TITLE_FORBIDDEN.iter().any(|marker| title.contains(marker)) {
        Some(ErrorPageKind::Forbidden)
    } else {
        None
    }
}
