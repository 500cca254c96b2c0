//! Content processor module
//!
//! Turns the raw pages an engine delivered into the crawl artifact. Each page
//! is classified (accepted, empty, or an error page in disguise), accepted
//! pages are stripped of links and images and appended as one markdown
//! section, and every decision is counted in [`CrawlStats`].

mod aggregate;
mod classifier;
mod stats;

pub use aggregate::{aggregate, render_section, Aggregator, CrawlOutcome};
pub use classifier::{classify, Classification, ErrorPageKind};
pub use stats::CrawlStats;
