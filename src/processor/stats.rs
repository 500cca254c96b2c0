//! Counters for one aggregation run

use crate::processor::{Classification, ErrorPageKind};
use chrono::{DateTime, Local};
use serde_json::{json, Value};

/// Page counts and timing for one crawl
///
/// Counters only grow while a run is in progress. [`CrawlStats::finish`]
/// stamps the end time and hands the stats back by value, after which they
/// are treated as read-only.
#[derive(Debug, Clone, PartialEq)]
pub struct CrawlStats {
    pub successful_pages: usize,
    pub failed_pages: usize,
    pub not_found_pages: usize,
    pub forbidden_pages: usize,
    pub start_time: DateTime<Local>,
    pub end_time: Option<DateTime<Local>>,
}

impl CrawlStats {
    /// Start counting now
    pub fn start() -> Self {
        Self {
            successful_pages: 0,
            failed_pages: 0,
            not_found_pages: 0,
            forbidden_pages: 0,
            start_time: Local::now(),
            end_time: None,
        }
    }

    /// Stats for a run that never got to process a page
    pub fn empty() -> Self {
        Self::start().finish()
    }

    /// Count one classified page
    pub fn record(&mut self, classification: &Classification) {
        match classification {
            Classification::Accepted(_) => self.successful_pages += 1,
            Classification::SkippedNoContent => self.failed_pages += 1,
            Classification::SkippedErrorPage(ErrorPageKind::NotFound) => self.not_found_pages += 1,
            Classification::SkippedErrorPage(ErrorPageKind::Forbidden) => {
                self.forbidden_pages += 1
            }
        }
    }

    /// Stamp the end time. A second call keeps the first stamp.
    pub fn finish(mut self) -> Self {
        self.end_time.get_or_insert_with(Local::now);
        self
    }

    /// Pages seen by the run, whatever their classification
    pub fn total_pages(&self) -> usize {
        self.successful_pages + self.failed_pages + self.error_pages()
    }

    /// Pages skipped as 403/404 error pages
    pub fn error_pages(&self) -> usize {
        self.not_found_pages + self.forbidden_pages
    }

    /// Wall-clock duration in seconds, never negative
    ///
    /// An unfinished run is measured up to now.
    pub fn duration_seconds(&self) -> f64 {
        let end = self.end_time.unwrap_or_else(Local::now);
        let micros = (end - self.start_time).num_microseconds().unwrap_or(0);
        (micros as f64 / 1_000_000.0).max(0.0)
    }

    /// Machine-readable form, used for structured logs and the CLI
    pub fn to_json(&self) -> Value {
        json!({
            "successful_pages": self.successful_pages,
            "failed_pages": self.failed_pages,
            "not_found_pages": self.not_found_pages,
            "forbidden_pages": self.forbidden_pages,
            "start_time": self.start_time.to_rfc3339(),
            "end_time": self.end_time.map(|end| end.to_rfc3339()),
            "duration_seconds": self.duration_seconds(),
        })
    }
}
