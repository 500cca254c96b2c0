//! Writing accepted pages into a single markdown artifact

use crate::crawler::PageResult;
use crate::processor::{classify, Classification, CrawlStats};
use chrono::{DateTime, Local};
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{debug, error, info, instrument};

/// Timestamp format used in each section's metadata
const SECTION_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

/// Result of one crawl run
#[derive(Debug, Clone, PartialEq)]
pub enum CrawlOutcome {
    /// The artifact was written in full
    Success { file_path: PathBuf, stats: CrawlStats },
    /// The run stopped; `stats` hold whatever was counted before that
    Failure { error: String, stats: CrawlStats },
}

impl CrawlOutcome {
    pub fn stats(&self) -> &CrawlStats {
        match self {
            CrawlOutcome::Success { stats, .. } | CrawlOutcome::Failure { stats, .. } => stats,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, CrawlOutcome::Success { .. })
    }
}

/// Render the artifact section for an accepted page
///
/// `content` is the already stripped page content.
pub fn render_section(page: &PageResult, content: &str, timestamp: &DateTime<Local>) -> String {
    format!(
        "\n# {title}\n\n## URL\n{url}\n\n## Metadata\n- Depth: {depth}\n- Timestamp: {timestamp}\n\n## Content\n{content}\n\n---\n",
        title = page.metadata.title(),
        url = page.url,
        depth = page.metadata.depth,
        timestamp = timestamp.format(SECTION_TIMESTAMP_FORMAT),
    )
}

/// Classifies crawl results and writes the accepted ones to disk
#[derive(Debug, Clone, Copy, Default)]
pub struct Aggregator {
    verbose: bool,
}

impl Aggregator {
    /// With `verbose`, every skipped page is logged at info level
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    /// Write every accepted page of `results` to `output_path`, in order
    ///
    /// The file is created or truncated. Sections are appended in input order
    /// and duplicates are kept. Any I/O failure ends the run with a
    /// [`CrawlOutcome::Failure`] carrying the counts gathered so far.
    #[instrument(skip(self, results), fields(pages = results.len(), output = %output_path.display()))]
    pub async fn aggregate(&self, results: &[PageResult], output_path: &Path) -> CrawlOutcome {
        let mut stats = CrawlStats::start();

        match self.write_sections(results, output_path, &mut stats).await {
            Ok(()) => {
                let stats = stats.finish();
                info!("Valid pages processed: {}", stats.successful_pages);
                info!("Error pages (403/404) skipped: {}", stats.error_pages());
                CrawlOutcome::Success {
                    file_path: output_path.to_path_buf(),
                    stats,
                }
            }
            Err(e) => {
                error!("Failed to write {}: {}", output_path.display(), e);
                CrawlOutcome::Failure {
                    error: format!("Writing error: {e}"),
                    stats: stats.finish(),
                }
            }
        }
    }

    async fn write_sections(
        &self,
        results: &[PageResult],
        output_path: &Path,
        stats: &mut CrawlStats,
    ) -> io::Result<()> {
        let file = File::create(output_path).await?;
        let mut writer = BufWriter::new(file);

        for page in results {
            let classification = classify(page);
            match &classification {
                Classification::Accepted(content) => {
                    let section = render_section(page, content, &Local::now());
                    writer.write_all(section.as_bytes()).await?;
                }
                Classification::SkippedNoContent => {
                    self.log_skip(format_args!("No content found for {} - Skipped", page.url));
                }
                Classification::SkippedErrorPage(kind) => {
                    self.log_skip(format_args!(
                        "{} page detected and skipped: {}",
                        kind, page.url
                    ));
                }
            }
            stats.record(&classification);
        }

        writer.flush().await?;
        Ok(())
    }

    fn log_skip(&self, message: std::fmt::Arguments<'_>) {
        if self.verbose {
            info!("{}", message);
        } else {
            debug!("{}", message);
        }
    }
}

/// Aggregate with default (quiet) logging
pub async fn aggregate(results: &[PageResult], output_path: &Path) -> CrawlOutcome {
    Aggregator::default().aggregate(results, output_path).await
}
