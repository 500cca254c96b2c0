//! Artifact naming

use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};
use url::Url;

const FILE_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Generated artifact path for a crawl of `url` started at `now`
///
/// The name is `crawl_<host>_<YYYYMMDD_HHMMSS>.md`, where every character
/// of the host (and port) that is not alphanumeric becomes `_`. Two runs
/// against the same host within one second get the same name.
pub fn generated_output_path(results_dir: &Path, url: &Url, now: &DateTime<Local>) -> PathBuf {
    results_dir.join(format!(
        "crawl_{}_{}.md",
        file_safe_host(url),
        now.format(FILE_TIMESTAMP_FORMAT)
    ))
}

fn file_safe_host(url: &Url) -> String {
    let host = match (url.host_str(), url.port()) {
        (Some(host), Some(port)) => format!("{host}:{port}"),
        (Some(host), None) => host.to_string(),
        (None, _) => "unknown".to_string(),
    };

    host.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}
