//! Media download via yt-dlp.
//!
//! The extractor is treated as a black box: it is handed a URL and a
//! destination directory and either produces downloaded files there or
//! fails with a human-readable cause. yt-dlp runs as a subprocess so the
//! potentially slow download never blocks the dispatcher.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use thiserror::Error;
use tokio::process::Command;
use tracing::{debug, warn};

/// Patterns in yt-dlp output that carry the actual user-facing cause of a
/// failed extraction (private post, removed content, bad URL, ...).
const FATAL_ERROR_PATTERNS: &[&str] = &[
    "login required",
    "rate-limit reached",
    "Requested content is not available",
    "Private",
    "This post is unavailable",
    "Unsupported URL",
    "is not a valid URL",
    "Unable to extract",
    "HTTP Error 403",
    "HTTP Error 404",
];

/// Longest stderr excerpt surfaced when no known cause line is found.
const MAX_STDERR_EXCERPT_CHARS: usize = 300;

/// Failure of a media fetch.
#[derive(Debug, Error)]
pub enum FetchError {
    /// yt-dlp could not be started at all (usually: not installed)
    #[error("failed to run yt-dlp: {0}")]
    Spawn(#[source] std::io::Error),
    /// yt-dlp ran but the extraction failed; carries the cause summary
    #[error("{0}")]
    Extraction(String),
    /// The download finished but the destination could not be read back
    #[error("could not read downloaded files: {0}")]
    Io(#[source] std::io::Error),
}

/// Result of a successful fetch.
#[derive(Debug)]
pub struct FetchResult {
    /// Downloaded files, sorted lexicographically by filename so delivery
    /// order is deterministic across runs for the same post.
    pub files: Vec<PathBuf>,
    /// Opaque extractor metadata (the info JSON yt-dlp prints per item),
    /// if it could be parsed.
    pub info: Option<serde_json::Value>,
}

/// Boundary the delivery pipeline consumes media through.
#[async_trait]
pub trait MediaFetcher: Send + Sync {
    /// Download everything behind `url` into `dest`.
    async fn fetch(&self, url: &str, dest: &Path) -> Result<FetchResult, FetchError>;
}

/// [`MediaFetcher`] backed by the system yt-dlp binary.
#[derive(Debug, Default, Clone, Copy)]
pub struct YtDlpFetcher;

#[async_trait]
impl MediaFetcher for YtDlpFetcher {
    async fn fetch(&self, url: &str, dest: &Path) -> Result<FetchResult, FetchError> {
        // One file per carousel item, named by media id so the order is
        // reproducible. Playlists stay enabled: a multi-item post is a
        // playlist from yt-dlp's point of view.
        let output_template = format!("{}/%(id)s.%(ext)s", dest.display());

        debug!("Running yt-dlp for {url}");
        let output = Command::new("yt-dlp")
            .arg("-f")
            .arg("best")
            .arg("--merge-output-format")
            .arg("mp4")
            .arg("--no-warnings")
            // Print the info JSON of each downloaded item on stdout
            .arg("-j")
            .arg("--no-simulate")
            .arg("-o")
            .arg(&output_template)
            .arg(url)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(FetchError::Spawn)?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            warn!("yt-dlp failed for {url}: {}", stderr.trim());
            return Err(FetchError::Extraction(summarize_stderr(&stderr)));
        }

        let info = String::from_utf8_lossy(&output.stdout)
            .lines()
            .find(|line| !line.trim().is_empty())
            .and_then(|line| serde_json::from_str(line).ok());

        let files = list_files_sorted(dest).await?;
        Ok(FetchResult { files, info })
    }
}

/// Collects the regular files in `dir`, sorted lexicographically by name.
async fn list_files_sorted(dir: &Path) -> Result<Vec<PathBuf>, FetchError> {
    let mut files = Vec::new();
    let mut entries = tokio::fs::read_dir(dir).await.map_err(FetchError::Io)?;
    while let Some(entry) = entries.next_entry().await.map_err(FetchError::Io)? {
        let file_type = entry.file_type().await.map_err(FetchError::Io)?;
        if file_type.is_file() {
            files.push(entry.path());
        }
    }
    files.sort();
    Ok(files)
}

/// Picks the most meaningful line out of yt-dlp's stderr.
///
/// Preference order: a line with a known fatal cause, then the last line
/// marked `ERROR`, then a truncated excerpt of the whole output.
fn summarize_stderr(stderr: &str) -> String {
    for line in stderr.lines().rev() {
        if FATAL_ERROR_PATTERNS.iter().any(|p| line.contains(p)) {
            return line.trim().to_string();
        }
    }
    stderr
        .lines()
        .rev()
        .find(|line| line.contains("ERROR"))
        .map_or_else(
            || crate::utils::truncate_str(stderr.trim(), MAX_STDERR_EXCERPT_CHARS),
            |line| line.trim().to_string(),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summarize_prefers_known_cause() {
        let stderr = "\
[Instagram] Extracting URL\n\
WARNING: something minor\n\
ERROR: [Instagram] ABC123: Requested content is not available, rate-limit reached or login required";
        let summary = summarize_stderr(stderr);
        assert!(summary.contains("Requested content is not available"));
        assert!(!summary.contains("WARNING"));
    }

    #[test]
    fn test_summarize_falls_back_to_error_line() {
        let stderr = "noise\nERROR: something exploded\nmore noise";
        assert_eq!(summarize_stderr(stderr), "ERROR: something exploded");
    }

    #[test]
    fn test_summarize_truncates_unstructured_output() {
        let stderr = "x".repeat(1000);
        let summary = summarize_stderr(&stderr);
        assert_eq!(summary.chars().count(), MAX_STDERR_EXCERPT_CHARS);
    }

    #[tokio::test]
    async fn test_list_files_sorted_is_lexicographic() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        for name in ["b.mp4", "a.jpg", "c.jpg"] {
            std::fs::write(dir.path().join(name), b"x")?;
        }
        std::fs::create_dir(dir.path().join("subdir"))?;

        let files = list_files_sorted(dir.path()).await?;
        let names: Vec<_> = files
            .iter()
            .filter_map(|p| p.file_name().and_then(|n| n.to_str()))
            .collect();
        // Directories are ignored; files come back in name order
        assert_eq!(names, ["a.jpg", "b.mp4", "c.jpg"]);
        Ok(())
    }
}
