//! Delivery pipeline: fetch a post's media into a scoped temporary directory
//! and relay each file to the chat, best-effort, with unconditional cleanup.
//!
//! One invocation handles exactly one validated link. The temporary
//! directory never outlives the invocation: it is removed on success,
//! on failure and on any unexpected error, and a cleanup failure is only
//! ever logged.

use crate::bot::messenger::Messenger;
use crate::config::Settings;
use crate::fetcher::{FetchResult, MediaFetcher};
use crate::media::UploadKind;
use crate::utils::truncate_str;
use anyhow::{Context, Result};
use std::path::Path;
use tracing::{error, info, warn};

/// Longest error cause surfaced to the chat.
const MAX_CAUSE_CHARS: usize = 500;

/// Run the whole fetch-and-relay sequence for one link.
///
/// Any error raised between fetching and delivering is caught here: it is
/// logged, reported to the requester as a failure notice, and never
/// propagated past this function except when even the notices themselves
/// cannot be sent.
///
/// # Errors
///
/// Returns an error only when sending a notice to the chat fails.
pub async fn deliver(
    fetcher: &dyn MediaFetcher,
    messenger: &dyn Messenger,
    settings: &Settings,
    url: &str,
) -> Result<()> {
    messenger
        .send_text("🔗 Link received. Starting download...")
        .await?;

    let tmpdir = tempfile::Builder::new().prefix("insta_dl_").tempdir();
    let tmpdir = match tmpdir {
        Ok(dir) => dir,
        Err(e) => {
            error!("Could not create temporary directory: {e}");
            messenger.send_text(&failure_notice(&e.into())).await?;
            return Ok(());
        }
    };

    let outcome = fetch_and_send(fetcher, messenger, settings, url, tmpdir.path()).await;

    // Cleanup runs on every exit path; its own failure is logged, never
    // surfaced to the requester.
    if let Err(e) = tmpdir.close() {
        warn!("Failed to remove temporary directory: {e}");
    }

    if let Err(e) = outcome {
        error!("Delivery failed for {url}: {e:#}");
        messenger.send_text(&failure_notice(&e)).await?;
    }

    Ok(())
}

fn failure_notice(e: &anyhow::Error) -> String {
    format!("⚠️ Error: {}", truncate_str(format!("{e:#}"), MAX_CAUSE_CHARS))
}

async fn fetch_and_send(
    fetcher: &dyn MediaFetcher,
    messenger: &dyn Messenger,
    settings: &Settings,
    url: &str,
    dir: &Path,
) -> Result<()> {
    messenger
        .send_text("⏳ Downloading from Instagram...")
        .await?;

    let FetchResult { files, info } = fetcher.fetch(url, dir).await?;

    if files.is_empty() {
        messenger
            .send_text("⚠️ No files were downloaded. The post may be private or something went wrong.")
            .await?;
        return Ok(());
    }

    let total = files.len();
    info!(
        "Fetched {total} file(s) for {url} (metadata: {})",
        if info.is_some() { "yes" } else { "no" }
    );
    messenger
        .send_text(&format!(
            "✅ Download finished. {total} file(s) ready to send."
        ))
        .await?;

    let max_bytes = settings.max_file_size_bytes();
    for (idx, path) in files.iter().enumerate() {
        send_one_file(messenger, settings, path, idx + 1, total, max_bytes).await?;
    }

    Ok(())
}

/// Delivers a single file: status notice, size check, type-based upload,
/// per-file outcome notice. An upload failure is reported and swallowed so
/// the remaining files still get their turn.
async fn send_one_file(
    messenger: &dyn Messenger,
    settings: &Settings,
    path: &Path,
    index: usize,
    total: usize,
    max_bytes: u64,
) -> Result<()> {
    let name = path
        .file_name()
        .map_or_else(|| "file".to_string(), |n| n.to_string_lossy().into_owned());

    let size = tokio::fs::metadata(path)
        .await
        .with_context(|| format!("could not stat {name}"))?
        .len();

    #[allow(clippy::cast_precision_loss)]
    let size_mb = size as f64 / 1024.0 / 1024.0;
    messenger
        .send_text(&format!("📤 Sending {index}/{total}: {name} ({size_mb:.2} MB)"))
        .await?;

    if size > max_bytes {
        messenger
            .send_text(&format!(
                "⚠️ {name} is larger than {} MB and cannot be sent.",
                settings.max_file_size_mb()
            ))
            .await?;
        return Ok(());
    }

    let upload = match UploadKind::from_path(path) {
        UploadKind::Photo => messenger.send_photo(path).await,
        UploadKind::Video => messenger.send_video(path).await,
        UploadKind::Document => messenger.send_document(path).await,
    };

    match upload {
        Ok(()) => {
            messenger.send_text(&format!("✅ Sent {name}.")).await?;
        }
        Err(e) => {
            // Best effort: one failed upload never blocks the rest.
            warn!("Upload of {name} failed: {e:#}");
            messenger
                .send_text(&format!(
                    "❌ Failed to send {name}: {}",
                    truncate_str(format!("{e:#}"), MAX_CAUSE_CHARS)
                ))
                .await?;
        }
    }

    Ok(())
}
