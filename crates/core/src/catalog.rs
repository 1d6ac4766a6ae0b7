//! Video catalog: lists playable videos by scanning a directory.
//!
//! Each regular file with an accepted extension becomes one entry whose
//! identifier is the file name without its extension. Entries are sorted by
//! identifier so listings are reproducible.

use std::io::ErrorKind;
use std::path::Path;

use serde::Serialize;

use crate::error::CoreError;

/// Extension accepted when none is configured.
pub const DEFAULT_VIDEO_EXTENSION: &str = "mp4";

/// One listed video.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VideoEntry {
    pub video_id: String,
    /// File name inside the videos directory.
    pub file: String,
    /// URL the player loads the bytes from.
    pub url: String,
    /// Corpus-wide frame rate, shared with the client.
    pub fps: f64,
}

/// Settings for [`scan_videos`].
#[derive(Debug, Clone)]
pub struct CatalogOptions<'a> {
    /// Lowercase extensions without the leading dot.
    pub extensions: &'a [String],
    /// Prefix prepended to the file name to build `url` (e.g. `/videos`).
    pub url_prefix: &'a str,
    pub fps: f64,
}

fn has_accepted_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| {
            let e = e.to_ascii_lowercase();
            extensions.iter().any(|accepted| *accepted == e)
        })
        .unwrap_or(false)
}

/// List the videos in `dir`.
///
/// A missing directory lists as empty. Files whose names are not valid
/// UTF-8 are skipped.
pub async fn scan_videos(
    dir: &Path,
    options: &CatalogOptions<'_>,
) -> Result<Vec<VideoEntry>, CoreError> {
    let mut read_dir = match tokio::fs::read_dir(dir).await {
        Ok(rd) => rd,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::debug!(dir = %dir.display(), "Videos directory does not exist");
            return Ok(Vec::new());
        }
        Err(e) => {
            return Err(CoreError::Internal(format!(
                "failed to read {}: {e}",
                dir.display()
            )))
        }
    };

    let mut entries = Vec::new();
    loop {
        let entry = match read_dir.next_entry().await {
            Ok(Some(entry)) => entry,
            Ok(None) => break,
            Err(e) => {
                return Err(CoreError::Internal(format!(
                    "failed to read {}: {e}",
                    dir.display()
                )))
            }
        };

        let path = entry.path();
        if !has_accepted_extension(&path, options.extensions) {
            continue;
        }
        // Follows symlinks.
        match tokio::fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => {}
            _ => continue,
        }

        let (Some(file), Some(stem)) = (
            path.file_name().and_then(|n| n.to_str()),
            path.file_stem().and_then(|s| s.to_str()),
        ) else {
            tracing::debug!(path = %path.display(), "Skipping non UTF-8 file name");
            continue;
        };

        entries.push(VideoEntry {
            video_id: stem.to_string(),
            file: file.to_string(),
            url: format!("{}/{file}", options.url_prefix.trim_end_matches('/')),
            fps: options.fps,
        });
    }

    entries.sort_by(|a, b| a.video_id.cmp(&b.video_id).then_with(|| a.file.cmp(&b.file)));
    Ok(entries)
}
