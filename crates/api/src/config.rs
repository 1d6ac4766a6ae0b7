use std::path::PathBuf;

use framebox_core::catalog::DEFAULT_VIDEO_EXTENSION;
use framebox_core::detection::FrameRate;

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Directory scanned for playable videos, also served at `/videos`.
    pub videos_dir: PathBuf,
    /// Directory holding one `{video_id}.sqlite` detection table per video.
    pub boxes_dir: PathBuf,
    /// Frame rate shared by every video in the corpus.
    pub fps: FrameRate,
    /// Lowercase video file extensions listed by the catalog.
    pub video_extensions: Vec<String>,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `VIDEOS_DIR`           | `data/videos`              |
    /// | `BOXES_DIR`            | `data/boxes`               |
    /// | `FPS`                  | `24`                       |
    /// | `VIDEO_EXTENSIONS`     | `mp4`                      |
    ///
    /// Panics on malformed values so misconfiguration fails at startup.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins = split_list(
            &std::env::var("CORS_ORIGINS").unwrap_or_else(|_| "http://localhost:5173".into()),
        );

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let videos_dir = PathBuf::from(
            std::env::var("VIDEOS_DIR").unwrap_or_else(|_| "data/videos".into()),
        );
        let boxes_dir =
            PathBuf::from(std::env::var("BOXES_DIR").unwrap_or_else(|_| "data/boxes".into()));

        let fps: FrameRate = std::env::var("FPS")
            .unwrap_or_else(|_| "24".into())
            .parse()
            .unwrap_or_else(|e| panic!("FPS must be a positive rate: {e}"));

        let video_extensions: Vec<String> = split_list(
            &std::env::var("VIDEO_EXTENSIONS").unwrap_or_else(|_| DEFAULT_VIDEO_EXTENSION.into()),
        )
        .into_iter()
        .map(|e| e.trim_start_matches('.').to_ascii_lowercase())
        .collect();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            videos_dir,
            boxes_dir,
            fps,
            video_extensions,
        }
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
