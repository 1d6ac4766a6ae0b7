#![allow(dead_code)]

use std::path::Path;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use framebox_core::detection::{Detection, FrameRate};
use framebox_db::repositories::DetectionRepo;
use framebox_db::{create_table_file, table_path};
use http_body_util::BodyExt;
use tempfile::TempDir;
use tower::ServiceExt;

use framebox_api::config::ServerConfig;
use framebox_api::router::build_app_router;
use framebox_api::state::AppState;

/// Temporary `videos/` and `boxes/` directories backing a test app.
pub struct Fixture {
    pub root: TempDir,
}

impl Fixture {
    pub fn new() -> Self {
        let root = tempfile::tempdir().unwrap();
        std::fs::create_dir(root.path().join("videos")).unwrap();
        std::fs::create_dir(root.path().join("boxes")).unwrap();
        Self { root }
    }

    pub fn videos_dir(&self) -> std::path::PathBuf {
        self.root.path().join("videos")
    }

    pub fn boxes_dir(&self) -> std::path::PathBuf {
        self.root.path().join("boxes")
    }

    /// Create a video file with the given name and contents.
    pub fn add_video(&self, file: &str, bytes: &[u8]) {
        std::fs::write(self.videos_dir().join(file), bytes).unwrap();
    }

    /// Write a detection table for `video_id`.
    pub async fn add_boxes(&self, video_id: &str, rows: &[Detection]) {
        write_table(&self.boxes_dir(), video_id, rows).await;
    }

    /// Build a test `ServerConfig` pointing at the fixture directories.
    pub fn config(&self) -> ServerConfig {
        ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            cors_origins: vec!["http://localhost:5173".to_string()],
            request_timeout_secs: 30,
            videos_dir: self.videos_dir(),
            boxes_dir: self.boxes_dir(),
            fps: FrameRate::default(),
            video_extensions: vec!["mp4".to_string()],
        }
    }

    /// Build the app with the production middleware stack, returning its
    /// state too so tests can inspect the index cache.
    pub fn app_with_state(&self) -> (Router, AppState) {
        let config = self.config();
        let state = AppState::new(config.clone());
        (build_app_router(state.clone(), &config), state)
    }

    pub fn app(&self) -> Router {
        self.app_with_state().0
    }
}

pub async fn write_table(dir: &Path, video_id: &str, rows: &[Detection]) {
    let pool = create_table_file(&table_path(dir, video_id)).await.unwrap();
    DetectionRepo::insert_all(&pool, rows).await.unwrap();
    pool.close().await;
}

pub fn det(frame: u64, box_index: u32) -> Detection {
    Detection {
        frame,
        box_index,
        x: 100.0 + box_index as f64,
        y: 50.0,
        width: 20.0,
        height: 40.0,
    }
}

/// The reference table: frame 5 with boxes 0 and 1, frame 10 with box 0.
pub fn sample_rows() -> Vec<Detection> {
    vec![det(10, 0), det(5, 1), det(5, 0)]
}

/// Send a GET request through the router.
pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    app.oneshot(request).await.unwrap()
}

/// Collect a response body as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Collect a response body as raw bytes.
pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}
