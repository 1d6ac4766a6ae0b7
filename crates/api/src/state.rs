use std::sync::Arc;

use framebox_db::IndexCache;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Server configuration (directories, frame rate, CORS).
    pub config: Arc<ServerConfig>,
    /// Loaded detection tables, keyed by video id.
    pub index: Arc<IndexCache>,
}

impl AppState {
    /// Build state with an empty index over the configured boxes directory.
    pub fn new(config: ServerConfig) -> Self {
        let index = Arc::new(IndexCache::new(config.boxes_dir.clone()));
        Self {
            config: Arc::new(config),
            index,
        }
    }
}
