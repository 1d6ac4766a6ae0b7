//! Storage layer for per-video detection tables.
//!
//! Each video's detections live in their own SQLite file,
//! `{boxes_dir}/{video_id}.sqlite`, holding a single `boxes` table. Files are
//! opened read-only at query time; [`create_table_file`] is the ingestion
//! path used by the import tool and test fixtures.

pub mod cache;
pub mod models;
pub mod repositories;

use std::path::{Path, PathBuf};

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

pub use cache::IndexCache;

pub type DbPool = sqlx::SqlitePool;

/// File extension of detection table files.
pub const TABLE_EXTENSION: &str = "sqlite";

/// Path of the table file backing `video_id`.
pub fn table_path(boxes_dir: &Path, video_id: &str) -> PathBuf {
    boxes_dir.join(format!("{video_id}.{TABLE_EXTENSION}"))
}

/// Open an existing table file for reading.
pub async fn open_table(path: &Path) -> Result<DbPool, sqlx::Error> {
    let options = SqliteConnectOptions::new()
        .filename(path)
        .read_only(true)
        .create_if_missing(false);
    SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
}

/// Open (creating if needed) a table file for writing and ensure the
/// `boxes` schema exists.
pub async fn create_table_file(path: &Path) -> Result<DbPool, sqlx::Error> {
    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await?;
    repositories::DetectionRepo::create_schema(&pool).await?;
    Ok(pool)
}

