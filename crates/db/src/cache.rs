//! Process-wide cache of loaded detection tables, keyed by video id.
//!
//! The first request for a video loads its table file; later requests get
//! the same `Arc<BoxTable>` without touching the filesystem. Concurrent
//! first requests for one id share a single load: the first caller installs
//! a shared future in the map and every other caller awaits a clone of it,
//! so all of them see the same table or the same error. The load task
//! settles its own entry, so a failed load leaves nothing behind even when
//! every caller gave up waiting, and the next request tries again.
//!
//! The map lock is only held to look up or swap entries, never across a
//! load, so a slow first load of one video does not block queries on others.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::panic::AssertUnwindSafe;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use framebox_core::box_table::BoxTable;
use framebox_core::error::CoreError;
use framebox_core::validation::validate_video_id;
use futures::future::{BoxFuture, FutureExt, Shared};
use tokio::sync::RwLock;

use crate::models::detection::DetectionRow;
use crate::repositories::DetectionRepo;

type LoadResult = Result<Arc<BoxTable>, CoreError>;
type PendingLoad = Shared<BoxFuture<'static, LoadResult>>;
type Slots = Arc<RwLock<HashMap<String, Slot>>>;

enum Slot {
    Ready(Arc<BoxTable>),
    Loading { generation: u64, pending: PendingLoad },
}

/// Lazily populated, append-only map from video id to its loaded table.
pub struct IndexCache {
    boxes_dir: PathBuf,
    slots: Slots,
    next_generation: AtomicU64,
    loads: Arc<AtomicU64>,
}

impl IndexCache {
    /// Create an empty cache over the table files in `boxes_dir`.
    pub fn new(boxes_dir: impl Into<PathBuf>) -> Self {
        Self {
            boxes_dir: boxes_dir.into(),
            slots: Arc::new(RwLock::new(HashMap::new())),
            next_generation: AtomicU64::new(0),
            loads: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Resolve `video_id` to its table, loading it on first use.
    ///
    /// Fails with [`CoreError::NotFound`] when no table file exists and with
    /// [`CoreError::Validation`] for ids that cannot name a file. Dropping
    /// the returned future does not affect the load or the cache.
    pub async fn resolve(&self, video_id: &str) -> Result<Arc<BoxTable>, CoreError> {
        validate_video_id(video_id)?;

        if let Some(Slot::Ready(table)) = self.slots.read().await.get(video_id) {
            return Ok(Arc::clone(table));
        }

        let pending = {
            let mut slots = self.slots.write().await;
            match slots.get(video_id) {
                Some(Slot::Ready(table)) => return Ok(Arc::clone(table)),
                Some(Slot::Loading { pending, .. }) => pending.clone(),
                None => {
                    let generation = self.next_generation.fetch_add(1, Ordering::Relaxed);
                    // The load task settles its slot under the write lock, so
                    // it cannot run ahead of this insert.
                    let pending = self.start_load(video_id, generation);
                    slots.insert(
                        video_id.to_string(),
                        Slot::Loading {
                            generation,
                            pending: pending.clone(),
                        },
                    );
                    tracing::debug!(video_id, generation, "Started detection table load");
                    pending
                }
            }
        };

        pending.await
    }

    /// Number of loaded tables.
    pub async fn len(&self) -> usize {
        self.slots
            .read()
            .await
            .values()
            .filter(|slot| matches!(slot, Slot::Ready(_)))
            .count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Number of loads still in flight.
    pub async fn loading(&self) -> usize {
        self.slots
            .read()
            .await
            .values()
            .filter(|slot| matches!(slot, Slot::Loading { .. }))
            .count()
    }

    /// Whether `video_id` has a loaded table.
    pub async fn contains(&self, video_id: &str) -> bool {
        matches!(self.slots.read().await.get(video_id), Some(Slot::Ready(_)))
    }

    /// Ids of loaded tables, sorted.
    pub async fn cached_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self
            .slots
            .read()
            .await
            .iter()
            .filter(|(_, slot)| matches!(slot, Slot::Ready(_)))
            .map(|(id, _)| id.clone())
            .collect();
        ids.sort();
        ids
    }

    /// Number of table loads started since the cache was created.
    pub fn load_count(&self) -> u64 {
        self.loads.load(Ordering::Relaxed)
    }

    /// Spawn the load. The task settles its own slot before its result is
    /// visible to any waiter, and runs to completion even if every waiter
    /// goes away.
    fn start_load(&self, video_id: &str, generation: u64) -> PendingLoad {
        let video_id = video_id.to_string();
        let path = crate::table_path(&self.boxes_dir, &video_id);
        let loads = Arc::clone(&self.loads);
        let slots = Arc::clone(&self.slots);

        let task = tokio::spawn(async move {
            loads.fetch_add(1, Ordering::Relaxed);
            let outcome = AssertUnwindSafe(load_table(&video_id, &path))
                .catch_unwind()
                .await
                .unwrap_or_else(|_| {
                    Err(CoreError::Internal(format!(
                        "table load for '{video_id}' panicked"
                    )))
                });
            settle(&slots, &video_id, generation, &outcome).await;
            outcome
        });

        async move {
            match task.await {
                Ok(result) => result,
                Err(e) => Err(CoreError::Internal(format!("table load task failed: {e}"))),
            }
        }
        .boxed()
        .shared()
    }
}

/// Replace the pending entry for `video_id` with its outcome: the table on
/// success, nothing on failure. Only the load installed under `generation`
/// is settled.
async fn settle(
    slots: &RwLock<HashMap<String, Slot>>,
    video_id: &str,
    generation: u64,
    outcome: &LoadResult,
) {
    let mut slots = slots.write().await;
    let still_pending = matches!(
        slots.get(video_id),
        Some(Slot::Loading { generation: g, .. }) if *g == generation
    );
    if !still_pending {
        return;
    }
    match outcome {
        Ok(table) => {
            slots.insert(video_id.to_string(), Slot::Ready(Arc::clone(table)));
        }
        Err(err) => {
            slots.remove(video_id);
            tracing::debug!(video_id, error = %err, "Detection table load failed");
        }
    }
}

fn not_found(video_id: &str) -> CoreError {
    CoreError::NotFound {
        entity: "Video",
        id: video_id.to_string(),
    }
}

fn load_error(video_id: &str, err: sqlx::Error) -> CoreError {
    tracing::error!(video_id, error = %err, "Failed to read detection table");
    CoreError::Internal(format!("failed to read detection table for '{video_id}': {err}"))
}

async fn load_table(video_id: &str, path: &Path) -> LoadResult {
    match tokio::fs::metadata(path).await {
        Ok(meta) if meta.is_file() => {}
        Ok(_) => return Err(not_found(video_id)),
        Err(e) if e.kind() == ErrorKind::NotFound => return Err(not_found(video_id)),
        Err(e) => {
            return Err(CoreError::Internal(format!(
                "failed to stat {}: {e}",
                path.display()
            )))
        }
    }

    let started = Instant::now();
    let pool = crate::open_table(path)
        .await
        .map_err(|e| load_error(video_id, e))?;
    let rows = DetectionRepo::list_all(&pool).await;
    pool.close().await;
    let rows = rows.map_err(|e| load_error(video_id, e))?;

    let detections = rows
        .into_iter()
        .map(DetectionRow::into_detection)
        .collect::<Result<Vec<_>, _>>()?;
    let table = BoxTable::new(detections);

    tracing::info!(
        video_id,
        rows = table.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Detection table loaded"
    );
    Ok(Arc::new(table))
}
