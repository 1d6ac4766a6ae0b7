//! Repository for the `boxes` table of a detection table file.

use framebox_core::detection::Detection;
use framebox_core::error::CoreError;

use crate::models::detection::DetectionRow;
use crate::DbPool;

/// Column list for `boxes` queries. Casts normalize files written by other
/// tools that stored coordinates as integers.
const COLUMNS: &str = "CAST(frame AS INTEGER) AS frame, \
    CAST(box_index AS INTEGER) AS box_index, \
    CAST(x AS REAL) AS x, CAST(y AS REAL) AS y, \
    CAST(width AS REAL) AS width, CAST(height AS REAL) AS height";

/// Errors from writing a table: either a row that cannot be stored or a
/// storage failure.
#[derive(Debug, thiserror::Error)]
pub enum WriteError {
    #[error(transparent)]
    Row(#[from] CoreError),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Reads and writes detection rows.
pub struct DetectionRepo;

impl DetectionRepo {
    /// Create the `boxes` table and its frame index if missing.
    pub async fn create_schema(pool: &DbPool) -> Result<(), sqlx::Error> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS boxes (
                frame     INTEGER NOT NULL,
                box_index INTEGER NOT NULL,
                x         REAL    NOT NULL,
                y         REAL    NOT NULL,
                width     REAL    NOT NULL,
                height    REAL    NOT NULL
            )",
        )
        .execute(pool)
        .await?;
        sqlx::query("CREATE INDEX IF NOT EXISTS idx_boxes_frame ON boxes (frame, box_index)")
            .execute(pool)
            .await?;
        Ok(())
    }

    /// All rows ordered by `(frame, box_index)`.
    pub async fn list_all(pool: &DbPool) -> Result<Vec<DetectionRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM boxes ORDER BY frame ASC, box_index ASC");
        sqlx::query_as::<_, DetectionRow>(&query)
            .fetch_all(pool)
            .await
    }

    /// Number of rows in the table.
    pub async fn count(pool: &DbPool) -> Result<i64, sqlx::Error> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM boxes")
            .fetch_one(pool)
            .await?;
        Ok(row.0)
    }

    /// Append detections in a single transaction, returning the number of
    /// rows written.
    pub async fn insert_all(pool: &DbPool, detections: &[Detection]) -> Result<u64, WriteError> {
        let rows = detections
            .iter()
            .map(DetectionRow::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        let mut tx = pool.begin().await?;
        for row in &rows {
            sqlx::query(
                "INSERT INTO boxes (frame, box_index, x, y, width, height)
                 VALUES (?, ?, ?, ?, ?, ?)",
            )
            .bind(row.frame)
            .bind(row.box_index)
            .bind(row.x)
            .bind(row.y)
            .bind(row.width)
            .bind(row.height)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        Ok(rows.len() as u64)
    }
}
