//! Build a detection table file from JSON Lines.
//!
//! ```text
//! framebox-import <detections.jsonl> <boxes_dir>/<video_id>.sqlite
//! ```
//!
//! Each input line is one detection object with the fields `frame`,
//! `box_index`, `x`, `y`, `width`, `height`. Blank lines are skipped. Rows
//! are appended to the table if the output file already exists.

use std::path::PathBuf;

use anyhow::{bail, Context};
use framebox_core::detection::Detection;
use framebox_db::repositories::DetectionRepo;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "framebox_import=info,framebox_db=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut args = std::env::args_os().skip(1);
    let (Some(input), Some(output), None) = (args.next(), args.next(), args.next()) else {
        bail!("usage: framebox-import <detections.jsonl> <output.sqlite>");
    };
    let input = PathBuf::from(input);
    let output = PathBuf::from(output);

    let text = tokio::fs::read_to_string(&input)
        .await
        .with_context(|| format!("failed to read {}", input.display()))?;

    let mut detections = Vec::new();
    for (lineno, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let detection: Detection = serde_json::from_str(line)
            .with_context(|| format!("{}:{}: invalid detection", input.display(), lineno + 1))?;
        detections.push(detection);
    }

    let pool = framebox_db::create_table_file(&output)
        .await
        .with_context(|| format!("failed to open {}", output.display()))?;
    let written = DetectionRepo::insert_all(&pool, &detections).await?;
    let total = DetectionRepo::count(&pool).await?;
    pool.close().await;

    tracing::info!(
        input = %input.display(),
        output = %output.display(),
        written,
        total,
        "Detection table written"
    );
    Ok(())
}
