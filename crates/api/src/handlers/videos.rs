//! Handlers for the `/videos` resource.
//!
//! The catalog lists playable files; every other endpoint queries one
//! video's detection table, resolved through the shared [`IndexCache`].
//! Parameters are validated before the table is resolved, so a bad request
//! never triggers a table load.
//!
//! [`IndexCache`]: framebox_db::IndexCache

use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Serialize;

use framebox_core::box_table::TableSummary;
use framebox_core::catalog::{self, CatalogOptions, VideoEntry};
use framebox_core::detection::{BoxView, Detection};
use framebox_core::timeline::DEFAULT_BIN_SECS;
use framebox_core::validation::{validate_bin_secs, validate_frame};

use crate::error::AppResult;
use crate::query::{FrameParams, RangeParams, TimelineParams};
use crate::routes::VIDEO_FILES_PATH;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

/// Range query result, echoing the requested bounds.
#[derive(Debug, Serialize)]
pub struct RangeResponse {
    pub boxes: Vec<Detection>,
    pub start_frame: u64,
    pub end_frame: u64,
}

#[derive(Debug, Serialize)]
pub struct TimelineResponse {
    pub bin_sec: u64,
    pub counts: Vec<u64>,
}

/// Nearest hit; `frame` serializes as `null` when there is none.
#[derive(Debug, Serialize)]
pub struct HitResponse {
    pub frame: Option<u64>,
}

#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub video_id: String,
    #[serde(flatten)]
    pub summary: TableSummary,
    pub fps: f64,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/videos
pub async fn list_videos(State(state): State<AppState>) -> AppResult<Json<Vec<VideoEntry>>> {
    let options = CatalogOptions {
        extensions: &state.config.video_extensions,
        url_prefix: VIDEO_FILES_PATH,
        fps: state.config.fps.as_f64(),
    };
    let videos = catalog::scan_videos(&state.config.videos_dir, &options).await?;

    tracing::debug!(count = videos.len(), "Listed videos");
    Ok(Json(videos))
}

/// GET /api/videos/{video_id}/boxes?frame=
///
/// Boxes at one frame ordered by `box_index`; `[]` when the frame is empty.
pub async fn get_boxes(
    State(state): State<AppState>,
    Path(video_id): Path<String>,
    params: Result<Query<FrameParams>, QueryRejection>,
) -> AppResult<Json<Vec<BoxView>>> {
    let Query(params) = params?;
    let frame = validate_frame("frame", params.frame)?;

    let table = state.index.resolve(&video_id).await?;
    let boxes = table.point_query(frame).iter().map(BoxView::from).collect();

    Ok(Json(boxes))
}

/// GET /api/videos/{video_id}/boxes_range?start_frame=&end_frame=
///
/// Boxes for every frame in the inclusive range, ordered by frame then
/// `box_index`. An inverted range returns no boxes.
pub async fn get_boxes_range(
    State(state): State<AppState>,
    Path(video_id): Path<String>,
    params: Result<Query<RangeParams>, QueryRejection>,
) -> AppResult<Json<RangeResponse>> {
    let Query(params) = params?;
    let start_frame = validate_frame("start_frame", params.start_frame)?;
    let end_frame = validate_frame("end_frame", params.end_frame)?;

    let table = state.index.resolve(&video_id).await?;
    let boxes = table.range_query(start_frame, end_frame).to_vec();

    tracing::debug!(
        video_id = %video_id,
        start_frame,
        end_frame,
        count = boxes.len(),
        "Range query"
    );

    Ok(Json(RangeResponse {
        boxes,
        start_frame,
        end_frame,
    }))
}

/// GET /api/videos/{video_id}/timeline?bin_sec=
///
/// Dense detection counts per `bin_sec`-second bin.
pub async fn get_timeline(
    State(state): State<AppState>,
    Path(video_id): Path<String>,
    params: Result<Query<TimelineParams>, QueryRejection>,
) -> AppResult<Json<TimelineResponse>> {
    let Query(params) = params?;
    let bin_sec = match params.bin_sec {
        Some(raw) => validate_bin_secs(raw)?,
        None => DEFAULT_BIN_SECS,
    };

    let table = state.index.resolve(&video_id).await?;
    let counts = table.timeline_bins(bin_sec, state.config.fps)?;

    Ok(Json(TimelineResponse { bin_sec, counts }))
}

/// GET /api/videos/{video_id}/next_hit?frame=
pub async fn get_next_hit(
    State(state): State<AppState>,
    Path(video_id): Path<String>,
    params: Result<Query<FrameParams>, QueryRejection>,
) -> AppResult<Json<HitResponse>> {
    let Query(params) = params?;
    let frame = validate_frame("frame", params.frame)?;

    let table = state.index.resolve(&video_id).await?;
    Ok(Json(HitResponse {
        frame: table.next_hit(frame),
    }))
}

/// GET /api/videos/{video_id}/prev_hit?frame=
pub async fn get_prev_hit(
    State(state): State<AppState>,
    Path(video_id): Path<String>,
    params: Result<Query<FrameParams>, QueryRejection>,
) -> AppResult<Json<HitResponse>> {
    let Query(params) = params?;
    let frame = validate_frame("frame", params.frame)?;

    let table = state.index.resolve(&video_id).await?;
    Ok(Json(HitResponse {
        frame: table.prev_hit(frame),
    }))
}

/// GET /api/videos/{video_id}/summary
pub async fn get_summary(
    State(state): State<AppState>,
    Path(video_id): Path<String>,
) -> AppResult<Json<SummaryResponse>> {
    let table = state.index.resolve(&video_id).await?;
    let summary = table.summary();

    Ok(Json(SummaryResponse {
        video_id,
        summary,
        fps: state.config.fps.as_f64(),
    }))
}
