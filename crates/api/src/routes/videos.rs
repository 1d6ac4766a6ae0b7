//! Route definitions for the video catalog and detection queries.
//!
//! Mounted at `/api/videos`.
//!
//! ```text
//! GET  /                              list_videos
//! GET  /{video_id}/boxes              get_boxes
//! GET  /{video_id}/boxes_range        get_boxes_range
//! GET  /{video_id}/timeline           get_timeline
//! GET  /{video_id}/next_hit           get_next_hit
//! GET  /{video_id}/prev_hit           get_prev_hit
//! GET  /{video_id}/summary            get_summary
//! ```

use axum::routing::get;
use axum::Router;

use crate::handlers::videos;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(videos::list_videos))
        .route("/{video_id}/boxes", get(videos::get_boxes))
        .route("/{video_id}/boxes_range", get(videos::get_boxes_range))
        .route("/{video_id}/timeline", get(videos::get_timeline))
        .route("/{video_id}/next_hit", get(videos::get_next_hit))
        .route("/{video_id}/prev_hit", get(videos::get_prev_hit))
        .route("/{video_id}/summary", get(videos::get_summary))
}
