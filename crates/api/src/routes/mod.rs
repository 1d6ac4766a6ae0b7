pub mod health;
pub mod videos;

use axum::Router;

use crate::state::AppState;

/// Mount point of the raw video files served to the player.
pub const VIDEO_FILES_PATH: &str = "/videos";

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /videos                                   list videos
/// /videos/{video_id}/boxes                  boxes at ?frame=
/// /videos/{video_id}/boxes_range            boxes in ?start_frame=&end_frame=
/// /videos/{video_id}/timeline               dense counts per ?bin_sec=
/// /videos/{video_id}/next_hit               next occupied frame after ?frame=
/// /videos/{video_id}/prev_hit               previous occupied frame before ?frame=
/// /videos/{video_id}/summary                row / frame counts
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().nest("/videos", videos::router())
}
