//! The browser viewer page.
//!
//! The page is a static template with the corpus frame rate substituted in,
//! so the player converts between time and frames with the same rate the
//! server bins with.

use axum::extract::State;
use axum::response::Html;
use framebox_core::detection::FrameRate;

use crate::state::AppState;

const INDEX_TEMPLATE: &str = include_str!("../../templates/index.html");

/// Render the viewer page for `fps`.
pub fn render_index(fps: FrameRate) -> String {
    INDEX_TEMPLATE.replace("{{FPS}}", &fps.as_f64().to_string())
}

/// GET /
pub async fn index(State(state): State<AppState>) -> Html<String> {
    Html(render_index(state.config.fps))
}
