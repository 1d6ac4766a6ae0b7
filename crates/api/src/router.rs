//! Router assembly shared by `main.rs` and the integration tests.

use std::time::Duration;

use axum::http::header::{CONTENT_TYPE, RANGE};
use axum::http::{HeaderName, Method, StatusCode};
use axum::routing::get;
use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::services::ServeDir;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::config::ServerConfig;
use crate::handlers::viewer;
use crate::routes::{self, VIDEO_FILES_PATH};
use crate::state::AppState;

/// Build the application [`Router`]: `/health`, the viewer page at `/`, the
/// JSON API under `/api`, and the raw video files under [`VIDEO_FILES_PATH`]
/// served by `ServeDir`, which answers `Range` requests with 206.
///
/// Requests pass through CORS first, then get an `x-request-id`, are traced,
/// and are bounded by `request_timeout_secs`; a panicking handler becomes a
/// 500. The same id is echoed on the response.
pub fn build_app_router(state: AppState, config: &ServerConfig) -> Router {
    let cors = build_cors_layer(config);
    let video_files = ServeDir::new(&config.videos_dir);
    let request_id_header = HeaderName::from_static("x-request-id");

    Router::new()
        .merge(routes::health::router())
        .route("/", get(viewer::index))
        .nest("/api", routes::api_routes())
        .nest_service(VIDEO_FILES_PATH, video_files)
        // Layers run outermost-last: CORS sees the request first.
        .layer(CatchPanicLayer::new())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(config.request_timeout_secs),
        ))
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        .layer(cors)
        .with_state(state)
}

/// CORS for the viewer's origins. Only reads are exposed, and `Range` is
/// allowed so cross-origin players can seek.
///
/// Panics on an unparsable origin.
pub fn build_cors_layer(config: &ServerConfig) -> CorsLayer {
    let origins: Vec<_> = config
        .cors_origins
        .iter()
        .map(|o| {
            o.parse()
                .unwrap_or_else(|e| panic!("Invalid CORS origin '{o}': {e}"))
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::HEAD])
        .allow_headers([CONTENT_TYPE, RANGE])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600))
}
