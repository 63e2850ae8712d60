//! API Module
//!
//! HTTP API layer of the judging server.
//! Each submodule handles endpoints for a specific area.

pub mod error;
pub mod health;
pub mod judge;
pub mod regulations;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method, header::CONTENT_TYPE},
    routing::{get, post},
};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Create the main API router with all endpoints
pub fn create_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes;
    let cors = build_cors_layer(&state.config.cors_origins);

    Router::new()
        // Liveness probe
        .route("/health", get(health::health_check))
        // Judging endpoints
        .route("/video-judge/health", get(health::judge_health))
        .route("/video-judge/analyze", post(judge::analyze))
        .route("/video-judge/analyze-async", post(judge::analyze_async))
        .route("/video-judge/status/{judgment_id}", get(judge::get_status))
        // Reference data
        .route(
            "/video-judge/regulations/{discipline}",
            get(regulations::get_regulations),
        )
        .route("/video-judge/disciplines", get(regulations::list_disciplines))
        // Add state and middleware
        .with_state(state)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Build the CORS layer; no configured origins means any origin
fn build_cors_layer(origins: &[String]) -> CorsLayer {
    let allow_origin = if origins.is_empty() {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(
            origins
                .iter()
                .filter_map(|o| HeaderValue::from_str(o).ok()),
        )
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([CONTENT_TYPE])
}
