//! Health Check API Handlers

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use repx_core::dto::judgment::HealthResponse;

use crate::service::judgment_service;
use crate::state::AppState;

/// GET /health
/// Liveness probe
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

/// GET /video-judge/health
/// Judging service health with the configured backend
pub async fn judge_health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(judgment_service::health(state.config.judge.backend.as_str()))
}
