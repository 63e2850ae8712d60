//! API Error Handling
//!
//! Unified error types and conversion for API responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use repx_core::InputError;
use repx_judge::JudgeError;

/// API error type
#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    BadRequest(String),
    /// Judging failed on the server side; details are logged, never returned
    JudgeFailed(JudgeError),
    InternalError(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::JudgeFailed(err) => {
                tracing::error!("Judging error: {:?}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, err.summary())
            }
            ApiError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

impl From<JudgeError> for ApiError {
    fn from(err: JudgeError) -> Self {
        if err.is_client_error() {
            tracing::warn!("Rejected video: {}", err);
            ApiError::BadRequest(err.summary())
        } else {
            ApiError::JudgeFailed(err)
        }
    }
}

impl From<InputError> for ApiError {
    fn from(err: InputError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
