//! Judgment API Handlers
//!
//! Video upload endpoints (synchronous and asynchronous) and async status.

use axum::{
    Json,
    extract::{Multipart, Path, State},
};
use bytes::Bytes;
use uuid::Uuid;

use repx_core::domain::{CameraAngle, Discipline};
use repx_core::dto::job::{JudgmentStatusResponse, SubmittedJobResponse};
use repx_core::dto::judgment::JudgmentResponse;
use repx_judge::{AnalyzeRequest, VideoSource};

use crate::api::error::{ApiError, ApiResult};
use crate::service::{job_service, judgment_service};
use crate::state::AppState;

/// An uploaded file
struct Upload {
    file_name: Option<String>,
    bytes: Bytes,
}

impl Upload {
    /// File extension including the dot, ".mp4" when the client sent none
    fn suffix(&self) -> String {
        self.file_name
            .as_deref()
            .and_then(|name| std::path::Path::new(name).extension())
            .and_then(|ext| ext.to_str())
            .map(|ext| format!(".{}", ext.to_lowercase()))
            .unwrap_or_else(|| ".mp4".to_string())
    }
}

/// Validated form of an analysis upload
struct AnalysisForm {
    video: Upload,
    discipline: Discipline,
    camera_angle: CameraAngle,
    additional_context: Option<String>,
    secondary_video: Option<Upload>,
}

async fn read_form(mut multipart: Multipart) -> ApiResult<AnalysisForm> {
    let mut video = None;
    let mut secondary_video = None;
    let mut discipline = None;
    let mut camera_angle = None;
    let mut additional_context = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "video" | "secondary_video" => {
                let file_name = field.file_name().map(str::to_string);
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::BadRequest(e.to_string()))?;
                let upload = Upload { file_name, bytes };
                if name == "video" {
                    video = Some(upload);
                } else if !upload.bytes.is_empty() {
                    secondary_video = Some(upload);
                }
            }
            "discipline" | "camera_angle" | "additional_context" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| ApiError::BadRequest(e.to_string()))?;
                match name.as_str() {
                    "discipline" => discipline = Some(text),
                    "camera_angle" => camera_angle = Some(text),
                    _ => additional_context = Some(text).filter(|t| !t.is_empty()),
                }
            }
            _ => {} // ignore unknown fields
        }
    }

    let discipline = discipline
        .ok_or_else(|| ApiError::BadRequest("Missing required 'discipline' field".into()))?
        .parse::<Discipline>()?;

    let camera_angle = match camera_angle {
        Some(raw) => raw.parse::<CameraAngle>()?,
        None => CameraAngle::Auto,
    };

    let video = video
        .filter(|v| !v.bytes.is_empty())
        .ok_or_else(|| ApiError::BadRequest("Missing required 'video' field".into()))?;

    Ok(AnalysisForm {
        video,
        discipline,
        camera_angle,
        additional_context,
        secondary_video,
    })
}

/// POST /video-judge/analyze
/// Judge an uploaded video and return the verdict
pub async fn analyze(
    State(state): State<AppState>,
    multipart: Multipart,
) -> ApiResult<Json<JudgmentResponse>> {
    let form = read_form(multipart).await?;

    tracing::info!(
        "Analyzing {} video ({} bytes, camera angle {})",
        form.discipline,
        form.video.bytes.len(),
        form.camera_angle
    );

    let mut request = AnalyzeRequest::from_bytes(form.discipline, form.video.bytes)
        .with_camera_angle(form.camera_angle);
    if let Some(secondary) = form.secondary_video {
        request = request.with_secondary_video(VideoSource::Bytes(secondary.bytes));
    }
    if let Some(context) = form.additional_context {
        request = request.with_additional_context(context);
    }

    let response = judgment_service::analyze(
        state.judge.as_ref(),
        &request,
        state.config.judge.confidence_threshold,
    )
    .await?;

    Ok(Json(response))
}

/// POST /video-judge/analyze-async
/// Queue an uploaded video for judging and return its ID
pub async fn analyze_async(
    State(state): State<AppState>,
    multipart: Multipart,
) -> ApiResult<Json<SubmittedJobResponse>> {
    let form = read_form(multipart).await?;

    if form.secondary_video.is_some() {
        tracing::debug!("Ignoring secondary video on async submission");
    }

    let suffix = form.video.suffix();
    let judgment_id = state
        .runner
        .submit(
            form.video.bytes,
            form.discipline,
            form.camera_angle,
            form.additional_context,
            &suffix,
        )
        .await
        .map_err(|e| match e {
            job_service::JobError::NotFound(id) => {
                ApiError::NotFound(format!("Judgment ID not found: {}", id))
            }
            job_service::JobError::Store(err) => ApiError::InternalError(err.to_string()),
            job_service::JobError::Io(err) => ApiError::InternalError(err.to_string()),
        })?;

    Ok(Json(SubmittedJobResponse::pending(judgment_id)))
}

/// GET /video-judge/status/{judgment_id}
/// Get the state of an async judgment
pub async fn get_status(
    State(state): State<AppState>,
    Path(judgment_id): Path<String>,
) -> ApiResult<Json<JudgmentStatusResponse>> {
    tracing::debug!("Getting judgment status: {}", judgment_id);

    let not_found = || ApiError::NotFound(format!("Judgment ID not found: {}", judgment_id));

    let id = Uuid::parse_str(&judgment_id).map_err(|_| not_found())?;

    let job = state.runner.get_status(id).await.map_err(|e| match e {
        job_service::JobError::NotFound(_) => not_found(),
        job_service::JobError::Store(err) => ApiError::InternalError(err.to_string()),
        job_service::JobError::Io(err) => ApiError::InternalError(err.to_string()),
    })?;

    Ok(Json(JudgmentStatusResponse::from_job(
        &job,
        state.config.judge.confidence_threshold,
    )))
}
