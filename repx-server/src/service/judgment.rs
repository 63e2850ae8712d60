//! Judgment Service
//!
//! Synchronous judging and service health.

use tracing::info;
use uuid::Uuid;

use repx_core::domain::Discipline;
use repx_core::dto::judgment::{HealthResponse, JudgmentResponse};
use repx_judge::{AnalyzeRequest, JudgeError, VideoJudge};

/// Judge one attempt and shape the answer for the API
pub async fn analyze(
    judge: &dyn VideoJudge,
    request: &AnalyzeRequest,
    confidence_threshold: f64,
) -> Result<JudgmentResponse, JudgeError> {
    let result = judge.analyze(request).await?;

    let judgment_id = Uuid::new_v4();
    let response =
        JudgmentResponse::from_result(judgment_id, &result, chrono::Utc::now(), confidence_threshold);

    info!(
        "Judgment {} ({}): {} at {:.2} confidence",
        judgment_id, response.discipline, response.overall_judgment, response.confidence
    );
    if response.below_confidence_threshold {
        info!("Judgment {} flagged for human review", judgment_id);
    }

    Ok(response)
}

/// Health summary for the configured backend
pub fn health(vlm_backend: &str) -> HealthResponse {
    HealthResponse {
        status: "healthy".to_string(),
        vlm_backend: vlm_backend.to_string(),
        available_disciplines: Discipline::ALL.to_vec(),
    }
}
