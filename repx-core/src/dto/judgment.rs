//! Judgment DTOs

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{Discipline, JudgmentDetail, OverallJudgment, VideoJudgmentResult};

/// Per-criterion line of a judgment response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailDto {
    pub criteria: String,
    pub passed: bool,
    pub confidence: f64,
    pub explanation: String,
}

impl From<&JudgmentDetail> for DetailDto {
    fn from(detail: &JudgmentDetail) -> Self {
        Self {
            criteria: detail.criteria.clone(),
            passed: detail.passed,
            confidence: detail.confidence,
            explanation: detail.explanation.clone(),
        }
    }
}

/// Response of a synchronous analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JudgmentResponse {
    pub judgment_id: Uuid,
    pub discipline: Discipline,
    pub is_valid: bool,
    pub confidence: f64,
    pub rep_count: u32,
    pub overall_judgment: OverallJudgment,
    pub invalid_reasons: Vec<String>,
    pub details: Vec<DetailDto>,
    pub frame_analysis: serde_json::Map<String, serde_json::Value>,
    pub model_used: String,
    pub processed_at: chrono::DateTime<chrono::Utc>,
    /// Set when the model's confidence is under the configured threshold
    pub below_confidence_threshold: bool,
}

impl JudgmentResponse {
    pub fn from_result(
        judgment_id: Uuid,
        result: &VideoJudgmentResult,
        processed_at: chrono::DateTime<chrono::Utc>,
        confidence_threshold: f64,
    ) -> Self {
        Self {
            judgment_id,
            discipline: result.discipline,
            is_valid: result.is_valid,
            confidence: result.confidence,
            rep_count: result.rep_count,
            overall_judgment: result.overall_judgment,
            invalid_reasons: result.invalid_reasons.clone(),
            details: result.details.iter().map(DetailDto::from).collect(),
            frame_analysis: result.frame_analysis.clone(),
            model_used: result.model_used.clone(),
            processed_at,
            below_confidence_threshold: result.confidence < confidence_threshold,
        }
    }
}

/// Health probe of the judging service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub vlm_backend: String,
    pub available_disciplines: Vec<Discipline>,
}
