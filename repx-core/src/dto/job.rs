//! Asynchronous job DTOs

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::judgment::JudgmentResponse;
use crate::domain::{Job, JobOutcome, JobStatus};

/// Acknowledgement returned right after an async submission
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmittedJobResponse {
    pub judgment_id: Uuid,
    pub status: JobStatus,
    pub message: String,
}

impl SubmittedJobResponse {
    pub fn pending(judgment_id: Uuid) -> Self {
        Self {
            judgment_id,
            status: JobStatus::Pending,
            message: "Video submitted for analysis. Check status endpoint for results.".to_string(),
        }
    }
}

/// Current state of an async judgment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JudgmentStatusResponse {
    pub judgment_id: Uuid,
    pub status: JobStatus,
    pub submitted_at: chrono::DateTime<chrono::Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<JudgmentResponse>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl JudgmentStatusResponse {
    /// Flattens a job; a completed job carries the same shape as a synchronous answer
    pub fn from_job(job: &Job, confidence_threshold: f64) -> Self {
        let (result, error) = match &job.outcome {
            Some(JobOutcome::Completed { result }) => {
                let processed_at = job.completed_at.unwrap_or_else(chrono::Utc::now);
                let response =
                    JudgmentResponse::from_result(job.id, result, processed_at, confidence_threshold);
                (Some(response), None)
            }
            Some(JobOutcome::Failed { error }) => (None, Some(error.clone())),
            None => (None, None),
        };

        Self {
            judgment_id: job.id,
            status: job.status,
            submitted_at: job.submitted_at,
            started_at: job.started_at,
            completed_at: job.completed_at,
            result,
            error,
        }
    }
}
