//! Judgment job domain types

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use uuid::Uuid;

use super::discipline::Discipline;
use super::judgment::VideoJudgmentResult;

/// Asynchronous judgment record
///
/// Owned by the job store; the runner advances it through its lifecycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub id: Uuid,
    pub discipline: Discipline,
    pub status: JobStatus,
    pub submitted_at: chrono::DateTime<chrono::Utc>,
    pub started_at: Option<chrono::DateTime<chrono::Utc>>,
    pub completed_at: Option<chrono::DateTime<chrono::Utc>>,
    /// Temporary copy of the uploaded video, removed on the terminal transition
    pub video_path: PathBuf,
    pub outcome: Option<JobOutcome>,
}

impl Job {
    /// Creates a pending job
    pub fn pending(id: Uuid, discipline: Discipline, video_path: PathBuf) -> Self {
        Self {
            id,
            discipline,
            status: JobStatus::Pending,
            submitted_at: chrono::Utc::now(),
            started_at: None,
            completed_at: None,
            video_path,
            outcome: None,
        }
    }
}

/// Job lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Pending => "pending",
            JobStatus::Processing => "processing",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }

    /// Statuses only move forward: pending -> processing -> completed | failed
    pub fn can_transition_to(&self, next: JobStatus) -> bool {
        matches!(
            (self, next),
            (JobStatus::Pending, JobStatus::Processing)
                | (JobStatus::Processing, JobStatus::Completed)
                | (JobStatus::Processing, JobStatus::Failed)
        )
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Terminal outcome of a job: exactly one of result or error
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum JobOutcome {
    Completed { result: VideoJudgmentResult },
    Failed { error: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_transitions_allowed() {
        assert!(JobStatus::Pending.can_transition_to(JobStatus::Processing));
        assert!(JobStatus::Processing.can_transition_to(JobStatus::Completed));
        assert!(JobStatus::Processing.can_transition_to(JobStatus::Failed));
    }

    #[test]
    fn test_backward_and_skipping_transitions_rejected() {
        assert!(!JobStatus::Processing.can_transition_to(JobStatus::Pending));
        assert!(!JobStatus::Pending.can_transition_to(JobStatus::Completed));
        assert!(!JobStatus::Completed.can_transition_to(JobStatus::Failed));
        assert!(!JobStatus::Failed.can_transition_to(JobStatus::Completed));
    }

    #[test]
    fn test_new_job_is_pending() {
        let job = Job::pending(Uuid::new_v4(), Discipline::Squat, PathBuf::from("/tmp/x.mp4"));
        assert_eq!(job.status, JobStatus::Pending);
        assert!(job.outcome.is_none());
        assert!(!job.status.is_terminal());
    }
}
