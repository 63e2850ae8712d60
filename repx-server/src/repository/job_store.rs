//! Job Store
//!
//! Registry of asynchronous judgments. Updates are compare-and-swap on the
//! job status, so a stale writer can never overwrite a newer state.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

use repx_core::domain::{Job, JobOutcome, JobStatus, VideoJudgmentResult};

/// Store error type
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Job {0} not found")]
    NotFound(Uuid),

    #[error("Job {0} already exists")]
    Duplicate(Uuid),

    #[error("Job {id} is {actual}, expected {expected}")]
    Conflict {
        id: Uuid,
        expected: JobStatus,
        actual: JobStatus,
    },

    #[error("Illegal transition for job {id}: {from} -> {to}")]
    IllegalTransition {
        id: Uuid,
        from: JobStatus,
        to: JobStatus,
    },
}

/// A lifecycle step applied to a stored job
#[derive(Debug, Clone)]
pub enum JobUpdate {
    Start,
    Complete(VideoJudgmentResult),
    Fail(String),
}

impl JobUpdate {
    /// Status the job holds after this update
    pub fn target_status(&self) -> JobStatus {
        match self {
            JobUpdate::Start => JobStatus::Processing,
            JobUpdate::Complete(_) => JobStatus::Completed,
            JobUpdate::Fail(_) => JobStatus::Failed,
        }
    }

    fn apply(self, job: &mut Job) {
        let now = chrono::Utc::now();
        job.status = self.target_status();
        match self {
            JobUpdate::Start => job.started_at = Some(now),
            JobUpdate::Complete(result) => {
                job.completed_at = Some(now);
                job.outcome = Some(JobOutcome::Completed { result });
            }
            JobUpdate::Fail(error) => {
                job.completed_at = Some(now);
                job.outcome = Some(JobOutcome::Failed { error });
            }
        }
    }
}

/// Registry of asynchronous judgments
#[async_trait]
pub trait JobStore: Send + Sync {
    async fn insert(&self, job: Job) -> Result<(), StoreError>;

    /// Returns a snapshot of the job
    async fn get(&self, id: Uuid) -> Result<Option<Job>, StoreError>;

    /// Applies `update` only if the job is currently `expected` and the
    /// transition is legal; returns the updated snapshot
    async fn compare_and_set(
        &self,
        id: Uuid,
        expected: JobStatus,
        update: JobUpdate,
    ) -> Result<Job, StoreError>;

    /// Drops terminal jobs that finished before `cutoff`; returns how many
    async fn evict_finished_before(&self, cutoff: DateTime<Utc>) -> Result<usize, StoreError>;
}

/// Process-local job store
///
/// The index lock is only held to find or add an entry; each job has its own
/// lock so updates to different jobs never wait on each other.
#[derive(Default)]
pub struct InMemoryJobStore {
    jobs: RwLock<HashMap<Uuid, Arc<Mutex<Job>>>>,
}

impl InMemoryJobStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn entry(&self, id: Uuid) -> Option<Arc<Mutex<Job>>> {
        self.jobs.read().get(&id).cloned()
    }
}

#[async_trait]
impl JobStore for InMemoryJobStore {
    async fn insert(&self, job: Job) -> Result<(), StoreError> {
        let mut jobs = self.jobs.write();
        if jobs.contains_key(&job.id) {
            return Err(StoreError::Duplicate(job.id));
        }
        jobs.insert(job.id, Arc::new(Mutex::new(job)));
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<Job>, StoreError> {
        Ok(self.entry(id).map(|job| job.lock().clone()))
    }

    async fn compare_and_set(
        &self,
        id: Uuid,
        expected: JobStatus,
        update: JobUpdate,
    ) -> Result<Job, StoreError> {
        let entry = self.entry(id).ok_or(StoreError::NotFound(id))?;
        let mut job = entry.lock();

        if job.status != expected {
            return Err(StoreError::Conflict {
                id,
                expected,
                actual: job.status,
            });
        }

        let to = update.target_status();
        if !job.status.can_transition_to(to) {
            return Err(StoreError::IllegalTransition {
                id,
                from: job.status,
                to,
            });
        }

        update.apply(&mut job);
        Ok(job.clone())
    }

    async fn evict_finished_before(&self, cutoff: DateTime<Utc>) -> Result<usize, StoreError> {
        let mut jobs = self.jobs.write();
        let before = jobs.len();
        jobs.retain(|_, job| {
            let job = job.lock();
            !(job.status.is_terminal() && job.completed_at.is_some_and(|at| at < cutoff))
        });
        Ok(before - jobs.len())
    }
}
