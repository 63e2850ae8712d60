//! Job Service
//!
//! Runs asynchronous judgments in the background. Each submission is stored
//! as a pending job, then a spawned task (bounded by a semaphore) advances it
//! to processing and finally to completed or failed.

use bytes::Bytes;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempPath;
use thiserror::Error;
use tokio::sync::Semaphore;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use repx_core::domain::{CameraAngle, Discipline, Job, JobStatus};
use repx_judge::{AnalyzeRequest, VideoJudge};

use crate::repository::{JobStore, JobUpdate, StoreError};

/// Period of the finished-job sweep
const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Failure recorded when the judging task panics or is cancelled
pub const ABORTED: &str = "Judging aborted unexpectedly";

/// Service error type
#[derive(Debug, Error)]
pub enum JobError {
    #[error("Judgment ID not found: {0}")]
    NotFound(Uuid),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Failed to store uploaded video: {0}")]
    Io(#[from] std::io::Error),
}

/// Background executor for asynchronous judgments
pub struct JobRunner {
    store: Arc<dyn JobStore>,
    judge: Arc<dyn VideoJudge>,
    semaphore: Arc<Semaphore>,
}

impl JobRunner {
    /// Creates a runner executing at most `max_parallel_jobs` judgments at once
    pub fn new(store: Arc<dyn JobStore>, judge: Arc<dyn VideoJudge>, max_parallel_jobs: usize) -> Self {
        Self {
            store,
            judge,
            semaphore: Arc::new(Semaphore::new(max_parallel_jobs)),
        }
    }

    /// Stores the video, records a pending job and schedules its execution
    ///
    /// `suffix` is the upload's file extension (".mp4", ...), kept so the
    /// decoder can recognise the container.
    pub async fn submit(
        &self,
        video_bytes: Bytes,
        discipline: Discipline,
        camera_angle: CameraAngle,
        additional_context: Option<String>,
        suffix: &str,
    ) -> Result<Uuid, JobError> {
        let temp_path = tempfile::Builder::new()
            .prefix("repx-job-")
            .suffix(suffix)
            .tempfile()?
            .into_temp_path();
        tokio::fs::write(&temp_path, &video_bytes).await?;

        let id = Uuid::new_v4();
        self.store
            .insert(Job::pending(id, discipline, temp_path.to_path_buf()))
            .await?;

        let mut request =
            AnalyzeRequest::from_path(discipline, temp_path.to_path_buf()).with_camera_angle(camera_angle);
        if let Some(context) = additional_context {
            request = request.with_additional_context(context);
        }

        info!(
            "Judgment {} submitted ({}, {} bytes)",
            id,
            discipline,
            video_bytes.len()
        );

        self.spawn_job_task(id, request, temp_path);

        Ok(id)
    }

    /// Get a job by ID
    pub async fn get_status(&self, id: Uuid) -> Result<Job, JobError> {
        let job = self.store.get(id).await?.ok_or(JobError::NotFound(id))?;
        Ok(job)
    }

    /// Forgets judgments that finished more than `retention` ago
    pub async fn evict_expired(&self, retention: Duration) -> Result<usize, JobError> {
        let cutoff = chrono::Duration::from_std(retention)
            .ok()
            .and_then(|retention| chrono::Utc::now().checked_sub_signed(retention));
        let Some(cutoff) = cutoff else {
            return Ok(0);
        };

        Ok(self.store.evict_finished_before(cutoff).await?)
    }

    /// Periodically evicts finished judgments older than `retention`
    pub fn spawn_retention_sweep(self: &Arc<Self>, retention: Duration) -> tokio::task::JoinHandle<()> {
        let runner = Arc::clone(self);

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(SWEEP_INTERVAL.min(retention));
            loop {
                ticker.tick().await;
                match runner.evict_expired(retention).await {
                    Ok(0) => {}
                    Ok(evicted) => debug!("Evicted {} finished judgments", evicted),
                    Err(e) => warn!("Failed to evict finished judgments: {}", e),
                }
            }
        })
    }

    /// Spawns a task to execute a single job
    ///
    /// The temporary video is owned by the task and removed when it ends,
    /// whatever the outcome.
    fn spawn_job_task(
        &self,
        id: Uuid,
        request: AnalyzeRequest,
        temp_path: TempPath,
    ) -> tokio::task::JoinHandle<()> {
        let store = Arc::clone(&self.store);
        let judge = Arc::clone(&self.judge);
        let semaphore = Arc::clone(&self.semaphore);

        tokio::spawn(async move {
            // Permit is released when dropped
            let _permit = semaphore.acquire_owned().await.ok();

            match Self::execute_job(id, request, store.as_ref(), judge).await {
                Ok(status) => info!("Judgment {} finished with status: {}", id, status),
                Err(e) => error!("Failed to execute judgment {}: {}", id, e),
            }

            if let Err(e) = temp_path.close() {
                warn!("Failed to remove temporary video for judgment {}: {}", id, e);
            }
        })
    }

    /// Executes a single job and records its outcome
    ///
    /// The judge runs in its own task so that a panic still ends in the
    /// failed state.
    async fn execute_job(
        id: Uuid,
        request: AnalyzeRequest,
        store: &dyn JobStore,
        judge: Arc<dyn VideoJudge>,
    ) -> Result<JobStatus, StoreError> {
        store
            .compare_and_set(id, JobStatus::Pending, JobUpdate::Start)
            .await?;

        debug!("Processing judgment {}", id);

        let analysis = tokio::spawn(async move { judge.analyze(&request).await }).await;

        let update = match analysis {
            Ok(Ok(result)) => JobUpdate::Complete(result),
            Ok(Err(e)) => {
                error!("Judgment {} failed: {:?}", id, e);
                JobUpdate::Fail(e.summary())
            }
            Err(e) => {
                error!("Judgment {} aborted: {}", id, e);
                JobUpdate::Fail(ABORTED.to_string())
            }
        };

        let job = store
            .compare_and_set(id, JobStatus::Processing, update)
            .await?;

        Ok(job.status)
    }
}
