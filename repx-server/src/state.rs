//! Shared application state

use std::sync::Arc;

use repx_judge::VideoJudge;

use crate::config::ServerConfig;
use crate::repository::InMemoryJobStore;
use crate::service::job_service::JobRunner;

/// State handed to every request handler
#[derive(Clone)]
pub struct AppState {
    pub judge: Arc<dyn VideoJudge>,
    pub runner: Arc<JobRunner>,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    /// Wires the job runner to an in-memory store around `judge`
    pub fn new(config: ServerConfig, judge: Arc<dyn VideoJudge>) -> Self {
        let runner = JobRunner::new(
            Arc::new(InMemoryJobStore::new()),
            Arc::clone(&judge),
            config.max_parallel_jobs,
        );

        Self {
            judge,
            runner: Arc::new(runner),
            config: Arc::new(config),
        }
    }
}
