//! Server configuration
//!
//! Loaded once at startup from the environment.

use anyhow::Context;
use axum::http::HeaderValue;
use repx_judge::JudgeConfig;
use std::time::Duration;

const DEFAULT_MAX_UPLOAD_BYTES: usize = 200 * 1024 * 1024;
const DEFAULT_JOB_RETENTION: Duration = Duration::from_secs(60 * 60);

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address the HTTP listener binds to
    pub bind_addr: String,

    /// Maximum number of async judgments running at once
    pub max_parallel_jobs: usize,

    /// Request body limit for video uploads
    pub max_upload_bytes: usize,

    /// Allowed CORS origins; empty allows any origin
    pub cors_origins: Vec<String>,

    /// How long finished async judgments stay queryable
    pub job_retention: Duration,

    pub judge: JudgeConfig,
}

impl ServerConfig {
    /// Creates configuration from environment variables
    ///
    /// Expected environment variables:
    /// - REPX_BIND_ADDR (optional, default: 0.0.0.0:8000)
    /// - MAX_PARALLEL_JOBS (optional, default: 4)
    /// - MAX_UPLOAD_BYTES (optional, default: 200 MiB)
    /// - REPX_CORS_ORIGINS (optional, comma separated)
    /// - JOB_RETENTION_SECS (optional, default: 3600)
    /// - VLM_* variables, see [`JudgeConfig::from_env`]
    pub fn from_env() -> anyhow::Result<Self> {
        let bind_addr =
            std::env::var("REPX_BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8000".to_string());

        let max_parallel_jobs = std::env::var("MAX_PARALLEL_JOBS")
            .ok()
            .map(|v| v.parse::<usize>())
            .transpose()
            .context("Invalid MAX_PARALLEL_JOBS")?
            .unwrap_or(4);

        let max_upload_bytes = std::env::var("MAX_UPLOAD_BYTES")
            .ok()
            .map(|v| v.parse::<usize>())
            .transpose()
            .context("Invalid MAX_UPLOAD_BYTES")?
            .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES);

        let cors_origins = std::env::var("REPX_CORS_ORIGINS")
            .map(|v| {
                v.split(',')
                    .map(str::trim)
                    .filter(|o| !o.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        let job_retention = std::env::var("JOB_RETENTION_SECS")
            .ok()
            .map(|v| v.parse::<u64>())
            .transpose()
            .context("Invalid JOB_RETENTION_SECS")?
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_JOB_RETENTION);

        let judge = JudgeConfig::from_env().context("Failed to load judge configuration")?;

        Ok(Self {
            bind_addr,
            max_parallel_jobs,
            max_upload_bytes,
            cors_origins,
            job_retention,
            judge,
        })
    }

    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.max_parallel_jobs == 0 {
            anyhow::bail!("max_parallel_jobs must be greater than 0");
        }

        if self.max_upload_bytes == 0 {
            anyhow::bail!("max_upload_bytes must be greater than 0");
        }

        if self.job_retention.is_zero() {
            anyhow::bail!("job_retention must be greater than 0");
        }

        for origin in &self.cors_origins {
            HeaderValue::from_str(origin)
                .with_context(|| format!("Invalid CORS origin '{}'", origin))?;
        }

        self.judge.validate()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8000".to_string(),
            max_parallel_jobs: 4,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            cors_origins: Vec::new(),
            job_retention: DEFAULT_JOB_RETENTION,
            judge: JudgeConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_addr, "0.0.0.0:8000");
        assert_eq!(config.max_parallel_jobs, 4);
        assert_eq!(config.max_upload_bytes, 200 * 1024 * 1024);
        assert!(config.cors_origins.is_empty());
        assert_eq!(config.job_retention, Duration::from_secs(3600));
    }

    #[test]
    fn test_config_validation() {
        let mut config = ServerConfig::default();
        config.judge.api_key = Some("sk-test".to_string());
        assert!(config.validate().is_ok());

        config.max_parallel_jobs = 0;
        assert!(config.validate().is_err());
        config.max_parallel_jobs = 2;

        config.job_retention = Duration::ZERO;
        assert!(config.validate().is_err());
        config.job_retention = Duration::from_secs(60);

        config.cors_origins = vec!["http://localhost:5173".to_string()];
        assert!(config.validate().is_ok());

        config.cors_origins = vec!["bad\norigin".to_string()];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_judge_config_is_validated() {
        let config = ServerConfig::default();
        // Hosted default backend without a key
        assert!(config.validate().is_err());
    }
}
