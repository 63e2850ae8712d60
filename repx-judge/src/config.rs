//! Judge configuration
//!
//! Selects the model backend and tunes sampling and scoring. Built once per
//! process (or per request) and never mutated afterwards.

use anyhow::Context;
use repx_vlm::{BackendOptions, VlmBackend};

use crate::sampler::SamplingPolicy;

/// Judge configuration
#[derive(Debug, Clone)]
pub struct JudgeConfig {
    pub backend: VlmBackend,

    /// Base URL of a self-hosted backend; hosted backends use their public API
    pub base_url: Option<String>,

    pub api_key: Option<String>,

    /// Overrides the backend's default model
    pub model: Option<String>,

    /// Number of frames sampled from the primary video
    pub num_frames: usize,

    /// Results below this confidence are flagged for human review
    pub confidence_threshold: f64,

    /// Count "uncertain" criteria as failed
    pub strict_mode: bool,

    pub sampling: SamplingPolicy,
}

impl JudgeConfig {
    /// Creates a configuration with defaults for the given backend
    pub fn new(backend: VlmBackend) -> Self {
        Self {
            backend,
            base_url: None,
            api_key: None,
            model: None,
            num_frames: 16,
            confidence_threshold: 0.7,
            strict_mode: true,
            sampling: SamplingPolicy::Uniform,
        }
    }

    /// Creates configuration from environment variables
    ///
    /// Expected environment variables:
    /// - VLM_BACKEND (optional, default: openai_gpt4o)
    /// - VLLM_BASE_URL (optional, self-hosted backends only, default: http://localhost:8000)
    /// - VLM_API_KEY (optional, falls back to OPENAI_API_KEY or GOOGLE_API_KEY by backend)
    /// - VLM_MODEL (optional)
    /// - VLM_NUM_FRAMES (optional, default: 16)
    /// - VLM_CONFIDENCE_THRESHOLD (optional, default: 0.7)
    /// - VLM_STRICT_MODE (optional, default: true)
    /// - VLM_SAMPLING (optional, uniform | key_moments, default: uniform)
    pub fn from_env() -> anyhow::Result<Self> {
        let backend = match non_empty_var("VLM_BACKEND") {
            Some(tag) => tag.parse::<VlmBackend>().context("Invalid VLM_BACKEND")?,
            None => VlmBackend::OpenaiGpt4o,
        };

        let base_url = if backend.is_self_hosted() {
            Some(non_empty_var("VLLM_BASE_URL").unwrap_or_else(|| "http://localhost:8000".to_string()))
        } else {
            None
        };

        let fallback_key = match backend {
            VlmBackend::GeminiPro => "GOOGLE_API_KEY",
            _ => "OPENAI_API_KEY",
        };
        let api_key = non_empty_var("VLM_API_KEY").or_else(|| non_empty_var(fallback_key));

        let num_frames = match non_empty_var("VLM_NUM_FRAMES") {
            Some(raw) => raw.parse::<usize>().context("Invalid VLM_NUM_FRAMES")?,
            None => 16,
        };

        let confidence_threshold = match non_empty_var("VLM_CONFIDENCE_THRESHOLD") {
            Some(raw) => raw.parse::<f64>().context("Invalid VLM_CONFIDENCE_THRESHOLD")?,
            None => 0.7,
        };

        let strict_mode = non_empty_var("VLM_STRICT_MODE")
            .map(|raw| raw.eq_ignore_ascii_case("true"))
            .unwrap_or(true);

        let sampling = match non_empty_var("VLM_SAMPLING") {
            Some(raw) => raw.parse::<SamplingPolicy>().map_err(anyhow::Error::msg)?,
            None => SamplingPolicy::Uniform,
        };

        Ok(Self {
            backend,
            base_url,
            api_key,
            model: non_empty_var("VLM_MODEL"),
            num_frames,
            confidence_threshold,
            strict_mode,
            sampling,
        })
    }

    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.num_frames == 0 {
            anyhow::bail!("num_frames must be greater than 0");
        }

        if !(0.0..=1.0).contains(&self.confidence_threshold) {
            anyhow::bail!("confidence_threshold must be between 0.0 and 1.0");
        }

        if let Some(url) = &self.base_url {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                anyhow::bail!("base_url must start with http:// or https://");
            }
        }

        if self.backend.requires_api_key() && self.api_key.as_deref().is_none_or(str::is_empty) {
            anyhow::bail!("backend {} requires an API key", self.backend);
        }

        Ok(())
    }

    /// Overrides handed to the backend factory
    pub fn backend_options(&self) -> BackendOptions {
        BackendOptions {
            base_url: self.base_url.clone(),
            api_key: self.api_key.clone(),
            model: self.model.clone(),
        }
    }
}

impl Default for JudgeConfig {
    fn default() -> Self {
        Self::new(VlmBackend::OpenaiGpt4o)
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
