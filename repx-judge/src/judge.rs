//! Judge orchestrator
//!
//! Runs one attempt through the pipeline: sample frames, build the prompt,
//! ask the model, parse the answer.

use async_trait::async_trait;
use bytes::Bytes;
use std::path::PathBuf;
use tracing::{debug, info, warn};

use repx_core::InputError;
use repx_core::domain::{CameraAngle, Discipline, VideoJudgmentResult};
use repx_vlm::{ConfigError, VlmClient, create_client};

use crate::config::JudgeConfig;
use crate::error::Result;
use crate::parser::{self, ParseOptions};
use crate::prompt::{self, SYSTEM_PROMPT};
use crate::sampler::{self, FfmpegSampler, FrameSampler, VideoSource};

/// One attempt to judge
#[derive(Debug, Clone)]
pub struct AnalyzeRequest {
    pub discipline: Discipline,
    /// Exactly one of `video_path` and `video_bytes` must be set
    pub video_path: Option<PathBuf>,
    pub video_bytes: Option<Bytes>,
    /// Second camera, typically parallel to the bar for pull-ups
    pub secondary_video: Option<VideoSource>,
    pub camera_angle: CameraAngle,
    pub additional_context: Option<String>,
}

impl AnalyzeRequest {
    pub fn from_path(discipline: Discipline, path: impl Into<PathBuf>) -> Self {
        Self {
            discipline,
            video_path: Some(path.into()),
            video_bytes: None,
            secondary_video: None,
            camera_angle: CameraAngle::Auto,
            additional_context: None,
        }
    }

    pub fn from_bytes(discipline: Discipline, bytes: impl Into<Bytes>) -> Self {
        Self {
            discipline,
            video_path: None,
            video_bytes: Some(bytes.into()),
            secondary_video: None,
            camera_angle: CameraAngle::Auto,
            additional_context: None,
        }
    }

    pub fn with_camera_angle(mut self, camera_angle: CameraAngle) -> Self {
        self.camera_angle = camera_angle;
        self
    }

    pub fn with_secondary_video(mut self, source: VideoSource) -> Self {
        self.secondary_video = Some(source);
        self
    }

    pub fn with_additional_context(mut self, context: impl Into<String>) -> Self {
        self.additional_context = Some(context.into());
        self
    }

    /// The primary video, checking that exactly one source was given
    pub fn primary_source(&self) -> std::result::Result<VideoSource, InputError> {
        match (&self.video_path, &self.video_bytes) {
            (Some(path), None) => Ok(VideoSource::Path(path.clone())),
            (None, Some(bytes)) => Ok(VideoSource::Bytes(bytes.clone())),
            (None, None) => Err(InputError::MissingVideo),
            (Some(_), Some(_)) => Err(InputError::ConflictingVideoSources),
        }
    }
}

/// Anything that can judge an attempt
///
/// Implemented by [`Judge`]; callers such as the HTTP server hold it as a
/// trait object so tests can substitute their own.
#[async_trait]
pub trait VideoJudge: Send + Sync {
    async fn analyze(&self, request: &AnalyzeRequest) -> Result<VideoJudgmentResult>;

    /// Identifier of the model behind this judge
    fn model_name(&self) -> String;

    /// Runs up to `max_retries + 1` sequential attempts
    ///
    /// Never fails: when every attempt errors, a degraded result names the
    /// attempt count and the last error.
    async fn analyze_with_retry(&self, request: &AnalyzeRequest, max_retries: u32) -> VideoJudgmentResult {
        let attempts = max_retries.saturating_add(1);
        let mut last_error = String::new();

        for attempt in 1..=attempts {
            match self.analyze(request).await {
                Ok(result) => return result,
                Err(e) => {
                    warn!(attempt, attempts, error = %e, "Analysis attempt failed");
                    last_error = e.to_string();
                }
            }
        }

        VideoJudgmentResult::degraded(
            request.discipline,
            format!("Analysis failed after {} attempts: {}", attempts, last_error),
            last_error,
            "",
            "N/A",
        )
    }

    /// Releases backend resources
    async fn close(&self) {}
}

/// The judging pipeline over a frame sampler and a model backend
pub struct Judge {
    config: JudgeConfig,
    sampler: Box<dyn FrameSampler>,
    client: Box<dyn VlmClient>,
}

impl Judge {
    /// Creates a judge with the ffmpeg sampler and the configured backend
    pub fn new(config: JudgeConfig) -> std::result::Result<Self, ConfigError> {
        let client = create_client(config.backend, config.backend_options())?;
        let sampler = FfmpegSampler::new(config.sampling);
        Ok(Self::with_components(config, Box::new(sampler), client))
    }

    pub fn with_components(
        config: JudgeConfig,
        sampler: Box<dyn FrameSampler>,
        client: Box<dyn VlmClient>,
    ) -> Self {
        Self {
            config,
            sampler,
            client,
        }
    }

    pub fn config(&self) -> &JudgeConfig {
        &self.config
    }
}

#[async_trait]
impl VideoJudge for Judge {
    async fn analyze(&self, request: &AnalyzeRequest) -> Result<VideoJudgmentResult> {
        let primary = request.primary_source()?;
        let discipline = request.discipline;
        let camera_angle = request.camera_angle.resolve(discipline);
        let num_frames = self.config.num_frames;

        let (frames, prompt) = match &request.secondary_video {
            Some(secondary) => {
                let primary_frames = self.sampler.extract(&primary, num_frames).await?;
                let secondary_frames = self
                    .sampler
                    .extract(secondary, (num_frames / 2).max(1))
                    .await?;
                debug!(
                    primary = primary_frames.len(),
                    secondary = secondary_frames.len(),
                    "Interleaving camera angles"
                );
                (
                    sampler::interleave(primary_frames, secondary_frames),
                    prompt::build_multi_angle_prompt(discipline, &[camera_angle, CameraAngle::Parallel]),
                )
            }
            None => (
                self.sampler.extract(&primary, num_frames).await?,
                prompt::build_prompt(discipline, camera_angle, false),
            ),
        };
        let prompt = prompt::with_additional_context(prompt, request.additional_context.as_deref());

        let model_name = self.client.model_name();
        info!(
            discipline = %discipline,
            camera_angle = %camera_angle,
            frames = frames.len(),
            model = %model_name,
            "Judging attempt"
        );

        let raw = self
            .client
            .analyze_frames(&frames, &prompt, Some(SYSTEM_PROMPT))
            .await?;

        let result = parser::parse(
            &raw,
            discipline,
            &model_name,
            ParseOptions {
                strict_mode: self.config.strict_mode,
            },
        );
        info!(
            discipline = %discipline,
            verdict = %result.overall_judgment,
            confidence = result.confidence,
            reps = result.rep_count,
            "Attempt judged"
        );

        Ok(result)
    }

    fn model_name(&self) -> String {
        self.client.model_name()
    }

    async fn close(&self) {
        self.client.close().await;
    }
}
