//! Local judging command
//!
//! Runs the full pipeline in-process: sampling, prompting, the model call and
//! parsing, with retries.

use anyhow::{Context, Result};
use clap::{ArgAction, Args};
use colored::*;
use std::path::PathBuf;
use uuid::Uuid;

use repx_core::domain::{CameraAngle, Discipline};
use repx_core::dto::judgment::JudgmentResponse;
use repx_judge::{AnalyzeRequest, Judge, JudgeConfig, SamplingPolicy, VideoJudge, VideoSource};
use repx_vlm::VlmBackend;

use crate::output::print_judgment;

/// Arguments of `repx judge`
#[derive(Args, Debug)]
pub struct JudgeArgs {
    /// Video file
    pub video: PathBuf,

    /// Discipline: pull_up, dip or squat
    #[arg(short, long)]
    pub discipline: Discipline,

    /// Camera angle: front, side, parallel or auto
    #[arg(long, default_value = "auto")]
    pub camera_angle: CameraAngle,

    /// Second camera angle (parallel to the bar for pull-ups)
    #[arg(long)]
    pub secondary: Option<PathBuf>,

    /// Additional context for the judge
    #[arg(long)]
    pub context: Option<String>,

    /// Retries after a failed attempt
    #[arg(long, default_value_t = 2)]
    pub retries: u32,

    /// Model backend
    #[arg(long, env = "VLM_BACKEND", default_value = "openai_gpt4o")]
    pub backend: VlmBackend,

    /// API key of a hosted backend (falls back to OPENAI_API_KEY / GOOGLE_API_KEY)
    #[arg(long, env = "VLM_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Base URL of a self-hosted backend
    #[arg(long, env = "VLLM_BASE_URL")]
    pub base_url: Option<String>,

    /// Model override
    #[arg(long, env = "VLM_MODEL")]
    pub model: Option<String>,

    /// Number of frames sampled from the video
    #[arg(long, env = "VLM_NUM_FRAMES", default_value_t = 16)]
    pub frames: usize,

    /// Sample around the lift's key moments instead of uniformly
    #[arg(long)]
    pub key_moments: bool,

    /// Results below this confidence are flagged for review
    #[arg(long, env = "VLM_CONFIDENCE_THRESHOLD", default_value_t = 0.7)]
    pub confidence_threshold: f64,

    /// Count uncertain criteria as failed
    #[arg(long, env = "VLM_STRICT_MODE", default_value_t = true, action = ArgAction::Set)]
    pub strict_mode: bool,

    /// Print the judgment as JSON
    #[arg(long)]
    pub json: bool,
}

impl JudgeArgs {
    /// Builds and validates the judge configuration
    pub fn judge_config(&self) -> Result<JudgeConfig> {
        let mut config = JudgeConfig::new(self.backend);

        let fallback_key = match self.backend {
            VlmBackend::GeminiPro => "GOOGLE_API_KEY",
            _ => "OPENAI_API_KEY",
        };
        config.api_key = self
            .api_key
            .clone()
            .or_else(|| std::env::var(fallback_key).ok())
            .filter(|k| !k.trim().is_empty());

        if self.backend.is_self_hosted() {
            config.base_url = self.base_url.clone();
        }
        config.model = self.model.clone();
        config.num_frames = self.frames;
        config.confidence_threshold = self.confidence_threshold;
        config.strict_mode = self.strict_mode;
        config.sampling = if self.key_moments {
            SamplingPolicy::KeyMoments
        } else {
            SamplingPolicy::Uniform
        };

        config.validate()?;
        Ok(config)
    }

    fn request(&self) -> AnalyzeRequest {
        let mut request = AnalyzeRequest::from_path(self.discipline, self.video.clone())
            .with_camera_angle(self.camera_angle);
        if let Some(secondary) = &self.secondary {
            request = request.with_secondary_video(VideoSource::Path(secondary.clone()));
        }
        if let Some(context) = &self.context {
            request = request.with_additional_context(context.clone());
        }
        request
    }
}

/// Judge a video locally
pub async fn handle_judge_command(args: JudgeArgs) -> Result<()> {
    for path in std::iter::once(&args.video).chain(args.secondary.as_ref()) {
        if !path.is_file() {
            anyhow::bail!("Video not found: {}", path.display());
        }
    }

    let config = args.judge_config()?;
    let judge = Judge::new(config.clone()).context("Failed to create judge")?;

    if !args.json {
        println!(
            "{}",
            format!(
                "Judging {} with {} ({} frames)...",
                args.discipline.display_name(),
                judge.model_name(),
                config.num_frames
            )
            .dimmed()
        );
    }

    let result = judge.analyze_with_retry(&args.request(), args.retries).await;
    judge.close().await;

    let response = JudgmentResponse::from_result(
        Uuid::new_v4(),
        &result,
        chrono::Utc::now(),
        config.confidence_threshold,
    );

    if args.json {
        println!("{}", serde_json::to_string_pretty(&response)?);
    } else {
        print_judgment(&response);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        args: JudgeArgs,
    }

    fn parse(argv: &[&str]) -> JudgeArgs {
        let argv = std::iter::once("repx-judge").chain(argv.iter().copied());
        TestCli::try_parse_from(argv).unwrap().args
    }

    #[test]
    fn test_self_hosted_config() {
        let args = parse(&[
            "attempt.mp4",
            "--discipline",
            "squat",
            "--backend",
            "vllm_qwen",
            "--base-url",
            "http://gpu-box:8000",
            "--frames",
            "8",
            "--key-moments",
            "--strict-mode",
            "false",
        ]);

        assert_eq!(args.discipline, Discipline::Squat);
        assert_eq!(args.camera_angle, CameraAngle::Auto);
        assert_eq!(args.retries, 2);

        let config = args.judge_config().unwrap();
        assert_eq!(config.backend, VlmBackend::VllmQwen);
        assert_eq!(config.base_url.as_deref(), Some("http://gpu-box:8000"));
        assert_eq!(config.num_frames, 8);
        assert_eq!(config.sampling, SamplingPolicy::KeyMoments);
        assert!(!config.strict_mode);
    }

    #[test]
    fn test_request_carries_secondary_and_context() {
        let args = parse(&[
            "front.mp4",
            "-d",
            "pull_up",
            "--camera-angle",
            "front",
            "--secondary",
            "side.mp4",
            "--context",
            "Third attempt",
        ]);

        let request = args.request();
        assert_eq!(request.camera_angle, CameraAngle::Front);
        assert!(matches!(
            request.secondary_video,
            Some(VideoSource::Path(ref p)) if p.ends_with("side.mp4")
        ));
        assert_eq!(request.additional_context.as_deref(), Some("Third attempt"));
    }

    #[test]
    fn test_unknown_values_are_rejected() {
        let argv = ["repx-judge", "a.mp4", "-d", "deadlift"];
        assert!(TestCli::try_parse_from(argv).is_err());

        let argv = ["repx-judge", "a.mp4", "-d", "dip", "--camera-angle", "overhead"];
        assert!(TestCli::try_parse_from(argv).is_err());

        let argv = ["repx-judge", "a.mp4", "-d", "dip", "--backend", "claude"];
        assert!(TestCli::try_parse_from(argv).is_err());
    }

    #[test]
    fn test_zero_frames_fails_validation() {
        let args = parse(&[
            "a.mp4",
            "-d",
            "dip",
            "--backend",
            "vllm_llava",
            "--frames",
            "0",
        ]);
        assert!(args.judge_config().is_err());
    }
}
