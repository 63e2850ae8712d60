//! RepX video judge
//!
//! The judging pipeline: sample frames from a video, build a
//! discipline-specific prompt, ask a vision model, and parse its answer into a
//! structured, confidence-scored judgment.
//!
//! # Example
//!
//! ```no_run
//! use repx_core::domain::Discipline;
//! use repx_judge::{AnalyzeRequest, Judge, JudgeConfig, VideoJudge};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let judge = Judge::new(JudgeConfig::from_env()?)?;
//! let request = AnalyzeRequest::from_path(Discipline::PullUp, "attempt.mp4");
//!
//! let result = judge.analyze_with_retry(&request, 2).await;
//! println!("{} ({:.0}%)", result.overall_judgment, result.confidence * 100.0);
//! judge.close().await;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod judge;
pub mod parser;
pub mod prompt;
pub mod sampler;

pub use config::JudgeConfig;
pub use error::{ExtractionError, JudgeError};
pub use judge::{AnalyzeRequest, Judge, VideoJudge};
pub use sampler::{FfmpegSampler, FrameSampler, SamplingPolicy, VideoSource};
