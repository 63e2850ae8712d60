//! Error types for the judging pipeline

use thiserror::Error;

use repx_core::InputError;
use repx_vlm::ProviderError;

/// Failure to turn a video into frames
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("ffprobe/ffmpeg binary not found: {0}")]
    ToolNotFound(std::io::Error),

    #[error("ffprobe/ffmpeg execution failed (exit code {exit_code:?}): {stderr}")]
    ExecutionFailed {
        exit_code: Option<i32>,
        stderr: String,
    },

    #[error("Cannot open video file: {0}")]
    VideoNotFound(String),

    #[error("Failed to parse ffprobe output: {0}")]
    Probe(String),

    #[error("No video stream in {0}")]
    NoVideoStream(String),

    #[error("No frames could be decoded from {0}")]
    NoFrames(String),

    #[error("Failed to decode frame: {0}")]
    Decode(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ExtractionError {
    /// True when the video itself could not be opened or decoded
    ///
    /// A missing tool or a failed temp-file write is a server fault.
    pub fn is_undecodable(&self) -> bool {
        !matches!(self, ExtractionError::ToolNotFound(_) | ExtractionError::Io(_))
    }
}

/// Errors surfaced by [`crate::Judge::analyze`]
///
/// Unparseable model output is not an error; it degrades to a result.
#[derive(Debug, Error)]
pub enum JudgeError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error("Frame extraction failed: {0}")]
    Extraction(#[from] ExtractionError),

    #[error("Model backend failed: {0}")]
    Provider(#[from] ProviderError),
}

impl JudgeError {
    /// True when the caller sent something unusable (HTTP 400 territory)
    pub fn is_client_error(&self) -> bool {
        match self {
            JudgeError::Input(_) => true,
            JudgeError::Extraction(e) => e.is_undecodable(),
            JudgeError::Provider(_) => false,
        }
    }

    /// Message safe to hand back to a caller
    ///
    /// Input errors are reported as-is; everything else is summarized since
    /// it may carry file paths, tool output or backend responses.
    pub fn summary(&self) -> String {
        match self {
            JudgeError::Input(e) => e.to_string(),
            e if e.is_client_error() => UNDECODABLE_VIDEO.to_string(),
            _ => PROCESSING_FAILED.to_string(),
        }
    }
}

pub const UNDECODABLE_VIDEO: &str = "Could not decode video";
pub const PROCESSING_FAILED: &str = "Error processing video";

pub type Result<T> = std::result::Result<T, JudgeError>;
