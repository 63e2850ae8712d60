//! Input validation errors shared by every RepX component

use thiserror::Error;

/// Errors raised when a caller supplies an unusable judging request
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("Invalid discipline: {0}. Must be one of: pull_up, dip, squat")]
    UnknownDiscipline(String),

    #[error("Invalid camera angle: {0}. Must be one of: front, side, parallel, auto")]
    UnknownCameraAngle(String),

    #[error("Either video_path or video_bytes must be provided")]
    MissingVideo,

    #[error("Only one of video_path or video_bytes may be provided")]
    ConflictingVideoSources,
}
