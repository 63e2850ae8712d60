//! Core domain types
//!
//! These types represent the fundamental entities of the judging pipeline and
//! are shared between the judge library (which produces them), the server
//! (which tracks them) and the CLI (which displays them).

pub mod discipline;
pub mod frame;
pub mod job;
pub mod judgment;

pub use discipline::{CameraAngle, Discipline};
pub use frame::Frame;
pub use job::{Job, JobOutcome, JobStatus};
pub use judgment::{CriterionStatus, JudgmentDetail, OverallJudgment, VideoJudgmentResult};
