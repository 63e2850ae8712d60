//! Service Module
//!
//! Business logic layer of the judging server.

pub mod job;
pub mod judgment;

// Re-export for convenience
pub use job as job_service;
pub use judgment as judgment_service;
