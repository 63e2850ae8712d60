//! Data Transfer Objects for the judging API
//!
//! Wire shapes shared by the HTTP server and the command-line client. DTOs are
//! flattened views of domain values, tuned for JSON transfer.

pub mod job;
pub mod judgment;
pub mod regulations;
