//! Repository Module
//!
//! Storage layer for the judging server.

pub mod job_store;

pub use job_store::{InMemoryJobStore, JobStore, JobUpdate, StoreError};
