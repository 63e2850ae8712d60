//! RepX judging server
//!
//! HTTP front of the video judge: synchronous and asynchronous analysis,
//! job status, and the static regulation reference.

pub mod api;
pub mod config;
pub mod repository;
pub mod service;
pub mod state;

pub use config::ServerConfig;
pub use state::AppState;
