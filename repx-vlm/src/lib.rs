//! RepX vision-language model backends
//!
//! A uniform interface over the vision models that judge lift attempts. Every
//! backend takes an ordered set of frames plus a prompt and returns the
//! model's raw text answer.
//!
//! # Example
//!
//! ```no_run
//! use repx_vlm::{BackendOptions, VlmBackend, create_client};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = create_client(
//!     VlmBackend::VllmQwen,
//!     BackendOptions {
//!         base_url: Some("http://gpu-box:8000".to_string()),
//!         ..Default::default()
//!     },
//! )?;
//!
//! let answer = client.analyze_frames(&[], "Describe the lift", None).await?;
//! println!("{} said: {}", client.model_name(), answer);
//! client.close().await;
//! # Ok(())
//! # }
//! ```

pub mod backend;
mod chat;
pub mod error;
pub mod gemini;
mod http;
pub mod openai;
pub mod vllm;

pub use backend::{BackendOptions, VlmBackend, create_client};
pub use error::{ConfigError, ProviderError, Result};
pub use gemini::GeminiClient;
pub use openai::OpenAiClient;
pub use vllm::VllmClient;

use async_trait::async_trait;
use repx_core::domain::Frame;
use std::time::Duration;

/// Sampling temperature sent to every backend; low for consistent verdicts
pub const TEMPERATURE: f32 = 0.1;
pub const MAX_TOKENS: u32 = 2048;
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// A vision-language model that can judge a sequence of frames
#[async_trait]
pub trait VlmClient: Send + Sync {
    /// Sends the frames (in order) followed by the prompt, returning the raw answer
    async fn analyze_frames(
        &self,
        frames: &[Frame],
        prompt: &str,
        system_prompt: Option<&str>,
    ) -> Result<String>;

    /// Identifier recorded in judgments, e.g. `OpenAI:gpt-4o`
    fn model_name(&self) -> String;

    /// Drops the connection pool; the next call opens a new one
    async fn close(&self);
}
