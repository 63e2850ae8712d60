//! Self-hosted vLLM backend

use async_trait::async_trait;
use tracing::debug;

use repx_core::domain::Frame;

use crate::VlmClient;
use crate::chat;
use crate::error::Result;
use crate::http::LazyClient;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
pub const LLAVA_MODEL: &str = "llava-hf/llava-1.5-7b-hf";
pub const QWEN_MODEL: &str = "Qwen/Qwen2-VL-7B-Instruct";

/// Client for vision models served through vLLM's OpenAI-compatible API
#[derive(Debug)]
pub struct VllmClient {
    base_url: String,
    model: String,
    api_key: Option<String>,
    http: LazyClient,
}

impl VllmClient {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            api_key,
            http: LazyClient::default(),
        }
    }
}

#[async_trait]
impl VlmClient for VllmClient {
    async fn analyze_frames(
        &self,
        frames: &[Frame],
        prompt: &str,
        system_prompt: Option<&str>,
    ) -> Result<String> {
        let client = self.http.get()?;
        let url = format!("{}/v1/chat/completions", self.base_url);
        let request = chat::build_request(&self.model, frames, prompt, system_prompt, None);

        debug!(model = %self.model, frames = frames.len(), "Sending frames to vLLM");
        chat::complete(&client, &url, self.api_key.as_deref(), &request).await
    }

    fn model_name(&self) -> String {
        format!("vLLM:{}", self.model)
    }

    async fn close(&self) {
        self.http.close();
    }
}
