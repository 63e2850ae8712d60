//! Hosted OpenAI backend

use async_trait::async_trait;
use tracing::debug;

use repx_core::domain::Frame;

use crate::VlmClient;
use crate::chat;
use crate::error::Result;
use crate::http::LazyClient;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com";
pub const GPT4V_MODEL: &str = "gpt-4-vision-preview";
pub const GPT4O_MODEL: &str = "gpt-4o";

/// Client for OpenAI vision models; frames are sent at high detail
#[derive(Debug)]
pub struct OpenAiClient {
    base_url: String,
    model: String,
    api_key: String,
    http: LazyClient,
}

impl OpenAiClient {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self::with_base_url(DEFAULT_BASE_URL, api_key, model)
    }

    /// Points the client at an alternative host, e.g. a proxy or a test server
    pub fn with_base_url(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            api_key: api_key.into(),
            http: LazyClient::default(),
        }
    }
}

#[async_trait]
impl VlmClient for OpenAiClient {
    async fn analyze_frames(
        &self,
        frames: &[Frame],
        prompt: &str,
        system_prompt: Option<&str>,
    ) -> Result<String> {
        let client = self.http.get()?;
        let url = format!("{}/v1/chat/completions", self.base_url);
        let request = chat::build_request(&self.model, frames, prompt, system_prompt, Some("high"));

        debug!(model = %self.model, frames = frames.len(), "Sending frames to OpenAI");
        chat::complete(&client, &url, Some(&self.api_key), &request).await
    }

    fn model_name(&self) -> String {
        format!("OpenAI:{}", self.model)
    }

    async fn close(&self) {
        self.http.close();
    }
}
