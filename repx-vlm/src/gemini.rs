//! Google Gemini backend
//!
//! Gemini has no system role in `generateContent`; the system prompt is sent
//! as the leading text part instead.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use repx_core::domain::Frame;

use crate::error::{ProviderError, Result};
use crate::http::{LazyClient, handle_response};
use crate::{MAX_TOKENS, TEMPERATURE, VlmClient};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-1.5-pro";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Part {
    Text { text: String },
    Image { inline_data: InlineData },
}

#[derive(Debug, Serialize)]
struct InlineData {
    mime_type: &'static str,
    data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

/// Client for Gemini vision models
#[derive(Debug)]
pub struct GeminiClient {
    base_url: String,
    model: String,
    api_key: String,
    http: LazyClient,
}

impl GeminiClient {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self::with_base_url(DEFAULT_BASE_URL, api_key, model)
    }

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

fn build_request(frames: &[Frame], prompt: &str, system_prompt: Option<&str>) -> GenerateRequest {
    let mut parts = Vec::with_capacity(frames.len() + 2);

    if let Some(system) = system_prompt {
        parts.push(Part::Text {
            text: format!("{system}\n\n"),
        });
    }
    parts.extend(frames.iter().map(|frame| Part::Image {
        inline_data: InlineData {
            mime_type: "image/jpeg",
            data: frame.image_base64.clone(),
        },
    }));
    parts.push(Part::Text {
        text: prompt.to_string(),
    });

    GenerateRequest {
        contents: vec![Content { parts }],
        generation_config: GenerationConfig {
            temperature: TEMPERATURE,
            max_output_tokens: MAX_TOKENS,
        },
    }
}

#[async_trait]
impl VlmClient for GeminiClient {
    async fn analyze_frames(
        &self,
        frames: &[Frame],
        prompt: &str,
        system_prompt: Option<&str>,
    ) -> Result<String> {
        let client = self.http.get()?;
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );
        let request = build_request(frames, prompt, system_prompt);

        debug!(model = %self.model, frames = frames.len(), "Sending frames to Gemini");
        let response = client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&request)
            .send()
            .await?;
        let response: GenerateResponse = handle_response(response).await?;

        response
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content.parts.into_iter().next())
            .and_then(|part| part.text)
            .ok_or_else(|| ProviderError::MalformedResponse("no text in candidates".to_string()))
    }

    fn model_name(&self) -> String {
        format!("Gemini:{}", self.model)
    }

    async fn close(&self) {
        self.http.close();
    }
}
