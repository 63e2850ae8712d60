//! Backend selection and the client factory

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::info;

use crate::error::ConfigError;
use crate::gemini::{self, GeminiClient};
use crate::openai::{self, OpenAiClient};
use crate::vllm::{self, VllmClient};
use crate::VlmClient;

/// Supported model backends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VlmBackend {
    VllmLlava,
    VllmQwen,
    OpenaiGpt4v,
    OpenaiGpt4o,
    GeminiPro,
}

impl VlmBackend {
    pub const ALL: [VlmBackend; 5] = [
        VlmBackend::VllmLlava,
        VlmBackend::VllmQwen,
        VlmBackend::OpenaiGpt4v,
        VlmBackend::OpenaiGpt4o,
        VlmBackend::GeminiPro,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            VlmBackend::VllmLlava => "vllm_llava",
            VlmBackend::VllmQwen => "vllm_qwen",
            VlmBackend::OpenaiGpt4v => "openai_gpt4v",
            VlmBackend::OpenaiGpt4o => "openai_gpt4o",
            VlmBackend::GeminiPro => "gemini_pro",
        }
    }

    /// Model used when the caller does not name one
    pub fn default_model(&self) -> &'static str {
        match self {
            VlmBackend::VllmLlava => vllm::LLAVA_MODEL,
            VlmBackend::VllmQwen => vllm::QWEN_MODEL,
            VlmBackend::OpenaiGpt4v => openai::GPT4V_MODEL,
            VlmBackend::OpenaiGpt4o => openai::GPT4O_MODEL,
            VlmBackend::GeminiPro => gemini::DEFAULT_MODEL,
        }
    }

    pub fn requires_api_key(&self) -> bool {
        !self.is_self_hosted()
    }

    pub fn is_self_hosted(&self) -> bool {
        matches!(self, VlmBackend::VllmLlava | VlmBackend::VllmQwen)
    }
}

impl fmt::Display for VlmBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VlmBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim().to_lowercase();
        VlmBackend::ALL
            .into_iter()
            .find(|backend| backend.as_str() == tag)
            .ok_or_else(|| ConfigError::UnknownBackend(s.trim().to_string()))
    }
}

/// Optional overrides applied when building a client
#[derive(Debug, Clone, Default)]
pub struct BackendOptions {
    /// Host of the backend; defaults per backend
    pub base_url: Option<String>,
    pub api_key: Option<String>,
    pub model: Option<String>,
}

/// Builds the client for a backend
///
/// Fails when a hosted backend is selected without an API key.
pub fn create_client(
    backend: VlmBackend,
    options: BackendOptions,
) -> Result<Box<dyn VlmClient>, ConfigError> {
    let BackendOptions {
        base_url,
        api_key,
        model,
    } = options;
    let api_key = api_key.filter(|key| !key.trim().is_empty());
    let model = model.unwrap_or_else(|| backend.default_model().to_string());

    let client: Box<dyn VlmClient> = match backend {
        VlmBackend::VllmLlava | VlmBackend::VllmQwen => Box::new(VllmClient::new(
            base_url.unwrap_or_else(|| vllm::DEFAULT_BASE_URL.to_string()),
            model,
            api_key,
        )),
        VlmBackend::OpenaiGpt4v | VlmBackend::OpenaiGpt4o => {
            let api_key = api_key.ok_or_else(|| missing_key(backend))?;
            Box::new(OpenAiClient::with_base_url(
                base_url.unwrap_or_else(|| openai::DEFAULT_BASE_URL.to_string()),
                api_key,
                model,
            ))
        }
        VlmBackend::GeminiPro => {
            let api_key = api_key.ok_or_else(|| missing_key(backend))?;
            Box::new(GeminiClient::with_base_url(
                base_url.unwrap_or_else(|| gemini::DEFAULT_BASE_URL.to_string()),
                api_key,
                model,
            ))
        }
    };

    info!(backend = %backend, model = %client.model_name(), "Created VLM client");
    Ok(client)
}

fn missing_key(backend: VlmBackend) -> ConfigError {
    ConfigError::MissingApiKey {
        backend: backend.as_str().to_string(),
    }
}
