//! OpenAI-compatible chat completions wire format
//!
//! Spoken by both the hosted OpenAI API and self-hosted vLLM servers.

use reqwest::Client;
use serde::{Deserialize, Serialize};

use repx_core::domain::Frame;

use crate::error::{ProviderError, Result};
use crate::http::handle_response;
use crate::{MAX_TOKENS, TEMPERATURE};

#[derive(Debug, Serialize)]
pub(crate) struct ChatRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
    pub temperature: f32,
}

#[derive(Debug, Serialize)]
pub(crate) struct ChatMessage {
    pub role: &'static str,
    pub content: MessageContent,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub(crate) enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub(crate) enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Serialize)]
pub(crate) struct ImageUrl {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<&'static str>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

/// Builds the request body: optional system message, then one user message
/// carrying every frame followed by the prompt text
pub(crate) fn build_request<'a>(
    model: &'a str,
    frames: &[Frame],
    prompt: &str,
    system_prompt: Option<&str>,
    image_detail: Option<&'static str>,
) -> ChatRequest<'a> {
    let mut parts: Vec<ContentPart> = frames
        .iter()
        .map(|frame| ContentPart::ImageUrl {
            image_url: ImageUrl {
                url: frame.data_url(),
                detail: image_detail,
            },
        })
        .collect();
    parts.push(ContentPart::Text {
        text: prompt.to_string(),
    });

    let mut messages = Vec::with_capacity(2);
    if let Some(system) = system_prompt {
        messages.push(ChatMessage {
            role: "system",
            content: MessageContent::Text(system.to_string()),
        });
    }
    messages.push(ChatMessage {
        role: "user",
        content: MessageContent::Parts(parts),
    });

    ChatRequest {
        model,
        messages,
        max_tokens: MAX_TOKENS,
        temperature: TEMPERATURE,
    }
}

/// POSTs a chat request and returns the first choice's text
pub(crate) async fn complete(
    client: &Client,
    url: &str,
    bearer: Option<&str>,
    request: &ChatRequest<'_>,
) -> Result<String> {
    let mut builder = client.post(url).json(request);
    if let Some(token) = bearer {
        builder = builder.bearer_auth(token);
    }

    let response: ChatResponse = handle_response(builder.send().await?).await?;

    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| ProviderError::MalformedResponse("no message content in choices".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(index: u64) -> Frame {
        Frame {
            index,
            timestamp_ms: 0.0,
            image_base64: "AAAA".to_string(),
            width: 2,
            height: 2,
        }
    }

    #[test]
    fn test_request_layout() {
        let request = build_request(
            "gpt-4o",
            &[frame(0), frame(5)],
            "judge this",
            Some("be strict"),
            Some("high"),
        );
        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(value["messages"][0]["role"], "system");
        assert_eq!(value["messages"][0]["content"], "be strict");

        let parts = value["messages"][1]["content"].as_array().unwrap();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0]["type"], "image_url");
        assert_eq!(parts[0]["image_url"]["url"], "data:image/jpeg;base64,AAAA");
        assert_eq!(parts[0]["image_url"]["detail"], "high");
        assert_eq!(parts[2]["type"], "text");
        assert_eq!(parts[2]["text"], "judge this");
        assert_eq!(value["max_tokens"], 2048);
    }

    #[test]
    fn test_request_without_system_prompt_or_detail() {
        let request = build_request("llava", &[frame(0)], "p", None, None);
        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(value["messages"].as_array().unwrap().len(), 1);
        assert!(value["messages"][0]["content"][0]["image_url"].get("detail").is_none());
    }
}
