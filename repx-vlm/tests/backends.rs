//! Integration tests for the model backends.
//!
//! Uses wiremock to stand in for vLLM, OpenAI and Gemini servers and checks
//! the request shape each one expects plus status/envelope error mapping.

use repx_core::domain::Frame;
use repx_vlm::{
    BackendOptions, GeminiClient, OpenAiClient, ProviderError, VlmBackend, VlmClient, VllmClient,
    create_client,
};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn frames() -> Vec<Frame> {
    (0..3)
        .map(|i| Frame {
            index: i * 10,
            timestamp_ms: i as f64 * 333.3,
            image_base64: format!("ZnJhbWU{i}"),
            width: 640,
            height: 360,
        })
        .collect()
}

fn chat_reply(text: &str) -> serde_json::Value {
    json!({
        "id": "chatcmpl-1",
        "choices": [{ "index": 0, "message": { "role": "assistant", "content": text } }]
    })
}

#[tokio::test]
async fn test_vllm_sends_openai_compatible_request() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(body_partial_json(json!({
            "model": "Qwen/Qwen2-VL-7B-Instruct",
            "max_tokens": 2048,
            "messages": [{ "role": "system", "content": "sys" }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_reply("{\"overall_judgment\":\"VALID\"}")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = VllmClient::new(mock_server.uri(), "Qwen/Qwen2-VL-7B-Instruct", None);
    let answer = client
        .analyze_frames(&frames(), "judge", Some("sys"))
        .await
        .expect("request failed");

    assert_eq!(answer, "{\"overall_judgment\":\"VALID\"}");
}

#[tokio::test]
async fn test_vllm_forwards_optional_bearer() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer local-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_reply("ok")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_client(
        VlmBackend::VllmLlava,
        BackendOptions {
            base_url: Some(format!("{}/", mock_server.uri())),
            api_key: Some("local-token".to_string()),
            model: None,
        },
    )
    .expect("client");

    let answer = client.analyze_frames(&frames(), "judge", None).await.expect("request failed");
    assert_eq!(answer, "ok");
}

#[tokio::test]
async fn test_openai_uses_bearer_and_high_detail() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .and(body_partial_json(json!({ "model": "gpt-4o" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_reply("verdict")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = OpenAiClient::with_base_url(mock_server.uri(), "sk-test", "gpt-4o");
    let answer = client.analyze_frames(&frames(), "judge", None).await.expect("request failed");
    assert_eq!(answer, "verdict");

    let requests = mock_server.received_requests().await.expect("recording enabled");
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    let parts = body["messages"][0]["content"].as_array().unwrap();
    assert_eq!(parts.len(), 4);
    assert!(parts[..3].iter().all(|p| p["image_url"]["detail"] == "high"));
    assert_eq!(parts[0]["image_url"]["url"], "data:image/jpeg;base64,ZnJhbWU0");
}

#[tokio::test]
async fn test_gemini_passes_key_as_query_param() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-1.5-pro:generateContent"))
        .and(query_param("key", "g-key"))
        .and(body_partial_json(json!({
            "generationConfig": { "temperature": 0.1, "maxOutputTokens": 2048 }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{ "content": { "parts": [{ "text": "gemini verdict" }] } }]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = GeminiClient::with_base_url(mock_server.uri(), "g-key", "gemini-1.5-pro");
    let answer = client
        .analyze_frames(&frames(), "judge", Some("sys"))
        .await
        .expect("request failed");

    assert_eq!(answer, "gemini verdict");
}

#[tokio::test]
async fn test_non_success_status_maps_to_api_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(503).set_body_string("model is loading"))
        .mount(&mock_server)
        .await;

    let client = VllmClient::new(mock_server.uri(), "llava-hf/llava-1.5-7b-hf", None);
    let result = client.analyze_frames(&frames(), "judge", None).await;

    match result {
        Err(ProviderError::ApiError { status, message }) => {
            assert_eq!(status, 503);
            assert_eq!(message, "model is loading");
        }
        other => panic!("expected ApiError, got {other:?}"),
    }
}

#[tokio::test]
async fn test_missing_choices_is_malformed_response() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
        .mount(&mock_server)
        .await;

    let client = OpenAiClient::with_base_url(mock_server.uri(), "sk-test", "gpt-4o");
    let result = client.analyze_frames(&frames(), "judge", None).await;

    assert!(matches!(result, Err(ProviderError::MalformedResponse(_))));
}

#[tokio::test]
async fn test_gemini_non_json_body_is_malformed_response() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-1.5-pro:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&mock_server)
        .await;

    let client = GeminiClient::with_base_url(mock_server.uri(), "g-key", "gemini-1.5-pro");
    let result = client.analyze_frames(&frames(), "judge", None).await;

    assert!(matches!(result, Err(ProviderError::MalformedResponse(_))));
}

#[tokio::test]
async fn test_client_works_again_after_close() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_reply("again")))
        .expect(2)
        .mount(&mock_server)
        .await;

    let client = VllmClient::new(mock_server.uri(), "llava-hf/llava-1.5-7b-hf", None);
    client.analyze_frames(&frames(), "judge", None).await.expect("first call");
    client.close().await;
    let answer = client.analyze_frames(&frames(), "judge", None).await.expect("second call");

    assert_eq!(answer, "again");
}
