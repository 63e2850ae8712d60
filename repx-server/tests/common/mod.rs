//! Shared helpers for router tests.

#![allow(dead_code)]

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response};
use http_body_util::BodyExt;
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

use repx_core::domain::{OverallJudgment, VideoJudgmentResult};
use repx_judge::error::{ExtractionError, JudgeError};
use repx_judge::{AnalyzeRequest, FfmpegSampler, Judge, JudgeConfig, VideoJudge};
use repx_server::{AppState, ServerConfig, api};
use repx_vlm::{ProviderError, VlmBackend, create_client};

pub const BOUNDARY: &str = "repx-test-boundary";

/// How the fake judge answers
#[derive(Clone, Copy)]
pub enum Verdict {
    Valid(f64),
    ProviderDown,
    Undecodable,
}

/// Judge answering a fixed verdict and remembering the last request
pub struct FakeJudge {
    pub verdict: Verdict,
    pub last_request: Mutex<Option<AnalyzeRequest>>,
}

#[async_trait]
impl VideoJudge for FakeJudge {
    async fn analyze(&self, request: &AnalyzeRequest) -> repx_judge::error::Result<VideoJudgmentResult> {
        *self.last_request.lock().unwrap() = Some(request.clone());

        match self.verdict {
            Verdict::Valid(confidence) => {
                let mut result =
                    VideoJudgmentResult::degraded(request.discipline, "", "", "{}", "Fake:model");
                result.is_valid = true;
                result.overall_judgment = OverallJudgment::Valid;
                result.confidence = confidence;
                result.rep_count = 1;
                result.invalid_reasons.clear();
                result.frame_analysis.clear();
                Ok(result)
            }
            Verdict::ProviderDown => Err(JudgeError::Provider(ProviderError::api_error(
                503,
                "upstream secret: gpu-node-7 overloaded",
            ))),
            Verdict::Undecodable => Err(JudgeError::Extraction(ExtractionError::NoFrames(
                "upload.mp4".to_string(),
            ))),
        }
    }

    fn model_name(&self) -> String {
        "Fake:model".to_string()
    }
}

pub fn test_config() -> ServerConfig {
    ServerConfig {
        judge: JudgeConfig::new(VlmBackend::VllmLlava),
        ..Default::default()
    }
}

pub fn build_app(verdict: Verdict) -> (Router, Arc<FakeJudge>) {
    build_app_with(test_config(), verdict)
}

pub fn build_app_with(config: ServerConfig, verdict: Verdict) -> (Router, Arc<FakeJudge>) {
    let judge = Arc::new(FakeJudge {
        verdict,
        last_request: Mutex::new(None),
    });
    let state = AppState::new(config, judge.clone());
    (api::create_router(state), judge)
}

/// Router over a real judge whose ffmpeg/ffprobe binaries do not exist
pub fn build_app_without_ffmpeg() -> Router {
    let config = test_config();
    let client = create_client(config.judge.backend, config.judge.backend_options()).unwrap();
    let sampler = FfmpegSampler::new(config.judge.sampling)
        .with_binaries("/nonexistent/ffmpeg", "/nonexistent/ffprobe");
    let judge = Judge::with_components(config.judge.clone(), Box::new(sampler), client);

    api::create_router(AppState::new(config, Arc::new(judge)))
}

/// Multipart form builder
#[derive(Default)]
pub struct Form {
    parts: Vec<(String, Option<String>, Vec<u8>)>,
}

impl Form {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn file(mut self, name: &str, file_name: &str, content: &[u8]) -> Self {
        self.parts
            .push((name.to_string(), Some(file_name.to_string()), content.to_vec()));
        self
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.parts
            .push((name.to_string(), None, value.as_bytes().to_vec()));
        self
    }

    fn into_body(self) -> Vec<u8> {
        let mut body = Vec::new();
        for (name, file_name, content) in self.parts {
            body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
            let disposition = match file_name {
                Some(file_name) => format!(
                    "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n\
                     Content-Type: video/mp4\r\n\r\n",
                    name, file_name
                ),
                None => format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name),
            };
            body.extend_from_slice(disposition.as_bytes());
            body.extend_from_slice(&content);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
        body
    }
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_multipart(app: Router, uri: &str, form: Form) -> Response<Body> {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(form.into_body()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}
