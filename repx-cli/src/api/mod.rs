//! API client module
//!
//! HTTP client for the asynchronous endpoints of a RepX judging server.

use anyhow::{Context, Result};
use reqwest::Client;
use reqwest::multipart::{Form, Part};
use std::path::Path;

use repx_core::domain::{CameraAngle, Discipline};
use repx_core::dto::job::{JudgmentStatusResponse, SubmittedJobResponse};

/// HTTP client for the judging server API
pub struct ApiClient {
    base_url: String,
    client: Client,
}

impl ApiClient {
    /// Create a new API client
    ///
    /// # Arguments
    /// * `base_url` - The base URL of the judging server
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }

    /// Upload a video for asynchronous judging
    ///
    /// # Arguments
    /// * `video` - Path of the video file
    /// * `discipline` - Discipline being judged
    /// * `camera_angle` - Camera placement, `auto` lets the server choose
    /// * `additional_context` - Free text appended to the prompt
    ///
    /// # Returns
    /// The pending judgment acknowledgement
    pub async fn submit(
        &self,
        video: &Path,
        discipline: Discipline,
        camera_angle: CameraAngle,
        additional_context: Option<&str>,
    ) -> Result<SubmittedJobResponse> {
        let bytes = tokio::fs::read(video)
            .await
            .with_context(|| format!("Failed to read video {}", video.display()))?;

        let file_name = video
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("video.mp4")
            .to_string();

        let mut form = Form::new()
            .part("video", Part::bytes(bytes).file_name(file_name))
            .text("discipline", discipline.as_str())
            .text("camera_angle", camera_angle.as_str());
        if let Some(context) = additional_context {
            form = form.text("additional_context", context.to_string());
        }

        let url = format!("{}/video-judge/analyze-async", self.base_url);
        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .context("Failed to send submit request")?;

        self.handle_response(response).await
    }

    /// Get the state of an async judgment
    ///
    /// # Arguments
    /// * `judgment_id` - The ID returned on submission
    ///
    /// # Returns
    /// The judgment status, with the result once completed
    pub async fn get_status(&self, judgment_id: &str) -> Result<JudgmentStatusResponse> {
        let url = format!("{}/video-judge/status/{}", self.base_url, judgment_id);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .context("Failed to send status request")?;

        self.handle_response(response).await
    }

    /// Handle API response and deserialize JSON
    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T> {
        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<serde_json::Value>(&error_text)
                .ok()
                .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_string))
                .unwrap_or(error_text);
            anyhow::bail!("Request failed with status {}: {}", status, message);
        }

        response
            .json()
            .await
            .context("Failed to parse response JSON")
    }
}
