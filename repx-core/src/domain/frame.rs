//! Sampled video frame

use serde::{Deserialize, Serialize};

/// One still image sampled from a video, ready to send to a model backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    /// Ordinal index within the source video
    pub index: u64,
    pub timestamp_ms: f64,
    /// Base64 encoded JPEG
    pub image_base64: String,
    pub width: u32,
    pub height: u32,
}

impl Frame {
    /// Data URL form used by OpenAI-compatible chat APIs
    pub fn data_url(&self) -> String {
        format!("data:image/jpeg;base64,{}", self.image_base64)
    }
}
