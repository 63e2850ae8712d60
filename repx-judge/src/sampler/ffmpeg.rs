//! Frame sampling through the ffprobe/ffmpeg command-line tools
//!
//! `ffprobe` reports the frame count, rate and resolution; each selected
//! frame is then decoded by `ffmpeg` to a PNG on stdout and re-encoded as a
//! downscaled JPEG with the `image` crate.

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use serde::Deserialize;
use std::path::Path;
use tokio::process::Command;
use tracing::{debug, warn};

use repx_core::domain::Frame;

use super::{FrameSampler, SamplingPolicy, VideoSource};
use crate::error::ExtractionError;

/// Longest side of a frame sent to the model
pub const MAX_DIMENSION: u32 = 1024;
pub const JPEG_QUALITY: u8 = 85;

// ---------------------------------------------------------------------------
// ffprobe JSON output structures
// ---------------------------------------------------------------------------

/// Subset of `ffprobe -print_format json -show_format -show_streams`
#[derive(Debug, Deserialize)]
pub struct FfprobeOutput {
    #[serde(default)]
    pub streams: Vec<FfprobeStream>,
    pub format: Option<FfprobeFormat>,
}

#[derive(Debug, Deserialize)]
pub struct FfprobeStream {
    pub codec_type: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    /// e.g. "30/1" or "24000/1001"
    pub r_frame_rate: Option<String>,
    pub duration: Option<String>,
    pub nb_frames: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct FfprobeFormat {
    pub duration: Option<String>,
}

/// What the sampler needs to know about a video
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VideoInfo {
    pub total_frames: u64,
    pub fps: f64,
    pub width: u32,
    pub height: u32,
}

impl VideoInfo {
    pub fn from_probe(probe: &FfprobeOutput) -> Option<Self> {
        let stream = probe
            .streams
            .iter()
            .find(|s| s.codec_type.as_deref() == Some("video"))?;

        let fps = stream.r_frame_rate.as_deref().map(parse_fraction).unwrap_or(0.0);

        let duration = stream
            .duration
            .as_deref()
            .or(probe.format.as_ref().and_then(|f| f.duration.as_deref()))
            .and_then(|d| d.parse::<f64>().ok())
            .unwrap_or(0.0);

        let total_frames = stream
            .nb_frames
            .as_deref()
            .and_then(|n| n.parse::<u64>().ok())
            .filter(|&n| n > 0)
            .unwrap_or_else(|| {
                if duration > 0.0 && fps > 0.0 {
                    (duration * fps).round() as u64
                } else {
                    0
                }
            });

        Some(Self {
            total_frames,
            fps,
            width: stream.width.unwrap_or(0),
            height: stream.height.unwrap_or(0),
        })
    }

    /// Capture time of a frame; zero when the rate is unknown
    pub fn timestamp_ms(&self, index: u64) -> f64 {
        if self.fps > 0.0 {
            index as f64 / self.fps * 1000.0
        } else {
            0.0
        }
    }
}

/// Parse a fraction string like `"30/1"` into a float
fn parse_fraction(s: &str) -> f64 {
    match s.split_once('/') {
        Some((num, den)) => {
            let num = num.parse::<f64>().unwrap_or(0.0);
            let den = den.parse::<f64>().unwrap_or(1.0);
            if den > 0.0 { num / den } else { 0.0 }
        }
        None => s.parse::<f64>().unwrap_or(0.0),
    }
}

/// Samples frames by shelling out to ffprobe and ffmpeg
#[derive(Debug, Clone)]
pub struct FfmpegSampler {
    policy: SamplingPolicy,
    ffmpeg: String,
    ffprobe: String,
}

impl FfmpegSampler {
    pub fn new(policy: SamplingPolicy) -> Self {
        Self {
            policy,
            ffmpeg: "ffmpeg".to_string(),
            ffprobe: "ffprobe".to_string(),
        }
    }

    /// Uses explicit binaries instead of the ones on `PATH`
    pub fn with_binaries(mut self, ffmpeg: impl Into<String>, ffprobe: impl Into<String>) -> Self {
        self.ffmpeg = ffmpeg.into();
        self.ffprobe = ffprobe.into();
        self
    }

    async fn probe(&self, path: &Path) -> Result<VideoInfo, ExtractionError> {
        let output = Command::new(&self.ffprobe)
            .args(["-v", "quiet", "-print_format", "json", "-show_format", "-show_streams"])
            .arg(path)
            .output()
            .await
            .map_err(ExtractionError::ToolNotFound)?;

        if !output.status.success() {
            return Err(ExtractionError::ExecutionFailed {
                exit_code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            });
        }

        let probe: FfprobeOutput = serde_json::from_slice(&output.stdout)
            .map_err(|e| ExtractionError::Probe(e.to_string()))?;

        VideoInfo::from_probe(&probe)
            .ok_or_else(|| ExtractionError::NoVideoStream(path.display().to_string()))
    }

    /// Decodes one frame to PNG bytes, or `None` if ffmpeg produced nothing
    async fn decode_png(&self, path: &Path, index: u64) -> Result<Option<Vec<u8>>, ExtractionError> {
        let select = format!("select=eq(n\\,{index})");
        let output = Command::new(&self.ffmpeg)
            .args(["-v", "error", "-i"])
            .arg(path)
            .args(["-vf", &select, "-vsync", "0", "-frames:v", "1"])
            .args(["-f", "image2pipe", "-vcodec", "png", "-"])
            .output()
            .await
            .map_err(ExtractionError::ToolNotFound)?;

        if !output.status.success() || output.stdout.is_empty() {
            warn!(
                index,
                stderr = %String::from_utf8_lossy(&output.stderr).trim(),
                "Skipping frame that could not be decoded"
            );
            return Ok(None);
        }

        Ok(Some(output.stdout))
    }

    async fn extract_from_bytes(
        &self,
        bytes: &[u8],
        target_count: usize,
        temp_dir: &Path,
    ) -> Result<Vec<Frame>, ExtractionError> {
        // Removed when `temp` drops, on every path out of this function
        let temp = tempfile::Builder::new()
            .prefix("repx-")
            .suffix(".mp4")
            .tempfile_in(temp_dir)?;
        tokio::fs::write(temp.path(), bytes).await?;

        self.extract_from_path(temp.path(), target_count).await
    }

    async fn extract_from_path(
        &self,
        path: &Path,
        target_count: usize,
    ) -> Result<Vec<Frame>, ExtractionError> {
        if !path.exists() {
            return Err(ExtractionError::VideoNotFound(path.display().to_string()));
        }

        let info = self.probe(path).await?;
        let indices = self.policy.indices(info.total_frames, target_count);
        debug!(
            path = %path.display(),
            total_frames = info.total_frames,
            fps = info.fps,
            selected = indices.len(),
            policy = %self.policy,
            "Sampling video frames"
        );

        let mut frames = Vec::with_capacity(indices.len());
        for index in indices {
            let Some(png) = self.decode_png(path, index).await? else {
                continue;
            };

            let encoded = tokio::task::spawn_blocking(move || encode_frame(&png))
                .await
                .map_err(|e| ExtractionError::Decode(e.to_string()))?;

            match encoded {
                Ok((image_base64, width, height)) => frames.push(Frame {
                    index,
                    timestamp_ms: info.timestamp_ms(index),
                    image_base64,
                    width,
                    height,
                }),
                Err(e) => warn!(index, error = %e, "Skipping frame that could not be re-encoded"),
            }
        }

        if frames.is_empty() {
            return Err(ExtractionError::NoFrames(path.display().to_string()));
        }

        Ok(frames)
    }
}

impl Default for FfmpegSampler {
    fn default() -> Self {
        Self::new(SamplingPolicy::default())
    }
}

#[async_trait]
impl FrameSampler for FfmpegSampler {
    async fn extract(
        &self,
        source: &VideoSource,
        target_count: usize,
    ) -> Result<Vec<Frame>, ExtractionError> {
        match source {
            VideoSource::Path(path) => self.extract_from_path(path, target_count).await,
            VideoSource::Bytes(bytes) => {
                self.extract_from_bytes(bytes, target_count, &std::env::temp_dir())
                    .await
            }
        }
    }
}

/// Downscales a decoded frame and re-encodes it as base64 JPEG
///
/// Returns the payload with its final width and height.
pub fn encode_frame(png: &[u8]) -> Result<(String, u32, u32), ExtractionError> {
    let decoded = image::load_from_memory_with_format(png, image::ImageFormat::Png)
        .map_err(|e| ExtractionError::Decode(e.to_string()))?;

    let longest = decoded.width().max(decoded.height());
    let resized = if longest > MAX_DIMENSION {
        let scale = MAX_DIMENSION as f64 / longest as f64;
        let width = ((decoded.width() as f64 * scale) as u32).max(1);
        let height = ((decoded.height() as f64 * scale) as u32).max(1);
        decoded.resize_exact(width, height, FilterType::Triangle)
    } else {
        decoded
    };

    let rgb = resized.to_rgb8();
    let mut jpeg = Vec::new();
    JpegEncoder::new_with_quality(&mut jpeg, JPEG_QUALITY)
        .encode_image(&rgb)
        .map_err(|e| ExtractionError::Decode(e.to_string()))?;

    Ok((BASE64.encode(&jpeg), rgb.width(), rgb.height()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgb};

    fn png_of(width: u32, height: u32) -> Vec<u8> {
        let img: ImageBuffer<Rgb<u8>, Vec<u8>> =
            ImageBuffer::from_fn(width, height, |x, y| Rgb([(x % 255) as u8, (y % 255) as u8, 128]));
        let mut out = std::io::Cursor::new(Vec::new());
        img.write_to(&mut out, image::ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[test]
    fn test_parse_fraction() {
        assert!((parse_fraction("30/1") - 30.0).abs() < 0.001);
        assert!((parse_fraction("24000/1001") - 23.976).abs() < 0.01);
        assert!((parse_fraction("25") - 25.0).abs() < 0.001);
        assert_eq!(parse_fraction("30/0"), 0.0);
    }

    #[test]
    fn test_video_info_prefers_nb_frames() {
        let probe: FfprobeOutput = serde_json::from_str(
            r#"{
                "streams": [
                    {"codec_type": "audio"},
                    {"codec_type": "video", "width": 1920, "height": 1080,
                     "r_frame_rate": "30/1", "nb_frames": "300", "duration": "10.0"}
                ],
                "format": {"duration": "10.0"}
            }"#,
        )
        .unwrap();

        let info = VideoInfo::from_probe(&probe).unwrap();
        assert_eq!(info.total_frames, 300);
        assert_eq!((info.width, info.height), (1920, 1080));
        assert!((info.timestamp_ms(15) - 500.0).abs() < 0.001);
    }

    #[test]
    fn test_video_info_estimates_frames_from_duration() {
        let probe: FfprobeOutput = serde_json::from_str(
            r#"{
                "streams": [{"codec_type": "video", "r_frame_rate": "25/1"}],
                "format": {"duration": "4.0"}
            }"#,
        )
        .unwrap();

        assert_eq!(VideoInfo::from_probe(&probe).unwrap().total_frames, 100);
    }

    #[test]
    fn test_video_info_requires_video_stream() {
        let probe: FfprobeOutput =
            serde_json::from_str(r#"{"streams": [{"codec_type": "audio"}]}"#).unwrap();
        assert!(VideoInfo::from_probe(&probe).is_none());
    }

    #[test]
    fn test_encode_frame_downscales_large_frames() {
        let (payload, width, height) = encode_frame(&png_of(2048, 1024)).unwrap();
        assert_eq!((width, height), (1024, 512));

        let jpeg = BASE64.decode(payload).unwrap();
        assert_eq!(&jpeg[..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn test_encode_frame_keeps_small_frames() {
        let (_, width, height) = encode_frame(&png_of(640, 360)).unwrap();
        assert_eq!((width, height), (640, 360));
    }

    #[test]
    fn test_encode_frame_rejects_garbage() {
        assert!(matches!(encode_frame(b"not a png"), Err(ExtractionError::Decode(_))));
    }

    #[tokio::test]
    async fn test_uploaded_bytes_are_removed_after_failure() {
        let scratch = tempfile::tempdir().unwrap();
        let sampler = FfmpegSampler::default()
            .with_binaries("/nonexistent/ffmpeg", "/nonexistent/ffprobe");

        let result = sampler
            .extract_from_bytes(b"fake video", 4, scratch.path())
            .await;

        assert!(matches!(result, Err(ExtractionError::ToolNotFound(_))));
        assert_eq!(std::fs::read_dir(scratch.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_missing_file_is_extraction_error() {
        let sampler = FfmpegSampler::default();
        let result = sampler
            .extract(&VideoSource::Path("/nonexistent/attempt.mp4".into()), 4)
            .await;
        assert!(matches!(result, Err(ExtractionError::VideoNotFound(_))));
    }
}
