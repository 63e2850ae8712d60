//! Frame sampling
//!
//! Chooses which frames of a video the model gets to see and turns them into
//! JPEG payloads. Index selection is pure and lives here; decoding is behind
//! the [`FrameSampler`] trait so tests can substitute canned frames.

pub mod ffmpeg;

use async_trait::async_trait;
use bytes::Bytes;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use repx_core::domain::Frame;

use crate::error::ExtractionError;

pub use ffmpeg::FfmpegSampler;

/// Where a video comes from
#[derive(Debug, Clone)]
pub enum VideoSource {
    Path(PathBuf),
    /// In-memory upload; spilled to a scoped temporary file for decoding
    Bytes(Bytes),
}

/// How frame indices are chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SamplingPolicy {
    /// Evenly spaced across the whole video
    #[default]
    Uniform,
    /// Start, quarters and end, refined with midpoints
    KeyMoments,
}

impl SamplingPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            SamplingPolicy::Uniform => "uniform",
            SamplingPolicy::KeyMoments => "key_moments",
        }
    }

    /// Frame indices for a video of `total` frames
    pub fn indices(&self, total: u64, target_count: usize) -> Vec<u64> {
        match self {
            SamplingPolicy::Uniform => uniform_indices(total, target_count),
            SamplingPolicy::KeyMoments => key_moment_indices(total, target_count),
        }
    }
}

impl fmt::Display for SamplingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SamplingPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "uniform" => Ok(SamplingPolicy::Uniform),
            "key_moments" | "key-moments" => Ok(SamplingPolicy::KeyMoments),
            other => Err(format!(
                "Invalid sampling policy: {}. Must be one of: uniform, key_moments",
                other
            )),
        }
    }
}

/// Turns a video into an ordered set of frames
#[async_trait]
pub trait FrameSampler: Send + Sync {
    /// Samples up to `target_count` frames, ordered by capture time
    async fn extract(
        &self,
        source: &VideoSource,
        target_count: usize,
    ) -> Result<Vec<Frame>, ExtractionError>;
}

/// `floor(i * total / target_count)` for each `i` in `0..target_count`
///
/// The target is capped at `total` so every index names a distinct frame.
pub fn uniform_indices(total: u64, target_count: usize) -> Vec<u64> {
    let count = (target_count as u64).min(total);
    (0..count).map(|i| i * total / count).collect()
}

/// Start, quarter, half, three-quarter and last frame, then midpoints of
/// neighbouring indices until `target_count` is reached
///
/// Stops refining once a pass adds nothing new, which happens on very short
/// videos. The result is sorted, deduplicated and truncated to `target_count`.
pub fn key_moment_indices(total: u64, target_count: usize) -> Vec<u64> {
    if total == 0 || target_count == 0 {
        return Vec::new();
    }

    let mut indices = vec![0, total / 4, total / 2, 3 * total / 4, total - 1];
    indices.sort_unstable();
    indices.dedup();

    while indices.len() < target_count {
        let midpoints: Vec<u64> = indices.windows(2).map(|w| (w[0] + w[1]) / 2).collect();

        let before = indices.len();
        indices.extend(midpoints);
        indices.sort_unstable();
        indices.dedup();

        if indices.len() == before {
            break;
        }
    }

    indices.truncate(target_count);
    indices
}

/// Alternates primary and secondary frames: p0, s0, p1, s1, ...
///
/// Once the shorter side runs out the rest of the longer side follows in order.
pub fn interleave(primary: Vec<Frame>, secondary: Vec<Frame>) -> Vec<Frame> {
    let mut merged = Vec::with_capacity(primary.len() + secondary.len());
    let mut primary = primary.into_iter();
    let mut secondary = secondary.into_iter();

    loop {
        match (primary.next(), secondary.next()) {
            (None, None) => break,
            (p, s) => {
                merged.extend(p);
                merged.extend(s);
            }
        }
    }

    merged
}
