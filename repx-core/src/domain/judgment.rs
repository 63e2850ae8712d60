//! Judgment domain types

use serde::{Deserialize, Serialize};
use std::fmt;

use super::discipline::Discipline;

/// Model verdict for the whole attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OverallJudgment {
    Valid,
    Invalid,
    NeedsReview,
}

impl OverallJudgment {
    pub fn as_str(&self) -> &'static str {
        match self {
            OverallJudgment::Valid => "VALID",
            OverallJudgment::Invalid => "INVALID",
            OverallJudgment::NeedsReview => "NEEDS_REVIEW",
        }
    }

    /// Parses the model's verdict; anything but the exact tags needs review
    pub fn from_model(value: &str) -> Self {
        match value {
            "VALID" => OverallJudgment::Valid,
            "INVALID" => OverallJudgment::Invalid,
            _ => OverallJudgment::NeedsReview,
        }
    }
}

impl fmt::Display for OverallJudgment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status of a single criterion as reported by the model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CriterionStatus {
    Pass,
    Fail,
    Uncertain,
}

impl CriterionStatus {
    /// Maps a loosely typed model value onto the tri-state.
    ///
    /// Only a literal JSON `true` passes. The string `"uncertain"` is
    /// uncertain; every other value fails.
    pub fn from_json(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Bool(true) => CriterionStatus::Pass,
            serde_json::Value::String(s) if s.trim().eq_ignore_ascii_case("uncertain") => {
                CriterionStatus::Uncertain
            }
            _ => CriterionStatus::Fail,
        }
    }
}

/// A single evaluated criterion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JudgmentDetail {
    /// Label such as "Rep 2: chin_above_bar"
    pub criteria: String,
    pub passed: bool,
    pub confidence: f64,
    pub explanation: String,
}

/// Complete judgment for one video submission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoJudgmentResult {
    pub is_valid: bool,
    pub overall_judgment: OverallJudgment,
    pub confidence: f64,
    pub discipline: Discipline,
    pub rep_count: u32,
    pub details: Vec<JudgmentDetail>,
    pub invalid_reasons: Vec<String>,
    pub frame_analysis: serde_json::Map<String, serde_json::Value>,
    /// Raw model text, kept for audit
    pub raw_response: String,
    pub model_used: String,
}

impl VideoJudgmentResult {
    /// Builds the shaped answer used whenever no usable judgment exists
    pub fn degraded(
        discipline: Discipline,
        invalid_reason: impl Into<String>,
        error_note: impl Into<String>,
        raw_response: impl Into<String>,
        model_used: impl Into<String>,
    ) -> Self {
        let mut frame_analysis = serde_json::Map::new();
        frame_analysis.insert(
            "error".to_string(),
            serde_json::Value::String(error_note.into()),
        );

        Self {
            is_valid: false,
            overall_judgment: OverallJudgment::NeedsReview,
            confidence: 0.0,
            discipline,
            rep_count: 0,
            details: Vec::new(),
            invalid_reasons: vec![invalid_reason.into()],
            frame_analysis,
            raw_response: raw_response.into(),
            model_used: model_used.into(),
        }
    }
}
