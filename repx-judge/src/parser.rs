//! Model answer parsing
//!
//! Turns the model's free-form text into a [`VideoJudgmentResult`]. Parsing
//! never fails: text without usable JSON degrades to an invalid result that
//! carries the reason.

use regex::Regex;
use serde_json::{Map, Value};
use std::sync::LazyLock;
use tracing::{debug, error};

use repx_core::domain::{
    CriterionStatus, Discipline, JudgmentDetail, OverallJudgment, VideoJudgmentResult,
};

static FENCED_JSON: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```json\s*(.*?)\s*```").expect("valid regex"));

static BARE_OBJECT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\{.*\}").expect("valid regex"));

const DEFAULT_CONFIDENCE: f64 = 0.5;

/// Parser settings taken from the judge configuration
#[derive(Debug, Clone, Copy)]
pub struct ParseOptions {
    pub strict_mode: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self { strict_mode: true }
    }
}

/// Locates the JSON payload: a fenced json block, else the widest `{...}` span
fn extract_json(raw: &str) -> Option<&str> {
    if let Some(fenced) = FENCED_JSON.captures(raw).and_then(|c| c.get(1)) {
        return Some(fenced.as_str());
    }
    BARE_OBJECT.find(raw).map(|m| m.as_str())
}

/// Reads a number the model may have written as a number or a numeric string
fn as_f64(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

fn confidence(value: Option<&Value>) -> f64 {
    as_f64(value)
        .filter(|c| c.is_finite())
        .unwrap_or(DEFAULT_CONFIDENCE)
        .clamp(0.0, 1.0)
}

fn count(value: Option<&Value>) -> Option<u32> {
    as_f64(value)
        .filter(|n| n.is_finite() && *n >= 0.0)
        .map(|n| n.min(u32::MAX as f64) as u32)
}

/// Renders a criterion value the way the model wrote it
fn display_status(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Whether a criterion counts as met
fn criterion_passed(status: CriterionStatus, strict_mode: bool) -> bool {
    match status {
        CriterionStatus::Pass => true,
        // Strict mode re-states what the tri-state already implies
        CriterionStatus::Uncertain if strict_mode => false,
        CriterionStatus::Uncertain | CriterionStatus::Fail => false,
    }
}

/// Parses a raw model answer into a judgment
pub fn parse(
    raw: &str,
    discipline: Discipline,
    model_name: &str,
    options: ParseOptions,
) -> VideoJudgmentResult {
    let Some(json) = extract_json(raw) else {
        debug!(model = model_name, "No JSON found in model answer");
        return VideoJudgmentResult::degraded(
            discipline,
            "Could not parse VLM response",
            "Parse failed",
            raw,
            model_name,
        );
    };

    let parsed: Map<String, Value> = match serde_json::from_str(json) {
        Ok(parsed) => parsed,
        Err(e) => {
            error!(model = model_name, error = %e, "JSON parse error in model answer");
            return VideoJudgmentResult::degraded(
                discipline,
                format!("JSON parse error: {}", e),
                "JSON parse failed",
                raw,
                model_name,
            );
        }
    };

    let overall_judgment = parsed
        .get("overall_judgment")
        .and_then(Value::as_str)
        .map(OverallJudgment::from_model)
        .unwrap_or(OverallJudgment::NeedsReview);

    let rep_count = count(parsed.get("total_reps_attempted")).unwrap_or_else(|| {
        let valid = count(parsed.get("valid_reps")).unwrap_or(0);
        let invalid = count(parsed.get("invalid_reps")).unwrap_or(0);
        valid.saturating_add(invalid)
    });

    let mut details = Vec::new();
    let mut invalid_reasons = Vec::new();

    let reps = parsed
        .get("rep_analysis")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();

    for rep in reps {
        let rep_number = count(rep.get("rep_number")).unwrap_or(0);
        let rep_confidence = confidence(rep.get("confidence"));

        if let Some(criteria) = rep.get("criteria_met").and_then(Value::as_object) {
            for (name, value) in criteria {
                let status = CriterionStatus::from_json(value);
                details.push(JudgmentDetail {
                    criteria: format!("Rep {}: {}", rep_number, name),
                    passed: criterion_passed(status, options.strict_mode),
                    confidence: rep_confidence,
                    explanation: format!("Status: {}", display_status(value)),
                });
            }
        }

        if let Some(reasons) = rep.get("invalid_reasons").and_then(Value::as_array) {
            invalid_reasons.extend(
                reasons
                    .iter()
                    .map(|reason| format!("Rep {}: {}", rep_number, display_status(reason))),
            );
        }
    }

    let mut frame_analysis = parsed
        .get("frame_observations")
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_default();
    frame_analysis.insert(
        "recommendations".to_string(),
        parsed
            .get("recommendations")
            .cloned()
            .unwrap_or_else(|| Value::String(String::new())),
    );

    VideoJudgmentResult {
        is_valid: overall_judgment == OverallJudgment::Valid,
        overall_judgment,
        confidence: confidence(parsed.get("confidence")),
        discipline,
        rep_count,
        details,
        invalid_reasons,
        frame_analysis,
        raw_response: raw.to_string(),
        model_used: model_name.to_string(),
    }
}
