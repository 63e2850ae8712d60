//! Prompt construction
//!
//! Prompts are a pure function of the discipline, the camera angle and whether
//! a second camera is present. Each discipline embeds its regulation text and
//! a mandated JSON answer schema.

use repx_core::domain::{CameraAngle, Discipline};
use repx_core::regulations;

/// Sent as the system message with every request
pub const SYSTEM_PROMPT: &str = "You are an expert street lifting competition judge with extensive experience
in evaluating athletic performance according to international street lifting regulations.

Your role is to analyze video frames of street lifting attempts and determine whether
each repetition meets the official standards. You must be:

1. PRECISE: Apply the exact criteria from the regulations
2. OBJECTIVE: Base judgments solely on visible evidence in the frames
3. CONSISTENT: Apply the same standards to all athletes
4. THOROUGH: Check all required criteria for each repetition

When analyzing videos:
- Examine each frame carefully for body position and form
- Track the athlete's movement through the repetition
- Identify the start position, bottom/top position, and completion
- Note any technical violations

Your judgment must be fair but strict - if you cannot clearly confirm a criterion
is met from the available frames, note it as uncertain.

Always respond in the specified JSON format.";

const PULL_UP_SECONDARY_VIEW_NOTE: &str = "
NOTE: You have been provided with TWO camera angles:
- FRONT VIEW: Primary view facing the athlete
- SIDE VIEW (parallel to bar): Secondary view to confirm bar clearance

Use the side view to definitively determine if the chin clears the bar when
the front view is ambiguous.
";

const PULL_UP_EVALUATION: &str = r#"Analyze the provided video frames and evaluate the pull-up attempt(s).

For EACH repetition visible in the frames, evaluate:

1. STARTING/BOTTOM POSITION:
   - Are the arms fully extended (dead hang)?
   - Is the body stable (minimal swing)?
   - Are feet off the ground?

2. TOP POSITION:
   - Does the chin CLEARLY pass above the bar?
   - Can you see daylight between the chin and bar level?

3. MOVEMENT QUALITY:
   - Is the movement controlled (no excessive kipping)?
   - Is the descent controlled?
   - Does the athlete return to full arm extension?

Respond with the following JSON structure:
```json
{
    "discipline": "pull_up",
    "total_reps_attempted": <number>,
    "valid_reps": <number>,
    "invalid_reps": <number>,
    "overall_judgment": "VALID" | "INVALID" | "NEEDS_REVIEW",
    "confidence": <0.0-1.0>,
    "rep_analysis": [
        {
            "rep_number": 1,
            "is_valid": true | false,
            "confidence": <0.0-1.0>,
            "criteria_met": {
                "full_arm_extension_bottom": true | false | "uncertain",
                "chin_above_bar": true | false | "uncertain",
                "controlled_movement": true | false | "uncertain",
                "no_excessive_kipping": true | false | "uncertain",
                "full_lockout_return": true | false | "uncertain"
            },
            "invalid_reasons": ["reason1", "reason2"],
            "notes": "Any additional observations"
        }
    ],
    "frame_observations": {
        "frame_quality": "good" | "fair" | "poor",
        "visibility_issues": ["list any issues"],
        "key_frames": [
            {
                "frame_description": "bottom position",
                "observation": "what you see"
            }
        ]
    },
    "recommendations": "Suggestions for the athlete or for video quality improvement"
}
```

Analyze the frames now and provide your judgment:"#;

const DIP_EVALUATION: &str = r#"Analyze the provided video frames and evaluate the dip attempt(s).

For EACH repetition visible in the frames, evaluate:

1. STARTING/TOP POSITION:
   - Are the arms fully extended (elbows locked)?
   - Is the body stable on the bars?
   - Are feet off the ground?

2. BOTTOM POSITION (DEPTH):
   - Are the upper arms at or BELOW parallel to the ground?
   - Is the shoulder crease at or below the elbow level?
   - Is the elbow angle approximately 90 degrees or less?

3. MOVEMENT QUALITY:
   - Is the descent controlled?
   - Is there no excessive swinging?
   - Does the athlete fully lock out at the top?

CRITICAL: The depth requirement is the most common point of failure.
Upper arms MUST be parallel to the ground or lower. The shoulder
crease MUST be at or below the top of the elbow.

Respond with the following JSON structure:
```json
{
    "discipline": "dip",
    "total_reps_attempted": <number>,
    "valid_reps": <number>,
    "invalid_reps": <number>,
    "overall_judgment": "VALID" | "INVALID" | "NEEDS_REVIEW",
    "confidence": <0.0-1.0>,
    "rep_analysis": [
        {
            "rep_number": 1,
            "is_valid": true | false,
            "confidence": <0.0-1.0>,
            "criteria_met": {
                "full_arm_extension_top": true | false | "uncertain",
                "upper_arms_parallel_or_below": true | false | "uncertain",
                "shoulder_below_elbow": true | false | "uncertain",
                "controlled_movement": true | false | "uncertain",
                "no_excessive_swing": true | false | "uncertain"
            },
            "invalid_reasons": ["reason1", "reason2"],
            "depth_assessment": {
                "estimated_upper_arm_angle": "<angle or description>",
                "depth_achieved": "above_parallel" | "at_parallel" | "below_parallel"
            },
            "notes": "Any additional observations"
        }
    ],
    "frame_observations": {
        "frame_quality": "good" | "fair" | "poor",
        "visibility_issues": ["list any issues"],
        "key_frames": [
            {
                "frame_description": "bottom position",
                "observation": "what you see"
            }
        ]
    },
    "recommendations": "Suggestions for the athlete or for video quality improvement"
}
```

Analyze the frames now and provide your judgment:"#;

const SQUAT_EVALUATION: &str = r#"Analyze the provided video frames and evaluate the squat attempt(s).

For EACH repetition visible in the frames, evaluate:

1. STARTING/TOP POSITION:
   - Are hips and knees fully extended (standing tall)?
   - Is the athlete stable?
   - Is the bar properly positioned on the back?

2. BOTTOM POSITION (DEPTH):
   - Does the hip crease descend BELOW the top of the knee?
   - Is the thigh surface lower than parallel?
   - Has the athlete "broken parallel"?

3. MOVEMENT QUALITY:
   - Is the descent controlled?
   - Is there excessive forward lean?
   - Does the athlete achieve full lockout at the top?
   - Is the bar position stable throughout?

CRITICAL: The depth requirement is strictly enforced.
The HIP CREASE must go BELOW the top of the knee.
This is commonly called "breaking parallel."

Respond with the following JSON structure:
```json
{
    "discipline": "squat",
    "total_reps_attempted": <number>,
    "valid_reps": <number>,
    "invalid_reps": <number>,
    "overall_judgment": "VALID" | "INVALID" | "NEEDS_REVIEW",
    "confidence": <0.0-1.0>,
    "rep_analysis": [
        {
            "rep_number": 1,
            "is_valid": true | false,
            "confidence": <0.0-1.0>,
            "criteria_met": {
                "full_hip_knee_extension_top": true | false | "uncertain",
                "hip_crease_below_knee": true | false | "uncertain",
                "controlled_movement": true | false | "uncertain",
                "stable_bar_position": true | false | "uncertain",
                "full_lockout_top": true | false | "uncertain"
            },
            "invalid_reasons": ["reason1", "reason2"],
            "depth_assessment": {
                "hip_crease_position": "above_knee" | "at_knee" | "below_knee",
                "estimated_thigh_angle": "<angle or description>",
                "parallel_achieved": true | false | "uncertain"
            },
            "notes": "Any additional observations"
        }
    ],
    "frame_observations": {
        "frame_quality": "good" | "fair" | "poor",
        "visibility_issues": ["list any issues"],
        "key_frames": [
            {
                "frame_description": "bottom position",
                "observation": "what you see"
            }
        ]
    },
    "recommendations": "Suggestions for the athlete or for video quality improvement"
}
```

Analyze the frames now and provide your judgment:"#;

/// Criterion keys the model is asked to report for each rep, in schema order
pub fn criteria_keys(discipline: Discipline) -> &'static [&'static str] {
    match discipline {
        Discipline::PullUp => &[
            "full_arm_extension_bottom",
            "chin_above_bar",
            "controlled_movement",
            "no_excessive_kipping",
            "full_lockout_return",
        ],
        Discipline::Dip => &[
            "full_arm_extension_top",
            "upper_arms_parallel_or_below",
            "shoulder_below_elbow",
            "controlled_movement",
            "no_excessive_swing",
        ],
        Discipline::Squat => &[
            "full_hip_knee_extension_top",
            "hip_crease_below_knee",
            "controlled_movement",
            "stable_bar_position",
            "full_lockout_top",
        ],
    }
}

/// Builds the analysis prompt for a single-camera (or annotated multi-camera) attempt
///
/// `Auto` angles are resolved against the discipline first.
pub fn build_prompt(discipline: Discipline, camera_angle: CameraAngle, has_secondary_view: bool) -> String {
    let angle = camera_angle.resolve(discipline).as_str().to_uppercase();
    let regulation = regulations::for_discipline(discipline).text;

    let (heading, evaluation) = match discipline {
        Discipline::PullUp => ("STREET LIFTING PULL-UP ANALYSIS", PULL_UP_EVALUATION),
        Discipline::Dip => ("STREET LIFTING DIP ANALYSIS", DIP_EVALUATION),
        Discipline::Squat => ("STREET LIFTING SQUAT ANALYSIS", SQUAT_EVALUATION),
    };

    let mut prompt = format!("{heading}\n\n{regulation}\n\n");
    if discipline == Discipline::PullUp && has_secondary_view {
        prompt.push_str(PULL_UP_SECONDARY_VIEW_NOTE);
        prompt.push_str("\n\n");
    }
    prompt.push_str(&format!("CAMERA ANGLE: {angle} VIEW\n\n{evaluation}"));
    prompt
}

/// Builds the prompt for interleaved frames from several cameras
pub fn build_multi_angle_prompt(discipline: Discipline, angles: &[CameraAngle]) -> String {
    let angles_description = angles
        .iter()
        .map(|a| a.resolve(discipline).as_str())
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "MULTI-ANGLE VIDEO ANALYSIS

You are provided with video frames from MULTIPLE camera angles: {angles_description}

The frames are interleaved from different cameras. Use information from ALL angles
to make a comprehensive judgment.

For PULL-UPS specifically:
- Use the FRONT view to assess body position and stability
- Use the SIDE/PARALLEL view to confirm chin clearance above the bar

Cross-reference observations between angles to increase judgment confidence.

{}
",
        build_prompt(discipline, CameraAngle::Multiple, true)
    )
}

/// Appends free-form caller context to a prompt, verbatim
///
/// An empty string counts as no context.
pub fn with_additional_context(prompt: String, context: Option<&str>) -> String {
    match context.filter(|c| !c.is_empty()) {
        Some(context) => format!("{prompt}\n\nADDITIONAL CONTEXT: {context}"),
        None => prompt,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_embeds_regulation_and_schema() {
        for discipline in Discipline::ALL {
            let prompt = build_prompt(discipline, CameraAngle::Auto, false);
            assert!(prompt.contains(regulations::for_discipline(discipline).text));
            assert!(prompt.contains("```json"));
            assert!(prompt.contains(&format!("\"discipline\": \"{}\"", discipline.as_str())));
            for key in criteria_keys(discipline) {
                assert!(prompt.contains(key), "{discipline} prompt lacks {key}");
            }
            assert!(prompt.ends_with("Analyze the frames now and provide your judgment:"));
        }
    }

    #[test]
    fn test_auto_angle_is_resolved() {
        assert!(build_prompt(Discipline::PullUp, CameraAngle::Auto, false).contains("CAMERA ANGLE: FRONT VIEW"));
        assert!(build_prompt(Discipline::Squat, CameraAngle::Auto, false).contains("CAMERA ANGLE: SIDE VIEW"));
        assert!(build_prompt(Discipline::Dip, CameraAngle::Parallel, false).contains("CAMERA ANGLE: PARALLEL VIEW"));
    }

    #[test]
    fn test_secondary_view_note_only_for_pull_ups() {
        assert!(build_prompt(Discipline::PullUp, CameraAngle::Front, true).contains("TWO camera angles"));
        assert!(!build_prompt(Discipline::PullUp, CameraAngle::Front, false).contains("TWO camera angles"));
        assert!(!build_prompt(Discipline::Dip, CameraAngle::Side, true).contains("TWO camera angles"));
    }

    #[test]
    fn test_depth_warning_for_dip_and_squat() {
        assert!(build_prompt(Discipline::Dip, CameraAngle::Side, false).contains("CRITICAL: The depth requirement"));
        assert!(build_prompt(Discipline::Squat, CameraAngle::Side, false).contains("depth_assessment"));
        assert!(!build_prompt(Discipline::PullUp, CameraAngle::Front, false).contains("depth_assessment"));
    }

    #[test]
    fn test_multi_angle_prompt() {
        let prompt =
            build_multi_angle_prompt(Discipline::PullUp, &[CameraAngle::Auto, CameraAngle::Parallel]);
        assert!(prompt.starts_with("MULTI-ANGLE VIDEO ANALYSIS"));
        assert!(prompt.contains("MULTIPLE camera angles: front, parallel"));
        assert!(prompt.contains("CAMERA ANGLE: MULTIPLE VIEW"));
        assert!(prompt.contains("STREET LIFTING PULL-UP ANALYSIS"));
    }

    #[test]
    fn test_additional_context() {
        let prompt = with_additional_context("base".to_string(), Some("athlete wears a red shirt"));
        assert_eq!(prompt, "base\n\nADDITIONAL CONTEXT: athlete wears a red shirt");
        assert_eq!(
            with_additional_context("base".to_string(), Some("  lane 4\n")),
            "base\n\nADDITIONAL CONTEXT:   lane 4\n"
        );
        assert_eq!(with_additional_context("base".to_string(), Some("")), "base");
        assert_eq!(with_additional_context("base".to_string(), None), "base");
    }
}
