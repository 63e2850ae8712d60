//! Street lifting technical regulations
//!
//! Static reference material the judge evaluates attempts against: the
//! rulebook text embedded in prompts, a visual checklist per position, and the
//! catalogue of invalid-attempt codes.

use serde::Serialize;

use crate::domain::Discipline;

/// How badly an invalid-attempt reason affects the lift
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Minor,
    Major,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Minor => "minor",
            Severity::Major => "major",
            Severity::Critical => "critical",
        }
    }
}

/// A catalogued reason for rejecting a repetition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct InvalidReason {
    pub code: &'static str,
    pub description: &'static str,
    pub severity: Severity,
}

/// Checklist section, e.g. "top_position" and what to look for there
pub type VisualCriteria = &'static [(&'static str, &'static [&'static str])];

/// Everything the rulebook says about one discipline
#[derive(Debug)]
pub struct Regulation {
    pub text: &'static str,
    pub visual_criteria: VisualCriteria,
    pub invalid_reasons: &'static [InvalidReason],
}

/// Looks up the regulation for a discipline
pub fn for_discipline(discipline: Discipline) -> &'static Regulation {
    match discipline {
        Discipline::PullUp => &PULL_UP,
        Discipline::Dip => &DIP,
        Discipline::Squat => &SQUAT,
    }
}

const fn reason(code: &'static str, description: &'static str, severity: Severity) -> InvalidReason {
    InvalidReason {
        code,
        description,
        severity,
    }
}

// =============================================================================
// Pull-up
// =============================================================================

pub const PULL_UP_REGULATIONS: &str = r#"
## PULL-UP TECHNICAL REGULATIONS

### Starting Position:
1. Athlete must hang from the bar with arms FULLY EXTENDED (dead hang position)
2. Grip can be pronated (overhand), supinated (underhand), or neutral
3. Body must be still before starting the repetition
4. Feet must not touch the ground

### Upward Phase (Concentric):
1. Athlete pulls body upward in a controlled manner
2. NO excessive kipping, swinging, or butterfly motion allowed
3. Movement must be primarily driven by upper body strength

### Top Position (Completion Criteria):
1. CHIN must CLEARLY pass ABOVE the horizontal plane of the bar
2. The chin must break the plane - touching the bar is not sufficient if chin doesn't clear it
3. Momentary pause at the top is recommended but not required

### Downward Phase (Eccentric):
1. Athlete must lower body in a CONTROLLED manner
2. Arms must return to FULL EXTENSION (dead hang)
3. Complete lockout of elbows required before next repetition
4. No bouncing or using momentum from the descent

### Common Invalid Attempts:
- Chin does not clear the bar (NO REP)
- Arms not fully extended at bottom (NO REP)
- Excessive kipping or swinging (NO REP)
- Legs used to generate upward momentum (NO REP)
- Grip release during repetition (NO REP)

### Camera Requirements:
- PRIMARY: Front-facing camera to verify chin clears bar
- SECONDARY (if needed): Side view parallel to bar to confirm bar clearance
"#;

static PULL_UP: Regulation = Regulation {
    text: PULL_UP_REGULATIONS,
    visual_criteria: &[
        (
            "starting_position",
            &[
                "Arms fully extended (straight elbows)",
                "Body hanging still (no swing)",
                "Feet off the ground",
            ],
        ),
        (
            "top_position",
            &[
                "Chin visibly above the bar horizontal plane",
                "Clear daylight between chin and bar level",
            ],
        ),
        (
            "bottom_position",
            &[
                "Full arm extension (elbow lockout)",
                "Dead hang achieved before next rep",
            ],
        ),
        (
            "movement_quality",
            &[
                "Controlled ascent without excessive kipping",
                "No butterfly or CrossFit-style motion",
                "Minimal body swing",
            ],
        ),
    ],
    invalid_reasons: &[
        reason("PU001", "Chin did not clear the bar", Severity::Critical),
        reason("PU002", "Arms not fully extended at start/bottom", Severity::Major),
        reason("PU003", "Excessive kipping or swinging motion", Severity::Major),
        reason("PU004", "Leg kick used for momentum", Severity::Major),
        reason("PU005", "Grip release during repetition", Severity::Critical),
        reason("PU006", "Feet touched ground during rep", Severity::Critical),
        reason("PU007", "Incomplete range of motion", Severity::Major),
    ],
};

// =============================================================================
// Dip
// =============================================================================

pub const DIP_REGULATIONS: &str = r#"
## DIP TECHNICAL REGULATIONS

### Starting Position:
1. Athlete must be supported on parallel bars or dip station
2. Arms must be FULLY EXTENDED (elbows locked out)
3. Body should be relatively vertical (slight forward lean acceptable)
4. Feet must not touch the ground

### Downward Phase (Eccentric):
1. Athlete lowers body in a CONTROLLED manner
2. Upper arms must descend until they are AT LEAST PARALLEL to the ground
3. The shoulder joint must break below the elbow joint plane
4. Angle at elbow should reach approximately 90 degrees or less

### Bottom Position (Depth Criteria):
1. Upper arm must be PARALLEL to ground or below
2. The crease of the shoulder must be at or below the top of the elbow
3. Momentary pause at bottom is recommended but not required

### Upward Phase (Concentric):
1. Athlete pushes body upward in a controlled manner
2. Movement must continue until arms are FULLY EXTENDED
3. Complete elbow lockout required at top
4. No excessive swinging or kipping

### Common Invalid Attempts:
- Insufficient depth (upper arms not parallel) (NO REP)
- Arms not fully locked out at top (NO REP)
- Excessive swinging or momentum (NO REP)
- Feet touched ground during rep (NO REP)
- Grip release or repositioning (NO REP)

### Camera Requirements:
- REQUIRED: Side angle view to accurately assess depth and arm angle
- The camera should be perpendicular to the athlete's sagittal plane
"#;

static DIP: Regulation = Regulation {
    text: DIP_REGULATIONS,
    visual_criteria: &[
        (
            "starting_position",
            &[
                "Arms fully extended with elbow lockout",
                "Body stable on the bars",
                "Feet clear of the ground",
            ],
        ),
        (
            "bottom_position",
            &[
                "Upper arms at or below parallel to ground",
                "Shoulder crease at or below elbow level",
                "Elbow angle approximately 90 degrees or less",
            ],
        ),
        (
            "top_position",
            &[
                "Full arm extension",
                "Complete elbow lockout",
                "Controlled finish",
            ],
        ),
        (
            "movement_quality",
            &[
                "Controlled descent",
                "No excessive swinging",
                "Smooth transition at bottom",
            ],
        ),
    ],
    invalid_reasons: &[
        reason("DIP001", "Insufficient depth - upper arms not parallel", Severity::Critical),
        reason("DIP002", "Arms not fully locked out at top", Severity::Major),
        reason("DIP003", "Excessive swinging or momentum", Severity::Major),
        reason("DIP004", "Feet touched ground during rep", Severity::Critical),
        reason("DIP005", "Grip release or hand repositioning", Severity::Critical),
        reason("DIP006", "Incomplete range of motion", Severity::Major),
    ],
};

// =============================================================================
// Squat
// =============================================================================

pub const SQUAT_REGULATIONS: &str = r#"
## SQUAT TECHNICAL REGULATIONS

### Starting Position:
1. Athlete stands with barbell on upper back (high bar or low bar position)
2. Feet should be shoulder-width apart (stance may vary)
3. Knees and hips must be FULLY EXTENDED (standing tall)
4. Athlete must be stable before beginning descent

### Downward Phase (Eccentric):
1. Athlete descends in a CONTROLLED manner
2. Hips move back and down
3. Knees track over toes (may go past toes depending on mobility)
4. Descent continues until proper depth is achieved

### Bottom Position (Depth Criteria):
1. The hip crease must descend BELOW the top of the knee
2. The top surface of the thigh at the hip must be lower than the knee
3. This is commonly referred to as "breaking parallel"
4. Depth must be achieved in a controlled manner (no bouncing)

### Upward Phase (Concentric):
1. Athlete drives upward from the bottom position
2. Hips and knees extend together
3. Movement continues until fully standing
4. Complete hip and knee lockout required at top

### Common Invalid Attempts:
- Hip crease did not break below knee (NO REP)
- Did not achieve full lockout at top (NO REP)
- Loss of balance or step during lift (NO REP)
- Bar slipped or moved significantly (NO REP)
- Excessive forward lean causing near-failure (subjective)

### Camera Requirements:
- REQUIRED: Side angle view to accurately assess squat depth
- Camera should be positioned at hip height
- Clear view of hip crease and knee required
"#;

static SQUAT: Regulation = Regulation {
    text: SQUAT_REGULATIONS,
    visual_criteria: &[
        (
            "starting_position",
            &[
                "Full hip and knee extension",
                "Athlete standing tall and stable",
                "Bar properly positioned on back",
            ],
        ),
        (
            "bottom_position",
            &[
                "Hip crease below top of knee",
                "Thigh surface lower than parallel",
                "Breaking parallel achieved",
            ],
        ),
        (
            "top_position",
            &[
                "Full hip extension (standing tall)",
                "Full knee extension (lockout)",
                "Controlled stable finish",
            ],
        ),
        (
            "movement_quality",
            &[
                "Controlled descent",
                "No excessive forward lean",
                "Stable bar position throughout",
                "Balanced foot pressure",
            ],
        ),
    ],
    invalid_reasons: &[
        reason("SQ001", "Hip crease did not break below knee (depth)", Severity::Critical),
        reason("SQ002", "Did not achieve full lockout at top", Severity::Major),
        reason("SQ003", "Loss of balance or step during lift", Severity::Critical),
        reason("SQ004", "Bar slipped or moved significantly", Severity::Major),
        reason("SQ005", "Incomplete range of motion", Severity::Major),
        reason("SQ006", "Excessive forward lean / good morning squat", Severity::Major),
    ],
};
