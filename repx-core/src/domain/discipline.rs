//! Discipline and camera angle types

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::InputError;

/// A judged lift type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Discipline {
    PullUp,
    Dip,
    Squat,
}

impl Discipline {
    pub const ALL: [Discipline; 3] = [Discipline::PullUp, Discipline::Dip, Discipline::Squat];

    /// Wire tag, e.g. `pull_up`
    pub fn as_str(&self) -> &'static str {
        match self {
            Discipline::PullUp => "pull_up",
            Discipline::Dip => "dip",
            Discipline::Squat => "squat",
        }
    }

    /// Human readable name
    pub fn display_name(&self) -> &'static str {
        match self {
            Discipline::PullUp => "Pull-Up",
            Discipline::Dip => "Dip",
            Discipline::Squat => "Squat",
        }
    }

    /// Camera angle used when the caller asks for `auto`
    pub fn default_camera_angle(&self) -> CameraAngle {
        match self {
            Discipline::PullUp => CameraAngle::Front,
            Discipline::Dip | Discipline::Squat => CameraAngle::Side,
        }
    }

    pub fn required_camera_angles(&self) -> Vec<CameraAngle> {
        vec![self.default_camera_angle()]
    }

    /// Pull-ups may add a view parallel to the bar to confirm chin clearance
    pub fn optional_camera_angles(&self) -> Vec<CameraAngle> {
        match self {
            Discipline::PullUp => vec![CameraAngle::Parallel],
            Discipline::Dip | Discipline::Squat => vec![],
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Discipline::PullUp => "Athlete pulls body up on a bar until chin clears the bar",
            Discipline::Dip => {
                "Athlete lowers body on parallel bars until upper arms are parallel"
            }
            Discipline::Squat => "Athlete squats with barbell until hip crease is below knee",
        }
    }
}

impl fmt::Display for Discipline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Discipline {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "pull_up" => Ok(Discipline::PullUp),
            "dip" => Ok(Discipline::Dip),
            "squat" => Ok(Discipline::Squat),
            other => Err(InputError::UnknownDiscipline(other.to_string())),
        }
    }
}

/// Camera placement relative to the athlete
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CameraAngle {
    #[default]
    Auto,
    Front,
    Side,
    Parallel,
    /// Several interleaved cameras; only produced internally for multi-angle prompts
    Multiple,
}

impl CameraAngle {
    pub fn as_str(&self) -> &'static str {
        match self {
            CameraAngle::Auto => "auto",
            CameraAngle::Front => "front",
            CameraAngle::Side => "side",
            CameraAngle::Parallel => "parallel",
            CameraAngle::Multiple => "multiple",
        }
    }

    /// Replaces `Auto` with the discipline's default angle
    pub fn resolve(self, discipline: Discipline) -> CameraAngle {
        match self {
            CameraAngle::Auto => discipline.default_camera_angle(),
            explicit => explicit,
        }
    }
}

impl fmt::Display for CameraAngle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CameraAngle {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "auto" => Ok(CameraAngle::Auto),
            "front" => Ok(CameraAngle::Front),
            "side" => Ok(CameraAngle::Side),
            "parallel" => Ok(CameraAngle::Parallel),
            other => Err(InputError::UnknownCameraAngle(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discipline_round_trips_through_tag() {
        for discipline in Discipline::ALL {
            assert_eq!(discipline.as_str().parse::<Discipline>(), Ok(discipline));
        }
    }

    #[test]
    fn test_unknown_discipline_is_input_error() {
        let err = "bench_press".parse::<Discipline>().unwrap_err();
        assert_eq!(err, InputError::UnknownDiscipline("bench_press".to_string()));
    }

    #[test]
    fn test_auto_angle_resolves_per_discipline() {
        assert_eq!(CameraAngle::Auto.resolve(Discipline::PullUp), CameraAngle::Front);
        assert_eq!(CameraAngle::Auto.resolve(Discipline::Squat), CameraAngle::Side);
        assert_eq!(CameraAngle::Auto.resolve(Discipline::Dip), CameraAngle::Side);
    }

    #[test]
    fn test_explicit_angle_is_kept() {
        assert_eq!(
            CameraAngle::Parallel.resolve(Discipline::Squat),
            CameraAngle::Parallel
        );
    }

    #[test]
    fn test_camera_angle_parsing() {
        assert_eq!("FRONT".parse::<CameraAngle>(), Ok(CameraAngle::Front));
        assert_eq!("".parse::<CameraAngle>(), Ok(CameraAngle::Auto));
        assert!("overhead".parse::<CameraAngle>().is_err());
        // Multiple is internal-only
        assert!("multiple".parse::<CameraAngle>().is_err());
    }

    #[test]
    fn test_discipline_serializes_snake_case() {
        let json = serde_json::to_string(&Discipline::PullUp).unwrap();
        assert_eq!(json, "\"pull_up\"");
    }
}
