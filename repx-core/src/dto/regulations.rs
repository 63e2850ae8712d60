//! Regulation reference DTOs

use serde::{Deserialize, Serialize};

use crate::domain::{CameraAngle, Discipline};
use crate::regulations;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvalidReasonDto {
    pub code: String,
    pub description: String,
    pub severity: String,
}

/// Checklist section and the items to look for in it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CriteriaSection {
    pub section: String,
    pub items: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegulationsResponse {
    pub discipline: Discipline,
    pub regulations: String,
    pub visual_criteria: Vec<CriteriaSection>,
    pub common_invalid_reasons: Vec<InvalidReasonDto>,
}

impl RegulationsResponse {
    pub fn for_discipline(discipline: Discipline) -> Self {
        let regulation = regulations::for_discipline(discipline);

        Self {
            discipline,
            regulations: regulation.text.trim().to_string(),
            visual_criteria: regulation
                .visual_criteria
                .iter()
                .map(|(section, items)| CriteriaSection {
                    section: section.to_string(),
                    items: items.iter().map(|i| i.to_string()).collect(),
                })
                .collect(),
            common_invalid_reasons: regulation
                .invalid_reasons
                .iter()
                .map(|r| InvalidReasonDto {
                    code: r.code.to_string(),
                    description: r.description.to_string(),
                    severity: r.severity.as_str().to_string(),
                })
                .collect(),
        }
    }
}

/// Summary of one judged discipline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisciplineInfo {
    pub id: Discipline,
    pub name: String,
    pub required_camera_angles: Vec<CameraAngle>,
    pub optional_camera_angles: Vec<CameraAngle>,
    pub description: String,
}

impl From<Discipline> for DisciplineInfo {
    fn from(discipline: Discipline) -> Self {
        Self {
            id: discipline,
            name: discipline.display_name().to_string(),
            required_camera_angles: discipline.required_camera_angles(),
            optional_camera_angles: discipline.optional_camera_angles(),
            description: discipline.description().to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisciplinesResponse {
    pub disciplines: Vec<DisciplineInfo>,
}

impl DisciplinesResponse {
    pub fn all() -> Self {
        Self {
            disciplines: Discipline::ALL.into_iter().map(DisciplineInfo::from).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_regulations_keep_section_order() {
        let response = RegulationsResponse::for_discipline(Discipline::PullUp);
        let sections: Vec<_> = response
            .visual_criteria
            .iter()
            .map(|s| s.section.as_str())
            .collect();
        assert_eq!(
            sections,
            vec!["starting_position", "top_position", "bottom_position", "movement_quality"]
        );
        assert_eq!(response.common_invalid_reasons[0].code, "PU001");
        assert_eq!(response.common_invalid_reasons[0].severity, "critical");
    }

    #[test]
    fn test_disciplines_listing() {
        let response = DisciplinesResponse::all();
        assert_eq!(response.disciplines.len(), 3);

        let pull_up = &response.disciplines[0];
        assert_eq!(pull_up.name, "Pull-Up");
        assert_eq!(pull_up.required_camera_angles, vec![CameraAngle::Front]);
        assert_eq!(pull_up.optional_camera_angles, vec![CameraAngle::Parallel]);
    }
}
