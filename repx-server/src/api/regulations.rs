//! Regulations API Handlers
//!
//! Static reference data: rulebook text, visual checklists and the catalogue
//! of invalid-rep reasons.

use axum::{Json, extract::Path};
use repx_core::domain::Discipline;
use repx_core::dto::regulations::{DisciplinesResponse, RegulationsResponse};

use crate::api::error::ApiResult;

/// GET /video-judge/regulations/{discipline}
pub async fn get_regulations(Path(discipline): Path<String>) -> ApiResult<Json<RegulationsResponse>> {
    let discipline = discipline.parse::<Discipline>()?;
    Ok(Json(RegulationsResponse::for_discipline(discipline)))
}

/// GET /video-judge/disciplines
pub async fn list_disciplines() -> Json<DisciplinesResponse> {
    Json(DisciplinesResponse::all())
}
