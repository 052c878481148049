use std::sync::Arc;

use axum::extract::State;
use serde::Deserialize;

use crate::api::extract::{Json, Path, Query};
use crate::api::AppState;
use crate::error::Result;
use crate::matching::{MatchedPersonnel, PersonnelSearch, PersonnelUtilization};
use crate::models::Personnel;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    pub experience_level: Option<String>,
    pub skill_id: Option<String>,
    pub min_proficiency: Option<String>,
}

pub async fn match_personnel(
    State(state): State<Arc<AppState>>,
    Path(project_id): Path<i32>,
) -> Result<Json<Vec<MatchedPersonnel>>> {
    Ok(Json(state.engine.match_project(project_id).await?))
}

pub async fn search_personnel(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<Personnel>>> {
    let search =
        PersonnelSearch::from_params(query.experience_level, query.skill_id, query.min_proficiency)?;
    Ok(Json(state.engine.search_personnel(&search).await?))
}

pub async fn personnel_utilization(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<PersonnelUtilization>>> {
    Ok(Json(state.engine.utilization().await?))
}
