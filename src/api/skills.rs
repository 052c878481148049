use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::api::extract::{Json, Path};
use crate::api::AppState;
use crate::error::{Error, Result};
use crate::models::{NewSkill, Skill, SkillPatch};

#[derive(Debug, Deserialize)]
pub struct SkillRequest {
    pub skill_name: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
}

pub async fn list_skills(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Skill>>> {
    Ok(Json(state.store.list_skills().await?))
}

pub async fn get_skill(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<Skill>> {
    state
        .store
        .get_skill(id)
        .await?
        .map(Json)
        .ok_or_else(|| Error::not_found("Skill"))
}

pub async fn create_skill(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SkillRequest>,
) -> Result<(StatusCode, Json<Skill>)> {
    let skill = NewSkill::new(
        req.skill_name.unwrap_or_default(),
        req.category,
        req.description,
    )?;
    let skill = state.store.create_skill(skill).await?;
    Ok((StatusCode::CREATED, Json(skill)))
}

pub async fn update_skill(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(req): Json<SkillRequest>,
) -> Result<Json<Skill>> {
    let patch = SkillPatch::new(req.skill_name, req.category, req.description);
    state
        .store
        .update_skill(id, patch)
        .await?
        .map(Json)
        .ok_or_else(|| Error::not_found("Skill"))
}

pub async fn delete_skill(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<Value>> {
    if !state.store.delete_skill(id).await? {
        return Err(Error::not_found("Skill"));
    }
    Ok(Json(json!({ "success": true })))
}
