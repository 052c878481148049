use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::api::extract::{Json, Path};
use crate::api::AppState;
use crate::error::{Error, Result};
use crate::models::{
    non_blank, AssignOutcome, ExperienceLevel, NewPersonnel, Personnel, PersonnelPatch,
    PersonnelSkill, ProficiencyLevel,
};

#[derive(Debug, Deserialize)]
pub struct PersonnelRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
    pub experience_level: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AssignSkillRequest {
    pub skill_id: Option<i32>,
    pub proficiency_level: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ProficiencyRequest {
    pub proficiency_level: Option<String>,
}

fn experience_level(raw: Option<String>) -> Result<Option<ExperienceLevel>> {
    non_blank(raw).map(|value| value.parse()).transpose()
}

fn proficiency(raw: Option<String>) -> Result<ProficiencyLevel> {
    non_blank(raw)
        .ok_or_else(|| Error::InvalidInput("Invalid proficiency_level".to_string()))?
        .parse()
}

pub async fn list_personnel(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Personnel>>> {
    Ok(Json(state.store.list_personnel().await?))
}

pub async fn get_personnel(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<Personnel>> {
    state
        .store
        .get_personnel(id)
        .await?
        .map(Json)
        .ok_or_else(|| Error::not_found("Personnel"))
}

pub async fn create_personnel(
    State(state): State<Arc<AppState>>,
    Json(req): Json<PersonnelRequest>,
) -> Result<(StatusCode, Json<Personnel>)> {
    let (Some(name), Some(email)) = (non_blank(req.name), non_blank(req.email)) else {
        return Err(Error::InvalidInput("Name and email are required".to_string()));
    };
    let personnel = NewPersonnel::new(name, email, req.role, experience_level(req.experience_level)?)?;
    let personnel = state.store.create_personnel(personnel).await?;
    Ok((StatusCode::CREATED, Json(personnel)))
}

pub async fn update_personnel(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(req): Json<PersonnelRequest>,
) -> Result<Json<Personnel>> {
    let patch = PersonnelPatch::new(
        req.name,
        req.email,
        req.role,
        experience_level(req.experience_level)?,
    );
    state
        .store
        .update_personnel(id, patch)
        .await?
        .map(Json)
        .ok_or_else(|| Error::not_found("Personnel"))
}

pub async fn delete_personnel(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<Value>> {
    if !state.store.delete_personnel(id).await? {
        return Err(Error::not_found("Personnel"));
    }
    Ok(Json(json!({ "success": true })))
}

pub async fn list_personnel_skills(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<Vec<PersonnelSkill>>> {
    Ok(Json(state.store.list_personnel_skills(id).await?))
}

pub async fn assign_skill(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(req): Json<AssignSkillRequest>,
) -> Result<(StatusCode, Json<Value>)> {
    let (Some(skill_id), Some(_)) = (req.skill_id, req.proficiency_level.as_deref()) else {
        return Err(Error::InvalidInput(
            "skill_id and proficiency_level are required".to_string(),
        ));
    };
    let level = proficiency(req.proficiency_level)?;

    match state.store.assign_skill(id, skill_id, level).await? {
        AssignOutcome::Created => Ok((StatusCode::CREATED, Json(json!({ "created": true })))),
        AssignOutcome::Updated => Ok((StatusCode::OK, Json(json!({ "updated": true })))),
    }
}

pub async fn update_personnel_skill(
    State(state): State<Arc<AppState>>,
    Path((id, skill_id)): Path<(i32, i32)>,
    Json(req): Json<ProficiencyRequest>,
) -> Result<Json<Value>> {
    let level = proficiency(req.proficiency_level)?;
    if !state.store.update_personnel_skill(id, skill_id, level).await? {
        return Err(Error::not_found("Assignment"));
    }
    Ok(Json(json!({ "updated": true })))
}

pub async fn remove_personnel_skill(
    State(state): State<Arc<AppState>>,
    Path((id, skill_id)): Path<(i32, i32)>,
) -> Result<Json<Value>> {
    if !state.store.remove_personnel_skill(id, skill_id).await? {
        return Err(Error::not_found("Assignment"));
    }
    Ok(Json(json!({ "deleted": true })))
}
