use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::api::extract::{Json, Path};
use crate::api::AppState;
use crate::error::{Error, Result};
use crate::models::{
    non_blank, parse_date, NewProject, ProficiencyLevel, Project, ProjectPatch,
    ProjectRequiredSkill, ProjectStatus,
};

#[derive(Debug, Deserialize)]
pub struct ProjectRequest {
    pub project_name: Option<String>,
    pub description: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RequirementRequest {
    pub skill_id: Option<i32>,
    pub minimum_proficiency_level: Option<String>,
}

fn status(raw: Option<String>) -> Result<Option<ProjectStatus>> {
    non_blank(raw).map(|value| value.parse()).transpose()
}

fn minimum(raw: Option<String>) -> Result<ProficiencyLevel> {
    non_blank(raw)
        .ok_or_else(|| Error::InvalidInput("minimum_proficiency_level is required".to_string()))?
        .parse()
}

pub async fn list_projects(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Project>>> {
    Ok(Json(state.store.list_projects().await?))
}

pub async fn get_project(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<Project>> {
    state
        .store
        .get_project(id)
        .await?
        .map(Json)
        .ok_or_else(|| Error::not_found("Project"))
}

pub async fn create_project(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ProjectRequest>,
) -> Result<(StatusCode, Json<Project>)> {
    let project = NewProject::new(
        req.project_name.unwrap_or_default(),
        req.description,
        parse_date("start_date", req.start_date)?,
        parse_date("end_date", req.end_date)?,
        status(req.status)?,
    )?;
    let project = state.store.create_project(project).await?;
    Ok((StatusCode::CREATED, Json(project)))
}

pub async fn update_project(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(req): Json<ProjectRequest>,
) -> Result<Json<Project>> {
    let patch = ProjectPatch::new(
        req.project_name,
        req.description,
        parse_date("start_date", req.start_date)?,
        parse_date("end_date", req.end_date)?,
        status(req.status)?,
    );
    state
        .store
        .update_project(id, patch)
        .await?
        .map(Json)
        .ok_or_else(|| Error::not_found("Project"))
}

pub async fn delete_project(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<Value>> {
    if !state.store.delete_project(id).await? {
        return Err(Error::not_found("Project"));
    }
    Ok(Json(json!({ "success": true })))
}

pub async fn list_requirements(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<Vec<ProjectRequiredSkill>>> {
    Ok(Json(state.store.list_project_requirements(id).await?))
}

pub async fn add_requirement(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(req): Json<RequirementRequest>,
) -> Result<(StatusCode, Json<Value>)> {
    let Some(skill_id) = req.skill_id else {
        return Err(Error::InvalidInput(
            "skill_id and minimum_proficiency_level are required".to_string(),
        ));
    };
    let level = minimum(req.minimum_proficiency_level)?;

    state.store.add_requirement(id, skill_id, level).await?;
    Ok((StatusCode::CREATED, Json(json!({ "created": true }))))
}

pub async fn update_requirement(
    State(state): State<Arc<AppState>>,
    Path((id, skill_id)): Path<(i32, i32)>,
    Json(req): Json<RequirementRequest>,
) -> Result<Json<Value>> {
    let level = minimum(req.minimum_proficiency_level)?;
    if !state.store.update_requirement(id, skill_id, level).await? {
        return Err(Error::not_found("Requirement"));
    }
    Ok(Json(json!({ "updated": true })))
}

pub async fn remove_requirement(
    State(state): State<Arc<AppState>>,
    Path((id, skill_id)): Path<(i32, i32)>,
) -> Result<Json<Value>> {
    if !state.store.remove_requirement(id, skill_id).await? {
        return Err(Error::not_found("Requirement"));
    }
    Ok(Json(json!({ "deleted": true })))
}
