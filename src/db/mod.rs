//! Storage layer.
//!
//! `Repository` is the handle every other layer receives. `Database` backs it
//! with PostgreSQL, `MemoryStore` keeps everything in process.

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::Database;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::Config;
use crate::error::Result;
use crate::models::{
    AssignOutcome, NewPersonnel, NewProject, NewSkill, Personnel, PersonnelPatch, PersonnelSkill,
    ProficiencyLevel, Project, ProjectPatch, ProjectRequiredSkill, Skill, SkillPatch,
};

/// Result of probing the backing store.
#[derive(Debug, Clone, Serialize)]
pub struct StoreHealth {
    pub connected: bool,
    pub version: String,
    pub name: String,
    pub time: DateTime<Utc>,
}

/// Shared storage handle.
pub type Store = Arc<dyn Repository>;

#[async_trait]
pub trait Repository: Send + Sync {
    // Skill operations
    async fn list_skills(&self) -> Result<Vec<Skill>>;
    async fn get_skill(&self, id: i32) -> Result<Option<Skill>>;
    async fn create_skill(&self, skill: NewSkill) -> Result<Skill>;
    async fn update_skill(&self, id: i32, patch: SkillPatch) -> Result<Option<Skill>>;
    /// Removes the skill and every personnel/project row referencing it.
    async fn delete_skill(&self, id: i32) -> Result<bool>;

    // Personnel operations
    /// All personnel, newest first.
    async fn list_personnel(&self) -> Result<Vec<Personnel>>;
    async fn get_personnel(&self, id: i32) -> Result<Option<Personnel>>;
    async fn create_personnel(&self, personnel: NewPersonnel) -> Result<Personnel>;
    async fn update_personnel(&self, id: i32, patch: PersonnelPatch) -> Result<Option<Personnel>>;
    async fn delete_personnel(&self, id: i32) -> Result<bool>;

    // Personnel skill operations
    async fn list_personnel_skills(&self, personnel_id: i32) -> Result<Vec<PersonnelSkill>>;
    async fn list_all_personnel_skills(&self) -> Result<Vec<PersonnelSkill>>;
    async fn assign_skill(
        &self,
        personnel_id: i32,
        skill_id: i32,
        level: ProficiencyLevel,
    ) -> Result<AssignOutcome>;
    async fn update_personnel_skill(
        &self,
        personnel_id: i32,
        skill_id: i32,
        level: ProficiencyLevel,
    ) -> Result<bool>;
    async fn remove_personnel_skill(&self, personnel_id: i32, skill_id: i32) -> Result<bool>;

    // Project operations
    /// All projects, newest first.
    async fn list_projects(&self) -> Result<Vec<Project>>;
    async fn get_project(&self, id: i32) -> Result<Option<Project>>;
    async fn create_project(&self, project: NewProject) -> Result<Project>;
    async fn update_project(&self, id: i32, patch: ProjectPatch) -> Result<Option<Project>>;
    async fn delete_project(&self, id: i32) -> Result<bool>;

    // Requirement operations
    async fn list_project_requirements(&self, project_id: i32) -> Result<Vec<ProjectRequiredSkill>>;
    async fn list_all_requirements(&self) -> Result<Vec<ProjectRequiredSkill>>;
    async fn add_requirement(
        &self,
        project_id: i32,
        skill_id: i32,
        minimum: ProficiencyLevel,
    ) -> Result<()>;
    async fn update_requirement(
        &self,
        project_id: i32,
        skill_id: i32,
        minimum: ProficiencyLevel,
    ) -> Result<bool>;
    async fn remove_requirement(&self, project_id: i32, skill_id: i32) -> Result<bool>;

    async fn health(&self) -> Result<StoreHealth>;
}

/// Connect to PostgreSQL, optionally applying the bundled migrations.
pub async fn init(config: &Config, migrate: bool) -> Result<Store> {
    let db = Database::new(config).await?;

    if migrate {
        db.migrate().await?;
    }

    Ok(Arc::new(db))
}

/// A fresh, empty in-process store.
pub fn in_memory() -> Store {
    Arc::new(MemoryStore::new())
}
