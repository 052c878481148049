use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};
use tracing::{debug, info};

use crate::config::Config;
use crate::db::{Repository, StoreHealth};
use crate::error::{Error, Result};
use crate::models::{
    AssignOutcome, NewPersonnel, NewProject, NewSkill, Personnel, PersonnelPatch, PersonnelSkill,
    ProficiencyLevel, Project, ProjectPatch, ProjectRequiredSkill, Skill, SkillPatch,
};

const PERSONNEL_SKILL_COLUMNS: &str = r#"
    ps.personnel_id, ps.skill_id, s.skill_name, ps.proficiency_level
"#;

const REQUIREMENT_COLUMNS: &str = r#"
    prs.project_id, prs.skill_id, s.skill_name, prs.minimum_proficiency_level
"#;

/// PostgreSQL-backed repository over a connection pool.
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Create a new Database instance with a connection pool
    pub async fn new(config: &Config) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.db_max_connections)
            .connect(config.database_url()?)
            .await?;

        info!(max_connections = config.db_max_connections, "database pool ready");
        Ok(Self::from_pool(pool))
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get a reference to the connection pool
    pub fn get_pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        info!("migrations applied");
        Ok(())
    }

    async fn email_taken(&self, email: &str, except_id: Option<i32>) -> Result<bool> {
        let existing: Option<i32> = sqlx::query_scalar(
            "SELECT id FROM personnel WHERE email = $1 AND ($2::int IS NULL OR id <> $2)",
        )
        .bind(email)
        .bind(except_id)
        .fetch_optional(self.get_pool())
        .await?;

        Ok(existing.is_some())
    }
}

#[async_trait]
impl Repository for Database {
    async fn list_skills(&self) -> Result<Vec<Skill>> {
        let skills = sqlx::query_as::<_, Skill>(
            "SELECT * FROM skills ORDER BY LOWER(skill_name) ASC, skill_name ASC",
        )
        .fetch_all(self.get_pool())
        .await?;

        Ok(skills)
    }

    async fn get_skill(&self, id: i32) -> Result<Option<Skill>> {
        let skill = sqlx::query_as::<_, Skill>("SELECT * FROM skills WHERE id = $1")
            .bind(id)
            .fetch_optional(self.get_pool())
            .await?;

        Ok(skill)
    }

    async fn create_skill(&self, skill: NewSkill) -> Result<Skill> {
        let skill = sqlx::query_as::<_, Skill>(
            r#"
            INSERT INTO skills (skill_name, category, description)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(&skill.name)
        .bind(&skill.category)
        .bind(&skill.description)
        .fetch_one(self.get_pool())
        .await?;

        debug!(skill_id = skill.id, "skill created");
        Ok(skill)
    }

    async fn update_skill(&self, id: i32, patch: SkillPatch) -> Result<Option<Skill>> {
        let skill = sqlx::query_as::<_, Skill>(
            r#"
            UPDATE skills
            SET skill_name = COALESCE($1, skill_name),
                category = COALESCE($2, category),
                description = COALESCE($3, description)
            WHERE id = $4
            RETURNING *
            "#,
        )
        .bind(patch.name)
        .bind(patch.category)
        .bind(patch.description)
        .bind(id)
        .fetch_optional(self.get_pool())
        .await?;

        Ok(skill)
    }

    async fn delete_skill(&self, id: i32) -> Result<bool> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM personnel_skills WHERE skill_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM project_required_skills WHERE skill_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM skills WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_personnel(&self) -> Result<Vec<Personnel>> {
        let personnel = sqlx::query_as::<_, Personnel>(
            "SELECT * FROM personnel ORDER BY created_at DESC, id DESC",
        )
        .fetch_all(self.get_pool())
        .await?;

        Ok(personnel)
    }

    async fn get_personnel(&self, id: i32) -> Result<Option<Personnel>> {
        let personnel = sqlx::query_as::<_, Personnel>("SELECT * FROM personnel WHERE id = $1")
            .bind(id)
            .fetch_optional(self.get_pool())
            .await?;

        Ok(personnel)
    }

    async fn create_personnel(&self, personnel: NewPersonnel) -> Result<Personnel> {
        if self.email_taken(&personnel.email, None).await? {
            return Err(Error::Conflict("Email already exists".to_string()));
        }

        let personnel = sqlx::query_as::<_, Personnel>(
            r#"
            INSERT INTO personnel (name, email, role, experience_level)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(&personnel.name)
        .bind(&personnel.email)
        .bind(&personnel.role)
        .bind(personnel.experience_level.map(|level| level.as_str()))
        .fetch_one(self.get_pool())
        .await?;

        debug!(personnel_id = personnel.id, "personnel created");
        Ok(personnel)
    }

    async fn update_personnel(&self, id: i32, patch: PersonnelPatch) -> Result<Option<Personnel>> {
        if let Some(email) = &patch.email {
            if self.email_taken(email, Some(id)).await? {
                return Err(Error::Conflict("Email already exists".to_string()));
            }
        }

        let personnel = sqlx::query_as::<_, Personnel>(
            r#"
            UPDATE personnel
            SET name = COALESCE($1, name),
                email = COALESCE($2, email),
                role = COALESCE($3, role),
                experience_level = COALESCE($4, experience_level)
            WHERE id = $5
            RETURNING *
            "#,
        )
        .bind(patch.name)
        .bind(patch.email)
        .bind(patch.role)
        .bind(patch.experience_level.map(|level| level.as_str()))
        .bind(id)
        .fetch_optional(self.get_pool())
        .await?;

        Ok(personnel)
    }

    async fn delete_personnel(&self, id: i32) -> Result<bool> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM personnel_skills WHERE personnel_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM personnel WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_personnel_skills(&self, personnel_id: i32) -> Result<Vec<PersonnelSkill>> {
        let sql = format!(
            "SELECT {PERSONNEL_SKILL_COLUMNS} FROM personnel_skills ps \
             JOIN skills s ON s.id = ps.skill_id \
             WHERE ps.personnel_id = $1 ORDER BY LOWER(s.skill_name) ASC, s.skill_name ASC"
        );
        let skills = sqlx::query_as::<_, PersonnelSkill>(&sql)
            .bind(personnel_id)
            .fetch_all(self.get_pool())
            .await?;

        Ok(skills)
    }

    async fn list_all_personnel_skills(&self) -> Result<Vec<PersonnelSkill>> {
        let sql = format!(
            "SELECT {PERSONNEL_SKILL_COLUMNS} FROM personnel_skills ps \
             JOIN skills s ON s.id = ps.skill_id \
             ORDER BY ps.personnel_id ASC, LOWER(s.skill_name) ASC, s.skill_name ASC"
        );
        let skills = sqlx::query_as::<_, PersonnelSkill>(&sql)
            .fetch_all(self.get_pool())
            .await?;

        Ok(skills)
    }

    async fn assign_skill(
        &self,
        personnel_id: i32,
        skill_id: i32,
        level: ProficiencyLevel,
    ) -> Result<AssignOutcome> {
        let mut tx = self.pool.begin().await?;

        let existing: Option<i32> = sqlx::query_scalar(
            "SELECT id FROM personnel_skills WHERE personnel_id = $1 AND skill_id = $2",
        )
        .bind(personnel_id)
        .bind(skill_id)
        .fetch_optional(&mut *tx)
        .await?;

        let outcome = if existing.is_some() {
            sqlx::query(
                "UPDATE personnel_skills SET proficiency_level = $1 \
                 WHERE personnel_id = $2 AND skill_id = $3",
            )
            .bind(level.as_str())
            .bind(personnel_id)
            .bind(skill_id)
            .execute(&mut *tx)
            .await?;
            AssignOutcome::Updated
        } else {
            sqlx::query(
                "INSERT INTO personnel_skills (personnel_id, skill_id, proficiency_level) \
                 VALUES ($1, $2, $3)",
            )
            .bind(personnel_id)
            .bind(skill_id)
            .bind(level.as_str())
            .execute(&mut *tx)
            .await?;
            AssignOutcome::Created
        };

        tx.commit().await?;

        Ok(outcome)
    }

    async fn update_personnel_skill(
        &self,
        personnel_id: i32,
        skill_id: i32,
        level: ProficiencyLevel,
    ) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE personnel_skills SET proficiency_level = $1 \
             WHERE personnel_id = $2 AND skill_id = $3",
        )
        .bind(level.as_str())
        .bind(personnel_id)
        .bind(skill_id)
        .execute(self.get_pool())
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn remove_personnel_skill(&self, personnel_id: i32, skill_id: i32) -> Result<bool> {
        let result =
            sqlx::query("DELETE FROM personnel_skills WHERE personnel_id = $1 AND skill_id = $2")
                .bind(personnel_id)
                .bind(skill_id)
                .execute(self.get_pool())
                .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_projects(&self) -> Result<Vec<Project>> {
        let projects = sqlx::query_as::<_, Project>(
            "SELECT * FROM projects ORDER BY created_at DESC, id DESC",
        )
        .fetch_all(self.get_pool())
        .await?;

        Ok(projects)
    }

    async fn get_project(&self, id: i32) -> Result<Option<Project>> {
        let project = sqlx::query_as::<_, Project>("SELECT * FROM projects WHERE id = $1")
            .bind(id)
            .fetch_optional(self.get_pool())
            .await?;

        Ok(project)
    }

    async fn create_project(&self, project: NewProject) -> Result<Project> {
        let project = sqlx::query_as::<_, Project>(
            r#"
            INSERT INTO projects (project_name, description, start_date, end_date, status)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(&project.name)
        .bind(&project.description)
        .bind(project.start_date)
        .bind(project.end_date)
        .bind(project.status.as_str())
        .fetch_one(self.get_pool())
        .await?;

        debug!(project_id = project.id, "project created");
        Ok(project)
    }

    async fn update_project(&self, id: i32, patch: ProjectPatch) -> Result<Option<Project>> {
        let project = sqlx::query_as::<_, Project>(
            r#"
            UPDATE projects
            SET project_name = COALESCE($1, project_name),
                description = COALESCE($2, description),
                start_date = COALESCE($3, start_date),
                end_date = COALESCE($4, end_date),
                status = COALESCE($5, status)
            WHERE id = $6
            RETURNING *
            "#,
        )
        .bind(patch.name)
        .bind(patch.description)
        .bind(patch.start_date)
        .bind(patch.end_date)
        .bind(patch.status.map(|status| status.as_str()))
        .bind(id)
        .fetch_optional(self.get_pool())
        .await?;

        Ok(project)
    }

    async fn delete_project(&self, id: i32) -> Result<bool> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM project_required_skills WHERE project_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_project_requirements(&self, project_id: i32) -> Result<Vec<ProjectRequiredSkill>> {
        let sql = format!(
            "SELECT {REQUIREMENT_COLUMNS} FROM project_required_skills prs \
             JOIN skills s ON s.id = prs.skill_id \
             WHERE prs.project_id = $1 ORDER BY LOWER(s.skill_name) ASC, s.skill_name ASC"
        );
        let requirements = sqlx::query_as::<_, ProjectRequiredSkill>(&sql)
            .bind(project_id)
            .fetch_all(self.get_pool())
            .await?;

        Ok(requirements)
    }

    async fn list_all_requirements(&self) -> Result<Vec<ProjectRequiredSkill>> {
        let sql = format!(
            "SELECT {REQUIREMENT_COLUMNS} FROM project_required_skills prs \
             JOIN skills s ON s.id = prs.skill_id \
             ORDER BY prs.project_id ASC, LOWER(s.skill_name) ASC, s.skill_name ASC"
        );
        let requirements = sqlx::query_as::<_, ProjectRequiredSkill>(&sql)
            .fetch_all(self.get_pool())
            .await?;

        Ok(requirements)
    }

    async fn add_requirement(
        &self,
        project_id: i32,
        skill_id: i32,
        minimum: ProficiencyLevel,
    ) -> Result<()> {
        sqlx::query(
            "INSERT INTO project_required_skills (project_id, skill_id, minimum_proficiency_level) \
             VALUES ($1, $2, $3)",
        )
        .bind(project_id)
        .bind(skill_id)
        .bind(minimum.as_str())
        .execute(self.get_pool())
        .await?;

        Ok(())
    }

    async fn update_requirement(
        &self,
        project_id: i32,
        skill_id: i32,
        minimum: ProficiencyLevel,
    ) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE project_required_skills SET minimum_proficiency_level = $1 \
             WHERE project_id = $2 AND skill_id = $3",
        )
        .bind(minimum.as_str())
        .bind(project_id)
        .bind(skill_id)
        .execute(self.get_pool())
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn remove_requirement(&self, project_id: i32, skill_id: i32) -> Result<bool> {
        let result = sqlx::query(
            "DELETE FROM project_required_skills WHERE project_id = $1 AND skill_id = $2",
        )
        .bind(project_id)
        .bind(skill_id)
        .execute(self.get_pool())
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn health(&self) -> Result<StoreHealth> {
        let row = sqlx::query(
            "SELECT version() AS version, current_database() AS name, NOW() AS time",
        )
        .fetch_one(self.get_pool())
        .await?;

        Ok(StoreHealth {
            connected: true,
            version: row.try_get("version")?,
            name: row.try_get("name")?,
            time: row.try_get("time")?,
        })
    }
}
