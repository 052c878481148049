use serde::Serialize;
use sqlx::postgres::PgRow;
use sqlx::{FromRow, Row};

use crate::models::{decode_text, ProficiencyLevel};

/// A skill held by a person, joined with the skill's name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PersonnelSkill {
    pub personnel_id: i32,
    pub skill_id: i32,
    pub skill_name: String,
    pub proficiency_level: ProficiencyLevel,
}

impl<'r> FromRow<'r, PgRow> for PersonnelSkill {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            personnel_id: row.try_get("personnel_id")?,
            skill_id: row.try_get("skill_id")?,
            skill_name: row.try_get("skill_name")?,
            proficiency_level: decode_text(row, "proficiency_level")?,
        })
    }
}

/// A project's minimum proficiency on one skill, joined with the skill's name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectRequiredSkill {
    pub project_id: i32,
    pub skill_id: i32,
    pub skill_name: String,
    pub minimum_proficiency_level: ProficiencyLevel,
}

impl<'r> FromRow<'r, PgRow> for ProjectRequiredSkill {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            project_id: row.try_get("project_id")?,
            skill_id: row.try_get("skill_id")?,
            skill_name: row.try_get("skill_name")?,
            minimum_proficiency_level: decode_text(row, "minimum_proficiency_level")?,
        })
    }
}

/// Result of assigning a skill to a person: the pair was new, or its level replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignOutcome {
    Created,
    Updated,
}
