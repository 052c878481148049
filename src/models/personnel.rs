use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgRow;
use sqlx::{FromRow, Row};

use crate::error::Result;
use crate::models::{decode_optional_text, non_blank, required, ExperienceLevel};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Personnel {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub role: Option<String>,
    pub experience_level: Option<ExperienceLevel>,
    pub created_at: DateTime<Utc>,
}

impl<'r> FromRow<'r, PgRow> for Personnel {
    fn from_row(row: &'r PgRow) -> std::result::Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            email: row.try_get("email")?,
            role: row.try_get("role")?,
            experience_level: decode_optional_text(row, "experience_level")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct NewPersonnel {
    pub name: String,
    pub email: String,
    pub role: Option<String>,
    pub experience_level: Option<ExperienceLevel>,
}

impl NewPersonnel {
    pub fn new(
        name: String,
        email: String,
        role: Option<String>,
        experience_level: Option<ExperienceLevel>,
    ) -> Result<Self> {
        Ok(Self {
            name: required("name", name)?,
            email: required("email", email)?,
            role: non_blank(role),
            experience_level,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct PersonnelPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
    pub experience_level: Option<ExperienceLevel>,
}

impl PersonnelPatch {
    pub fn new(
        name: Option<String>,
        email: Option<String>,
        role: Option<String>,
        experience_level: Option<ExperienceLevel>,
    ) -> Self {
        Self {
            name: non_blank(name),
            email: non_blank(email),
            role: non_blank(role),
            experience_level,
        }
    }

    pub fn apply(self, personnel: &mut Personnel) {
        if let Some(name) = self.name {
            personnel.name = name;
        }
        if let Some(email) = self.email {
            personnel.email = email;
        }
        if let Some(role) = self.role {
            personnel.role = Some(role);
        }
        if let Some(level) = self.experience_level {
            personnel.experience_level = Some(level);
        }
    }
}
