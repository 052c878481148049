use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgRow;
use sqlx::{FromRow, Row};

use crate::error::{Error, Result};
use crate::models::{decode_text, non_blank, required, ProjectStatus};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: i32,
    #[serde(rename = "project_name")]
    pub name: String,
    pub description: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub status: ProjectStatus,
    pub created_at: DateTime<Utc>,
}

impl<'r> FromRow<'r, PgRow> for Project {
    fn from_row(row: &'r PgRow) -> std::result::Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            name: row.try_get("project_name")?,
            description: row.try_get("description")?,
            start_date: row.try_get("start_date")?,
            end_date: row.try_get("end_date")?,
            status: decode_text(row, "status")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct NewProject {
    pub name: String,
    pub description: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub status: ProjectStatus,
}

impl NewProject {
    pub fn new(
        name: String,
        description: Option<String>,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
        status: Option<ProjectStatus>,
    ) -> Result<Self> {
        check_dates(start_date, end_date)?;
        Ok(Self {
            name: required("project_name", name)?,
            description: non_blank(description),
            start_date,
            end_date,
            status: status.unwrap_or_default(),
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct ProjectPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub status: Option<ProjectStatus>,
}

impl ProjectPatch {
    pub fn new(
        name: Option<String>,
        description: Option<String>,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
        status: Option<ProjectStatus>,
    ) -> Self {
        Self {
            name: non_blank(name),
            description: non_blank(description),
            start_date,
            end_date,
            status,
        }
    }

    pub fn apply(self, project: &mut Project) {
        if let Some(name) = self.name {
            project.name = name;
        }
        if let Some(description) = self.description {
            project.description = Some(description);
        }
        if let Some(start_date) = self.start_date {
            project.start_date = Some(start_date);
        }
        if let Some(end_date) = self.end_date {
            project.end_date = Some(end_date);
        }
        if let Some(status) = self.status {
            project.status = status;
        }
    }
}

/// Parses an optional `YYYY-MM-DD` date, treating blanks as unset.
pub fn parse_date(field: &str, value: Option<String>) -> Result<Option<NaiveDate>> {
    non_blank(value)
        .map(|raw| {
            NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
                .map_err(|_| Error::InvalidInput(format!("{field} must be a YYYY-MM-DD date")))
        })
        .transpose()
}

fn check_dates(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Result<()> {
    match (start, end) {
        (Some(start), Some(end)) if end < start => Err(Error::InvalidInput(
            "end_date must not be before start_date".to_string(),
        )),
        _ => Ok(()),
    }
}
