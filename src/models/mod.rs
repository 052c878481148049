mod assignment;
mod levels;
mod personnel;
mod project;
mod skill;

pub use assignment::{AssignOutcome, PersonnelSkill, ProjectRequiredSkill};
pub use levels::{ExperienceLevel, ProficiencyLevel, ProjectStatus};
pub use personnel::{NewPersonnel, Personnel, PersonnelPatch};
pub use project::{parse_date, NewProject, Project, ProjectPatch};
pub use skill::{NewSkill, Skill, SkillPatch};

use std::cmp::Ordering;
use std::str::FromStr;

use sqlx::postgres::PgRow;
use sqlx::Row;

use crate::error::{Error, Result};

/// Blank strings count as "not supplied" for optional text fields.
pub fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Case-insensitive name ordering; the raw name breaks ties so the order is total.
pub fn name_order(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

pub(crate) fn required(field: &str, value: String) -> Result<String> {
    let value = value.trim().to_string();
    if value.is_empty() {
        return Err(Error::InvalidInput(format!("{field} is required")));
    }
    Ok(value)
}

/// Decodes a TEXT column into one of the level/status enums.
pub(crate) fn decode_text<T>(row: &PgRow, column: &str) -> std::result::Result<T, sqlx::Error>
where
    T: FromStr<Err = Error>,
{
    let raw: String = row.try_get(column)?;
    raw.parse().map_err(|e: Error| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(e),
    })
}

pub(crate) fn decode_optional_text<T>(
    row: &PgRow,
    column: &str,
) -> std::result::Result<Option<T>, sqlx::Error>
where
    T: FromStr<Err = Error>,
{
    let raw: Option<String> = row.try_get(column)?;
    raw.map(|value| value.parse())
        .transpose()
        .map_err(|e: Error| sqlx::Error::ColumnDecode {
            index: column.to_string(),
            source: Box::new(e),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_order_ignoring_case() {
        let mut names = vec!["Carol", "bob", "alice", "Bob"];
        names.sort_by(|a, b| name_order(a, b));
        assert_eq!(names, vec!["alice", "Bob", "bob", "Carol"]);
    }
}
