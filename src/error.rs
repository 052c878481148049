use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    InvalidInput(String),
    #[error("{0}")]
    Conflict(String),
    #[error("storage failure: {0}")]
    Storage(#[source] sqlx::Error),
    #[error("storage migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
    #[error("operation exceeded its {0:?} budget")]
    Timeout(std::time::Duration),
}

impl Error {
    pub fn not_found(what: &str) -> Self {
        Error::NotFound(format!("{what} not found"))
    }
}

// Postgres SQLSTATE codes for the constraint violations surfaced as typed errors.
const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";
const CHECK_VIOLATION: &str = "23514";

impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            match db_err.code().as_deref() {
                Some(UNIQUE_VIOLATION) => {
                    return Error::Conflict(conflict_message(db_err.constraint()));
                }
                Some(FOREIGN_KEY_VIOLATION) => {
                    return Error::NotFound("Referenced record not found".to_string());
                }
                Some(CHECK_VIOLATION) => {
                    return Error::InvalidInput(db_err.message().to_string());
                }
                _ => {}
            }
        }
        Error::Storage(err)
    }
}

fn conflict_message(constraint: Option<&str>) -> String {
    match constraint {
        Some("personnel_email_key") => "Email already exists".to_string(),
        Some("skills_skill_name_key") => "Skill name already exists".to_string(),
        Some("project_required_skills_project_id_skill_id_key") => {
            "Requirement already exists".to_string()
        }
        Some("personnel_skills_personnel_id_skill_id_key") => {
            "Assignment already exists".to_string()
        }
        _ => "Record already exists".to_string(),
    }
}
