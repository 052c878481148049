use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::error;

use crate::error::Error;

impl Error {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Error::Conflict(_) => StatusCode::CONFLICT,
            Error::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            Error::Storage(_) | Error::Migration(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(error = %self, "request failed");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn maps_taxonomy_to_status() {
        assert_eq!(Error::not_found("Skill").status_code(), StatusCode::NOT_FOUND);
        assert_eq!(Error::InvalidInput("x".into()).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(Error::Conflict("x".into()).status_code(), StatusCode::CONFLICT);
        assert_eq!(
            Error::Timeout(Duration::from_secs(1)).status_code(),
            StatusCode::GATEWAY_TIMEOUT
        );
        assert_eq!(
            Error::Storage(sqlx::Error::PoolTimedOut).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
