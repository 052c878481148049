use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use serde_json::{json, Value};
use tracing::warn;

use crate::api::AppState;

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok", "timestamp": Utc::now().to_rfc3339() }))
}

pub async fn db_health(State(state): State<Arc<AppState>>) -> Response {
    match state.store.health().await {
        Ok(database) => Json(json!({ "status": "ok", "database": database })).into_response(),
        Err(err) => {
            warn!(error = %err, "database health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "error": format!("Database health check failed: {err}") })),
            )
                .into_response()
        }
    }
}
