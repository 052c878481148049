//! JSON HTTP API.

mod error;
mod extract;
mod health;
mod matching;
mod personnel;
mod projects;
mod skills;

use std::sync::Arc;

use axum::http::HeaderValue;
use axum::routing::{get, put};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::config::Config;
use crate::db::Store;
use crate::matching::MatchingEngine;

pub struct AppState {
    pub store: Store,
    pub engine: MatchingEngine,
}

impl AppState {
    pub fn new(store: Store, config: &Config) -> Self {
        let engine = MatchingEngine::new(Arc::clone(&store)).with_timeout(config.query_timeout());
        Self { store, engine }
    }
}

pub fn configure_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/health", get(health::health))
        .route("/api/health/db", get(health::db_health))
        .route("/api/skills", get(skills::list_skills).post(skills::create_skill))
        .route(
            "/api/skills/:id",
            get(skills::get_skill)
                .put(skills::update_skill)
                .delete(skills::delete_skill),
        )
        .route(
            "/api/personnel",
            get(personnel::list_personnel).post(personnel::create_personnel),
        )
        .route(
            "/api/personnel/:id",
            get(personnel::get_personnel)
                .put(personnel::update_personnel)
                .delete(personnel::delete_personnel),
        )
        .route(
            "/api/personnel/:id/skills",
            get(personnel::list_personnel_skills).post(personnel::assign_skill),
        )
        .route(
            "/api/personnel/:id/skills/:skill_id",
            put(personnel::update_personnel_skill)
                .delete(personnel::remove_personnel_skill),
        )
        .route("/api/projects", get(projects::list_projects).post(projects::create_project))
        .route(
            "/api/projects/:id",
            get(projects::get_project)
                .put(projects::update_project)
                .delete(projects::delete_project),
        )
        .route(
            "/api/projects/:id/requirements",
            get(projects::list_requirements).post(projects::add_requirement),
        )
        .route(
            "/api/projects/:id/requirements/:skill_id",
            put(projects::update_requirement).delete(projects::remove_requirement),
        )
        .route("/api/matching/search/personnel", get(matching::search_personnel))
        .route(
            "/api/matching/utilization/personnel",
            get(matching::personnel_utilization),
        )
        .route("/api/matching/:project_id", get(matching::match_personnel))
}

fn cors_layer(origin: Option<&str>) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    match origin.map(HeaderValue::from_str) {
        Some(Ok(origin)) => layer.allow_origin(origin),
        Some(Err(_)) => {
            warn!("CORS_ORIGIN is not a valid header value, allowing any origin");
            layer.allow_origin(Any)
        }
        None => layer.allow_origin(Any),
    }
}

/// The full application: routes, shared state, CORS and request tracing.
pub fn app(store: Store, config: &Config) -> Router {
    let state = Arc::new(AppState::new(store, config));

    configure_routes()
        .layer(cors_layer(config.cors_origin.as_deref()))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn serve(store: Store, config: &Config) -> anyhow::Result<()> {
    let addr = config.bind_addr()?;
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "API server listening");

    axum::serve(listener, app(store, config))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("API server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to listen for shutdown signal");
    }
}
