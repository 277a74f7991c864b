//! # polyglot-api
//!
//! REST API layer for Polyglot: authentication, locale and translation CRUD,
//! and the streamed JSON export.

pub mod auth;
pub mod export;
pub mod extract;
pub mod middleware;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use polyglot_common::config::AppConfig;
use polyglot_db::Database;

/// Shared application state available to all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(db: Database, config: AppConfig) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }
}

/// Build the complete API router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let state = Arc::new(state);

    let api_routes = Router::new()
        .merge(routes::auth::router(state.clone()))
        .merge(routes::locales::router(state.clone()))
        .merge(routes::translations::router(state.clone()))
        .merge(routes::health::router());

    Router::new()
        .nest("/api", api_routes)
        .layer(axum::middleware::from_fn(middleware::security_headers))
        .layer(
            tower_http::cors::CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods(tower_http::cors::Any)
                .allow_headers(tower_http::cors::Any),
        )
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(state)
}
