use std::sync::Arc;

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post, put},
};
use sqlx::SqlitePool;
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::auth::AuthSettings;
use crate::config::CorsConfig;
use crate::middleware::{auth_middleware, log_request};

mod auth;
mod checkout;
mod health;
mod index;
mod services;

#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthSettings>,
    pub pool: SqlitePool,
}

impl AppState {
    pub fn new(auth: AuthSettings, pool: SqlitePool) -> Self {
        Self {
            auth: Arc::new(auth),
            pool,
        }
    }
}

pub fn router(app_state: AppState) -> Router {
    let auth_gate = from_fn_with_state(app_state.clone(), auth_middleware);

    Router::new()
        // Health check endpoints (no auth required)
        .route("/health", get(health::health))
        .route("/ready", get(health::ready))
        .with_state(app_state.pool.clone())
        .route("/", get(index::page))
        .route(
            "/jwt",
            post(auth::issue_token).route_layer(from_fn(log_request)),
        )
        .route("/logout", post(auth::logout))
        .route(
            "/services",
            get(services::list)
                .route_layer(from_fn(log_request))
                .post(services::create),
        )
        .route("/services/{id}", get(services::detail))
        // Only the read is gated; layers wrap the routes registered before them
        .route(
            "/checkout",
            get(checkout::list)
                .route_layer(auth_gate)
                .route_layer(from_fn(log_request))
                .post(checkout::create),
        )
        .route(
            "/checkout/{id}",
            put(checkout::update).delete(checkout::delete),
        )
        .with_state(app_state)
}

/// Credentialed CORS for the configured front-end origins
pub fn cors_layer(config: &CorsConfig) -> anyhow::Result<CorsLayer> {
    let origins = config
        .allowed_origins
        .iter()
        .map(|origin| HeaderValue::from_str(origin))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE]))
}
