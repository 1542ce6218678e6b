//! Route definitions for the CollabVoice HTTP API.
//!
//! Auth routes are mounted under `/api/auth`, matching the paths the
//! frontend calls. The router receives `AppState` and passes it to all
//! handlers via Axum's `State` extractor.

use axum::http::{HeaderValue, Method};
use axum::{
    Router,
    routing::{get, post},
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use collab_core::config::app::CorsConfig;

use crate::handlers;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = build_cors_layer(&state.config.server.cors);

    Router::new()
        .route("/", get(handlers::health::index))
        .route("/api/health", get(handlers::health::health))
        .nest("/api/auth", auth_routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Auth endpoints: register, login, OAuth, verify, logout,
/// invalidate-others.
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login))
        .route("/oauth/{provider}", post(handlers::auth::oauth_login))
        .route("/verify", get(handlers::auth::verify))
        .route("/logout", post(handlers::auth::logout))
        .route(
            "/sessions/invalidate-others",
            post(handlers::auth::invalidate_others),
        )
}

/// Builds a CORS tower layer from configuration.
///
/// Credentialed cross-site requests require explicit origins; the
/// wildcard disables credentials.
fn build_cors_layer(config: &CorsConfig) -> CorsLayer {
    let mut layer = CorsLayer::new();

    if config.allowed_origins.contains(&"*".to_string()) {
        layer = layer.allow_origin(Any);
    } else {
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        layer = layer.allow_origin(origins);
        layer = layer.allow_credentials(config.allow_credentials);
    }

    let methods: Vec<Method> = config
        .allowed_methods
        .iter()
        .filter_map(|m| m.parse().ok())
        .collect();
    layer = layer.allow_methods(methods);

    let headers: Vec<axum::http::HeaderName> = config
        .allowed_headers
        .iter()
        .filter_map(|h| h.parse().ok())
        .collect();
    layer = layer.allow_headers(headers);

    layer.max_age(std::time::Duration::from_secs(config.max_age_seconds as u64))
}
