//! Route-Definitionen fuer die REST-API (/v1/...)

use axum::{
    http::{HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::rest::{handlers, AppState};

/// Erstellt den vollstaendigen Router inkl. CORS- und Trace-Layer
pub fn router(cors_origins: &[String]) -> Router<AppState> {
    // CORS konfigurieren: entweder spezifische Origins oder Any
    let cors = if cors_origins.is_empty() {
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = cors_origins.iter().filter_map(|o| o.parse().ok()).collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers(tower_http::cors::Any)
    };

    Router::new()
        // Health
        .route("/", get(handlers::health))
        // Benutzer
        .route("/v1/users", post(handlers::register))
        .route("/v1/users/:username/exists", get(handlers::username_exists))
        .route(
            "/v1/users/:username/login-attempts",
            get(handlers::login_attempts),
        )
        // Login
        .route("/v1/login", post(handlers::login))
        // Geschuetzte Ressource
        .route("/v1/me", get(handlers::me))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
