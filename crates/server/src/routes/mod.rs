//! Route table and middleware assembly.

/// Deployment, compilation, and estimation endpoints
pub mod deployment;
/// Security audit endpoints
pub mod security;

use axum::{
    http::Method,
    response::Json,
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use tower_http::cors::{Any, CorsLayer};

use crate::ApiState;

/// Build the full application router.
pub fn router(state: ApiState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/api/deployment/chains", get(deployment::chains))
        .route("/api/deployment/compile", post(deployment::compile))
        .route("/api/deployment/deploy", post(deployment::deploy))
        .route("/api/deployment/estimate-gas", post(deployment::estimate_gas))
        .route("/api/security/audit", post(security::audit))
        .route("/api/security/slither", post(security::slither))
        .route("/api/security/mythril", post(security::mythril))
        .layer(
            CorsLayer::new()
                .allow_methods([Method::POST, Method::GET])
                .allow_headers(Any)
                .allow_origin(Any),
        )
        .with_state(state)
}

async fn root() -> Json<Value> {
    Json(json!({
        "service": "InfraForge API",
        "health": "/health",
        "chains": "/api/deployment/chains",
    }))
}

async fn health() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": "infraforge",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
