//! HTTP API application wiring (Axum router + service wiring).
//!
//! Layout:
//! - `services.rs`: infrastructure wiring (stores, predictor, workflows)
//! - `routes/`: HTTP routes + handlers
//! - `dto.rs`: request/response DTOs and JSON mapping helpers
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{routing::get, Extension, Router};
use tower::ServiceBuilder;

use crate::config::AppConfig;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub async fn build_app(config: &AppConfig) -> Router {
    let services = Arc::new(services::build_services(config).await);
    build_app_with_services(services)
}

/// Router over already-built services. Split out so tests can seed the
/// store before serving.
pub fn build_app_with_services(services: Arc<services::AppServices>) -> Router {
    let triggers = routes::router().layer(Extension(services));

    Router::new()
        .route("/health", get(routes::system::health))
        .merge(triggers)
        .layer(ServiceBuilder::new())
}
