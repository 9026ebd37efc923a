use axum::{routing::post, Router};

pub mod forecast;
pub mod orders;
pub mod system;

/// Router for the replenishment trigger endpoints.
pub fn router() -> Router {
    Router::new()
        .route("/api/forecast/run", post(forecast::run))
        .route("/api/po/auto", post(orders::auto))
}
