use std::sync::Arc;

use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};

use crate::app::services::AppServices;
use crate::app::{dto, errors};

/// `POST /api/forecast/run`: aggregate sales history, call the predictor,
/// store the results.
pub async fn run(Extension(services): Extension<Arc<AppServices>>) -> axum::response::Response {
    match services.run_forecast().await {
        Ok(report) => (
            StatusCode::OK,
            Json(dto::ForecastRunResponse::from(report)),
        )
            .into_response(),
        Err(e) => errors::workflow_error_to_response(e),
    }
}
