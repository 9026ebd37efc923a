use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use restocker_forecast::ForecastError;
use restocker_infra::WorkflowError;

pub fn workflow_error_to_response(err: WorkflowError) -> axum::response::Response {
    match err {
        WorkflowError::Forecast(ForecastError::Unavailable(msg)) => {
            json_error(StatusCode::BAD_GATEWAY, "predictor_unavailable", msg)
        }
        WorkflowError::Forecast(ForecastError::Protocol(msg)) => {
            json_error(StatusCode::BAD_GATEWAY, "predictor_protocol_error", msg)
        }
        WorkflowError::Store(e) => json_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "store_error",
            e.to_string(),
        ),
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
