use std::sync::Arc;

use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};
use chrono::Utc;

use restocker_core::UserId;
use restocker_replenish::PassId;

use crate::app::services::AppServices;
use crate::app::{dto, errors};

/// `POST /api/po/auto`: reconcile stock against the latest forecasts and
/// issue purchase orders for the shortfalls.
///
/// The body is optional. Without a `passId` the pass is scoped to today,
/// which is what makes a same-day re-trigger idempotent.
pub async fn auto(
    Extension(services): Extension<Arc<AppServices>>,
    body: Option<Json<dto::AutoPurchaseOrdersRequest>>,
) -> axum::response::Response {
    let Json(body) = body.unwrap_or_default();

    let pass_id = match body.pass_id {
        Some(raw) => PassId::new(raw),
        None => PassId::for_day(Utc::now().date_naive()),
    };
    let requested_by = body.requested_by.map(UserId::from_uuid);

    match services.run_restock(pass_id, requested_by).await {
        Ok(report) => (
            StatusCode::OK,
            Json(dto::AutoPurchaseOrdersResponse::from(report)),
        )
            .into_response(),
        Err(e) => errors::workflow_error_to_response(e),
    }
}
