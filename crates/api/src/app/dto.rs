//! Request/response DTOs and JSON mapping helpers.
//!
//! Wire field names are camelCase to match the predictor service's
//! conventions (`passId`, `autoPOs`).

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use restocker_forecast::ForecastResult;
use restocker_infra::{ForecastRunReport, UpsertFailure};
use restocker_replenish::{IssueFailure, IssueReport};

/// Body of `POST /api/po/auto`. Both fields optional; the server fills in
/// a day-scoped pass id and the system user.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AutoPurchaseOrdersRequest {
    pub pass_id: Option<String>,
    pub requested_by: Option<Uuid>,
}

/// Response of `POST /api/forecast/run`.
#[derive(Debug, Serialize)]
pub struct ForecastRunResponse {
    pub message: &'static str,
    pub forecast: Vec<ForecastResult>,
    pub stored: usize,
    pub failed: Vec<UpsertFailure>,
}

impl From<ForecastRunReport> for ForecastRunResponse {
    fn from(report: ForecastRunReport) -> Self {
        Self {
            message: "Forecast completed",
            forecast: report.results,
            stored: report.stored,
            failed: report.failures,
        }
    }
}

/// Response of `POST /api/po/auto`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoPurchaseOrdersResponse {
    #[serde(rename = "autoPOs")]
    pub auto_pos: usize,
    pub duplicates: usize,
    pub notice_failures: usize,
    pub failed: Vec<IssueFailure>,
    pub pass_id: String,
}

impl From<IssueReport> for AutoPurchaseOrdersResponse {
    fn from(report: IssueReport) -> Self {
        Self {
            auto_pos: report.created,
            duplicates: report.duplicates,
            notice_failures: report.notice_failures,
            failed: report.failures,
            pass_id: report.pass_id.as_str().to_string(),
        }
    }
}
