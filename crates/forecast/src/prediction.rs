use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use restocker_core::ProductId;

/// Raw predictor output for one product.
///
/// Both value fields are optional: the predictor contract allows either to
/// be absent and downstream code must cope without failing the run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub product_id: ProductId,
    pub predicted: Option<f64>,
    pub forecast_date: Option<NaiveDate>,
}

/// Resolved forecast for one product: what gets persisted and what the
/// reconciler reads.
///
/// Invariant: at most one authoritative result per (product, forecast_date);
/// a new computation replaces the old value rather than accumulating rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResult {
    pub product_id: ProductId,
    pub forecast_date: NaiveDate,
    pub predicted_qty: f64,
}

impl ForecastResult {
    /// Resolve a raw prediction into a storable result.
    ///
    /// A missing predicted quantity coerces to `0.0` and a missing forecast
    /// date falls back to `fallback_date` (the caller's "today"). Negative
    /// quantities clamp to `0.0`. Coercion never fails.
    pub fn from_prediction(raw: Prediction, fallback_date: NaiveDate) -> Self {
        Self {
            product_id: raw.product_id,
            forecast_date: raw.forecast_date.unwrap_or(fallback_date),
            predicted_qty: raw.predicted.unwrap_or(0.0).max(0.0),
        }
    }
}
