//! Predictor wire protocol.
//!
//! The predictor speaks JSON with camelCase field names: the request body is
//! a flat array of daily demand records, the response a flat array of
//! per-product predictions. Field absence is legal on the response side.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use restocker_core::ProductId;
use restocker_demand::DemandPoint;

use crate::prediction::Prediction;

/// One daily demand record as sent to the predictor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DemandRecord {
    pub product_id: ProductId,
    pub sold: i64,
    pub date: NaiveDate,
}

impl From<&DemandPoint> for DemandRecord {
    fn from(point: &DemandPoint) -> Self {
        Self {
            product_id: point.product_id,
            sold: point.quantity_sold,
            date: point.date,
        }
    }
}

/// One per-product prediction as returned by the predictor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionRecord {
    pub product_id: ProductId,
    #[serde(default)]
    pub predicted: Option<f64>,
    #[serde(default)]
    pub forecast_date: Option<NaiveDate>,
}

impl From<PredictionRecord> for Prediction {
    fn from(record: PredictionRecord) -> Self {
        Self {
            product_id: record.product_id,
            predicted: record.predicted,
            forecast_date: record.forecast_date,
        }
    }
}

impl From<Prediction> for PredictionRecord {
    fn from(prediction: Prediction) -> Self {
        Self {
            product_id: prediction.product_id,
            predicted: prediction.predicted,
            forecast_date: prediction.forecast_date,
        }
    }
}
