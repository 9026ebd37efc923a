//! Forecasting contract.
//!
//! Defines the predictor boundary (`Forecaster`), the raw/resolved
//! prediction types, the predictor wire protocol, and a built-in
//! weighted-moving-average predictor for deployments without an external
//! forecasting service.

pub mod error;
pub mod forecaster;
pub mod local;
pub mod prediction;
pub mod wire;

pub use error::ForecastError;
pub use forecaster::Forecaster;
pub use local::LocalForecaster;
pub use prediction::{ForecastResult, Prediction};
pub use wire::{DemandRecord, PredictionRecord};
