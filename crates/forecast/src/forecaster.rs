use restocker_demand::DemandPoint;

use crate::error::ForecastError;
use crate::prediction::Prediction;

/// Demand predictor boundary.
///
/// Implementations take the full daily demand series in one call and return
/// one prediction per product. The predictor is treated as a pure function
/// of the batch: callers own retry policy, implementations must not retry
/// internally.
#[async_trait::async_trait]
pub trait Forecaster: Send + Sync {
    /// Predict upcoming demand for every product present in `demand`.
    ///
    /// An empty batch is legal and yields an empty prediction set.
    async fn predict(&self, demand: &[DemandPoint]) -> Result<Vec<Prediction>, ForecastError>;
}
