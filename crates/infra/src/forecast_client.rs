//! HTTP client for the external demand predictor.

use std::time::Duration;

use restocker_demand::DemandPoint;
use restocker_forecast::{DemandRecord, ForecastError, Forecaster, Prediction, PredictionRecord};

/// Calls the predictor service over HTTP.
///
/// One POST per run carrying the full demand batch; the configured timeout
/// bounds the whole request. No internal retry — the caller owns retry
/// policy.
#[derive(Debug, Clone)]
pub struct HttpForecastClient {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpForecastClient {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, ForecastError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ForecastError::unavailable(format!("building http client: {e}")))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }
}

#[async_trait::async_trait]
impl Forecaster for HttpForecastClient {
    async fn predict(&self, demand: &[DemandPoint]) -> Result<Vec<Prediction>, ForecastError> {
        let records: Vec<DemandRecord> = demand.iter().map(DemandRecord::from).collect();

        let response = self
            .client
            .post(&self.endpoint)
            .json(&records)
            .send()
            .await
            .map_err(|e| ForecastError::unavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ForecastError::unavailable(format!(
                "predictor answered {status}"
            )));
        }

        let predictions: Vec<PredictionRecord> = response
            .json()
            .await
            .map_err(|e| ForecastError::protocol(e.to_string()))?;

        Ok(predictions.into_iter().map(Prediction::from).collect())
    }
}
