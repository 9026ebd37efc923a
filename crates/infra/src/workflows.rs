//! End-to-end replenishment workflows.
//!
//! Two entry points: [`ForecastWorkflow`] turns sales history into stored
//! forecasts, [`RestockWorkflow`] turns stored forecasts into purchase
//! orders. The HTTP layer and any scheduler call these; they own no state
//! beyond their collaborators.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use restocker_core::UserId;
use restocker_demand::aggregate_daily_demand;
use restocker_forecast::{ForecastError, ForecastResult, Forecaster};
use restocker_replenish::{reconcile, IssueReport, PassId};

use crate::issuer::PurchaseOrderIssuer;
use crate::store::{ReplenishmentStore, StoreError, UpsertFailure};

/// A workflow-stopping failure.
///
/// Only failures that make the whole run meaningless surface here; per-record
/// problems are carried inside the run reports instead.
#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error(transparent)]
    Forecast(#[from] ForecastError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Outcome of one forecast run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastRunReport {
    /// Every prediction the forecaster produced, normalized.
    pub results: Vec<ForecastResult>,
    /// How many of them were durably stored.
    pub stored: usize,
    /// Per-record storage failures. Never aborts the run.
    pub failures: Vec<UpsertFailure>,
}

/// Sales history -> demand -> predictions -> stored forecasts.
pub struct ForecastWorkflow<S> {
    store: Arc<S>,
    forecaster: Arc<dyn Forecaster>,
}

impl<S> ForecastWorkflow<S>
where
    S: ReplenishmentStore,
{
    pub fn new(store: Arc<S>, forecaster: Arc<dyn Forecaster>) -> Self {
        Self { store, forecaster }
    }

    /// Run one forecast pass over the full sales history.
    ///
    /// The predictor is called exactly once, even when the demand batch is
    /// empty. Predictions missing a forecast date fall back to today.
    pub async fn run(&self) -> Result<ForecastRunReport, WorkflowError> {
        let transactions = self.store.outbound_transactions(None).await?;
        let demand = aggregate_daily_demand(&transactions);
        info!(
            transactions = transactions.len(),
            demand_points = demand.len(),
            "forecast run started"
        );

        let predictions = self.forecaster.predict(&demand).await?;
        let fallback_date = chrono::Utc::now().date_naive();
        let results: Vec<ForecastResult> = predictions
            .into_iter()
            .map(|p| ForecastResult::from_prediction(p, fallback_date))
            .collect();

        let upserts = self.store.upsert_forecasts(results.clone()).await;

        info!(
            results = results.len(),
            stored = upserts.stored,
            failed = upserts.failures.len(),
            "forecast run finished"
        );
        Ok(ForecastRunReport {
            results,
            stored: upserts.stored,
            failures: upserts.failures,
        })
    }
}

/// Stored forecasts -> restock intents -> purchase orders.
pub struct RestockWorkflow<S> {
    store: Arc<S>,
    issuer: PurchaseOrderIssuer<S>,
}

impl<S> RestockWorkflow<S>
where
    S: ReplenishmentStore + 'static,
{
    pub fn new(store: Arc<S>, issuer: PurchaseOrderIssuer<S>) -> Self {
        Self { store, issuer }
    }

    /// Run one restock pass: reconcile every product's stock against its
    /// latest forecast and issue orders for the shortfalls.
    pub async fn run(
        &self,
        pass_id: PassId,
        requested_by: UserId,
    ) -> Result<IssueReport, WorkflowError> {
        let rows = self.store.replenishment_rows().await?;
        let intents = reconcile(&rows);
        info!(
            pass_id = %pass_id,
            rows = rows.len(),
            intents = intents.len(),
            "restock run started"
        );

        Ok(self.issuer.issue(pass_id, intents, requested_by).await)
    }
}
