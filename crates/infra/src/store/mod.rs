//! Persistence boundary for the replenishment pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use restocker_core::ProductId;
use restocker_forecast::ForecastResult;
use restocker_inventory::StockTransaction;
use restocker_replenish::{PassId, PurchaseOrder, ReplenishmentRow};

mod in_memory;
mod postgres;

pub use in_memory::InMemoryReplenishmentStore;
pub use postgres::PostgresReplenishmentStore;

/// Storage-layer error.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The underlying storage engine failed (connection loss, constraint
    /// violation, poisoned lock).
    #[error("persistence error: {0}")]
    Persistence(String),
}

impl StoreError {
    pub fn persistence(msg: impl Into<String>) -> Self {
        Self::Persistence(msg.into())
    }
}

/// Result of a durable purchase-order write.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CreateOutcome {
    /// First write for this (pass, product) key.
    Created,
    /// A row for this key already exists; nothing was written.
    Duplicate,
}

/// One forecast record that could not be persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpsertFailure {
    pub product_id: ProductId,
    pub reason: String,
}

/// Outcome of a batch of per-record forecast upserts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpsertReport {
    pub stored: usize,
    pub failures: Vec<UpsertFailure>,
}

/// Read/write contract between the replenishment workflows and storage.
///
/// Writes are per-record: batch callers collect individual failures instead
/// of aborting, so one bad record never poisons the rest of a run.
#[async_trait::async_trait]
pub trait ReplenishmentStore: Send + Sync {
    /// Outbound stock movements, optionally restricted to those at or after
    /// `since`. Source data for demand aggregation.
    async fn outbound_transactions(
        &self,
        since: Option<DateTime<Utc>>,
    ) -> Result<Vec<StockTransaction>, StoreError>;

    /// Write-or-replace the forecast for (product, forecast_date). At most
    /// one stored result per key; a re-run replaces the value in place.
    async fn upsert_forecast(&self, forecast: ForecastResult) -> Result<(), StoreError>;

    /// Upsert a batch of forecasts, one record at a time.
    ///
    /// Failures are collected per record; the surviving records are still
    /// written. The report says how many stuck and which did not.
    async fn upsert_forecasts(&self, forecasts: Vec<ForecastResult>) -> UpsertReport {
        let mut report = UpsertReport::default();
        for forecast in forecasts {
            let product_id = forecast.product_id;
            match self.upsert_forecast(forecast).await {
                Ok(()) => report.stored += 1,
                Err(e) => {
                    tracing::warn!(%product_id, error = %e, "forecast upsert failed");
                    report.failures.push(UpsertFailure {
                        product_id,
                        reason: e.to_string(),
                    });
                }
            }
        }
        report
    }

    /// Most recent stored forecast for a product, by forecast date.
    async fn latest_forecast(
        &self,
        product_id: ProductId,
    ) -> Result<Option<ForecastResult>, StoreError>;

    /// Every product's stock level joined with its latest forecast. Products
    /// without a forecast appear with `forecast: None`.
    async fn replenishment_rows(&self) -> Result<Vec<ReplenishmentRow>, StoreError>;

    /// Durably record a purchase order, keyed by (pass_id, product_id).
    ///
    /// Returns `Duplicate` without writing when a row for the key already
    /// exists — re-running a pass can never produce a second order for the
    /// same product.
    async fn create_purchase_order(
        &self,
        order: &PurchaseOrder,
    ) -> Result<CreateOutcome, StoreError>;

    /// All purchase orders recorded under a pass.
    async fn purchase_orders_for_pass(
        &self,
        pass_id: &PassId,
    ) -> Result<Vec<PurchaseOrder>, StoreError>;
}
