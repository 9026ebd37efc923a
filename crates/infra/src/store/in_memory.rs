use std::collections::HashMap;
use std::sync::RwLock;

use chrono::{DateTime, NaiveDate, Utc};

use restocker_core::ProductId;
use restocker_forecast::ForecastResult;
use restocker_inventory::{StockLevel, StockTransaction};
use restocker_replenish::{PassId, PurchaseOrder, ReplenishmentRow};

use super::{CreateOutcome, ReplenishmentStore, StoreError};

/// In-memory replenishment store.
///
/// Intended for tests/dev. Not optimized for performance.
#[derive(Debug, Default)]
pub struct InMemoryReplenishmentStore {
    transactions: RwLock<Vec<StockTransaction>>,
    stock_levels: RwLock<HashMap<ProductId, StockLevel>>,
    forecasts: RwLock<HashMap<(ProductId, NaiveDate), ForecastResult>>,
    orders: RwLock<HashMap<(PassId, ProductId), PurchaseOrder>>,
}

fn poisoned(_: impl std::error::Error) -> StoreError {
    StoreError::persistence("lock poisoned")
}

impl InMemoryReplenishmentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a stock movement (seeding helper; inventory owns these rows in
    /// a real deployment).
    pub fn record_transaction(&self, tx: StockTransaction) -> Result<(), StoreError> {
        self.transactions.write().map_err(poisoned)?.push(tx);
        Ok(())
    }

    /// Set the current stock level row for a product.
    pub fn set_stock_level(&self, level: StockLevel) -> Result<(), StoreError> {
        self.stock_levels
            .write()
            .map_err(poisoned)?
            .insert(level.product_id, level);
        Ok(())
    }

    fn latest_forecast_locked(
        forecasts: &HashMap<(ProductId, NaiveDate), ForecastResult>,
        product_id: ProductId,
    ) -> Option<ForecastResult> {
        forecasts
            .iter()
            .filter(|((pid, _), _)| *pid == product_id)
            .max_by_key(|((_, date), _)| *date)
            .map(|(_, forecast)| forecast.clone())
    }
}

#[async_trait::async_trait]
impl ReplenishmentStore for InMemoryReplenishmentStore {
    async fn outbound_transactions(
        &self,
        since: Option<DateTime<Utc>>,
    ) -> Result<Vec<StockTransaction>, StoreError> {
        let transactions = self.transactions.read().map_err(poisoned)?;
        Ok(transactions
            .iter()
            .filter(|tx| tx.is_outbound())
            .filter(|tx| since.is_none_or(|cutoff| tx.occurred_at >= cutoff))
            .cloned()
            .collect())
    }

    async fn upsert_forecast(&self, forecast: ForecastResult) -> Result<(), StoreError> {
        let key = (forecast.product_id, forecast.forecast_date);
        self.forecasts.write().map_err(poisoned)?.insert(key, forecast);
        Ok(())
    }

    async fn latest_forecast(
        &self,
        product_id: ProductId,
    ) -> Result<Option<ForecastResult>, StoreError> {
        let forecasts = self.forecasts.read().map_err(poisoned)?;
        Ok(Self::latest_forecast_locked(&forecasts, product_id))
    }

    async fn replenishment_rows(&self) -> Result<Vec<ReplenishmentRow>, StoreError> {
        let stock_levels = self.stock_levels.read().map_err(poisoned)?;
        let forecasts = self.forecasts.read().map_err(poisoned)?;

        let mut rows: Vec<ReplenishmentRow> = stock_levels
            .values()
            .map(|level| ReplenishmentRow {
                stock: level.clone(),
                forecast: Self::latest_forecast_locked(&forecasts, level.product_id),
            })
            .collect();

        rows.sort_by_key(|row| row.stock.product_id);
        Ok(rows)
    }

    async fn create_purchase_order(
        &self,
        order: &PurchaseOrder,
    ) -> Result<CreateOutcome, StoreError> {
        let key = (order.pass_id.clone(), order.product_id);
        let mut orders = self.orders.write().map_err(poisoned)?;

        if orders.contains_key(&key) {
            return Ok(CreateOutcome::Duplicate);
        }

        let mut stored = order.clone();
        stored
            .mark_created()
            .map_err(|e| StoreError::persistence(e.to_string()))?;
        orders.insert(key, stored);
        Ok(CreateOutcome::Created)
    }

    async fn purchase_orders_for_pass(
        &self,
        pass_id: &PassId,
    ) -> Result<Vec<PurchaseOrder>, StoreError> {
        let orders = self.orders.read().map_err(poisoned)?;
        let mut matching: Vec<PurchaseOrder> = orders
            .iter()
            .filter(|((pass, _), _)| pass == pass_id)
            .map(|(_, order)| order.clone())
            .collect();

        matching.sort_by_key(|order| order.product_id);
        Ok(matching)
    }
}
