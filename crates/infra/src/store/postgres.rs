//! Postgres-backed replenishment store.
//!
//! Expected schema:
//!
//! ```sql
//! CREATE TABLE stock_transactions (
//!     id          BIGSERIAL PRIMARY KEY,
//!     product_id  UUID        NOT NULL,
//!     kind        TEXT        NOT NULL,          -- 'inbound' | 'outbound'
//!     quantity    BIGINT      NOT NULL,
//!     occurred_at TIMESTAMPTZ NOT NULL
//! );
//!
//! CREATE TABLE stock_levels (
//!     product_id    UUID   PRIMARY KEY,
//!     vendor_id     UUID   NOT NULL,
//!     sku           TEXT   NOT NULL,
//!     current_stock BIGINT NOT NULL
//! );
//!
//! CREATE TABLE forecast_results (
//!     product_id    UUID             NOT NULL,
//!     forecast_date DATE             NOT NULL,
//!     predicted_qty DOUBLE PRECISION NOT NULL,
//!     created_at    TIMESTAMPTZ      NOT NULL DEFAULT NOW(),
//!     PRIMARY KEY (product_id, forecast_date)
//! );
//!
//! CREATE TABLE purchase_orders (
//!     id           UUID        PRIMARY KEY,
//!     pass_id      TEXT        NOT NULL,
//!     product_id   UUID        NOT NULL,
//!     vendor_id    UUID        NOT NULL,
//!     sku          TEXT        NOT NULL,
//!     quantity     BIGINT      NOT NULL,
//!     requested_by UUID        NOT NULL,
//!     status       TEXT        NOT NULL,
//!     created_at   TIMESTAMPTZ NOT NULL,
//!     UNIQUE (pass_id, product_id)
//! );
//! ```
//!
//! The unique constraint on `(pass_id, product_id)` is the idempotency key:
//! `create_purchase_order` inserts with `ON CONFLICT DO NOTHING` and reports
//! a duplicate when no row was written. All sqlx errors map to
//! `StoreError::Persistence` with the failing operation named.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{FromRow, PgPool};
use tracing::instrument;
use uuid::Uuid;

use restocker_core::ProductId;
use restocker_forecast::ForecastResult;
use restocker_inventory::{StockLevel, StockTransaction, TransactionKind};
use restocker_replenish::{PassId, PurchaseOrder, PurchaseOrderStatus, ReplenishmentRow};

use super::{CreateOutcome, ReplenishmentStore, StoreError};

/// Postgres-backed replenishment store.
///
/// Uses the sqlx connection pool, which handles thread-safe connection
/// management; the store itself is cheap to clone and share.
#[derive(Debug, Clone)]
pub struct PostgresReplenishmentStore {
    pool: Arc<PgPool>,
}

impl PostgresReplenishmentStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }
}

fn map_sqlx_error(operation: &str, e: sqlx::Error) -> StoreError {
    StoreError::persistence(format!("{operation}: {e}"))
}

#[derive(Debug, FromRow)]
struct TransactionRow {
    product_id: Uuid,
    kind: String,
    quantity: i64,
    occurred_at: DateTime<Utc>,
}

impl TransactionRow {
    fn into_transaction(self) -> Result<StockTransaction, StoreError> {
        let kind = match self.kind.as_str() {
            "inbound" => TransactionKind::Inbound,
            "outbound" => TransactionKind::Outbound,
            other => {
                return Err(StoreError::persistence(format!(
                    "unknown transaction kind '{other}'"
                )))
            }
        };
        Ok(StockTransaction {
            product_id: ProductId::from_uuid(self.product_id),
            kind,
            quantity: self.quantity,
            occurred_at: self.occurred_at,
        })
    }
}

#[derive(Debug, FromRow)]
struct ForecastRow {
    product_id: Uuid,
    forecast_date: NaiveDate,
    predicted_qty: f64,
}

impl From<ForecastRow> for ForecastResult {
    fn from(row: ForecastRow) -> Self {
        Self {
            product_id: ProductId::from_uuid(row.product_id),
            forecast_date: row.forecast_date,
            predicted_qty: row.predicted_qty,
        }
    }
}

#[derive(Debug, FromRow)]
struct ReplenishmentRowRecord {
    product_id: Uuid,
    vendor_id: Uuid,
    sku: String,
    current_stock: i64,
    forecast_date: Option<NaiveDate>,
    predicted_qty: Option<f64>,
}

impl From<ReplenishmentRowRecord> for ReplenishmentRow {
    fn from(record: ReplenishmentRowRecord) -> Self {
        let product_id = ProductId::from_uuid(record.product_id);
        let forecast = match (record.forecast_date, record.predicted_qty) {
            (Some(forecast_date), Some(predicted_qty)) => Some(ForecastResult {
                product_id,
                forecast_date,
                predicted_qty,
            }),
            _ => None,
        };
        Self {
            stock: StockLevel {
                product_id,
                vendor_id: record.vendor_id.into(),
                sku: record.sku,
                current_stock: record.current_stock,
            },
            forecast,
        }
    }
}

#[derive(Debug, FromRow)]
struct PurchaseOrderRow {
    id: Uuid,
    pass_id: String,
    product_id: Uuid,
    vendor_id: Uuid,
    sku: String,
    quantity: i64,
    requested_by: Uuid,
    status: String,
    created_at: DateTime<Utc>,
}

impl PurchaseOrderRow {
    fn into_order(self) -> Result<PurchaseOrder, StoreError> {
        let status = match self.status.as_str() {
            "pending" => PurchaseOrderStatus::Pending,
            "created" => PurchaseOrderStatus::Created,
            "failed" => PurchaseOrderStatus::Failed,
            other => {
                return Err(StoreError::persistence(format!(
                    "unknown purchase order status '{other}'"
                )))
            }
        };
        Ok(PurchaseOrder {
            id: self.id.into(),
            pass_id: PassId::new(self.pass_id),
            product_id: ProductId::from_uuid(self.product_id),
            vendor_id: self.vendor_id.into(),
            sku: self.sku,
            quantity: self.quantity,
            requested_by: self.requested_by.into(),
            status,
            created_at: self.created_at,
        })
    }
}

fn status_text(status: PurchaseOrderStatus) -> &'static str {
    match status {
        PurchaseOrderStatus::Pending => "pending",
        PurchaseOrderStatus::Created => "created",
        PurchaseOrderStatus::Failed => "failed",
    }
}

#[async_trait::async_trait]
impl ReplenishmentStore for PostgresReplenishmentStore {
    #[instrument(skip(self), err)]
    async fn outbound_transactions(
        &self,
        since: Option<DateTime<Utc>>,
    ) -> Result<Vec<StockTransaction>, StoreError> {
        let rows: Vec<TransactionRow> = sqlx::query_as(
            r#"
            SELECT product_id, kind, quantity, occurred_at
            FROM stock_transactions
            WHERE kind = 'outbound'
              AND ($1::timestamptz IS NULL OR occurred_at >= $1)
            ORDER BY occurred_at ASC
            "#,
        )
        .bind(since)
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("outbound_transactions", e))?;

        rows.into_iter().map(TransactionRow::into_transaction).collect()
    }

    #[instrument(skip(self, forecast), fields(product_id = %forecast.product_id), err)]
    async fn upsert_forecast(&self, forecast: ForecastResult) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO forecast_results (product_id, forecast_date, predicted_qty, created_at)
            VALUES ($1, $2, $3, NOW())
            ON CONFLICT (product_id, forecast_date)
            DO UPDATE SET predicted_qty = EXCLUDED.predicted_qty, created_at = NOW()
            "#,
        )
        .bind(forecast.product_id.as_uuid())
        .bind(forecast.forecast_date)
        .bind(forecast.predicted_qty)
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("upsert_forecast", e))?;

        Ok(())
    }

    #[instrument(skip(self), err)]
    async fn latest_forecast(
        &self,
        product_id: ProductId,
    ) -> Result<Option<ForecastResult>, StoreError> {
        let row: Option<ForecastRow> = sqlx::query_as(
            r#"
            SELECT product_id, forecast_date, predicted_qty
            FROM forecast_results
            WHERE product_id = $1
            ORDER BY forecast_date DESC
            LIMIT 1
            "#,
        )
        .bind(product_id.as_uuid())
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("latest_forecast", e))?;

        Ok(row.map(ForecastResult::from))
    }

    #[instrument(skip(self), err)]
    async fn replenishment_rows(&self) -> Result<Vec<ReplenishmentRow>, StoreError> {
        let rows: Vec<ReplenishmentRowRecord> = sqlx::query_as(
            r#"
            SELECT
                s.product_id,
                s.vendor_id,
                s.sku,
                s.current_stock,
                f.forecast_date,
                f.predicted_qty
            FROM stock_levels s
            LEFT JOIN LATERAL (
                SELECT forecast_date, predicted_qty
                FROM forecast_results
                WHERE product_id = s.product_id
                ORDER BY forecast_date DESC
                LIMIT 1
            ) f ON TRUE
            ORDER BY s.product_id ASC
            "#,
        )
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("replenishment_rows", e))?;

        Ok(rows.into_iter().map(ReplenishmentRow::from).collect())
    }

    #[instrument(
        skip(self, order),
        fields(pass_id = %order.pass_id, product_id = %order.product_id),
        err
    )]
    async fn create_purchase_order(
        &self,
        order: &PurchaseOrder,
    ) -> Result<CreateOutcome, StoreError> {
        let result = sqlx::query(
            r#"
            INSERT INTO purchase_orders
                (id, pass_id, product_id, vendor_id, sku, quantity, requested_by, status, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT (pass_id, product_id) DO NOTHING
            "#,
        )
        .bind(order.id.as_uuid())
        .bind(order.pass_id.as_str())
        .bind(order.product_id.as_uuid())
        .bind(order.vendor_id.as_uuid())
        .bind(&order.sku)
        .bind(order.quantity)
        .bind(order.requested_by.as_uuid())
        .bind(status_text(PurchaseOrderStatus::Created))
        .bind(order.created_at)
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("create_purchase_order", e))?;

        if result.rows_affected() == 0 {
            Ok(CreateOutcome::Duplicate)
        } else {
            Ok(CreateOutcome::Created)
        }
    }

    #[instrument(skip(self), fields(pass_id = %pass_id), err)]
    async fn purchase_orders_for_pass(
        &self,
        pass_id: &PassId,
    ) -> Result<Vec<PurchaseOrder>, StoreError> {
        let rows: Vec<PurchaseOrderRow> = sqlx::query_as(
            r#"
            SELECT id, pass_id, product_id, vendor_id, sku, quantity, requested_by, status, created_at
            FROM purchase_orders
            WHERE pass_id = $1
            ORDER BY product_id ASC
            "#,
        )
        .bind(pass_id.as_str())
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("purchase_orders_for_pass", e))?;

        rows.into_iter().map(PurchaseOrderRow::into_order).collect()
    }
}
