use serde::{Deserialize, Serialize};

use restocker_core::{ProductId, VendorId};
use restocker_forecast::ForecastResult;
use restocker_inventory::StockLevel;

/// One product's stock level joined with its latest forecast, if any.
///
/// Snapshot row: produced by the store in one read, consumed without further
/// lookups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplenishmentRow {
    pub stock: StockLevel,
    pub forecast: Option<ForecastResult>,
}

/// A detected shortfall: forecast demand exceeds current stock.
///
/// Ephemeral — intents exist only between reconciliation and issuance and
/// are never persisted. Invariant: `shortfall_qty > 0`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestockIntent {
    pub product_id: ProductId,
    pub vendor_id: VendorId,
    pub sku: String,
    pub shortfall_qty: i64,
}

/// Compare each product's forecast demand against current stock and emit an
/// intent for every product that would run short.
///
/// Rows without a forecast are skipped. An intent is emitted iff
/// `predicted_qty > current_stock`, with the shortfall rounded up to a whole
/// unit. The result is sorted by product id, so a fixed snapshot always
/// yields the same intents. Never mutates stock or forecasts.
pub fn reconcile(rows: &[ReplenishmentRow]) -> Vec<RestockIntent> {
    let mut intents: Vec<RestockIntent> = rows
        .iter()
        .filter_map(|row| {
            let forecast = row.forecast.as_ref()?;
            let current = row.stock.current_stock;
            if forecast.predicted_qty <= current as f64 {
                return None;
            }
            let shortfall_qty = (forecast.predicted_qty - current as f64).ceil() as i64;
            Some(RestockIntent {
                product_id: row.stock.product_id,
                vendor_id: row.stock.vendor_id,
                sku: row.stock.sku.clone(),
                shortfall_qty,
            })
        })
        .collect();

    intents.sort_by_key(|intent| intent.product_id);
    intents
}


#[cfg(test)]
mod proptest_tests {
    use super::*;
    use chrono::NaiveDate;
    use proptest::prelude::*;

    fn arb_row() -> impl Strategy<Value = ReplenishmentRow> {
        (0i64..10_000, proptest::option::of(-100.0f64..10_000.0)).prop_map(
            |(current_stock, predicted)| {
                let product_id = ProductId::new();
                ReplenishmentRow {
                    stock: StockLevel {
                        product_id,
                        vendor_id: VendorId::new(),
                        sku: "SKU-P".to_string(),
                        current_stock,
                    },
                    forecast: predicted.map(|predicted_qty| ForecastResult {
                        product_id,
                        forecast_date: NaiveDate::from_ymd_opt(2025, 3, 17).unwrap(),
                        predicted_qty,
                    }),
                }
            },
        )
    }

    proptest! {
        #[test]
        fn shortfalls_are_always_positive(rows in proptest::collection::vec(arb_row(), 0..50)) {
            for intent in reconcile(&rows) {
                prop_assert!(intent.shortfall_qty > 0);
            }
        }

        #[test]
        fn intents_only_for_products_running_short(rows in proptest::collection::vec(arb_row(), 0..50)) {
            let intents = reconcile(&rows);
            for intent in &intents {
                let row = rows
                    .iter()
                    .find(|r| r.stock.product_id == intent.product_id)
                    .unwrap();
                let forecast = row.forecast.as_ref().unwrap();
                prop_assert!(forecast.predicted_qty > row.stock.current_stock as f64);
            }
        }
    }
}
