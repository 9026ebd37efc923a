use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use restocker_core::ProductId;
use restocker_inventory::StockTransaction;

/// Total quantity sold for one product on one calendar day.
///
/// Invariant: `quantity_sold >= 0`, at most one point per (product, day).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DemandPoint {
    pub product_id: ProductId,
    pub date: NaiveDate,
    pub quantity_sold: i64,
}

/// Collapse raw stock movements into a per-product daily demand series.
///
/// Only `Outbound` transactions count as demand; inbound movements are
/// ignored. Grouping is by (product, calendar day of `occurred_at` in UTC),
/// summing quantities. The result is ordered by product id, then date, so a
/// fixed input always yields the same series.
///
/// An empty input yields an empty series; that is a valid result, not an
/// error.
pub fn aggregate_daily_demand(transactions: &[StockTransaction]) -> Vec<DemandPoint> {
    let mut grouped: BTreeMap<(ProductId, NaiveDate), i64> = BTreeMap::new();

    for tx in transactions.iter().filter(|tx| tx.is_outbound()) {
        let day = tx.occurred_at.date_naive();
        *grouped.entry((tx.product_id, day)).or_insert(0) += tx.quantity;
    }

    grouped
        .into_iter()
        .map(|((product_id, date), quantity_sold)| DemandPoint {
            product_id,
            date,
            quantity_sold,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use restocker_inventory::TransactionKind;

    fn test_product_id() -> ProductId {
        ProductId::new()
    }

    fn test_tx(
        product_id: ProductId,
        kind: TransactionKind,
        quantity: i64,
        day: u32,
        hour: u32,
    ) -> StockTransaction {
        StockTransaction {
            product_id,
            kind,
            quantity,
            occurred_at: Utc.with_ymd_and_hms(2025, 3, day, hour, 0, 0).unwrap(),
        }
    }

    #[test]
    fn empty_input_yields_empty_series() {
        assert!(aggregate_daily_demand(&[]).is_empty());
    }

    #[test]
    fn sums_outbound_quantities_per_day() {
        let product = test_product_id();
        let txs = vec![
            test_tx(product, TransactionKind::Outbound, 3, 10, 9),
            test_tx(product, TransactionKind::Outbound, 4, 10, 17),
            test_tx(product, TransactionKind::Outbound, 5, 11, 12),
        ];

        let series = aggregate_daily_demand(&txs);
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].quantity_sold, 7);
        assert_eq!(series[1].quantity_sold, 5);
    }

    #[test]
    fn inbound_transactions_are_ignored() {
        let product = test_product_id();
        let txs = vec![
            test_tx(product, TransactionKind::Inbound, 50, 10, 8),
            test_tx(product, TransactionKind::Outbound, 2, 10, 9),
        ];

        let series = aggregate_daily_demand(&txs);
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].quantity_sold, 2);
    }

    #[test]
    fn output_is_grouped_per_product_and_ordered() {
        let a = test_product_id();
        let b = test_product_id();
        let txs = vec![
            test_tx(b, TransactionKind::Outbound, 1, 12, 10),
            test_tx(a, TransactionKind::Outbound, 2, 11, 10),
            test_tx(a, TransactionKind::Outbound, 3, 12, 10),
        ];

        let series = aggregate_daily_demand(&txs);
        assert_eq!(series.len(), 3);
        // Ordered by product id first, date second.
        assert_eq!(series[0].product_id, series[1].product_id);
        assert!(series[0].date < series[1].date);

        let a_points: Vec<_> = series.iter().filter(|p| p.product_id == a).collect();
        assert_eq!(a_points.len(), 2);
    }

    #[test]
    fn same_input_yields_same_series() {
        let product = test_product_id();
        let txs = vec![
            test_tx(product, TransactionKind::Outbound, 3, 10, 9),
            test_tx(product, TransactionKind::Outbound, 4, 11, 9),
        ];

        assert_eq!(aggregate_daily_demand(&txs), aggregate_daily_demand(&txs));
    }
}
