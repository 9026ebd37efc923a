use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use restocker_core::{ProductId, VendorId};

/// Direction of a stock movement.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    /// Goods received into stock.
    Inbound,
    /// Goods leaving stock (sales, shipments).
    Outbound,
}

/// A single recorded stock movement.
///
/// Owned by inventory; the replenishment core reads these but never writes
/// them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockTransaction {
    pub product_id: ProductId,
    pub kind: TransactionKind,
    pub quantity: i64,
    pub occurred_at: DateTime<Utc>,
}

impl StockTransaction {
    pub fn is_outbound(&self) -> bool {
        self.kind == TransactionKind::Outbound
    }
}

/// Current on-hand stock for a product, together with the vendor that
/// supplies it and the catalog sku. Read-only snapshot row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockLevel {
    pub product_id: ProductId,
    pub vendor_id: VendorId,
    pub sku: String,
    pub current_stock: i64,
}
