use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use restocker_core::{DomainError, ProductId, PurchaseOrderId, UserId, VendorId};

use crate::reconcile::RestockIntent;

/// Identifier of one reconciliation pass.
///
/// Together with a product id it forms the idempotency key for purchase
/// orders: re-running a pass can never create a second order for the same
/// product.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PassId(String);

impl PassId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Default pass id for a calendar day: `restock-YYYY-MM-DD`.
    pub fn for_day(date: NaiveDate) -> Self {
        Self(format!("restock-{}", date.format("%Y-%m-%d")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for PassId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Lifecycle of an issued purchase order.
///
/// `Pending` orders are in flight; the durable write moves them to `Created`
/// or `Failed`. `Failed` is terminal — failed orders are reported, never
/// retried automatically.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PurchaseOrderStatus {
    Pending,
    Created,
    Failed,
}

/// A replenishment purchase order addressed to a vendor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseOrder {
    pub id: PurchaseOrderId,
    pub pass_id: PassId,
    pub product_id: ProductId,
    pub vendor_id: VendorId,
    pub sku: String,
    pub quantity: i64,
    pub requested_by: UserId,
    pub status: PurchaseOrderStatus,
    pub created_at: DateTime<Utc>,
}

impl PurchaseOrder {
    /// Build a pending order from a restock intent.
    pub fn from_intent(pass_id: PassId, intent: &RestockIntent, requested_by: UserId) -> Self {
        Self {
            id: PurchaseOrderId::new(),
            pass_id,
            product_id: intent.product_id,
            vendor_id: intent.vendor_id,
            sku: intent.sku.clone(),
            quantity: intent.shortfall_qty,
            requested_by,
            status: PurchaseOrderStatus::Pending,
            created_at: Utc::now(),
        }
    }

    /// Record that the durable write succeeded.
    pub fn mark_created(&mut self) -> Result<(), DomainError> {
        if self.status != PurchaseOrderStatus::Pending {
            return Err(DomainError::invariant(
                "only pending purchase orders can be marked created",
            ));
        }
        self.status = PurchaseOrderStatus::Created;
        Ok(())
    }

    /// Record that the durable write failed. Terminal.
    pub fn mark_failed(&mut self) -> Result<(), DomainError> {
        if self.status != PurchaseOrderStatus::Pending {
            return Err(DomainError::invariant(
                "only pending purchase orders can be marked failed",
            ));
        }
        self.status = PurchaseOrderStatus::Failed;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_intent() -> RestockIntent {
        RestockIntent {
            product_id: ProductId::new(),
            vendor_id: VendorId::new(),
            sku: "SKU-9".to_string(),
            shortfall_qty: 7,
        }
    }

    #[test]
    fn pass_id_for_day_uses_iso_date() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        assert_eq!(PassId::for_day(date).as_str(), "restock-2025-03-10");
    }

    #[test]
    fn order_from_intent_starts_pending() {
        let intent = test_intent();
        let order = PurchaseOrder::from_intent(PassId::new("restock-test"), &intent, UserId::new());

        assert_eq!(order.status, PurchaseOrderStatus::Pending);
        assert_eq!(order.product_id, intent.product_id);
        assert_eq!(order.quantity, 7);
        assert_eq!(order.sku, "SKU-9");
    }

    #[test]
    fn pending_order_can_be_created_once() {
        let mut order =
            PurchaseOrder::from_intent(PassId::new("restock-test"), &test_intent(), UserId::new());

        order.mark_created().unwrap();
        assert_eq!(order.status, PurchaseOrderStatus::Created);

        let err = order.mark_created().unwrap_err();
        assert!(matches!(err, DomainError::InvariantViolation(_)));
    }

    #[test]
    fn failed_is_terminal() {
        let mut order =
            PurchaseOrder::from_intent(PassId::new("restock-test"), &test_intent(), UserId::new());

        order.mark_failed().unwrap();
        assert_eq!(order.status, PurchaseOrderStatus::Failed);

        assert!(order.mark_created().is_err());
        assert!(order.mark_failed().is_err());
    }
}
