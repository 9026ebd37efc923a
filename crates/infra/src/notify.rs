//! Vendor notification boundary.

use std::sync::Mutex;

use thiserror::Error;

use restocker_replenish::PurchaseOrder;

/// Address vendor notices are sent to.
///
/// Vendor contact management lives outside this system; a single
/// configured address stands in for the vendor directory.
pub const DEFAULT_VENDOR_ADDRESS: &str = "vendor@example.com";

/// A message telling a vendor about a freshly created purchase order.
///
/// Fire-and-forget: exactly one notice per created order, and a failed
/// notice never rolls the order back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VendorNotice {
    pub vendor_address: String,
    pub subject: String,
    pub body: String,
}

impl VendorNotice {
    pub fn for_order(order: &PurchaseOrder) -> Self {
        Self {
            vendor_address: DEFAULT_VENDOR_ADDRESS.to_string(),
            subject: format!("Purchase Order for {}", order.sku),
            body: format!(
                "Please create PO for {} units to replenish stock.",
                order.quantity
            ),
        }
    }
}

/// Notification delivery error.
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("notice delivery failed: {0}")]
    Delivery(String),
}

impl NotifyError {
    pub fn delivery(msg: impl Into<String>) -> Self {
        Self::Delivery(msg.into())
    }
}

/// Delivery boundary for vendor notices.
#[async_trait::async_trait]
pub trait VendorNotifier: Send + Sync {
    async fn send(&self, notice: VendorNotice) -> Result<(), NotifyError>;
}

/// Notifier that writes notices to the log instead of delivering them.
///
/// The default for deployments without a mail relay.
#[derive(Debug, Default)]
pub struct LoggingVendorNotifier;

#[async_trait::async_trait]
impl VendorNotifier for LoggingVendorNotifier {
    async fn send(&self, notice: VendorNotice) -> Result<(), NotifyError> {
        tracing::info!(
            vendor = %notice.vendor_address,
            subject = %notice.subject,
            "vendor notice"
        );
        Ok(())
    }
}

/// Notifier that records every notice in memory, with optional failure
/// injection. Test double.
#[derive(Debug, Default)]
pub struct RecordingVendorNotifier {
    sent: Mutex<Vec<VendorNotice>>,
    fail_subjects_containing: Mutex<Option<String>>,
}

impl RecordingVendorNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every notice whose subject contains `needle` fail delivery.
    pub fn fail_subjects_containing(&self, needle: impl Into<String>) {
        *self.fail_subjects_containing.lock().unwrap() = Some(needle.into());
    }

    pub fn sent(&self) -> Vec<VendorNotice> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl VendorNotifier for RecordingVendorNotifier {
    async fn send(&self, notice: VendorNotice) -> Result<(), NotifyError> {
        let failing = self.fail_subjects_containing.lock().unwrap().clone();
        if let Some(needle) = failing {
            if notice.subject.contains(&needle) {
                return Err(NotifyError::delivery(format!(
                    "injected failure for '{needle}'"
                )));
            }
        }

        self.sent.lock().unwrap().push(notice);
        Ok(())
    }
}
