//! Bounded-concurrency purchase order issuance.

use std::sync::Arc;

use tokio::sync::{Mutex, Semaphore};
use tracing::{info, warn};

use restocker_core::UserId;
use restocker_replenish::{
    IssueFailure, IssueReport, PassId, PurchaseOrder, RestockIntent,
};

use crate::notify::{VendorNotice, VendorNotifier};
use crate::store::{CreateOutcome, ReplenishmentStore};

/// Default width of the issuance worker pool.
pub const DEFAULT_MAX_CONCURRENT: usize = 4;

/// Turns restock intents into durable purchase orders.
///
/// One task per intent, bounded by a semaphore. Tasks are detached: once
/// dispatched they run to completion even if the caller goes away, but
/// `issue` joins every task before producing its report, so a normal run
/// never observes partial results.
pub struct PurchaseOrderIssuer<S> {
    store: Arc<S>,
    notifier: Arc<dyn VendorNotifier>,
    max_concurrent: usize,
}

impl<S> PurchaseOrderIssuer<S>
where
    S: ReplenishmentStore + 'static,
{
    pub fn new(store: Arc<S>, notifier: Arc<dyn VendorNotifier>) -> Self {
        Self {
            store,
            notifier,
            max_concurrent: DEFAULT_MAX_CONCURRENT,
        }
    }

    pub fn with_max_concurrent(mut self, max: usize) -> Self {
        self.max_concurrent = max.max(1);
        self
    }

    /// Issue one purchase order per intent under the given pass.
    ///
    /// Per-intent outcomes:
    /// - first write for the (pass, product) key: order created, vendor
    ///   notified; a failed notice is counted but never rolls the order back
    /// - key already written: counted as a duplicate, no notice
    /// - storage failure: order marked failed, recorded in the report
    pub async fn issue(
        &self,
        pass_id: PassId,
        intents: Vec<RestockIntent>,
        requested_by: UserId,
    ) -> IssueReport {
        let report = Arc::new(Mutex::new(IssueReport::empty(pass_id.clone())));
        let semaphore = Arc::new(Semaphore::new(self.max_concurrent));

        info!(
            pass_id = %pass_id,
            intents = intents.len(),
            width = self.max_concurrent,
            "issuing purchase orders"
        );

        let mut handles = Vec::with_capacity(intents.len());
        for intent in intents {
            let store = Arc::clone(&self.store);
            let notifier = Arc::clone(&self.notifier);
            let semaphore = Arc::clone(&semaphore);
            let report = Arc::clone(&report);
            let pass_id = pass_id.clone();

            handles.push(tokio::spawn(async move {
                // Acquire inside the task so every dispatched intent is
                // processed even if the spawning call is dropped mid-issue.
                let Ok(_permit) = semaphore.acquire().await else {
                    return;
                };

                let mut order = PurchaseOrder::from_intent(pass_id, &intent, requested_by);
                match store.create_purchase_order(&order).await {
                    Ok(CreateOutcome::Created) => {
                        if order.mark_created().is_err() {
                            // from_intent always starts Pending; unreachable.
                            warn!(product_id = %order.product_id, "order not pending");
                        }
                        let mut report = report.lock().await;
                        report.created += 1;

                        let notice = VendorNotice::for_order(&order);
                        if let Err(e) = notifier.send(notice).await {
                            warn!(
                                product_id = %order.product_id,
                                error = %e,
                                "vendor notice failed"
                            );
                            report.notice_failures += 1;
                        }
                    }
                    Ok(CreateOutcome::Duplicate) => {
                        info!(
                            product_id = %order.product_id,
                            "purchase order already exists for pass"
                        );
                        report.lock().await.duplicates += 1;
                    }
                    Err(e) => {
                        warn!(
                            product_id = %order.product_id,
                            error = %e,
                            "purchase order write failed"
                        );
                        let _ = order.mark_failed();
                        let mut report = report.lock().await;
                        report.failed += 1;
                        report.failures.push(IssueFailure {
                            product_id: order.product_id,
                            reason: e.to_string(),
                        });
                    }
                }
            }));
        }

        for handle in handles {
            if let Err(e) = handle.await {
                warn!(error = %e, "issuance task panicked");
            }
        }

        // Every task was joined above, so the Arc is ours alone.
        let report = match Arc::try_unwrap(report) {
            Ok(mutex) => mutex.into_inner(),
            Err(shared) => shared.lock().await.clone(),
        };

        info!(
            pass_id = %report.pass_id,
            created = report.created,
            duplicates = report.duplicates,
            failed = report.failed,
            notice_failures = report.notice_failures,
            "issuance finished"
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use restocker_core::{ProductId, VendorId};
    use restocker_replenish::PurchaseOrderStatus;

    use crate::notify::RecordingVendorNotifier;
    use crate::store::InMemoryReplenishmentStore;

    fn test_intent(sku: &str, shortfall: i64) -> RestockIntent {
        RestockIntent {
            product_id: ProductId::new(),
            vendor_id: VendorId::new(),
            sku: sku.to_string(),
            shortfall_qty: shortfall,
        }
    }

    fn test_issuer(
        store: Arc<InMemoryReplenishmentStore>,
        notifier: Arc<RecordingVendorNotifier>,
    ) -> PurchaseOrderIssuer<InMemoryReplenishmentStore> {
        PurchaseOrderIssuer::new(store, notifier).with_max_concurrent(2)
    }

    #[tokio::test]
    async fn one_order_and_notice_per_intent() {
        let store = Arc::new(InMemoryReplenishmentStore::new());
        let notifier = Arc::new(RecordingVendorNotifier::new());
        let issuer = test_issuer(Arc::clone(&store), Arc::clone(&notifier));

        let pass_id = PassId::new("restock-test");
        let intents = vec![test_intent("SKU-A", 3), test_intent("SKU-B", 7)];

        let report = issuer
            .issue(pass_id.clone(), intents, UserId::new())
            .await;

        assert_eq!(report.created, 2);
        assert_eq!(report.failed, 0);
        assert_eq!(report.duplicates, 0);
        assert_eq!(report.notice_failures, 0);
        assert_eq!(notifier.sent().len(), 2);

        let orders = store.purchase_orders_for_pass(&pass_id).await.unwrap();
        assert_eq!(orders.len(), 2);
        assert!(orders
            .iter()
            .all(|o| o.status == PurchaseOrderStatus::Created));
    }

    #[tokio::test]
    async fn rerun_reports_duplicates_without_new_notices() {
        let store = Arc::new(InMemoryReplenishmentStore::new());
        let notifier = Arc::new(RecordingVendorNotifier::new());
        let issuer = test_issuer(Arc::clone(&store), Arc::clone(&notifier));

        let pass_id = PassId::new("restock-test");
        let intent = test_intent("SKU-A", 3);

        let first = issuer
            .issue(pass_id.clone(), vec![intent.clone()], UserId::new())
            .await;
        assert_eq!(first.created, 1);

        let second = issuer
            .issue(pass_id.clone(), vec![intent], UserId::new())
            .await;
        assert_eq!(second.created, 0);
        assert_eq!(second.duplicates, 1);
        assert_eq!(notifier.sent().len(), 1);

        let orders = store.purchase_orders_for_pass(&pass_id).await.unwrap();
        assert_eq!(orders.len(), 1);
    }

    #[tokio::test]
    async fn failed_notice_leaves_order_created() {
        let store = Arc::new(InMemoryReplenishmentStore::new());
        let notifier = Arc::new(RecordingVendorNotifier::new());
        notifier.fail_subjects_containing("SKU-BAD");
        let issuer = test_issuer(Arc::clone(&store), Arc::clone(&notifier));

        let pass_id = PassId::new("restock-test");
        let intents = vec![test_intent("SKU-BAD", 2), test_intent("SKU-OK", 4)];

        let report = issuer
            .issue(pass_id.clone(), intents, UserId::new())
            .await;

        assert_eq!(report.created, 2);
        assert_eq!(report.notice_failures, 1);
        assert_eq!(notifier.sent().len(), 1);

        let orders = store.purchase_orders_for_pass(&pass_id).await.unwrap();
        assert_eq!(orders.len(), 2);
        assert!(orders
            .iter()
            .all(|o| o.status == PurchaseOrderStatus::Created));
    }

    #[tokio::test]
    async fn empty_intent_list_yields_empty_report() {
        let store = Arc::new(InMemoryReplenishmentStore::new());
        let notifier = Arc::new(RecordingVendorNotifier::new());
        let issuer = test_issuer(store, Arc::clone(&notifier));

        let report = issuer
            .issue(PassId::new("restock-test"), Vec::new(), UserId::new())
            .await;

        assert_eq!(report.created, 0);
        assert_eq!(report.duplicates, 0);
        assert_eq!(report.failed, 0);
        assert!(notifier.sent().is_empty());
    }
}
