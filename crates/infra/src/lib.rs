//! Infrastructure layer: persistence, the predictor client, vendor
//! notification, and the workflows that tie them together.

pub mod forecast_client;
pub mod issuer;
pub mod notify;
pub mod store;
pub mod workflows;


pub use forecast_client::HttpForecastClient;
pub use issuer::{PurchaseOrderIssuer, DEFAULT_MAX_CONCURRENT};
pub use notify::{
    LoggingVendorNotifier, NotifyError, RecordingVendorNotifier, VendorNotice, VendorNotifier,
    DEFAULT_VENDOR_ADDRESS,
};
pub use store::{
    CreateOutcome, InMemoryReplenishmentStore, PostgresReplenishmentStore, ReplenishmentStore,
    StoreError, UpsertFailure, UpsertReport,
};
pub use workflows::{ForecastRunReport, ForecastWorkflow, RestockWorkflow, WorkflowError};
