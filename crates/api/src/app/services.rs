use std::sync::Arc;

use sqlx::PgPool;

use restocker_core::UserId;
use restocker_forecast::{Forecaster, LocalForecaster};
use restocker_infra::{
    ForecastRunReport, ForecastWorkflow, HttpForecastClient, InMemoryReplenishmentStore,
    LoggingVendorNotifier, PostgresReplenishmentStore, PurchaseOrderIssuer, RestockWorkflow,
    VendorNotifier, WorkflowError,
};
use restocker_replenish::{IssueReport, PassId};

use crate::config::{AppConfig, ForecastMode};

/// Service wiring, selected once at startup.
///
/// Enum dispatch instead of trait objects so each variant keeps its
/// concrete store type end to end.
pub enum AppServices {
    InMemory {
        forecast: ForecastWorkflow<InMemoryReplenishmentStore>,
        restock: RestockWorkflow<InMemoryReplenishmentStore>,
        store: Arc<InMemoryReplenishmentStore>,
        system_user: UserId,
    },
    Persistent {
        forecast: ForecastWorkflow<PostgresReplenishmentStore>,
        restock: RestockWorkflow<PostgresReplenishmentStore>,
        system_user: UserId,
    },
}

pub async fn build_services(config: &AppConfig) -> AppServices {
    let forecaster = build_forecaster(config);
    let notifier: Arc<dyn VendorNotifier> = Arc::new(LoggingVendorNotifier);

    if config.use_persistent_stores {
        let database_url = config
            .database_url
            .as_deref()
            .expect("DATABASE_URL must be set when USE_PERSISTENT_STORES=true");
        let pool = PgPool::connect(database_url)
            .await
            .expect("failed to connect to Postgres");
        let store = Arc::new(PostgresReplenishmentStore::new(pool));

        let issuer = PurchaseOrderIssuer::new(Arc::clone(&store), notifier)
            .with_max_concurrent(config.issue_max_concurrent);
        AppServices::Persistent {
            forecast: ForecastWorkflow::new(Arc::clone(&store), forecaster),
            restock: RestockWorkflow::new(store, issuer),
            system_user: UserId::new(),
        }
    } else {
        let store = Arc::new(InMemoryReplenishmentStore::new());

        let issuer = PurchaseOrderIssuer::new(Arc::clone(&store), notifier)
            .with_max_concurrent(config.issue_max_concurrent);
        AppServices::InMemory {
            forecast: ForecastWorkflow::new(Arc::clone(&store), forecaster),
            restock: RestockWorkflow::new(Arc::clone(&store), issuer),
            store,
            system_user: UserId::new(),
        }
    }
}

fn build_forecaster(config: &AppConfig) -> Arc<dyn Forecaster> {
    match config.forecast_mode {
        ForecastMode::Local => Arc::new(LocalForecaster::default()),
        ForecastMode::Http => Arc::new(
            HttpForecastClient::new(config.forecast_service_url.clone(), config.forecast_timeout)
                .expect("failed to build predictor http client"),
        ),
    }
}

impl AppServices {
    /// Run one forecast pass.
    pub async fn run_forecast(&self) -> Result<ForecastRunReport, WorkflowError> {
        match self {
            AppServices::InMemory { forecast, .. } => forecast.run().await,
            AppServices::Persistent { forecast, .. } => forecast.run().await,
        }
    }

    /// Run one restock pass under the given pass id.
    pub async fn run_restock(
        &self,
        pass_id: PassId,
        requested_by: Option<UserId>,
    ) -> Result<IssueReport, WorkflowError> {
        let requested_by = requested_by.unwrap_or_else(|| self.system_user());
        match self {
            AppServices::InMemory { restock, .. } => restock.run(pass_id, requested_by).await,
            AppServices::Persistent { restock, .. } => restock.run(pass_id, requested_by).await,
        }
    }

    fn system_user(&self) -> UserId {
        match self {
            AppServices::InMemory { system_user, .. } => *system_user,
            AppServices::Persistent { system_user, .. } => *system_user,
        }
    }

    /// Seeding access to the in-memory store (dev/test wiring only).
    pub fn in_memory_store(&self) -> Option<Arc<InMemoryReplenishmentStore>> {
        match self {
            AppServices::InMemory { store, .. } => Some(Arc::clone(store)),
            AppServices::Persistent { .. } => None,
        }
    }
}
