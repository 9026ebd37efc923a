use std::sync::Arc;

use chrono::{TimeZone, Utc};
use reqwest::StatusCode;
use serde_json::json;

use restocker_api::app::services::{build_services, AppServices};
use restocker_api::app::build_app_with_services;
use restocker_api::config::{AppConfig, ForecastMode};
use restocker_core::{ProductId, VendorId};
use restocker_inventory::{StockLevel, StockTransaction, TransactionKind};

struct TestServer {
    base_url: String,
    services: Arc<AppServices>,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    /// Same router as prod, bound to an ephemeral port, with the built-in
    /// predictor so no external service is needed.
    async fn spawn() -> Self {
        let config = AppConfig {
            forecast_mode: ForecastMode::Local,
            ..AppConfig::default()
        };
        let services = Arc::new(build_services(&config).await);
        let app = build_app_with_services(Arc::clone(&services));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url,
            services,
            handle,
        }
    }

    /// Seed one product with sales history and a stock level.
    fn seed_product(&self, sku: &str, current_stock: i64, sold: &[i64]) -> ProductId {
        let store = self
            .services
            .in_memory_store()
            .expect("test server always runs in-memory");
        let product_id = ProductId::new();
        store
            .set_stock_level(StockLevel {
                product_id,
                vendor_id: VendorId::new(),
                sku: sku.to_string(),
                current_stock,
            })
            .unwrap();
        for (i, &quantity) in sold.iter().enumerate() {
            store
                .record_transaction(StockTransaction {
                    product_id,
                    kind: TransactionKind::Outbound,
                    quantity,
                    occurred_at: Utc
                        .with_ymd_and_hms(2025, 3, 10 + i as u32, 9, 0, 0)
                        .unwrap(),
                })
                .unwrap();
        }
        product_id
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[tokio::test]
async fn health_answers_ok() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/health", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn forecast_run_reports_stored_results() {
    let server = TestServer::spawn().await;
    server.seed_product("SKU-1", 5, &[4, 6, 8]);
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/api/forecast/run", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["message"], "Forecast completed");
    assert_eq!(body["stored"], 1);
    assert_eq!(body["forecast"].as_array().unwrap().len(), 1);
    assert_eq!(body["failed"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn forecast_run_with_no_history_stores_nothing() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/api/forecast/run", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["stored"], 0);
    assert_eq!(body["forecast"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn auto_po_orders_shortfalls_and_is_idempotent_per_pass() {
    let server = TestServer::spawn().await;
    // Heavy recent sales against a nearly empty shelf.
    server.seed_product("SKU-LOW", 1, &[10, 12, 14]);
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/api/forecast/run", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let first: serde_json::Value = client
        .post(format!("{}/api/po/auto", server.base_url))
        .json(&json!({"passId": "restock-blackbox"}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(first["autoPOs"], 1);
    assert_eq!(first["duplicates"], 0);
    assert_eq!(first["passId"], "restock-blackbox");

    let second: serde_json::Value = client
        .post(format!("{}/api/po/auto", server.base_url))
        .json(&json!({"passId": "restock-blackbox"}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(second["autoPOs"], 0);
    assert_eq!(second["duplicates"], 1);
}

#[tokio::test]
async fn auto_po_without_body_uses_a_day_scoped_pass() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/api/po/auto", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["autoPOs"], 0);
    let pass_id = body["passId"].as_str().unwrap();
    let today = Utc::now().date_naive().format("%Y-%m-%d").to_string();
    assert_eq!(pass_id, format!("restock-{today}"));
}
