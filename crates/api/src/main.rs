#[tokio::main]
async fn main() {
    restocker_observability::init();

    let config = restocker_api::config::AppConfig::from_env();
    tracing::info!(
        port = config.port,
        mode = ?config.forecast_mode,
        persistent = config.use_persistent_stores,
        "starting"
    );

    let app = restocker_api::app::build_app(&config).await;

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {addr}: {e}"));

    tracing::info!("listening on {}", listener.local_addr().unwrap());

    axum::serve(listener, app).await.unwrap();
}
