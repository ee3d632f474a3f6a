use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use catalog_service::build_app;
use catalog_service::config::{AppConfig, DEFAULT_LOG_FILTER};
use catalog_service::models::storage::CatalogStore;
use catalog_service::services::catalog::CatalogService;
use catalog_service::services::provider::OpenLibraryClient;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    let config = AppConfig::from_env();

    let provider = OpenLibraryClient::new(&config.catalog_base_url)
        .expect("Failed to build catalog HTTP client");
    let store = CatalogStore::new(Arc::new(provider));
    let service = Arc::new(CatalogService::new(Arc::new(store)));

    let app = build_app(service);

    let addr = config.addr();
    info!(
        "Catalog service starting on {} (provider {})",
        addr, config.catalog_base_url
    );

    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .unwrap();
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
