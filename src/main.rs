use anyhow::Result;
use gas_tracker::{
    config::Config,
    handlers::AppState,
    router::build_router,
    services::*,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;

    tracing::info!("Starting gas tracker v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Environment: {:?}", config.environment);
    for chain in config.registry.chains() {
        tracing::info!("Tracking {} via {}", chain.name, chain.rpc_endpoint);
    }

    // Initialize services
    let analytics = Arc::new(Analytics::new());
    let history = Arc::new(HistoryStore::new(
        config.history_path.clone(),
        analytics.clone(),
    ));
    let fetcher = Arc::new(RpcGasFetcher::new(config.rpc_timeout));
    let usd_rate = UsdRate::from_source(&config.usd_rate, config.rpc_timeout)?;
    let aggregator = Arc::new(AggregationService::new(
        config.registry.clone(),
        fetcher,
        usd_rate,
        history.clone(),
        analytics.clone(),
    ));

    let app_state = AppState {
        aggregator,
        history,
        analytics,
        dashboard_interval: config.dashboard_interval,
    };

    let app = build_router(app_state);

    // Start server
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Server is live on http://{}", addr);
    tracing::info!("WebSocket dashboard: ws://{}/ws/dashboard", addr);
    tracing::info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for ctrl+c: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down gracefully...");
}
