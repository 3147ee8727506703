use crate::{handlers::AppState, models::HealthStatus};
use axum::{extract::State, Json};
use chrono::Utc;

pub async fn health_check(State(state): State<AppState>) -> Json<HealthStatus> {
    let chains_total = state.aggregator.registry().len();
    let chains_available = match state.aggregator.snapshot().await {
        Ok(snapshot) => snapshot.available(),
        Err(e) => {
            tracing::warn!("Health check could not fetch prices: {:#}", e);
            0
        }
    };

    let status = if chains_available == chains_total {
        "healthy"
    } else if chains_available > 0 {
        "degraded"
    } else {
        "unhealthy"
    };

    Json(HealthStatus {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        chains_available,
        chains_total,
        history_entries: state.history.read_all().await.len(),
        uptime_seconds: state.analytics.uptime_seconds(),
        timestamp: Utc::now(),
    })
}

pub async fn root() -> &'static str {
    "Real-Time Gas Tracker Backend is running"
}
