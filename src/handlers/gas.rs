use crate::{
    error::GasTrackerError,
    models::{GasSnapshot, SimulateResponse},
    services::{AggregationService, Analytics, HistoryStore},
};
use axum::{extract::State, Json};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

#[derive(Clone)]
pub struct AppState {
    pub aggregator: Arc<AggregationService>,
    pub history: Arc<HistoryStore>,
    pub analytics: Arc<Analytics>,
    pub dashboard_interval: Duration,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulateRequest {
    pub eth_amount: Option<Value>,
}

/// Current price per chain. Mounted as `/api/gas-history` for the dashboard.
pub async fn get_gas_prices(
    State(state): State<AppState>,
) -> Result<Json<GasSnapshot>, GasTrackerError> {
    let snapshot = state
        .aggregator
        .snapshot()
        .await
        .map_err(GasTrackerError::PriceFetch)?;

    Ok(Json(snapshot))
}

pub async fn simulate(
    State(state): State<AppState>,
    body: Option<Json<SimulateRequest>>,
) -> Result<Json<SimulateResponse>, GasTrackerError> {
    let amount = parse_amount(body.as_ref().and_then(|Json(req)| req.eth_amount.as_ref()))?;

    let data = state
        .aggregator
        .run_cycle(amount)
        .await
        .map_err(GasTrackerError::Simulation)?;

    Ok(Json(SimulateResponse { data }))
}

/// Accepts a non-negative JSON number or numeric string. Absent, null, zero
/// and empty values all count as missing.
fn parse_amount(value: Option<&Value>) -> Result<f64, GasTrackerError> {
    let required = || GasTrackerError::InvalidInput("ethAmount is required".to_string());
    let not_a_number = || GasTrackerError::InvalidInput("ethAmount must be a number".to_string());

    let amount = match value {
        None | Some(Value::Null) | Some(Value::Bool(false)) => return Err(required()),
        Some(Value::Number(n)) => match n.as_f64() {
            Some(amount) if amount == 0.0 => return Err(required()),
            Some(amount) => amount,
            None => return Err(not_a_number()),
        },
        Some(Value::String(s)) if s.is_empty() => return Err(required()),
        Some(Value::String(s)) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|amount| amount.is_finite())
            .ok_or_else(not_a_number)?,
        Some(_) => return Err(not_a_number()),
    };

    if amount < 0.0 {
        return Err(GasTrackerError::InvalidInput(
            "ethAmount must be a non-negative number".to_string(),
        ));
    }

    Ok(amount)
}
