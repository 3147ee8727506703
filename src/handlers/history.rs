use crate::{handlers::AppState, models::HistoryEntry};
use axum::{extract::State, Json};

pub async fn get_gas_history(State(state): State<AppState>) -> Json<Vec<HistoryEntry>> {
    Json(state.history.read_all().await)
}
