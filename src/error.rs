use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum GasTrackerError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("Failed to fetch gas prices")]
    PriceFetch(#[source] anyhow::Error),

    #[error("Simulation failed")]
    Simulation(#[source] anyhow::Error),
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    pub error_code: String,
    pub timestamp: chrono::DateTime<Utc>,
    pub request_id: String,
}

impl GasTrackerError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            GasTrackerError::InvalidInput(_) => (StatusCode::BAD_REQUEST, "INVALID_INPUT"),
            GasTrackerError::PriceFetch(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "PRICE_FETCH_FAILED")
            }
            GasTrackerError::Simulation(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "SIMULATION_FAILED")
            }
        }
    }
}

impl IntoResponse for GasTrackerError {
    fn into_response(self) -> Response {
        let (status, error_code) = self.status_and_code();

        let body = ErrorResponse {
            success: false,
            error: self.to_string(),
            error_code: error_code.to_string(),
            timestamp: Utc::now(),
            request_id: Uuid::new_v4().to_string(),
        };

        if status.is_server_error() {
            tracing::error!(error = ?self, error_code = error_code, "Request failed");
        } else {
            tracing::warn!(error = %self, error_code = error_code, "Request rejected");
        }

        (status, Json(body)).into_response()
    }
}
