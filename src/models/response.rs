use super::ChainResult;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug)]
pub struct SimulateResponse {
    pub data: Vec<ChainResult>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
    pub chains_available: usize,
    pub chains_total: usize,
    pub history_entries: usize,
    pub uptime_seconds: u64,
    pub timestamp: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Stats {
    pub cycles_completed: u64,
    pub cycles_failed: u64,
    pub chain_fetch_failures: u64,
    pub history_appends: u64,
    pub history_write_failures: u64,
    pub history_corruptions: u64,
    pub uptime_seconds: u64,
}
