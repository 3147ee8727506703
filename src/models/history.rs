use super::{decimal, CostEstimate};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A persisted record of one past estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub chain: String,
    pub gas_price: f64,
    pub gas_limit: u64,
    #[serde(serialize_with = "decimal::six_places", deserialize_with = "decimal::lenient")]
    pub gas_cost_eth: f64,
    #[serde(serialize_with = "decimal::two_places", deserialize_with = "decimal::lenient")]
    pub gas_cost_usd: f64,
    pub timestamp: DateTime<Utc>,
}

impl HistoryEntry {
    pub fn from_estimate(estimate: &CostEstimate, timestamp: DateTime<Utc>) -> Self {
        Self {
            chain: estimate.chain.clone(),
            gas_price: estimate.gas_price_gwei,
            gas_limit: estimate.gas_limit,
            gas_cost_eth: estimate.gas_cost_in_eth,
            gas_cost_usd: estimate.gas_cost_in_usd,
            timestamp,
        }
    }
}
