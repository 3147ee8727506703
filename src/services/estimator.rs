use crate::models::{decimal::round_to, CostEstimate};
use thiserror::Error;

const GWEI_PER_NATIVE: f64 = 1e9;

#[derive(Error, Debug, PartialEq)]
pub enum EstimateError {
    #[error("gas price must be a positive finite number, got {0}")]
    InvalidGasPrice(f64),

    #[error("transfer amount must be a non-negative finite number, got {0}")]
    InvalidAmount(f64),

    #[error("USD rate must be a positive finite number, got {0}")]
    InvalidRate(f64),

    #[error("cost for {amount} native units does not fit in a finite number")]
    Overflow { amount: f64 },
}

/// Converts a gas price into transfer costs, at a USD rate fixed for the
/// lifetime of the estimator.
#[derive(Debug, Clone, Copy)]
pub struct CostEstimator {
    usd_rate: f64,
}

impl CostEstimator {
    pub fn new(usd_rate: f64) -> Result<Self, EstimateError> {
        if !usd_rate.is_finite() || usd_rate <= 0.0 {
            return Err(EstimateError::InvalidRate(usd_rate));
        }
        Ok(Self { usd_rate })
    }

    pub fn usd_rate(&self) -> f64 {
        self.usd_rate
    }

    /// Native cost is rounded to 6 places first; USD is derived from the
    /// rounded value and rounded to 2 places.
    pub fn estimate(
        &self,
        chain: &str,
        price_gwei: f64,
        gas_limit: u64,
        amount: f64,
    ) -> Result<CostEstimate, EstimateError> {
        if !price_gwei.is_finite() || price_gwei <= 0.0 {
            return Err(EstimateError::InvalidGasPrice(price_gwei));
        }
        if !amount.is_finite() || amount < 0.0 {
            return Err(EstimateError::InvalidAmount(amount));
        }

        let gas_cost_in_eth = round_to(price_gwei * gas_limit as f64 / GWEI_PER_NATIVE, 6);
        let gas_cost_in_usd = round_to(gas_cost_in_eth * amount * self.usd_rate, 2);
        if !gas_cost_in_eth.is_finite() || !gas_cost_in_usd.is_finite() {
            return Err(EstimateError::Overflow { amount });
        }

        Ok(CostEstimate {
            chain: chain.to_string(),
            gas_price_gwei: price_gwei,
            gas_limit,
            gas_cost_in_eth,
            gas_cost_in_usd,
        })
    }
}
