use crate::{config::UsdRateSource, contracts::UniswapV3Pool};
use anyhow::{anyhow, Context, Result};
use ethers::{
    providers::{Http, Provider},
    types::U256,
};
use std::sync::Arc;
use std::time::Duration;

// token0 of the default pool is USDC, token1 is WETH
const STABLE_DECIMALS: i32 = 6;
const NATIVE_DECIMALS: i32 = 18;
const Q96: f64 = 79_228_162_514_264_337_593_543_950_336.0;

/// The single source of the native-to-USD rate used by cost estimates.
pub enum UsdRate {
    Fixed(f64),
    Pool(PoolPriceOracle),
}

impl UsdRate {
    pub fn from_source(source: &UsdRateSource, timeout: Duration) -> Result<Self> {
        match source {
            UsdRateSource::Fixed(rate) => Ok(Self::Fixed(*rate)),
            UsdRateSource::Pool { address, rpc_url } => {
                let provider = Provider::<Http>::try_from(rpc_url.as_str())
                    .context("Invalid price pool RPC URL")?;
                tracing::info!("USD rate will be read from pool {:?}", address);
                Ok(Self::Pool(PoolPriceOracle {
                    pool: UniswapV3Pool::new(*address, Arc::new(provider)),
                    timeout,
                }))
            }
        }
    }

    pub async fn resolve(&self) -> Result<f64> {
        match self {
            Self::Fixed(rate) => Ok(*rate),
            Self::Pool(oracle) => oracle.native_usd().await,
        }
    }
}

pub struct PoolPriceOracle {
    pool: UniswapV3Pool<Provider<Http>>,
    timeout: Duration,
}

impl PoolPriceOracle {
    pub async fn native_usd(&self) -> Result<f64> {
        let call = self.pool.slot_0();
        let (sqrt_price_x96, ..) = tokio::time::timeout(self.timeout, call.call())
            .await
            .map_err(|_| anyhow!("slot0 call timed out after {:?}", self.timeout))?
            .context("slot0 call failed")?;

        let price = native_usd_from_sqrt_price(sqrt_price_x96)
            .ok_or_else(|| anyhow!("Pool returned unusable sqrtPriceX96 {}", sqrt_price_x96))?;

        tracing::debug!("Pool native/USD rate: {:.2}", price);
        Ok(price)
    }
}

/// `sqrtPriceX96` encodes sqrt(token1 / token0) in raw units. With USDC as
/// token0 and WETH as token1 the native price is the decimal-adjusted inverse.
pub fn native_usd_from_sqrt_price(sqrt_price_x96: U256) -> Option<f64> {
    let sqrt_price: f64 = sqrt_price_x96.to_string().parse().ok()?;
    let ratio = (sqrt_price / Q96).powi(2);
    let price = 10f64.powi(NATIVE_DECIMALS - STABLE_DECIMALS) / ratio;

    (price.is_finite() && price > 0.0).then_some(price)
}
