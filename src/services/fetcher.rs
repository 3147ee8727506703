use crate::models::{Chain, GasPriceSample, GasSnapshot};
use anyhow::Result;
use async_trait::async_trait;
use ethers::{
    providers::{Http, Middleware, Provider},
    types::U256,
    utils::format_units,
};
use futures::future::join_all;
use std::time::Duration;

/// Anything that can report current gas prices for a set of chains.
#[async_trait]
pub trait GasPriceSource: Send + Sync {
    /// Returns one sample per chain, in the order given. Per-chain failures
    /// show up as absent prices; `Err` is reserved for failures that affect
    /// the whole batch.
    async fn fetch_all(&self, chains: &[Chain]) -> Result<GasSnapshot>;
}

/// Queries `eth_gasPrice` on every chain's JSON-RPC endpoint.
pub struct RpcGasFetcher {
    client: reqwest::Client,
    timeout: Duration,
}

impl RpcGasFetcher {
    pub fn new(timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            timeout,
        }
    }

    pub async fn fetch_one(&self, chain: &Chain) -> Option<f64> {
        let http = Http::new_with_client(chain.rpc_endpoint.clone(), self.client.clone());
        let provider = Provider::new(http);

        let wei = match tokio::time::timeout(self.timeout, provider.get_gas_price()).await {
            Ok(Ok(wei)) => wei,
            Ok(Err(e)) => {
                tracing::error!("Failed to fetch gas price for {}: {}", chain.name, e);
                return None;
            }
            Err(_) => {
                tracing::error!(
                    "Gas price request for {} timed out after {:?}",
                    chain.name,
                    self.timeout
                );
                return None;
            }
        };

        let gwei = wei_to_gwei(wei);
        if gwei.is_none() {
            tracing::warn!("Gas price unavailable for {}", chain.name);
        } else {
            tracing::debug!("{} gas price: {:?} gwei", chain.name, gwei);
        }
        gwei
    }
}

#[async_trait]
impl GasPriceSource for RpcGasFetcher {
    async fn fetch_all(&self, chains: &[Chain]) -> Result<GasSnapshot> {
        let prices = join_all(chains.iter().map(|chain| self.fetch_one(chain))).await;

        let samples = chains
            .iter()
            .zip(prices)
            .map(|(chain, price_gwei)| GasPriceSample {
                chain: chain.name.clone(),
                price_gwei,
            })
            .collect();

        Ok(GasSnapshot::new(samples))
    }
}

/// Zero is treated the same as no price at all.
fn wei_to_gwei(wei: U256) -> Option<f64> {
    if wei.is_zero() {
        return None;
    }
    format_units(wei, "gwei")
        .ok()
        .and_then(|s| s.parse::<f64>().ok())
        .filter(|gwei| gwei.is_finite() && *gwei > 0.0)
}
