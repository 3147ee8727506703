use crate::{
    config::ChainRegistry,
    models::{ChainResult, GasSnapshot, HistoryEntry},
    services::{Analytics, CostEstimator, GasPriceSource, HistoryStore, UsdRate},
};
use anyhow::{Context, Result};
use chrono::Utc;
use std::sync::Arc;

/// Runs fetch → estimate → record across every registered chain.
pub struct AggregationService {
    registry: ChainRegistry,
    source: Arc<dyn GasPriceSource>,
    usd_rate: UsdRate,
    history: Arc<HistoryStore>,
    analytics: Arc<Analytics>,
}

impl AggregationService {
    pub fn new(
        registry: ChainRegistry,
        source: Arc<dyn GasPriceSource>,
        usd_rate: UsdRate,
        history: Arc<HistoryStore>,
        analytics: Arc<Analytics>,
    ) -> Self {
        Self {
            registry,
            source,
            usd_rate,
            history,
            analytics,
        }
    }

    pub fn registry(&self) -> &ChainRegistry {
        &self.registry
    }

    pub async fn snapshot(&self) -> Result<GasSnapshot> {
        let snapshot = self
            .source
            .fetch_all(self.registry.chains())
            .await
            .context("fetching gas prices")?;

        for sample in snapshot.samples().iter().filter(|s| s.price_gwei.is_none()) {
            self.analytics.record_fetch_failure(&sample.chain);
        }

        Ok(snapshot)
    }

    /// One result per registered chain, in registry order. Chains without a
    /// price get an inline error and are not recorded.
    pub async fn run_cycle(&self, amount: f64) -> Result<Vec<ChainResult>> {
        let outcome = self.cycle(amount).await;
        self.analytics.record_cycle(outcome.is_ok());
        outcome
    }

    async fn cycle(&self, amount: f64) -> Result<Vec<ChainResult>> {
        let rate = self.usd_rate.resolve().await.context("resolving USD rate")?;
        let estimator = CostEstimator::new(rate).context("building cost estimator")?;
        let snapshot = self.snapshot().await?;

        let mut results = Vec::with_capacity(self.registry.len());
        for chain in self.registry.chains() {
            let Some(price) = snapshot.price(&chain.name) else {
                results.push(ChainResult::failed(&chain.name, ChainResult::PRICE_UNAVAILABLE));
                continue;
            };

            let estimate = match estimator.estimate(&chain.name, price, chain.gas_limit, amount) {
                Ok(estimate) => estimate,
                Err(e) => {
                    tracing::warn!("Cost estimate for {} failed: {}", chain.name, e);
                    results.push(ChainResult::failed(&chain.name, ChainResult::ESTIMATION_FAILED));
                    continue;
                }
            };

            self.history
                .append(HistoryEntry::from_estimate(&estimate, Utc::now()))
                .await;
            results.push(ChainResult::Estimate(estimate));
        }

        tracing::info!(
            "Simulated {} chains ({} priced) for amount {}",
            results.len(),
            results.iter().filter(|r| r.is_estimate()).count(),
            amount
        );

        Ok(results)
    }
}
