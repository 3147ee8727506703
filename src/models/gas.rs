use super::decimal;
use serde::{ser::SerializeMap, Deserialize, Serialize, Serializer};

/// Price fetched for one chain during a single cycle. `None` when the
/// endpoint failed or reported no usable price.
#[derive(Debug, Clone, PartialEq)]
pub struct GasPriceSample {
    pub chain: String,
    pub price_gwei: Option<f64>,
}

/// Prices for every registered chain, in registry order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GasSnapshot {
    samples: Vec<GasPriceSample>,
}

impl GasSnapshot {
    pub fn new(samples: Vec<GasPriceSample>) -> Self {
        Self { samples }
    }

    pub fn price(&self, chain: &str) -> Option<f64> {
        self.samples
            .iter()
            .find(|s| s.chain == chain)
            .and_then(|s| s.price_gwei)
    }

    pub fn samples(&self) -> &[GasPriceSample] {
        &self.samples
    }

    pub fn available(&self) -> usize {
        self.samples.iter().filter(|s| s.price_gwei.is_some()).count()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

// Serialized as `{ "<chain>": gwei | null }`, keeping registry order.
impl Serialize for GasSnapshot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.samples.len()))?;
        for sample in &self.samples {
            map.serialize_entry(&sample.chain, &sample.price_gwei)?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostEstimate {
    pub chain: String,
    pub gas_price_gwei: f64,
    pub gas_limit: u64,
    #[serde(serialize_with = "decimal::six_places", deserialize_with = "decimal::lenient")]
    pub gas_cost_in_eth: f64,
    #[serde(serialize_with = "decimal::two_places", deserialize_with = "decimal::lenient")]
    pub gas_cost_in_usd: f64,
}

/// One row of a simulation response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChainResult {
    Estimate(CostEstimate),
    Failed { chain: String, error: String },
}

impl ChainResult {
    pub const PRICE_UNAVAILABLE: &'static str = "Gas price unavailable";
    pub const ESTIMATION_FAILED: &'static str = "Estimation failed";

    pub fn failed(chain: impl Into<String>, error: impl Into<String>) -> Self {
        Self::Failed {
            chain: chain.into(),
            error: error.into(),
        }
    }

    pub fn chain(&self) -> &str {
        match self {
            Self::Estimate(estimate) => &estimate.chain,
            Self::Failed { chain, .. } => chain,
        }
    }

    pub fn is_estimate(&self) -> bool {
        matches!(self, Self::Estimate(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn snapshot_serializes_in_registry_order() {
        let snapshot = GasSnapshot::new(vec![
            GasPriceSample { chain: "Ethereum".into(), price_gwei: Some(12.5) },
            GasPriceSample { chain: "Polygon".into(), price_gwei: None },
            GasPriceSample { chain: "Arbitrum".into(), price_gwei: Some(0.01) },
        ]);

        let body = serde_json::to_string(&snapshot).unwrap();
        assert_eq!(body, r#"{"Ethereum":12.5,"Polygon":null,"Arbitrum":0.01}"#);
        assert_eq!(snapshot.available(), 2);
        assert_eq!(snapshot.price("Polygon"), None);
        assert_eq!(snapshot.price("Arbitrum"), Some(0.01));
    }

    #[test]
    fn estimate_uses_fixed_precision_strings() {
        let result = ChainResult::Estimate(CostEstimate {
            chain: "Ethereum".into(),
            gas_price_gwei: 50.0,
            gas_limit: 21_000,
            gas_cost_in_eth: 0.00105,
            gas_cost_in_usd: 2871.6,
        });

        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({
                "chain": "Ethereum",
                "gasPriceGwei": 50.0,
                "gasLimit": 21000,
                "gasCostInEth": "0.001050",
                "gasCostInUsd": "2871.60",
            })
        );
    }

    #[test]
    fn failed_row_has_chain_and_error_only() {
        let result = ChainResult::failed("Polygon", ChainResult::PRICE_UNAVAILABLE);
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({ "chain": "Polygon", "error": "Gas price unavailable" })
        );
        assert!(!result.is_estimate());
    }
}
