use crate::models::Chain;
use anyhow::{bail, Context, Result};
use ethers::types::Address;
use reqwest::Url;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Placeholder rate inherited from the first dashboard release.
pub const DEFAULT_NATIVE_USD_RATE: f64 = 2_734_856.0;

// Uniswap v3 USDC/WETH 0.3% pool on Ethereum mainnet
pub const DEFAULT_PRICE_POOL: &str = "0x8ad599c3a0ff1de082011efddc58f1908eb6e6d8";

#[derive(Debug, Clone)]
pub enum Environment {
    Development,
    Testnet,
    Production,
}

/// Where the native-to-USD conversion rate comes from. Exactly one source is
/// active per process.
#[derive(Debug, Clone, PartialEq)]
pub enum UsdRateSource {
    Fixed(f64),
    Pool { address: Address, rpc_url: Url },
}

/// Ordered list of tracked chains. Order is the order results are reported in.
#[derive(Debug, Clone)]
pub struct ChainRegistry {
    chains: Vec<Chain>,
}

impl ChainRegistry {
    pub fn new(chains: Vec<Chain>) -> Result<Self> {
        for (i, chain) in chains.iter().enumerate() {
            if chains[..i].iter().any(|c| c.name == chain.name) {
                bail!("Duplicate chain name: {}", chain.name);
            }
        }
        Ok(Self { chains })
    }

    /// Ethereum, Polygon and Arbitrum public endpoints, each overridable
    /// through `<NAME>_RPC_URL`.
    pub fn from_env() -> Result<Self> {
        let defaults = [
            ("Ethereum", "ETHEREUM_RPC_URL", "https://eth.llamarpc.com"),
            ("Polygon", "POLYGON_RPC_URL", "https://polygon-rpc.com"),
            ("Arbitrum", "ARBITRUM_RPC_URL", "https://arb1.arbitrum.io/rpc"),
        ];

        let chains = defaults
            .iter()
            .map(|(name, var, default)| {
                let raw = std::env::var(var).unwrap_or_else(|_| default.to_string());
                let url = Url::parse(&raw).with_context(|| format!("Invalid {}", var))?;
                Ok(Chain::new(*name, url))
            })
            .collect::<Result<Vec<_>>>()?;

        Self::new(chains)
    }

    pub fn chains(&self) -> &[Chain] {
        &self.chains
    }

    pub fn len(&self) -> usize {
        self.chains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chains.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub environment: Environment,
    pub host: String,
    pub port: u16,

    pub registry: ChainRegistry,
    pub rpc_timeout: Duration,

    pub history_path: PathBuf,

    pub usd_rate: UsdRateSource,

    // Push interval for the dashboard socket
    pub dashboard_interval: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let environment = Self::parse_environment()?;

        let config = Self {
            environment,
            host: std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "5000".to_string())
                .parse()
                .context("Invalid PORT")?,

            registry: ChainRegistry::from_env()?,
            rpc_timeout: Duration::from_secs(
                std::env::var("RPC_TIMEOUT_SECS")
                    .unwrap_or_else(|_| "10".to_string())
                    .parse()
                    .context("Invalid RPC_TIMEOUT_SECS")?,
            ),

            history_path: std::env::var("HISTORY_PATH")
                .unwrap_or_else(|_| "data/GasHistory.json".to_string())
                .into(),

            usd_rate: Self::parse_usd_rate()?,

            dashboard_interval: Duration::from_secs(
                std::env::var("DASHBOARD_INTERVAL_SECS")
                    .unwrap_or_else(|_| "15".to_string())
                    .parse()
                    .context("Invalid DASHBOARD_INTERVAL_SECS")?,
            ),
        };

        config.validate()?;
        Ok(config)
    }

    fn parse_environment() -> Result<Environment> {
        let env = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());

        match env.to_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "testnet" | "test" => Ok(Environment::Testnet),
            "production" | "prod" => Ok(Environment::Production),
            _ => bail!("Unknown environment: {}", env),
        }
    }

    fn parse_usd_rate() -> Result<UsdRateSource> {
        let source = std::env::var("USD_RATE_SOURCE").unwrap_or_else(|_| "fixed".to_string());

        match source.to_lowercase().as_str() {
            "fixed" => {
                let rate = match std::env::var("NATIVE_USD_RATE") {
                    Ok(raw) => raw.parse().context("Invalid NATIVE_USD_RATE")?,
                    Err(_) => DEFAULT_NATIVE_USD_RATE,
                };
                Ok(UsdRateSource::Fixed(rate))
            }
            "pool" => {
                let address = std::env::var("PRICE_POOL_ADDRESS")
                    .unwrap_or_else(|_| DEFAULT_PRICE_POOL.to_string());
                let rpc_url = std::env::var("PRICE_POOL_RPC_URL")
                    .unwrap_or_else(|_| "https://eth.llamarpc.com".to_string());
                Ok(UsdRateSource::Pool {
                    address: Address::from_str(&address)
                        .context("Invalid PRICE_POOL_ADDRESS")?,
                    rpc_url: Url::parse(&rpc_url).context("Invalid PRICE_POOL_RPC_URL")?,
                })
            }
            _ => bail!("Unknown USD_RATE_SOURCE: {}", source),
        }
    }

    fn validate(&self) -> Result<()> {
        for chain in self.registry.chains() {
            if !chain.rpc_endpoint.scheme().starts_with("http") {
                bail!("RPC endpoint for {} must be HTTP(S) URL", chain.name);
            }
        }

        if self.registry.is_empty() {
            bail!("At least one chain must be configured");
        }

        if self.rpc_timeout.is_zero() {
            bail!("RPC_TIMEOUT_SECS must be greater than zero");
        }

        if self.dashboard_interval.is_zero() {
            bail!("DASHBOARD_INTERVAL_SECS must be greater than zero");
        }

        if let UsdRateSource::Fixed(rate) = self.usd_rate {
            if !rate.is_finite() || rate <= 0.0 {
                bail!("NATIVE_USD_RATE must be a positive number");
            }
        }

        tracing::info!(
            "Configuration validated for {:?} environment ({} chains)",
            self.environment,
            self.registry.len()
        );

        Ok(())
    }
}
