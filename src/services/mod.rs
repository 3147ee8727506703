pub mod aggregator;
pub mod analytics;
pub mod estimator;
pub mod fetcher;
pub mod history;
pub mod pricing;

pub use aggregator::AggregationService;
pub use analytics::Analytics;
pub use estimator::{CostEstimator, EstimateError};
pub use fetcher::{GasPriceSource, RpcGasFetcher};
pub use history::HistoryStore;
pub use pricing::UsdRate;
