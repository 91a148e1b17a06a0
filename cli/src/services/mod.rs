pub mod csv_service;
pub mod yahoo;

pub use csv_service::*;
pub use yahoo::*;

use crate::models::{HistoryRequest, Interval, PriceSeries};
use async_trait::async_trait;

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("provider error [{code}]: {description}")]
    Api { code: String, description: String },
    #[error("unexpected response: {0}")]
    Parse(String),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("no price data for {0}")]
    NoData(String),
    #[error("{provider} source does not serve {interval} bars")]
    UnsupportedInterval {
        provider: &'static str,
        interval: Interval,
    },
}

/// Anything that can produce a price history for one ticker.
#[async_trait]
pub trait PriceSource: Send + Sync {
    async fn fetch_history(&self, request: &HistoryRequest) -> Result<PriceSeries, SourceError>;

    /// Short label used in logs
    fn name(&self) -> &'static str;
}
