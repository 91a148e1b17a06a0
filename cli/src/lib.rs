//! # stockscope - single-ticker stock history analysis
//!
//! Fetches the price history of one ticker and derives:
//! - daily returns
//! - Pearson correlations between price/volume columns
//! - volatility (standard deviation of returns, average true range)
//! - a least-squares linear trend of the close price
//! - chart-ready series for line, bar and candlestick charts
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use stockscope::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = YahooClient::new()?;
//!     let series = client.fetch_history(&HistoryRequest::default_msft()).await?;
//!     let report = build_report(&series)?;
//!     println!("{}", render_text(&report));
//!     Ok(())
//! }
//! ```

pub mod analysis;
pub mod models;
pub mod report;
pub mod services;
pub mod utils;

pub mod prelude {
    //! Prelude module for convenient imports
    //!
    //! ```rust
    //! use stockscope::prelude::*;
    //! ```

    pub use crate::analysis::{
        compute_correlation, compute_returns, compute_volatility, fit_linear_trend, AnalysisError,
        CorrelationSummary, ReturnsSeries, TrendModel, VolatilityMetrics,
    };
    pub use crate::models::{HistoryRequest, Interval, PriceRecord, PriceSeries, RequestError};
    pub use crate::report::{build_report, render_text, AnalysisReport};
    pub use crate::services::{CsvSource, PriceSource, SourceError, YahooClient};
}

pub use utils::{init_logger, Logger, Timer};
