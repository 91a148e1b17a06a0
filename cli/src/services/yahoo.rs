//! Daily/weekly/monthly history from a Yahoo-style chart endpoint.

use super::{PriceSource, SourceError};
use crate::models::{HistoryRequest, PriceRecord, PriceSeries};
use crate::utils::{Logger, Timer};
use async_trait::async_trait;
use chrono::{DateTime, Duration as ChronoDuration, NaiveDate};
use rand::seq::SliceRandom;
use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:120.0) Gecko/20100101 Firefox/120.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/16.3 Safari/605.1.15",
];

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartEnvelope,
}

#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    result: Option<Vec<ChartData>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    #[serde(default)]
    meta: ChartMeta,
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: Indicators,
}

#[derive(Debug, Default, Deserialize)]
struct ChartMeta {
    /// Exchange offset from UTC in seconds
    #[serde(default)]
    gmtoffset: i64,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<QuoteColumns>,
}

#[derive(Debug, Deserialize)]
struct QuoteColumns {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<u64>>,
}

pub struct YahooClient {
    client: reqwest::Client,
    base_url: String,
    random_agent: bool,
    logger: Logger,
}

impl YahooClient {
    pub fn new() -> Result<Self, SourceError> {
        Self::with_options(DEFAULT_BASE_URL, Duration::from_secs(DEFAULT_TIMEOUT_SECS), true)
    }

    pub fn with_options(
        base_url: &str,
        timeout: Duration,
        random_agent: bool,
    ) -> Result<Self, SourceError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            random_agent,
            logger: Logger::new("YAHOO"),
        })
    }

    fn user_agent(&self) -> &'static str {
        if self.random_agent {
            USER_AGENTS
                .choose(&mut rand::thread_rng())
                .copied()
                .unwrap_or(USER_AGENTS[0])
        } else {
            USER_AGENTS[0]
        }
    }

    /// Query parameters for the chart endpoint. `period2` is exclusive, so the
    /// end date is pushed forward a day to keep it in the result.
    fn query_params(request: &HistoryRequest) -> Vec<(&'static str, String)> {
        let period1 = midnight_timestamp(request.start);
        let period2 = midnight_timestamp(request.end + ChronoDuration::days(1));

        vec![
            ("period1", period1.to_string()),
            ("period2", period2.to_string()),
            ("interval", request.interval.as_str().to_string()),
            ("events", "history".to_string()),
        ]
    }

    fn chart_url(&self, ticker: &str) -> String {
        format!("{}/{}", self.base_url, ticker)
    }

    async fn fetch_chart(&self, request: &HistoryRequest) -> Result<PriceSeries, SourceError> {
        let timer = Timer::start("Yahoo history fetch");
        let url = self.chart_url(&request.ticker);
        self.logger.info(&format!(
            "Fetching {} {} from {} to {}",
            request.ticker, request.interval, request.start, request.end
        ));

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .header("User-Agent", self.user_agent())
            .query(&Self::query_params(request))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            // The provider still reports details in the chart envelope on 4xx
            if let Err(e @ SourceError::Api { .. }) = parse_chart_response(&request.ticker, &body) {
                return Err(e);
            }
            return Err(SourceError::Parse(format!("provider responded with status {}", status)));
        }

        let series = parse_chart_response(&request.ticker, &body)?;
        self.logger.debug_with_data("Decoded records", series.len());
        timer.log_elapsed("YAHOO");
        Ok(series)
    }
}

#[async_trait]
impl PriceSource for YahooClient {
    async fn fetch_history(&self, request: &HistoryRequest) -> Result<PriceSeries, SourceError> {
        self.fetch_chart(request).await.inspect_err(|e| {
            self.logger.fetch_failed(&request.ticker, e);
        })
    }

    fn name(&self) -> &'static str {
        "yahoo"
    }
}

fn midnight_timestamp(date: NaiveDate) -> i64 {
    date.and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc().timestamp())
        .unwrap_or_default()
}

/// Decode a chart response body into a series.
///
/// Rows where any of open/high/low/close is null are dropped; a null volume
/// counts as zero. Bar dates are taken in the exchange's local time using
/// `meta.gmtoffset`.
pub fn parse_chart_response(ticker: &str, body: &str) -> Result<PriceSeries, SourceError> {
    let response: ChartResponse =
        serde_json::from_str(body).map_err(|e| SourceError::Parse(e.to_string()))?;

    if let Some(error) = response.chart.error {
        return Err(SourceError::Api {
            code: error.code,
            description: error.description,
        });
    }

    let data = response
        .chart
        .result
        .and_then(|results| results.into_iter().next())
        .ok_or_else(|| SourceError::NoData(ticker.to_string()))?;

    let quote = data
        .indicators
        .quote
        .into_iter()
        .next()
        .ok_or_else(|| SourceError::Parse("missing quote indicators".to_string()))?;

    let offset = data.meta.gmtoffset;
    let length = data.timestamp.len();
    if [quote.open.len(), quote.high.len(), quote.low.len(), quote.close.len()]
        .iter()
        .any(|&len| len != length)
    {
        return Err(SourceError::Parse("inconsistent column lengths".to_string()));
    }

    let mut records = Vec::with_capacity(length);
    for (i, &timestamp) in data.timestamp.iter().enumerate() {
        let (Some(open), Some(high), Some(low), Some(close)) =
            (quote.open[i], quote.high[i], quote.low[i], quote.close[i])
        else {
            continue;
        };

        let date = DateTime::from_timestamp(timestamp + offset, 0)
            .ok_or_else(|| {
                SourceError::Parse(format!("invalid timestamp {} at index {}", timestamp, i))
            })?
            .date_naive();
        let volume = quote.volume.get(i).copied().flatten().unwrap_or(0);

        records.push(PriceRecord::new(date, open, high, low, close, volume));
    }

    if records.is_empty() {
        return Err(SourceError::NoData(ticker.to_string()));
    }

    Ok(PriceSeries::new(ticker, records))
}
