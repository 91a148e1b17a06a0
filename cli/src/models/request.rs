use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

pub const DEFAULT_TICKER: &str = "MSFT";
pub const DEFAULT_START: &str = "2014-05-31";
pub const DEFAULT_END: &str = "2024-02-26";

/// Bar size requested from a price source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Interval {
    #[default]
    #[serde(rename = "1d")]
    Daily,
    #[serde(rename = "1wk")]
    Weekly,
    #[serde(rename = "1mo")]
    Monthly,
}

impl Interval {
    pub fn as_str(&self) -> &'static str {
        match self {
            Interval::Daily => "1d",
            Interval::Weekly => "1wk",
            Interval::Monthly => "1mo",
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Interval {
    type Err = RequestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1d" | "daily" => Ok(Interval::Daily),
            "1wk" | "weekly" => Ok(Interval::Weekly),
            "1mo" | "monthly" => Ok(Interval::Monthly),
            other => Err(RequestError::InvalidInterval(other.to_string())),
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum RequestError {
    #[error("invalid ticker symbol: {0:?}")]
    InvalidTicker(String),
    #[error("invalid date {0:?}, expected YYYY-MM-DD")]
    InvalidDate(String),
    #[error("start date {start} is after end date {end}")]
    InvertedRange { start: NaiveDate, end: NaiveDate },
    #[error("unsupported interval {0:?}, expected 1d, 1wk or 1mo")]
    InvalidInterval(String),
}

fn ticker_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9.\-^=]{1,15}$").expect("ticker pattern is valid")
    })
}

/// What history to retrieve: one ticker over an inclusive date range
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRequest {
    pub ticker: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub interval: Interval,
}

impl HistoryRequest {
    pub fn new(
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
        interval: Interval,
    ) -> Result<Self, RequestError> {
        let ticker = ticker.trim();
        if !ticker_pattern().is_match(ticker) {
            return Err(RequestError::InvalidTicker(ticker.to_string()));
        }
        if start > end {
            return Err(RequestError::InvertedRange { start, end });
        }

        Ok(Self {
            ticker: ticker.to_uppercase(),
            start,
            end,
            interval,
        })
    }

    /// Build a request from string arguments as they arrive from the CLI or a query string
    pub fn parse(
        ticker: &str,
        start: &str,
        end: &str,
        interval: &str,
    ) -> Result<Self, RequestError> {
        Self::new(ticker, parse_date(start)?, parse_date(end)?, interval.parse()?)
    }

    /// MSFT daily history from 2014-05-31 to 2024-02-26
    pub fn default_msft() -> Self {
        Self::parse(DEFAULT_TICKER, DEFAULT_START, DEFAULT_END, Interval::Daily.as_str())
            .expect("default request is valid")
    }
}

pub fn parse_date(value: &str) -> Result<NaiveDate, RequestError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| RequestError::InvalidDate(value.to_string()))
}
