use super::{PriceSource, SourceError};
use crate::models::{HistoryRequest, Interval, PriceRecord, PriceSeries};
use crate::utils::Logger;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};
use std::path::PathBuf;

/// Row layout of a history export: `Date,Open,High,Low,Close,Volume`.
/// Extra columns (dividends, splits, adjusted close) are ignored.
#[derive(Debug, Deserialize)]
struct RawPriceRow {
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Open")]
    open: f64,
    #[serde(rename = "High")]
    high: f64,
    #[serde(rename = "Low")]
    low: f64,
    #[serde(rename = "Close")]
    close: f64,
    #[serde(rename = "Volume")]
    volume: f64,
}

#[derive(Debug, Serialize)]
struct PriceRow {
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Open")]
    open: f64,
    #[serde(rename = "High")]
    high: f64,
    #[serde(rename = "Low")]
    low: f64,
    #[serde(rename = "Close")]
    close: f64,
    #[serde(rename = "Volume")]
    volume: u64,
}

impl RawPriceRow {
    fn to_price_record(&self) -> Result<PriceRecord, SourceError> {
        Ok(PriceRecord::new(
            parse_row_date(&self.date)?,
            self.open,
            self.high,
            self.low,
            self.close,
            self.volume.max(0.0) as u64,
        ))
    }
}

/// Accepts a bare `YYYY-MM-DD` or the timestamped form
/// `YYYY-MM-DD HH:MM:SS-05:00`; only the calendar date is kept.
fn parse_row_date(value: &str) -> Result<NaiveDate, SourceError> {
    let value = value.trim();
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(date);
    }
    DateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S%:z")
        .map(|dt| dt.date_naive())
        .map_err(|_| SourceError::Parse(format!("invalid date {:?}", value)))
}

/// Parse CSV history from any reader. Rows come back sorted by date.
pub fn read_csv<R: Read>(ticker: &str, reader: R) -> Result<PriceSeries, SourceError> {
    let mut reader = csv::Reader::from_reader(reader);
    let mut records = Vec::new();

    for result in reader.deserialize() {
        let row: RawPriceRow = result?;
        records.push(row.to_price_record()?);
    }

    Ok(PriceSeries::new(ticker, records))
}

/// Write a series in the same layout `read_csv` accepts.
pub fn write_csv<W: Write>(series: &PriceSeries, writer: W) -> Result<(), SourceError> {
    let mut writer = csv::Writer::from_writer(writer);
    for record in series.records() {
        writer.serialize(PriceRow {
            date: record.date.format("%Y-%m-%d").to_string(),
            open: record.open,
            high: record.high,
            low: record.low,
            close: record.close,
            volume: record.volume,
        })?;
    }
    writer.flush()?;
    Ok(())
}

/// Price history read from a local CSV file instead of the network.
///
/// Rows are taken as daily bars; requests for other intervals are rejected
/// rather than resampled.
pub struct CsvSource {
    path: PathBuf,
    logger: Logger,
}

impl CsvSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            logger: Logger::new("CSV_SOURCE"),
        }
    }

    async fn load(&self, request: &HistoryRequest) -> Result<PriceSeries, SourceError> {
        if request.interval != Interval::Daily {
            return Err(SourceError::UnsupportedInterval {
                provider: "csv",
                interval: request.interval,
            });
        }

        self.logger.info(&format!("Loading {} from {}", request.ticker, self.path.display()));

        let content = tokio::fs::read(&self.path).await?;
        let series = read_csv(&request.ticker, content.as_slice())?
            .filter_by_date_range(request.start, request.end);

        if series.is_empty() {
            self.logger.warn(&format!(
                "No rows between {} and {} in {}",
                request.start,
                request.end,
                self.path.display()
            ));
            return Err(SourceError::NoData(request.ticker.clone()));
        }

        self.logger.debug_with_data("Loaded records", series.len());
        Ok(series)
    }
}

#[async_trait]
impl PriceSource for CsvSource {
    async fn fetch_history(&self, request: &HistoryRequest) -> Result<PriceSeries, SourceError> {
        self.load(request).await.inspect_err(|e| {
            self.logger.fetch_failed(&request.ticker, e);
        })
    }

    fn name(&self) -> &'static str {
        "csv"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXPORT: &str = "\
Date,Open,High,Low,Close,Volume,Dividends,Stock Splits
2024-02-02 00:00:00-05:00,403.81,412.65,403.56,411.22,28245000,0.0,0.0
2024-02-01 00:00:00-05:00,401.83,408.00,401.80,403.78,30657700.0,0.0,0.0
2024-02-05 00:00:00-05:00,409.90,410.22,403.39,405.65,25352300,0.0,0.0
";

    #[test]
    fn test_read_csv_accepts_timestamped_dates() {
        let series = read_csv("MSFT", EXPORT.as_bytes()).unwrap();

        assert_eq!(series.len(), 3);
        assert_eq!(series.first().unwrap().date, NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
        assert_eq!(series.first().unwrap().volume, 30_657_700);
        assert_eq!(series.closes(), vec![403.78, 411.22, 405.65]);
    }

    #[test]
    fn test_read_csv_rejects_bad_date() {
        let content = "Date,Open,High,Low,Close,Volume\n02/01/2024,1,2,0.5,1.5,100\n";
        assert!(matches!(read_csv("MSFT", content.as_bytes()), Err(SourceError::Parse(_))));
    }

    #[test]
    fn test_write_then_read_preserves_rows() {
        let series = read_csv("MSFT", EXPORT.as_bytes()).unwrap();
        let mut buffer = Vec::new();
        write_csv(&series, &mut buffer).unwrap();

        let text = String::from_utf8(buffer.clone()).unwrap();
        assert!(text.starts_with("Date,Open,High,Low,Close,Volume\n2024-02-01,"));
        assert_eq!(read_csv("MSFT", buffer.as_slice()).unwrap(), series);
    }

    #[tokio::test]
    async fn test_csv_source_filters_to_request_range() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(EXPORT.as_bytes()).unwrap();

        let source = CsvSource::new(file.path());
        let request = HistoryRequest::parse("msft", "2024-02-02", "2024-02-05", "1d").unwrap();
        let series = source.fetch_history(&request).await.unwrap();

        assert_eq!(series.ticker(), "MSFT");
        assert_eq!(series.closes(), vec![411.22, 405.65]);
    }

    #[tokio::test]
    async fn test_csv_source_without_rows_in_range() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(EXPORT.as_bytes()).unwrap();

        let source = CsvSource::new(file.path());
        let request = HistoryRequest::parse("MSFT", "2020-01-01", "2020-12-31", "1d").unwrap();
        assert!(matches!(source.fetch_history(&request).await, Err(SourceError::NoData(_))));
    }

    #[tokio::test]
    async fn test_csv_source_rejects_non_daily_interval() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(EXPORT.as_bytes()).unwrap();

        let source = CsvSource::new(file.path());
        let request = HistoryRequest::parse("MSFT", "2024-02-01", "2024-02-05", "1wk").unwrap();
        match source.fetch_history(&request).await {
            Err(SourceError::UnsupportedInterval { provider, interval }) => {
                assert_eq!(provider, "csv");
                assert_eq!(interval, Interval::Weekly);
            }
            other => panic!("expected unsupported interval, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_csv_source_missing_file() {
        let source = CsvSource::new("/nonexistent/stockscope/history.csv");
        let request = HistoryRequest::default_msft();
        assert!(matches!(source.fetch_history(&request).await, Err(SourceError::Io(_))));
    }
}
