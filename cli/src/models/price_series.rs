use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One trading period of OHLCV data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRecord {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

impl PriceRecord {
    pub fn new(date: NaiveDate, open: f64, high: f64, low: f64, close: f64, volume: u64) -> Self {
        Self {
            date,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// High minus low for this period
    pub fn range(&self) -> f64 {
        self.high - self.low
    }

    pub fn same_date(&self, other: &PriceRecord) -> bool {
        self.date == other.date
    }
}

/// Date-ordered price history for a single ticker.
///
/// Records are sorted ascending by date and every date appears once. The
/// series is read-only after construction; analysis code only borrows it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    ticker: String,
    records: Vec<PriceRecord>,
}

impl PriceSeries {
    /// Build a series from records in any order.
    ///
    /// When several records share a date, the one supplied last wins.
    pub fn new(ticker: impl Into<String>, mut records: Vec<PriceRecord>) -> Self {
        // Stable sort keeps the supply order among equal dates
        records.sort_by(|a, b| a.date.cmp(&b.date));

        let mut deduped: Vec<PriceRecord> = Vec::with_capacity(records.len());
        for record in records {
            match deduped.last_mut() {
                Some(last) if last.same_date(&record) => *last = record,
                _ => deduped.push(record),
            }
        }

        Self {
            ticker: ticker.into(),
            records: deduped,
        }
    }

    pub fn ticker(&self) -> &str {
        &self.ticker
    }

    pub fn records(&self) -> &[PriceRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn first(&self) -> Option<&PriceRecord> {
        self.records.first()
    }

    pub fn last(&self) -> Option<&PriceRecord> {
        self.records.last()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.records.iter().map(|r| r.date).collect()
    }

    pub fn opens(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.open).collect()
    }

    pub fn highs(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.high).collect()
    }

    pub fn lows(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.low).collect()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.close).collect()
    }

    /// Volumes as floats so they can be fed to the same statistics as prices
    pub fn volumes(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.volume as f64).collect()
    }

    /// Keep only records whose date falls within `[start, end]`
    pub fn filter_by_date_range(&self, start: NaiveDate, end: NaiveDate) -> PriceSeries {
        Self {
            ticker: self.ticker.clone(),
            records: self
                .records
                .iter()
                .filter(|r| r.date >= start && r.date <= end)
                .cloned()
                .collect(),
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    pub fn day(offset: i64) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + chrono::Duration::days(offset)
    }

    /// Series with the given closes; open/high/low are derived around each close.
    pub fn series_from_closes(closes: &[f64]) -> PriceSeries {
        let records = closes
            .iter()
            .enumerate()
            .map(|(i, &c)| {
                let volume = 1_000 + i as u64 * 10;
                PriceRecord::new(day(i as i64), c - 1.0, c + 2.0, c - 2.0, c, volume)
            })
            .collect();
        PriceSeries::new("TEST", records)
    }
}
