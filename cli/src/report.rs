//! Assembles every analysis for one series into a single value that a chart
//! front end or the terminal can display.

use crate::analysis::{
    compute_returns, compute_volatility, correlation_summary, fit_linear_trend, AnalysisError,
    CorrelationSummary, MIN_POINTS, ReturnsSeries, TrendModel, VolatilityMetrics,
};
use crate::models::PriceSeries;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// One `(date, value)` point of a line or bar chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint<T> {
    pub date: NaiveDate,
    pub value: T,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candlestick {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

/// Series for every chart on the analysis page, each aligned with the input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSet {
    pub open: Vec<ChartPoint<f64>>,
    pub close: Vec<ChartPoint<f64>>,
    pub high: Vec<ChartPoint<f64>>,
    pub low: Vec<ChartPoint<f64>>,
    pub volume: Vec<ChartPoint<u64>>,
    pub candlesticks: Vec<Candlestick>,
    pub returns: Vec<ChartPoint<Option<f64>>>,
    pub trend: Vec<ChartPoint<f64>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub ticker: String,
    pub first_date: NaiveDate,
    pub last_date: NaiveDate,
    pub record_count: usize,
    pub returns: ReturnsSeries,
    pub correlations: CorrelationSummary,
    pub volatility: VolatilityMetrics,
    pub trend: TrendModel,
    pub charts: ChartSet,
}

pub fn build_report(series: &PriceSeries) -> Result<AnalysisReport, AnalysisError> {
    // Slice pattern only matches MIN_POINTS (two) or more records
    let [first, .., last] = series.records() else {
        return Err(AnalysisError::InsufficientData {
            required: MIN_POINTS,
            actual: series.len(),
        });
    };

    let returns = compute_returns(series);
    let correlations = correlation_summary(series)?;
    let volatility = compute_volatility(series)?;
    let trend = fit_linear_trend(series)?;
    let charts = build_charts(series, &returns, &trend);

    Ok(AnalysisReport {
        ticker: series.ticker().to_string(),
        first_date: first.date,
        last_date: last.date,
        record_count: series.len(),
        returns,
        correlations,
        volatility,
        trend,
        charts,
    })
}

fn build_charts(series: &PriceSeries, returns: &[Option<f64>], trend: &TrendModel) -> ChartSet {
    let records = series.records();
    let line = |pick: fn(&crate::models::PriceRecord) -> f64| -> Vec<ChartPoint<f64>> {
        records
            .iter()
            .map(|r| ChartPoint {
                date: r.date,
                value: pick(r),
            })
            .collect()
    };

    ChartSet {
        open: line(|r| r.open),
        close: line(|r| r.close),
        high: line(|r| r.high),
        low: line(|r| r.low),
        volume: records
            .iter()
            .map(|r| ChartPoint {
                date: r.date,
                value: r.volume,
            })
            .collect(),
        candlesticks: records
            .iter()
            .map(|r| Candlestick {
                date: r.date,
                open: r.open,
                high: r.high,
                low: r.low,
                close: r.close,
            })
            .collect(),
        returns: records
            .iter()
            .zip(returns)
            .map(|(r, &value)| ChartPoint { date: r.date, value })
            .collect(),
        trend: records
            .iter()
            .zip(&trend.fitted)
            .map(|(r, &value)| ChartPoint { date: r.date, value })
            .collect(),
    }
}

fn format_optional(value: Option<f64>) -> String {
    value.map_or_else(|| "undefined".to_string(), |v| format!("{:.6}", v))
}

fn write_series_summary(out: &mut String, title: &str, points: &[ChartPoint<f64>]) {
    let _ = writeln!(out, "## {}", title);
    let values: Vec<f64> = points.iter().map(|p| p.value).collect();
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if let (Some(first), Some(last)) = (points.first(), points.last()) {
        let _ = writeln!(
            out,
            "first {:.2} ({}) | last {:.2} ({}) | min {:.2} | max {:.2}",
            first.value, first.date, last.value, last.date, min, max
        );
    }
    let _ = writeln!(out);
}

/// Plain-text rendering of a report, one section per chart or statistic
pub fn render_text(report: &AnalysisReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# Stock Price Analysis: {}", report.ticker);
    let _ = writeln!(
        out,
        "{} records from {} to {}\n",
        report.record_count, report.first_date, report.last_date
    );

    write_series_summary(&mut out, "Opening Prices", &report.charts.open);
    write_series_summary(&mut out, "Closing Prices", &report.charts.close);
    write_series_summary(&mut out, "High Prices", &report.charts.high);
    write_series_summary(&mut out, "Low Prices", &report.charts.low);

    let _ = writeln!(out, "## Volume");
    let total: u64 = report.charts.volume.iter().map(|p| p.value).sum();
    let peak = report.charts.volume.iter().max_by_key(|p| p.value);
    if let Some(peak) = peak {
        let _ = writeln!(
            out,
            "average {:.0} | peak {} on {}\n",
            total as f64 / report.record_count as f64,
            peak.value,
            peak.date
        );
    }

    let _ = writeln!(out, "## Candlestick");
    let up_days = report.charts.candlesticks.iter().filter(|c| c.close >= c.open).count();
    let _ = writeln!(
        out,
        "{} up periods, {} down periods\n",
        up_days,
        report.record_count - up_days
    );

    let _ = writeln!(out, "### Correlation Analysis");
    let _ = writeln!(
        out,
        "The correlation coefficient between Opening and Closing prices is: {}",
        format_optional(report.correlations.open_close)
    );
    let _ = writeln!(
        out,
        "The correlation coefficient between High and Low prices is: {}",
        format_optional(report.correlations.high_low)
    );
    let _ = writeln!(
        out,
        "The correlation coefficient between Volume and High prices is: {}\n",
        format_optional(report.correlations.volume_high)
    );

    let _ = writeln!(out, "## Volatility Analysis");
    let _ = writeln!(
        out,
        "Standard Deviation of Returns (Volatility): {}",
        format_optional(report.volatility.standard_deviation_of_returns)
    );
    let _ = writeln!(
        out,
        "Average True Range (ATR): {:.6}\n",
        report.volatility.average_true_range
    );

    let _ = writeln!(out, "## Trend Analysis");
    let _ = writeln!(
        out,
        "Closing price trend: slope {:.6} per period, intercept {:.4}",
        report.trend.slope, report.trend.intercept
    );
    if let (Some(start), Some(end)) = (report.trend.fitted.first(), report.trend.fitted.last()) {
        let _ = writeln!(out, "Trend line runs from {:.2} to {:.2}", start, end);
    }

    out
}
