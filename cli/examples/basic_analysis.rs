//! Basic Analysis Example
//!
//! Runs each statistic on its own over a small in-memory series, then builds
//! the combined report. No network access is needed.

use chrono::NaiveDate;
use std::error::Error;
use stockscope::analysis::correlation_summary;
use stockscope::prelude::*;

fn sample_series() -> PriceSeries {
    let rows = [
        ("2024-02-01", 401.83, 408.00, 401.80, 403.78, 30_657_700),
        ("2024-02-02", 403.81, 412.65, 403.56, 411.22, 28_245_000),
        ("2024-02-05", 409.90, 410.22, 403.39, 405.65, 25_352_300),
        ("2024-02-06", 405.88, 407.97, 402.91, 405.49, 18_382_600),
        ("2024-02-07", 407.44, 414.30, 407.40, 414.05, 22_340_500),
        ("2024-02-08", 414.05, 415.56, 411.39, 414.11, 21_225_300),
    ];

    let records = rows
        .iter()
        .filter_map(|&(date, open, high, low, close, volume)| {
            let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()?;
            Some(PriceRecord::new(date, open, high, low, close, volume))
        })
        .collect();

    PriceSeries::new("MSFT", records)
}

fn main() -> Result<(), Box<dyn Error>> {
    stockscope::init_logger()?;

    let series = sample_series();
    println!("Loaded {} records for {}", series.len(), series.ticker());

    let returns = compute_returns(&series);
    println!("\nDaily returns:");
    for (record, value) in series.records().iter().zip(&returns) {
        match value {
            Some(r) => println!("  {}  {:+.4}%", record.date, r * 100.0),
            None => println!("  {}  (undefined)", record.date),
        }
    }

    let correlations = correlation_summary(&series)?;
    println!("\nOpen/Close correlation: {:?}", correlations.open_close);

    let volatility = compute_volatility(&series)?;
    println!("Volatility: {:?}", volatility);

    let trend = fit_linear_trend(&series)?;
    println!("Trend: slope {:.4}, intercept {:.4}", trend.slope, trend.intercept);

    let report = build_report(&series)?;
    println!("\n{}", render_text(&report));

    Ok(())
}
