use super::{compute_returns, defined_returns, ensure_min_points, mean, AnalysisError};
use crate::models::PriceSeries;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolatilityMetrics {
    /// Sample standard deviation (n - 1) of the defined returns.
    /// `None` when fewer than two returns are defined.
    pub standard_deviation_of_returns: Option<f64>,
    /// Mean of high - low over every record
    pub average_true_range: f64,
}

pub fn compute_volatility(series: &PriceSeries) -> Result<VolatilityMetrics, AnalysisError> {
    ensure_min_points(series.len())?;

    let returns = defined_returns(&compute_returns(series));
    let ranges: Vec<f64> = series.records().iter().map(|r| r.range()).collect();

    Ok(VolatilityMetrics {
        standard_deviation_of_returns: sample_std_dev(&returns),
        average_true_range: mean(&ranges),
    })
}

fn sample_std_dev(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let avg = mean(values);
    let squares = values.iter().map(|v| (v - avg).powi(2)).sum::<f64>();
    let variance = squares / (values.len() - 1) as f64;
    Some(variance.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::price_series::test_support::{day, series_from_closes};
    use crate::models::PriceRecord;

    const EPS: f64 = 1e-12;

    #[test]
    fn test_constant_closes_have_zero_volatility() {
        let metrics = compute_volatility(&series_from_closes(&[50.0; 6])).unwrap();
        assert_eq!(metrics.standard_deviation_of_returns, Some(0.0));
        assert!((metrics.average_true_range - 4.0).abs() < EPS);
    }

    #[test]
    fn test_sample_standard_deviation_of_returns() {
        // returns: 0.10, -0.10 -> mean 0, sample variance (0.01 + 0.01) / 1
        let metrics = compute_volatility(&series_from_closes(&[100.0, 110.0, 99.0])).unwrap();
        let expected = 0.02f64.sqrt();
        assert!((metrics.standard_deviation_of_returns.unwrap() - expected).abs() < EPS);
    }

    #[test]
    fn test_average_true_range_uses_every_record() {
        let records = vec![
            PriceRecord::new(day(0), 10.0, 12.0, 9.0, 11.0, 1),
            PriceRecord::new(day(1), 11.0, 15.0, 10.0, 14.0, 1),
            PriceRecord::new(day(2), 14.0, 14.5, 13.0, 13.5, 1),
        ];
        let metrics = compute_volatility(&PriceSeries::new("TEST", records)).unwrap();
        assert!((metrics.average_true_range - (3.0 + 5.0 + 1.5) / 3.0).abs() < EPS);
    }

    #[test]
    fn test_two_records_leave_std_undefined() {
        let metrics = compute_volatility(&series_from_closes(&[100.0, 101.0])).unwrap();
        assert_eq!(metrics.standard_deviation_of_returns, None);
    }

    #[test]
    fn test_single_record_is_insufficient() {
        assert_eq!(
            compute_volatility(&series_from_closes(&[100.0])),
            Err(AnalysisError::InsufficientData { required: 2, actual: 1 })
        );
    }
}
