use super::{ensure_min_points, mean, AnalysisError};
use crate::models::PriceSeries;
use serde::{Deserialize, Serialize};

/// Least-squares line of close price against record position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendModel {
    pub slope: f64,
    pub intercept: f64,
    /// `intercept + slope * i` for every index of the input series
    pub fitted: Vec<f64>,
}

impl TrendModel {
    pub fn predict(&self, index: usize) -> f64 {
        self.intercept + self.slope * index as f64
    }
}

/// Fit `close = intercept + slope * index` with the closed-form OLS solution.
pub fn fit_linear_trend(series: &PriceSeries) -> Result<TrendModel, AnalysisError> {
    ensure_min_points(series.len())?;

    let closes = series.closes();
    let n = closes.len();
    // mean of 0..n-1
    let mean_x = (n - 1) as f64 / 2.0;
    let mean_y = mean(&closes);

    let mut sxy = 0.0;
    let mut sxx = 0.0;
    for (i, y) in closes.iter().enumerate() {
        let dx = i as f64 - mean_x;
        sxy += dx * (y - mean_y);
        sxx += dx * dx;
    }

    // sxx > 0 whenever n >= 2
    let slope = sxy / sxx;
    let intercept = mean_y - slope * mean_x;

    let fitted = (0..n).map(|i| intercept + slope * i as f64).collect();

    Ok(TrendModel {
        slope,
        intercept,
        fitted,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::price_series::test_support::series_from_closes;

    const TOLERANCE: f64 = 1e-6;

    #[test]
    fn test_recovers_exact_line() {
        let model = fit_linear_trend(&series_from_closes(&[100.0, 102.0, 104.0, 106.0])).unwrap();

        assert!((model.slope - 2.0).abs() < TOLERANCE);
        assert!((model.intercept - 100.0).abs() < TOLERANCE);
        for (fitted, expected) in model.fitted.iter().zip([100.0, 102.0, 104.0, 106.0]) {
            assert!((fitted - expected).abs() < TOLERANCE);
        }
    }

    #[test]
    fn test_two_points_fit_exactly() {
        let model = fit_linear_trend(&series_from_closes(&[10.0, 7.0])).unwrap();
        assert!((model.slope + 3.0).abs() < TOLERANCE);
        assert!((model.intercept - 10.0).abs() < TOLERANCE);
        assert!((model.predict(2) - 4.0).abs() < TOLERANCE);
    }

    #[test]
    fn test_noisy_data_least_squares() {
        // x = 0..4, y = [1, 3, 2, 5, 4]
        // mean_x = 2, mean_y = 3, sxy = 8, sxx = 10
        let model = fit_linear_trend(&series_from_closes(&[1.0, 3.0, 2.0, 5.0, 4.0])).unwrap();
        assert!((model.slope - 0.8).abs() < TOLERANCE);
        assert!((model.intercept - 1.4).abs() < TOLERANCE);
        assert_eq!(model.fitted.len(), 5);
    }

    #[test]
    fn test_single_record_is_insufficient() {
        assert_eq!(
            fit_linear_trend(&series_from_closes(&[100.0])),
            Err(AnalysisError::InsufficientData { required: 2, actual: 1 })
        );
    }
}
