use super::{ensure_min_points, mean, AnalysisError};
use crate::models::PriceSeries;
use serde::{Deserialize, Serialize};

/// Pearson correlation coefficient of two aligned series.
///
/// Returns `Ok(None)` when either side is constant, since the coefficient
/// is undefined without variance.
pub fn compute_correlation(a: &[f64], b: &[f64]) -> Result<Option<f64>, AnalysisError> {
    if a.len() != b.len() {
        return Err(AnalysisError::LengthMismatch {
            left: a.len(),
            right: b.len(),
        });
    }
    ensure_min_points(a.len())?;

    // A flat column can still leave rounding residue around its float mean
    if is_constant(a) || is_constant(b) {
        return Ok(None);
    }

    let mean_a = mean(a);
    let mean_b = mean(b);

    let mut covariance = 0.0;
    let mut variance_a = 0.0;
    let mut variance_b = 0.0;
    for (x, y) in a.iter().zip(b) {
        let dx = x - mean_a;
        let dy = y - mean_b;
        covariance += dx * dy;
        variance_a += dx * dx;
        variance_b += dy * dy;
    }

    if variance_a == 0.0 || variance_b == 0.0 {
        return Ok(None);
    }

    let r = covariance / (variance_a.sqrt() * variance_b.sqrt());
    Ok(Some(r.clamp(-1.0, 1.0)))
}

fn is_constant(values: &[f64]) -> bool {
    values.windows(2).all(|w| w[0] == w[1])
}

/// The three column pairings reported for a ticker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationSummary {
    pub open_close: Option<f64>,
    pub high_low: Option<f64>,
    pub volume_high: Option<f64>,
}

pub fn correlation_summary(series: &PriceSeries) -> Result<CorrelationSummary, AnalysisError> {
    let highs = series.highs();

    Ok(CorrelationSummary {
        open_close: compute_correlation(&series.opens(), &series.closes())?,
        high_low: compute_correlation(&highs, &series.lows())?,
        volume_high: compute_correlation(&series.volumes(), &highs)?,
    })
}
