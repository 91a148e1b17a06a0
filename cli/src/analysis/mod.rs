//! Pure statistics over a [`PriceSeries`](crate::models::PriceSeries).
//!
//! Nothing in here performs I/O or keeps state; every function borrows its
//! input and returns freshly computed values.
//!
//! Degenerate statistics are `None` rather than NaN: the leading slot of a
//! returns series, a return whose previous close is zero, and a correlation
//! where one side has zero variance. Too few points is an [`AnalysisError`].

pub mod correlation;
pub mod returns;
pub mod trend;
pub mod volatility;

pub use correlation::*;
pub use returns::*;
pub use trend::*;
pub use volatility::*;

/// Minimum number of records for volatility, trend and correlation
pub const MIN_POINTS: usize = 2;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AnalysisError {
    #[error("insufficient data: need at least {required} points, got {actual}")]
    InsufficientData { required: usize, actual: usize },
    #[error("series length mismatch: {left} vs {right}")]
    LengthMismatch { left: usize, right: usize },
}

pub(crate) fn ensure_min_points(actual: usize) -> Result<(), AnalysisError> {
    if actual < MIN_POINTS {
        return Err(AnalysisError::InsufficientData {
            required: MIN_POINTS,
            actual,
        });
    }
    Ok(())
}

pub(crate) fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}
