use crate::models::PriceSeries;

/// Simple period-over-period close returns aligned with the series.
///
/// The result has one slot per record. Slot 0 is always `None`; slot `i` is
/// `None` when `close[i - 1]` is zero.
pub type ReturnsSeries = Vec<Option<f64>>;

pub fn compute_returns(series: &PriceSeries) -> ReturnsSeries {
    let closes = series.closes();
    let mut returns = Vec::with_capacity(closes.len());
    if closes.is_empty() {
        return returns;
    }

    returns.push(None);
    returns.extend(closes.windows(2).map(|w| pct_change(w[0], w[1])));
    returns
}

fn pct_change(previous: f64, current: f64) -> Option<f64> {
    if previous == 0.0 {
        None
    } else {
        Some((current - previous) / previous)
    }
}

/// Returns with the undefined slots dropped
pub fn defined_returns(returns: &[Option<f64>]) -> Vec<f64> {
    returns.iter().flatten().copied().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::price_series::test_support::series_from_closes;

    const EPS: f64 = 1e-12;

    #[test]
    fn test_returns_example_scenario() {
        let series = series_from_closes(&[100.0, 110.0, 99.0]);
        let returns = compute_returns(&series);

        assert_eq!(returns.len(), 3);
        assert_eq!(returns[0], None);
        assert!((returns[1].unwrap() - 0.10).abs() < EPS);
        assert!((returns[2].unwrap() + 0.10).abs() < EPS);
    }

    #[test]
    fn test_returns_match_definition() {
        let closes = [50.0, 52.5, 51.0, 60.2, 58.9, 61.0];
        let returns = compute_returns(&series_from_closes(&closes));

        assert_eq!(returns.len(), closes.len());
        assert!(returns[0].is_none());
        for i in 1..closes.len() {
            let expected = (closes[i] - closes[i - 1]) / closes[i - 1];
            assert!((returns[i].unwrap() - expected).abs() < EPS);
        }
    }

    #[test]
    fn test_zero_previous_close_is_undefined() {
        let returns = compute_returns(&series_from_closes(&[10.0, 0.0, 5.0, 6.0]));

        assert!((returns[1].unwrap() + 1.0).abs() < EPS);
        assert_eq!(returns[2], None);
        assert!((returns[3].unwrap() - 0.2).abs() < EPS);
        assert_eq!(defined_returns(&returns).len(), 2);
    }

    #[test]
    fn test_short_series_have_no_defined_returns() {
        assert!(compute_returns(&series_from_closes(&[])).is_empty());
        assert_eq!(compute_returns(&series_from_closes(&[42.0])), vec![None]);
    }
}
