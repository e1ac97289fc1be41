// Simple Moving Average (SMA) indicator implementation
use super::{closes, IndicatorCalculator};
use serde_json::Value;
use shared::models::Candle;

/// Mean of each trailing `window` values; the first `window - 1` positions are `None`.
///
/// Every value is summed over its own window rather than kept as a running sum,
/// so position `i` is exactly the arithmetic mean of `values[i+1-window..=i]`.
pub fn simple_moving_average(values: &[f64], window: usize) -> Vec<Option<f64>> {
    if window == 0 {
        return vec![None; values.len()];
    }
    (0..values.len())
        .map(|i| {
            if i + 1 < window {
                None
            } else {
                let sum: f64 = values[i + 1 - window..=i].iter().sum();
                Some(sum / window as f64)
            }
        })
        .collect()
}

pub struct Sma {
    name: String,
    period: usize,
}

impl Sma {
    pub fn new(period: usize) -> Self {
        Self {
            name: format!("SMA({})", period),
            period,
        }
    }

    /// Trend line: a short SMA under its own name.
    pub fn trend(period: usize) -> Self {
        Self {
            name: format!("Trend({})", period),
            period,
        }
    }
}

impl IndicatorCalculator for Sma {
    fn name(&self) -> &str {
        &self.name
    }

    fn parameters(&self) -> Value {
        serde_json::json!({ "period": self.period })
    }

    fn calculate(&self, data: &[Candle]) -> Vec<Option<f64>> {
        simple_moving_average(&closes(data), self.period)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::test_support::candles_from_closes;

    #[test]
    fn test_sma_calculation() {
        let candles = candles_from_closes(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        let results = Sma::new(3).calculate(&candles);
        assert_eq!(results, vec![None, None, Some(2.0), Some(3.0), Some(4.0)]);
    }

    #[test]
    fn test_sma_matches_window_mean_exactly() {
        let closes: Vec<f64> = (0..200).map(|i| 100.0 + i as f64 * 0.37).collect();
        let window = 50;
        let results = simple_moving_average(&closes, window);
        for i in (window - 1)..closes.len() {
            let slice = &closes[i + 1 - window..=i];
            let mean = slice.iter().sum::<f64>() / window as f64;
            assert_eq!(results[i], Some(mean), "index {}", i);
        }
        assert!(results[..window - 1].iter().all(Option::is_none));
    }

    #[test]
    fn test_sma_insufficient_data() {
        let candles = candles_from_closes(&[1.0, 2.0]);
        assert_eq!(Sma::new(3).calculate(&candles), vec![None, None]);
    }

    #[test]
    fn test_sma_period_one() {
        let candles = candles_from_closes(&[1.0, 2.0, 3.0]);
        assert_eq!(Sma::new(1).calculate(&candles), vec![Some(1.0), Some(2.0), Some(3.0)]);
    }

    #[test]
    fn test_sma_empty_data() {
        assert!(Sma::new(3).calculate(&[]).is_empty());
    }

    #[test]
    fn test_trend_name() {
        assert_eq!(Sma::trend(10).name(), "Trend(10)");
        assert_eq!(Sma::new(50).name(), "SMA(50)");
    }
}
