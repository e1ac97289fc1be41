// Relative Strength Index (RSI) indicator implementation
use super::{closes, IndicatorCalculator};
use serde_json::Value;
use shared::models::Candle;

pub struct Rsi {
    name: String,
    period: usize,
}

impl Rsi {
    pub fn new(period: usize) -> Self {
        Self {
            name: format!("RSI({})", period),
            period,
        }
    }
}

/// RSI from plain rolling means of the last `period` gains and losses.
///
/// The first `period` positions are `None` (the first close has no delta).
/// A window without losses reads 100, including a window without any movement.
pub fn relative_strength_index(values: &[f64], period: usize) -> Vec<Option<f64>> {
    if values.len() <= period || period == 0 {
        return vec![None; values.len()];
    }

    let deltas: Vec<f64> = values.windows(2).map(|pair| pair[1] - pair[0]).collect();
    let mut results = vec![None; period];

    // deltas[i - 1] is the change into values[i]
    for i in period..values.len() {
        let window = &deltas[i - period..i];
        let gains: f64 = window.iter().filter(|d| **d > 0.0).sum();
        let losses: f64 = window.iter().filter(|d| **d < 0.0).map(|d| -d).sum();
        let avg_gain = gains / period as f64;
        let avg_loss = losses / period as f64;

        if avg_loss == 0.0 {
            results.push(Some(100.0));
        } else {
            let rs = avg_gain / avg_loss;
            results.push(Some(100.0 - (100.0 / (1.0 + rs))));
        }
    }
    results
}

impl IndicatorCalculator for Rsi {
    fn name(&self) -> &str {
        &self.name
    }

    fn parameters(&self) -> Value {
        serde_json::json!({ "period": self.period })
    }

    fn calculate(&self, data: &[Candle]) -> Vec<Option<f64>> {
        relative_strength_index(&closes(data), self.period)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::test_support::candles_from_closes;

    #[test]
    fn test_rsi_calculation() {
        let closes = [
            44.34, 44.09, 44.15, 43.61, 44.33, 44.83, 45.10, 45.42, 45.84, 46.08, 45.89, 46.03, 45.61,
            46.28, 46.28, 46.00, 46.03, 46.41, 46.22, 45.64, 46.25,
        ];
        let results = Rsi::new(14).calculate(&candles_from_closes(&closes));

        for (i, value) in results.iter().enumerate().take(14) {
            assert_eq!(*value, None, "Expected None at index {}", i);
        }

        let deltas: Vec<f64> = closes.windows(2).map(|p| p[1] - p[0]).collect();
        let gains: f64 = deltas[..14].iter().filter(|d| **d > 0.0).sum();
        let losses: f64 = deltas[..14].iter().filter(|d| **d < 0.0).map(|d| -d).sum();
        let expected = 100.0 - 100.0 / (1.0 + (gains / 14.0) / (losses / 14.0));
        assert_eq!(results[14], Some(expected));
        // ~70.46 on this textbook sample
        assert!(expected > 65.0 && expected < 75.0, "RSI[14] = {}", expected);

        for value in results.iter().skip(14) {
            let v = value.unwrap();
            assert!((0.0..=100.0).contains(&v));
        }
    }

    #[test]
    fn test_rsi_insufficient_data() {
        let candles = candles_from_closes(&[1.0; 10]);
        assert_eq!(Rsi::new(14).calculate(&candles), vec![None; 10]);
        // exactly `period` closes still leaves only period - 1 deltas
        let candles = candles_from_closes(&[1.0; 14]);
        assert_eq!(Rsi::new(14).calculate(&candles), vec![None; 14]);
    }

    #[test]
    fn test_rsi_all_gains() {
        let closes: Vec<f64> = (1..=20).map(|i| i as f64).collect();
        let results = relative_strength_index(&closes, 14);
        assert!(results[..14].iter().all(Option::is_none));
        assert!(results[14..].iter().all(|v| *v == Some(100.0)));
    }

    #[test]
    fn test_rsi_all_losses() {
        let closes: Vec<f64> = (1..=20).map(|i| 20.0 - i as f64).collect();
        let results = relative_strength_index(&closes, 14);
        assert!(results[14..].iter().all(|v| *v == Some(0.0)));
    }

    #[test]
    fn test_rsi_constant_series_is_100() {
        let results = relative_strength_index(&[100.0; 30], 14);
        assert!(results[14..].iter().all(|v| *v == Some(100.0)));
    }

    #[test]
    fn test_rsi_bounded_for_noisy_input() {
        let closes: Vec<f64> = (0..300)
            .map(|i| 100.0 + ((i * 7919) % 23) as f64 - 11.0 + (i as f64 * 0.1).sin() * 5.0)
            .collect();
        for value in relative_strength_index(&closes, 14).into_iter().flatten() {
            assert!((0.0..=100.0).contains(&value), "RSI out of range: {}", value);
        }
    }

    #[test]
    fn test_rsi_uses_simple_rolling_window() {
        // Fifteen flat closes then one drop: the drop is the only loss in the last window.
        let mut closes = vec![10.0; 15];
        closes.push(9.0);
        let results = relative_strength_index(&closes, 14);
        assert_eq!(results[14], Some(100.0));
        assert_eq!(results[15], Some(0.0));
    }
}
