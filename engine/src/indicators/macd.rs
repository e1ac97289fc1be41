// Moving Average Convergence Divergence (MACD) and its signal line
use super::ema::exponential_moving_average;
use super::{closes, IndicatorCalculator};
use serde_json::Value;
use shared::models::Candle;

/// EMA(fast) - EMA(slow) of the closes, defined from the first candle.
pub fn macd_line(values: &[f64], fast: usize, slow: usize) -> Vec<f64> {
    let fast_ema = exponential_moving_average(values, fast);
    let slow_ema = exponential_moving_average(values, slow);
    fast_ema.iter().zip(slow_ema.iter()).map(|(f, s)| f - s).collect()
}

pub struct Macd {
    name: String,
    fast: usize,
    slow: usize,
}

impl Macd {
    pub fn new(fast: usize, slow: usize) -> Self {
        Self {
            name: format!("MACD({},{})", fast, slow),
            fast,
            slow,
        }
    }
}

impl IndicatorCalculator for Macd {
    fn name(&self) -> &str {
        &self.name
    }

    fn parameters(&self) -> Value {
        serde_json::json!({ "fast": self.fast, "slow": self.slow })
    }

    fn calculate(&self, data: &[Candle]) -> Vec<Option<f64>> {
        if self.fast == 0 || self.slow == 0 {
            return vec![None; data.len()];
        }
        macd_line(&closes(data), self.fast, self.slow)
            .into_iter()
            .map(Some)
            .collect()
    }
}

/// EMA of the MACD line.
pub struct MacdSignal {
    name: String,
    fast: usize,
    slow: usize,
    signal: usize,
}

impl MacdSignal {
    pub fn new(fast: usize, slow: usize, signal: usize) -> Self {
        Self {
            name: format!("Signal({})", signal),
            fast,
            slow,
            signal,
        }
    }
}

impl IndicatorCalculator for MacdSignal {
    fn name(&self) -> &str {
        &self.name
    }

    fn parameters(&self) -> Value {
        serde_json::json!({ "fast": self.fast, "slow": self.slow, "signal": self.signal })
    }

    fn calculate(&self, data: &[Candle]) -> Vec<Option<f64>> {
        if self.fast == 0 || self.slow == 0 || self.signal == 0 {
            return vec![None; data.len()];
        }
        let macd = macd_line(&closes(data), self.fast, self.slow);
        exponential_moving_average(&macd, self.signal)
            .into_iter()
            .map(Some)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::test_support::candles_from_closes;

    fn wave(len: usize) -> Vec<f64> {
        (0..len).map(|i| 100.0 + (i as f64 / 5.0).sin() * 3.0 + i as f64 * 0.05).collect()
    }

    #[test]
    fn test_macd_flat_series_is_zero() {
        let candles = candles_from_closes(&[100.0; 100]);
        let macd = Macd::new(12, 26).calculate(&candles);
        let signal = MacdSignal::new(12, 26, 9).calculate(&candles);
        assert!(macd.iter().all(|v| *v == Some(0.0)));
        assert!(signal.iter().all(|v| *v == Some(0.0)));
    }

    #[test]
    fn test_macd_is_deterministic() {
        let candles = candles_from_closes(&wave(500));
        let first = MacdSignal::new(12, 26, 9).calculate(&candles);
        let second = MacdSignal::new(12, 26, 9).calculate(&candles);
        let bits = |v: &[Option<f64>]| v.iter().map(|x| x.map(f64::to_bits)).collect::<Vec<_>>();
        assert_eq!(bits(&first), bits(&second));
        assert_eq!(
            bits(&Macd::new(12, 26).calculate(&candles)),
            bits(&Macd::new(12, 26).calculate(&candles))
        );
    }

    #[test]
    fn test_macd_rising_series_positive() {
        let closes: Vec<f64> = (0..60).map(|i| 100.0 + i as f64).collect();
        let macd = macd_line(&closes, 12, 26);
        assert_eq!(macd[0], 0.0);
        assert!(macd[1..].iter().all(|v| *v > 0.0));
    }

    #[test]
    fn test_macd_signal_lags_macd() {
        let closes: Vec<f64> = (0..60).map(|i| 100.0 + i as f64).collect();
        let candles = candles_from_closes(&closes);
        let macd = Macd::new(12, 26).calculate(&candles);
        let signal = MacdSignal::new(12, 26, 9).calculate(&candles);
        // a steady climb keeps MACD above its own smoothed line
        assert!(macd[59].unwrap() > signal[59].unwrap());
    }
}
