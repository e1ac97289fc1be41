// Technical indicators module
pub mod ema;
pub mod macd;
pub mod rsi;
pub mod sma;

pub use macd::{Macd, MacdSignal};
pub use rsi::Rsi;
pub use sma::Sma;

use serde_json::Value;
use shared::models::{Candle, Indicator};

use crate::config::IndicatorSettings;
use crate::error::Result;
use crate::models::{IndicatorKind, Series};

// Common trait for all indicators
pub trait IndicatorCalculator: Send + Sync {
    fn name(&self) -> &str;
    fn parameters(&self) -> Value;
    /// One entry per candle; `None` while the indicator is warming up.
    fn calculate(&self, data: &[Candle]) -> Vec<Option<f64>>;
}

pub(crate) fn closes(data: &[Candle]) -> Vec<f64> {
    data.iter().map(|c| c.close).collect()
}

/// Computes the full indicator set over a candle history.
///
/// Holds only the configured calculators; every call recomputes from scratch
/// and returns a fresh `Series`.
pub struct IndicatorEngine {
    calculators: Vec<(IndicatorKind, Box<dyn IndicatorCalculator>)>,
}

impl IndicatorEngine {
    pub fn new(settings: &IndicatorSettings) -> Result<Self> {
        settings.validate()?;
        Ok(Self::build(settings))
    }

    fn build(settings: &IndicatorSettings) -> Self {
        let calculators: Vec<(IndicatorKind, Box<dyn IndicatorCalculator>)> = vec![
            (IndicatorKind::Sma, Box::new(Sma::new(settings.sma_window))),
            (IndicatorKind::Rsi, Box::new(Rsi::new(settings.rsi_window))),
            (IndicatorKind::Macd, Box::new(Macd::new(settings.macd_fast, settings.macd_slow))),
            (
                IndicatorKind::SignalLine,
                Box::new(MacdSignal::new(settings.macd_fast, settings.macd_slow, settings.macd_signal)),
            ),
            (IndicatorKind::Trend, Box::new(Sma::trend(settings.trend_window))),
        ];
        Self { calculators }
    }

    pub fn evaluate(&self, candles: &[Candle]) -> Result<Series> {
        let mut series = Series::new(candles.to_vec());
        for (kind, calculator) in &self.calculators {
            let indicator = Indicator {
                name: calculator.name().to_string(),
                parameters: calculator.parameters(),
                values: calculator.calculate(candles),
            };
            series.insert_column(*kind, indicator)?;
        }
        tracing::debug!(candles = series.len(), columns = self.calculators.len(), "Evaluated indicators");
        Ok(series)
    }
}

impl Default for IndicatorEngine {
    fn default() -> Self {
        Self::build(&IndicatorSettings::default())
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::candles_from_closes;
    use super::*;
    use crate::error::EngineError;

    #[test]
    fn test_every_column_aligned_with_candles() {
        let closes: Vec<f64> = (0..75).map(|i| 50.0 + (i as f64 * 0.3).cos()).collect();
        let series = IndicatorEngine::default().evaluate(&candles_from_closes(&closes)).unwrap();
        for kind in IndicatorKind::ALL {
            let column = series.column(kind).unwrap();
            assert_eq!(column.values.len(), 75, "{}", kind);
        }
    }

    #[test]
    fn test_warm_up_windows() {
        let closes: Vec<f64> = (0..60).map(|i| 100.0 + i as f64).collect();
        let series = IndicatorEngine::default().evaluate(&candles_from_closes(&closes)).unwrap();
        assert_eq!(series.value(IndicatorKind::Sma, 48), None);
        assert!(series.value(IndicatorKind::Sma, 49).is_some());
        assert_eq!(series.value(IndicatorKind::Rsi, 13), None);
        assert!(series.value(IndicatorKind::Rsi, 14).is_some());
        assert_eq!(series.value(IndicatorKind::Trend, 8), None);
        assert!(series.value(IndicatorKind::Trend, 9).is_some());
        assert!(series.value(IndicatorKind::Macd, 0).is_some());
        assert!(series.value(IndicatorKind::SignalLine, 0).is_some());
    }

    #[test]
    fn test_short_history_has_no_trend() {
        let series = IndicatorEngine::default()
            .evaluate(&candles_from_closes(&[1.0, 2.0, 3.0]))
            .unwrap();
        assert!(series.column(IndicatorKind::Trend).unwrap().values.iter().all(Option::is_none));
    }

    #[test]
    fn test_evaluate_is_idempotent() {
        let closes: Vec<f64> = (0..300).map(|i| 100.0 + (i as f64 / 7.0).sin() * 4.0).collect();
        let candles = candles_from_closes(&closes);
        let engine = IndicatorEngine::default();
        let first = engine.evaluate(&candles).unwrap();
        let second = engine.evaluate(&candles).unwrap();
        for kind in IndicatorKind::ALL {
            let a: Vec<Option<u64>> = first.column(kind).unwrap().values.iter().map(|v| v.map(f64::to_bits)).collect();
            let b: Vec<Option<u64>> = second.column(kind).unwrap().values.iter().map(|v| v.map(f64::to_bits)).collect();
            assert_eq!(a, b, "{}", kind);
        }
    }

    #[test]
    fn test_column_names_and_parameters() {
        let series = IndicatorEngine::default().evaluate(&candles_from_closes(&[1.0; 5])).unwrap();
        let sma = series.column(IndicatorKind::Sma).unwrap();
        assert_eq!(sma.name, "SMA(50)");
        assert_eq!(sma.parameters["period"], 50);
        assert_eq!(series.column(IndicatorKind::SignalLine).unwrap().parameters["signal"], 9);
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let settings = IndicatorSettings {
            sma_window: 0,
            ..IndicatorSettings::default()
        };
        assert!(matches!(IndicatorEngine::new(&settings), Err(EngineError::InvalidParameter(_))));
    }
}
