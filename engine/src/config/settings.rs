// Analysis settings, loaded from a JSON file or taken from the defaults below.
use serde::Deserialize;
use shared::models::TimeFrame;
use std::path::Path;
use std::time::Duration;

use crate::data::DuplicatePolicy;
use crate::error::{EngineError, Result};
use crate::forecast::FeatureStrategy;

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct AnalysisSettings {
    pub symbol: String,
    pub timeframe: TimeFrame,
    /// Most recent candles requested per fetch and kept in the buffer.
    pub history_limit: usize,
    pub refresh_interval_secs: u64,
    pub duplicate_policy: DuplicatePolicy,
    pub indicators: IndicatorSettings,
    pub signals: SignalSettings,
    pub forecast: FeatureStrategy,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        AnalysisSettings {
            symbol: "BTC-USD".to_string(),
            timeframe: TimeFrame::Minute1,
            history_limit: 1440,
            refresh_interval_secs: 60,
            duplicate_policy: DuplicatePolicy::Overwrite,
            indicators: IndicatorSettings::default(),
            signals: SignalSettings::default(),
            forecast: FeatureStrategy::default(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(default)]
pub struct IndicatorSettings {
    pub sma_window: usize,
    pub rsi_window: usize,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
    pub trend_window: usize,
}

impl Default for IndicatorSettings {
    fn default() -> Self {
        IndicatorSettings {
            sma_window: 50,
            rsi_window: 14,
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
            trend_window: 10,
        }
    }
}

impl IndicatorSettings {
    pub fn validate(&self) -> Result<()> {
        let windows = [
            ("sma_window", self.sma_window),
            ("rsi_window", self.rsi_window),
            ("macd_fast", self.macd_fast),
            ("macd_slow", self.macd_slow),
            ("macd_signal", self.macd_signal),
            ("trend_window", self.trend_window),
        ];
        if let Some((name, _)) = windows.iter().find(|(_, w)| *w == 0) {
            return Err(EngineError::InvalidParameter(format!("{} must be greater than 0", name)));
        }
        if self.macd_fast >= self.macd_slow {
            return Err(EngineError::InvalidParameter(format!(
                "macd_fast ({}) must be smaller than macd_slow ({})",
                self.macd_fast, self.macd_slow
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct SignalSettings {
    pub rsi_oversold: f64,
    pub rsi_overbought: f64,
    pub rsi_enabled: bool,
    pub sma_bias_enabled: bool,
    pub crossover_enabled: bool,
    pub macd_enabled: bool,
    pub trend_enabled: bool,
}

impl Default for SignalSettings {
    fn default() -> Self {
        SignalSettings {
            rsi_oversold: 30.0,
            rsi_overbought: 70.0,
            rsi_enabled: true,
            sma_bias_enabled: true,
            crossover_enabled: true,
            macd_enabled: true,
            trend_enabled: true,
        }
    }
}

impl SignalSettings {
    pub fn validate(&self) -> Result<()> {
        let in_range = |v: f64| (0.0..=100.0).contains(&v);
        if !in_range(self.rsi_oversold) || !in_range(self.rsi_overbought) || self.rsi_oversold >= self.rsi_overbought {
            return Err(EngineError::InvalidParameter(format!(
                "RSI thresholds must satisfy 0 <= oversold ({}) < overbought ({}) <= 100",
                self.rsi_oversold, self.rsi_overbought
            )));
        }
        Ok(())
    }
}

impl AnalysisSettings {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let settings: AnalysisSettings =
            serde_json::from_str(json).map_err(|e| EngineError::ConfigError(format!("Invalid settings JSON: {}", e)))?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let settings = Self::from_json_str(&contents)?;
        tracing::info!(path = %path.display(), symbol = %settings.symbol, timeframe = %settings.timeframe, "Loaded analysis settings");
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if self.symbol.trim().is_empty() {
            return Err(EngineError::ConfigError("symbol must not be empty".to_string()));
        }
        if self.history_limit == 0 {
            return Err(EngineError::ConfigError("history_limit must be greater than 0".to_string()));
        }
        if self.refresh_interval_secs == 0 {
            return Err(EngineError::ConfigError("refresh_interval_secs must be greater than 0".to_string()));
        }
        self.indicators.validate()?;
        self.signals.validate()?;
        self.forecast.validate()?;

        // the buffer never holds more than history_limit candles
        let required = self.forecast.window().max(self.indicators.sma_window);
        if self.history_limit < required {
            return Err(EngineError::ConfigError(format!(
                "history_limit ({}) must cover the longest window ({})",
                self.history_limit, required
            )));
        }
        Ok(())
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }
}
