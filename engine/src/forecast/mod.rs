// Short-horizon price forecast from a linear model refitted on every call.
pub mod features;
pub mod regression;

use serde::Deserialize;
use shared::models::{Direction, ForecastResult};

use crate::error::{EngineError, Result};
use crate::models::Series;
use features::FeatureSet;
use regression::LinearRegression;

/// How the trailing closes are turned into a training set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FeatureStrategy {
    /// Lagged closes: each row is `lags` consecutive closes, sliding across the
    /// whole history given. Needs at least `window` candles.
    TrailingCloses { window: usize, lags: usize },
    /// Bollinger mid/upper/lower bands over `period` closes, computed on the trailing `window`.
    Bollinger { window: usize, period: usize },
}

impl Default for FeatureStrategy {
    fn default() -> Self {
        FeatureStrategy::Bollinger { window: 720, period: 20 }
    }
}

impl FeatureStrategy {
    pub fn trailing_closes() -> Self {
        FeatureStrategy::TrailingCloses { window: 60, lags: 10 }
    }

    /// Candles required before a forecast can be made.
    pub fn window(&self) -> usize {
        match *self {
            FeatureStrategy::TrailingCloses { window, .. } | FeatureStrategy::Bollinger { window, .. } => window,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            FeatureStrategy::TrailingCloses { .. } => "trailing_closes",
            FeatureStrategy::Bollinger { .. } => "bollinger",
        }
    }

    pub fn validate(&self) -> Result<()> {
        match *self {
            FeatureStrategy::TrailingCloses { window, lags } => {
                if lags == 0 || lags >= window {
                    return Err(EngineError::InvalidParameter(format!(
                        "trailing closes need 0 < lags ({}) < window ({})",
                        lags, window
                    )));
                }
            }
            FeatureStrategy::Bollinger { window, period } => {
                if period < 2 || window < period + 2 {
                    return Err(EngineError::InvalidParameter(format!(
                        "bollinger features need period ({}) >= 2 and window ({}) >= period + 2",
                        period, window
                    )));
                }
            }
        }
        Ok(())
    }

    /// Callers guarantee `closes.len() >= self.window()`.
    fn features(&self, closes: &[f64]) -> FeatureSet {
        match *self {
            FeatureStrategy::TrailingCloses { lags, .. } => features::lagged_closes(closes, lags),
            FeatureStrategy::Bollinger { window, period } => {
                features::bollinger_bands(&closes[closes.len() - window..], period)
            }
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Forecaster {
    strategy: FeatureStrategy,
}

impl Forecaster {
    pub fn new(strategy: FeatureStrategy) -> Result<Self> {
        strategy.validate()?;
        Ok(Self { strategy })
    }

    pub fn forecast(&self, series: &Series) -> Result<ForecastResult> {
        self.forecast_closes(&series.closes())
    }

    /// Fits on `closes` as the strategy selects them and projects the next close.
    /// UP only when the projection is strictly above the last close.
    pub fn forecast_closes(&self, closes: &[f64]) -> Result<ForecastResult> {
        let window = self.strategy.window();
        if closes.len() < window {
            return Err(EngineError::InsufficientData {
                required: window,
                available: closes.len(),
            });
        }
        let last_close = closes[closes.len() - 1];

        let set = self.strategy.features(closes);
        let model = LinearRegression::fit(&set.x, &set.y)?;
        let predicted_price = model.predict(set.latest.view())?;

        let direction = if predicted_price > last_close {
            Direction::Up
        } else {
            Direction::Down
        };
        tracing::debug!(
            strategy = self.strategy.name(),
            window,
            predicted_price,
            last_close,
            %direction,
            "Forecast computed"
        );
        Ok(ForecastResult {
            predicted_price,
            direction,
            basis_window: window,
            strategy: self.strategy.name().to_string(),
        })
    }
}
