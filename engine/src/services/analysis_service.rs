// Fetch -> compute -> publish cycle driven by the host's scheduler.
use chrono::{DateTime, Utc};
use shared::models::{Candle, ForecastResult, SignalReport, TimeFrame};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::config::AnalysisSettings;
use crate::data::{MarketDataSource, SeriesBuffer};
use crate::error::Result;
use crate::forecast::Forecaster;
use crate::indicators::IndicatorEngine;
use crate::models::Series;
use crate::signals::SignalGenerator;

/// One consistent evaluation, published as a whole.
#[derive(Debug, Clone)]
pub struct Evaluation {
    pub generation: u64,
    pub symbol: String,
    pub timeframe: TimeFrame,
    pub evaluated_at: DateTime<Utc>,
    pub series: Series,
    pub report: SignalReport,
    /// `None` while the history is shorter than the forecast window.
    pub forecast: Option<ForecastResult>,
}

pub struct AnalysisService {
    settings: AnalysisSettings,
    indicators: IndicatorEngine,
    signals: SignalGenerator,
    forecaster: Forecaster,
    buffer: RwLock<SeriesBuffer>,
    latest: Arc<RwLock<Option<Arc<Evaluation>>>>,
    next_generation: AtomicU64,
}

impl AnalysisService {
    pub fn new(settings: AnalysisSettings) -> Result<Self> {
        settings.validate()?;
        let buffer = SeriesBuffer::with_capacity(settings.duplicate_policy, settings.history_limit);
        Ok(Self {
            indicators: IndicatorEngine::new(&settings.indicators)?,
            signals: SignalGenerator::new(settings.signals)?,
            forecaster: Forecaster::new(settings.forecast)?,
            buffer: RwLock::new(buffer),
            latest: Arc::new(RwLock::new(None)),
            next_generation: AtomicU64::new(0),
            settings,
        })
    }

    pub fn settings(&self) -> &AnalysisSettings {
        &self.settings
    }

    /// Handle a presentation layer can poll for the latest published evaluation.
    pub fn subscribe(&self) -> Arc<RwLock<Option<Arc<Evaluation>>>> {
        self.latest.clone()
    }

    pub async fn latest(&self) -> Option<Arc<Evaluation>> {
        self.latest.read().await.clone()
    }

    /// Indicators, signals and forecast for a candle history. Pure; publishes nothing.
    pub fn evaluate(&self, candles: &[Candle]) -> Result<(Series, SignalReport, Option<ForecastResult>)> {
        let series = self.indicators.evaluate(candles)?;
        let report = self.signals.generate(&series)?;
        let forecast = match self.forecaster.forecast(&series) {
            Ok(forecast) => Some(forecast),
            Err(e) if e.is_recoverable() => {
                tracing::warn!(symbol = %self.settings.symbol, reason = %e, "Forecast unavailable");
                None
            }
            Err(e) => return Err(e),
        };
        Ok((series, report, forecast))
    }

    /// Runs one refresh cycle against `source`.
    ///
    /// The buffer and the published evaluation change only when the whole
    /// cycle succeeds; on error both keep their previous state. A cycle that
    /// finishes after a newer one has been published is discarded.
    pub async fn refresh(&self, source: &dyn MarketDataSource) -> Result<Arc<Evaluation>> {
        let generation = self.next_generation.fetch_add(1, Ordering::SeqCst) + 1;
        let symbol = &self.settings.symbol;
        let timeframe = self.settings.timeframe;
        tracing::info!(%symbol, %timeframe, generation, "Starting refresh cycle");

        let since = self.buffer.read().await.last().map(|c| c.timestamp);
        let fetched = source.fetch(symbol, timeframe, since, self.settings.history_limit)?;
        tracing::debug!(%symbol, fetched = fetched.len(), since = ?since, "Fetched candles");

        let mut buffer = self.buffer.write().await;
        let mut candidate = buffer.clone();
        let accepted = candidate.merge(fetched)?;

        let (series, report, forecast) = match self.evaluate(&candidate.snapshot()) {
            Ok(parts) => parts,
            Err(e) => {
                tracing::warn!(%symbol, generation, error_detail = %e, "Refresh cycle failed, keeping previous evaluation");
                return Err(e);
            }
        };

        let evaluation = Arc::new(Evaluation {
            generation,
            symbol: symbol.clone(),
            timeframe,
            evaluated_at: Utc::now(),
            series,
            report,
            forecast,
        });

        let mut latest = self.latest.write().await;
        if let Some(current) = latest.as_ref() {
            if current.generation > generation {
                tracing::warn!(%symbol, generation, published = current.generation, "Dropping stale refresh result");
                return Ok(current.clone());
            }
        }
        *buffer = candidate;
        *latest = Some(evaluation.clone());
        tracing::info!(
            %symbol,
            generation,
            accepted,
            candles = buffer.len(),
            signals = evaluation.report.signals.len(),
            "Published evaluation"
        );
        Ok(evaluation)
    }
}
