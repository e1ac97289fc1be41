// Market data sources feeding the engine.
use chrono::{DateTime, Utc};
use shared::models::{Candle, TimeFrame};
use std::collections::HashMap;
use std::path::PathBuf;

use super::csv_parser::OhlcvCsvParser;
use crate::error::{EngineError, Result};

/// Supplier of candles for one symbol and timeframe.
///
/// Implementations return candles ascending by timestamp, starting at `since`
/// (inclusive) when given, and at most `limit` of them. A thin market may
/// legitimately yield fewer than `limit`.
pub trait MarketDataSource: Send + Sync {
    fn fetch(
        &self,
        symbol: &str,
        timeframe: TimeFrame,
        since: Option<DateTime<Utc>>,
        limit: usize,
    ) -> Result<Vec<Candle>>;
}

fn select(candles: &[Candle], since: Option<DateTime<Utc>>, limit: usize) -> Vec<Candle> {
    let filtered: Vec<Candle> = candles
        .iter()
        .filter(|c| since.map_or(true, |start| c.timestamp >= start))
        .copied()
        .collect();
    let skip = filtered.len().saturating_sub(limit);
    filtered.into_iter().skip(skip).collect()
}

/// In-memory candles keyed by symbol and timeframe.
#[derive(Default)]
pub struct MarketDataStore {
    data: HashMap<String, HashMap<TimeFrame, Vec<Candle>>>,
}

impl MarketDataStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_candles(&mut self, symbol: &str, timeframe: TimeFrame, new_candles: Vec<Candle>) {
        let timeframe_data = self
            .data
            .entry(symbol.to_string())
            .or_default()
            .entry(timeframe)
            .or_default();

        timeframe_data.extend(new_candles);
        timeframe_data.sort_by_key(|c| c.timestamp);
        timeframe_data.dedup_by_key(|c| c.timestamp);
    }
}

impl MarketDataSource for MarketDataStore {
    fn fetch(
        &self,
        symbol: &str,
        timeframe: TimeFrame,
        since: Option<DateTime<Utc>>,
        limit: usize,
    ) -> Result<Vec<Candle>> {
        let candles = self
            .data
            .get(symbol)
            .and_then(|symbol_data| symbol_data.get(&timeframe))
            .map(|candles| select(candles, since, limit))
            .unwrap_or_default();
        Ok(candles)
    }
}

/// Reads an OHLCV CSV file on every fetch, so an external process can keep
/// rewriting it between refresh cycles. The file holds one symbol/timeframe.
pub struct CsvMarketData {
    path: PathBuf,
}

impl CsvMarketData {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl MarketDataSource for CsvMarketData {
    fn fetch(
        &self,
        symbol: &str,
        timeframe: TimeFrame,
        since: Option<DateTime<Utc>>,
        limit: usize,
    ) -> Result<Vec<Candle>> {
        let mut candles = OhlcvCsvParser::load_candles_from_csv(&self.path)?;
        if candles.windows(2).any(|pair| pair[1].timestamp < pair[0].timestamp) {
            return Err(EngineError::CsvDataFormatError(format!(
                "Candles in '{}' are not sorted by timestamp",
                self.path.display()
            )));
        }
        candles = select(&candles, since, limit);
        tracing::debug!(%symbol, %timeframe, path = %self.path.display(), count = candles.len(), "Loaded candles from CSV");
        Ok(candles)
    }
}
