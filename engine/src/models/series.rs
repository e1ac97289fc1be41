use chrono::{DateTime, Utc};
use serde::Serialize;
use shared::models::{Candle, Indicator};
use std::collections::BTreeMap;
use std::fmt;

use crate::error::{EngineError, Result};

/// The indicator columns a series can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum IndicatorKind {
    Sma,
    Rsi,
    Macd,
    SignalLine,
    Trend,
}

impl IndicatorKind {
    pub const ALL: [IndicatorKind; 5] = [
        IndicatorKind::Sma,
        IndicatorKind::Rsi,
        IndicatorKind::Macd,
        IndicatorKind::SignalLine,
        IndicatorKind::Trend,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            IndicatorKind::Sma => "SMA",
            IndicatorKind::Rsi => "RSI",
            IndicatorKind::Macd => "MACD",
            IndicatorKind::SignalLine => "SignalLine",
            IndicatorKind::Trend => "Trend",
        }
    }
}

impl fmt::Display for IndicatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Candles plus indicator columns aligned index-for-index with them.
///
/// Every column has exactly one entry per candle; `None` marks positions still
/// inside the indicator's warm-up window.
#[derive(Debug, Clone, Default)]
pub struct Series {
    candles: Vec<Candle>,
    columns: BTreeMap<IndicatorKind, Indicator>,
}

/// One evaluated position of a series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Row {
    pub index: usize,
    pub timestamp: DateTime<Utc>,
    pub close: f64,
    pub sma: Option<f64>,
    pub rsi: Option<f64>,
    pub macd: Option<f64>,
    pub signal_line: Option<f64>,
    pub trend: Option<f64>,
}

impl Row {
    pub fn value(&self, kind: IndicatorKind) -> Option<f64> {
        match kind {
            IndicatorKind::Sma => self.sma,
            IndicatorKind::Rsi => self.rsi,
            IndicatorKind::Macd => self.macd,
            IndicatorKind::SignalLine => self.signal_line,
            IndicatorKind::Trend => self.trend,
        }
    }

    /// The value of `kind`, or `UndefinedIndicator` while it is warming up.
    pub fn require(&self, kind: IndicatorKind) -> Result<f64> {
        self.value(kind).ok_or_else(|| EngineError::UndefinedIndicator {
            indicator: kind.to_string(),
            index: self.index,
        })
    }
}

impl Series {
    pub fn new(candles: Vec<Candle>) -> Self {
        Self {
            candles,
            columns: BTreeMap::new(),
        }
    }

    pub fn candles(&self) -> &[Candle] {
        &self.candles
    }

    pub fn len(&self) -> usize {
        self.candles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.candles.iter().map(|c| c.close).collect()
    }

    pub fn last_close(&self) -> Option<f64> {
        self.candles.last().map(|c| c.close)
    }

    /// Attaches a column, replacing any previous column of the same kind.
    pub fn insert_column(&mut self, kind: IndicatorKind, indicator: Indicator) -> Result<()> {
        if indicator.values.len() != self.candles.len() {
            return Err(EngineError::InvalidParameter(format!(
                "{} column has {} values for {} candles",
                kind,
                indicator.values.len(),
                self.candles.len()
            )));
        }
        self.columns.insert(kind, indicator);
        Ok(())
    }

    pub fn column(&self, kind: IndicatorKind) -> Option<&Indicator> {
        self.columns.get(&kind)
    }

    pub fn value(&self, kind: IndicatorKind, index: usize) -> Option<f64> {
        self.columns
            .get(&kind)
            .and_then(|indicator| indicator.values.get(index).copied().flatten())
    }

    pub fn row(&self, index: usize) -> Option<Row> {
        let candle = self.candles.get(index)?;
        Some(Row {
            index,
            timestamp: candle.timestamp,
            close: candle.close,
            sma: self.value(IndicatorKind::Sma, index),
            rsi: self.value(IndicatorKind::Rsi, index),
            macd: self.value(IndicatorKind::Macd, index),
            signal_line: self.value(IndicatorKind::SignalLine, index),
            trend: self.value(IndicatorKind::Trend, index),
        })
    }

    /// `(previous, current)` rows at the tail of the series.
    pub fn last_two(&self) -> Result<(Row, Row)> {
        let len = self.candles.len();
        match (len.checked_sub(2).and_then(|i| self.row(i)), len.checked_sub(1).and_then(|i| self.row(i))) {
            (Some(previous), Some(current)) => Ok((previous, current)),
            _ => Err(EngineError::InsufficientData {
                required: 2,
                available: len,
            }),
        }
    }
}
