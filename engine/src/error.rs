use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Insufficient data: {required} candles required, {available} available")]
    InsufficientData { required: usize, available: usize },

    #[error("Out-of-order candle: received {received} after {last}")]
    OutOfOrder {
        last: DateTime<Utc>,
        received: DateTime<Utc>,
    },

    #[error("Indicator {indicator} is undefined at index {index}")]
    UndefinedIndicator { indicator: String, index: usize },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Least-squares system is singular")]
    SingularSystem,

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("CSV parsing system error: {source}")]
    CsvSystemError {
        #[from]
        source: csv::Error,
    },

    #[error("I/O error: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },

    #[error("CSV data format error: {0}")]
    CsvDataFormatError(String),

    #[error(transparent)]
    AnyhowError(#[from] anyhow::Error),
}

impl EngineError {
    /// True for errors the caller should simply wait out (more candles will arrive).
    pub fn is_recoverable(&self) -> bool {
        matches!(self, EngineError::InsufficientData { .. } | EngineError::UndefinedIndicator { .. })
    }
}

pub type Result<T, E = EngineError> = std::result::Result<T, E>;
