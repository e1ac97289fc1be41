// Engine library root
// Indicator, signal and forecast evaluation over an OHLCV candle history.

pub mod config;
pub mod data;
pub mod error;
pub mod forecast;
pub mod indicators;
pub mod models;
pub mod services;
pub mod signals;

pub use config::AnalysisSettings;
pub use error::{EngineError, Result};
pub use services::{render_report, AnalysisService, Evaluation};
