pub mod models;
pub mod utils;

pub use models::{Candle, Direction, ForecastResult, Indicator, Signal, SignalKind, SignalReport, TimeFrame};
