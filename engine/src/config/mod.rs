pub mod settings;

pub use settings::{AnalysisSettings, IndicatorSettings, SignalSettings};
