// Formatting and timestamp helpers shared by the engine and any presentation layer.
use chrono::{DateTime, Utc};

/// Two-decimal rendering used by every diagnostic line.
pub fn format_decimal(value: f64) -> String {
    format!("{:.2}", value)
}

pub fn from_timestamp_millis(ts_millis: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp_millis(ts_millis)
}
