use anyhow::{anyhow, Result};
use csv::{ReaderBuilder, StringRecord, Trim};
use shared::models::Candle;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

pub mod ohlcv_format {
    use anyhow::{anyhow, Result};
    use chrono::{DateTime, NaiveDateTime, Utc};
    use shared::utils::from_timestamp_millis;

    /// Accepts epoch milliseconds (exchange OHLCV rows), RFC 3339, or
    /// `YYYY-MM-DD HH:MM:SS` read as UTC.
    pub fn parse_timestamp(s: &str) -> Result<DateTime<Utc>> {
        let s = s.trim();
        if let Ok(ms) = s.parse::<i64>() {
            return from_timestamp_millis(ms).ok_or_else(|| anyhow!("Timestamp '{}' is out of range", s));
        }
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Ok(dt.with_timezone(&Utc));
        }
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
            .map(|naive| DateTime::from_naive_utc_and_offset(naive, Utc))
            .map_err(|e| anyhow!("Failed to parse timestamp '{}': {}", s, e))
    }

    pub fn parse_price(s: &str) -> Result<f64> {
        let value: f64 = s.trim().parse().map_err(|e| anyhow!("Failed to parse number '{}': {}", s, e))?;
        if !value.is_finite() {
            return Err(anyhow!("Non-finite value '{}'", s));
        }
        Ok(value)
    }

}

pub struct OhlcvCsvParser;

impl OhlcvCsvParser {
    // CSV Header: timestamp,open,high,low,close,volume
    // Example Row: 1704067200000,42283.58,42298.61,42261.02,42298.61,3.0671
    pub fn load_candles_from_csv(file_path: impl AsRef<Path>) -> Result<Vec<Candle>> {
        let path = file_path.as_ref();
        let file = File::open(path).map_err(|e| anyhow!("Failed to open CSV file '{}': {}", path.display(), e))?;
        Self::read_candles(BufReader::new(file))
    }

    pub fn read_candles<R: Read>(reader: R) -> Result<Vec<Candle>> {
        let mut rdr = ReaderBuilder::new()
            .delimiter(b',')
            .has_headers(true)
            .trim(Trim::All)
            .from_reader(reader);

        let headers = rdr.headers()?.clone();
        let mut candles = Vec::new();

        for (idx, result) in rdr.records().enumerate() {
            let line = idx + 2;
            let record = result.map_err(|e| anyhow!("Error reading CSV record at line {}: {}", line, e))?;

            let timestamp_str = Self::required_field(&record, &headers, "timestamp", line)?;
            let timestamp = ohlcv_format::parse_timestamp(timestamp_str)
                .map_err(|e| anyhow!("Error parsing 'timestamp' at line {}: {}", line, e))?;

            let mut prices = [0.0; 5];
            for (slot, name) in prices.iter_mut().zip(["open", "high", "low", "close", "volume"]) {
                let raw = Self::required_field(&record, &headers, name, line)?;
                *slot = ohlcv_format::parse_price(raw)
                    .map_err(|e| anyhow!("Error parsing '{}' at line {}: {}", name, line, e))?;
            }
            let [open, high, low, close, volume] = prices;

            candles.push(Candle {
                timestamp,
                open,
                high,
                low,
                close,
                volume,
            });
        }
        Ok(candles)
    }

    fn required_field<'a>(record: &'a StringRecord, headers: &StringRecord, name: &str, line: usize) -> Result<&'a str> {
        headers
            .iter()
            .position(|header| header.eq_ignore_ascii_case(name))
            .and_then(|pos| record.get(pos))
            .ok_or_else(|| anyhow!("Missing '{}' field in CSV record at line {}", name, line))
    }
}
