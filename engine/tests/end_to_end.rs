use chrono::{Duration, TimeZone, Utc};
use shared::models::{Candle, Direction, SignalKind};
use signal_engine::config::AnalysisSettings;
use signal_engine::data::CsvMarketData;
use signal_engine::forecast::{FeatureStrategy, Forecaster};
use signal_engine::indicators::IndicatorEngine;
use signal_engine::models::IndicatorKind;
use signal_engine::services::{render_report, AnalysisService};
use signal_engine::signals::SignalGenerator;
use std::io::Write;
use tempfile::NamedTempFile;

fn candles(closes: &[f64]) -> Vec<Candle> {
    let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| Candle::flat(start + Duration::minutes(i as i64), close))
        .collect()
}

fn csv_rows(closes: &[f64], first_minute: usize) -> String {
    let start_ms = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap().timestamp_millis();
    closes
        .iter()
        .enumerate()
        .map(|(i, close)| {
            let ts = start_ms + ((first_minute + i) as i64) * 60_000;
            format!("{},{c},{c},{c},{c},10\n", ts, c = close)
        })
        .collect()
}

#[test]
fn test_flat_market() {
    let series = IndicatorEngine::default().evaluate(&candles(&[100.0; 100])).unwrap();
    let last = series.row(99).unwrap();
    assert_eq!(last.sma, Some(100.0));
    assert_eq!(last.rsi, Some(100.0));
    assert_eq!(last.macd, Some(0.0));
    assert_eq!(last.signal_line, Some(0.0));
    assert_eq!(last.trend, Some(100.0));

    let report = SignalGenerator::default().generate(&series).unwrap();
    assert_eq!(report.labels(), vec!["SELL — overbought", "SELL — at/below trend"]);
    assert!(!report.has_kind(SignalKind::Bullish));
    assert!(!report.has_kind(SignalKind::Bearish));
    assert!(report.skipped.is_empty());

    let forecaster = Forecaster::new(FeatureStrategy::trailing_closes()).unwrap();
    let forecast = forecaster.forecast(&series).unwrap();
    assert_eq!(forecast.predicted_price, 100.0);
    assert_eq!(forecast.direction, Direction::Down);
}

#[test]
fn test_bullish_crossover() {
    let mut closes = vec![100.0; 59];
    closes.push(99.0);
    closes.push(110.0);
    let series = IndicatorEngine::default().evaluate(&candles(&closes)).unwrap();
    let report = SignalGenerator::default().generate(&series).unwrap();
    let labels = report.labels();
    assert!(labels.contains(&"BUY — bullish crossover".to_string()));
    assert!(labels.contains(&"BULLISH — price above SMA".to_string()));
    assert!(labels.contains(&"BUY — above trend".to_string()));
}

#[test]
fn test_sell_off_is_oversold() {
    let closes: Vec<f64> = (0..100).map(|i| 200.0 - i as f64).collect();
    let series = IndicatorEngine::default().evaluate(&candles(&closes)).unwrap();
    assert_eq!(series.value(IndicatorKind::Rsi, 99), Some(0.0));

    let report = SignalGenerator::default().generate(&series).unwrap();
    let labels = report.labels();
    assert_eq!(labels[0], "BUY — oversold");
    assert!(labels.contains(&"BEARISH — price below SMA".to_string()));
    assert!(labels.contains(&"SELL — bearish MACD".to_string()));
    assert!(labels.contains(&"SELL — at/below trend".to_string()));
}

#[tokio::test]
async fn test_csv_refresh_cycle() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "timestamp,open,high,low,close,volume\n{}", csv_rows(&[100.0; 70], 0)).unwrap();
    file.flush().unwrap();

    let settings = AnalysisSettings {
        forecast: FeatureStrategy::trailing_closes(),
        ..AnalysisSettings::default()
    };
    let service = AnalysisService::new(settings).unwrap();
    let source = CsvMarketData::new(file.path());

    let first = service.refresh(&source).await.unwrap();
    assert_eq!(first.series.len(), 70);
    assert_eq!(first.forecast.as_ref().unwrap().direction, Direction::Down);

    write!(file, "{}", csv_rows(&[101.0, 102.0], 70)).unwrap();
    file.flush().unwrap();

    let second = service.refresh(&source).await.unwrap();
    assert_eq!(second.generation, 2);
    assert_eq!(second.series.len(), 72);
    assert_eq!(second.series.last_close(), Some(102.0));

    let text = render_report(&second);
    assert!(text.contains("Market: BTC-USD (1m)"));
    assert!(text.contains("Last close: 102.00"));
    assert!(text.contains("Forecast: "));
}

#[test]
fn test_results_cross_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<signal_engine::models::Series>();
    assert_send_sync::<signal_engine::Evaluation>();
    assert_send_sync::<AnalysisService>();
}
