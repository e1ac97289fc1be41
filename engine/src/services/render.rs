// Plain-text analysis block for terminals and text panes.
use shared::utils::format_decimal;
use std::fmt::Write;

use super::analysis_service::Evaluation;

pub fn render_report(evaluation: &Evaluation) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Market: {} ({})", evaluation.symbol, evaluation.timeframe);

    match evaluation.series.candles().last() {
        Some(candle) => {
            let _ = writeln!(out, "Last update: {}", candle.timestamp.format("%Y-%m-%d %H:%M:%S"));
            let _ = writeln!(out, "Last close: {}", format_decimal(candle.close));
        }
        None => {
            let _ = writeln!(out, "Last update: n/a");
        }
    }

    out.push_str("\nSignals:\n");
    for signal in &evaluation.report.signals {
        let _ = writeln!(out, "  {}", signal);
    }

    if !evaluation.report.details.is_empty() {
        out.push_str("\nDetails:\n");
        for (rule, line) in &evaluation.report.details {
            let _ = writeln!(out, "  {}: {}", rule, line);
        }
    }

    out.push('\n');
    match &evaluation.forecast {
        Some(forecast) => {
            let _ = writeln!(
                out,
                "Forecast: {} ({}), next close {}",
                forecast.direction,
                forecast.strategy,
                format_decimal(forecast.predicted_price)
            );
        }
        None => out.push_str("Forecast: unavailable\n"),
    }

    if !evaluation.report.skipped.is_empty() {
        out.push_str("\nSkipped:\n");
        for reason in &evaluation.report.skipped {
            let _ = writeln!(out, "  {}", reason);
        }
    }
    out
}
