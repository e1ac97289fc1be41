// Rule-based trading signals over the two most recent evaluated rows.
use shared::models::{Signal, SignalKind, SignalReport};
use shared::utils::format_decimal as fmt2;

use crate::config::SignalSettings;
use crate::error::Result;
use crate::models::{IndicatorKind, Row, Series};

#[derive(Default)]
struct ReportBuilder {
    signals: Vec<Signal>,
    details: Vec<(String, String)>,
    skipped: Vec<String>,
}

impl ReportBuilder {
    fn push(&mut self, kind: SignalKind, reason: &str) {
        self.signals.push(Signal::new(kind, reason));
    }

    /// One line per indicator; a second rule on the same indicator uses `annotate`.
    fn detail(&mut self, indicator: IndicatorKind, line: String) {
        if !self.details.iter().any(|(name, _)| name == indicator.as_str()) {
            self.details.push((indicator.to_string(), line));
        }
    }

    /// Adds `note` inside the closing parenthesis of an existing line.
    /// Returns false when the indicator has no line yet.
    fn annotate(&mut self, indicator: IndicatorKind, note: &str) -> bool {
        match self.details.iter_mut().find(|(name, _)| name == indicator.as_str()) {
            Some((_, line)) if line.ends_with(')') => {
                line.pop();
                line.push_str(&format!(", {})", note));
                true
            }
            _ => false,
        }
    }

    /// Records a rule that could not run; the remaining rules still apply.
    fn settle(&mut self, rule: &str, outcome: Result<()>) {
        if let Err(e) = outcome {
            tracing::debug!(rule, reason = %e, "Skipping signal rule");
            self.skipped.push(format!("{}: {}", rule, e));
        }
    }

    fn finish(mut self) -> SignalReport {
        if self.signals.is_empty() {
            self.signals.push(Signal::no_signal());
        }
        SignalReport {
            signals: self.signals,
            details: self.details,
            skipped: self.skipped,
        }
    }
}

/// Applies the rule table to a pair of rows. Holds only its thresholds and toggles.
#[derive(Debug, Clone, Default)]
pub struct SignalGenerator {
    settings: SignalSettings,
}

impl SignalGenerator {
    pub fn new(settings: SignalSettings) -> Result<Self> {
        settings.validate()?;
        Ok(Self { settings })
    }

    /// Evaluates the last two rows of `series`.
    pub fn generate(&self, series: &Series) -> Result<SignalReport> {
        let (previous, current) = series.last_two()?;
        Ok(self.evaluate(&previous, &current))
    }

    /// Every enabled rule runs independently, in table order.
    pub fn evaluate(&self, previous: &Row, current: &Row) -> SignalReport {
        let mut report = ReportBuilder::default();
        if self.settings.rsi_enabled {
            let outcome = self.rsi_rule(current, &mut report);
            report.settle("RSI", outcome);
        }
        if self.settings.sma_bias_enabled {
            let outcome = self.sma_bias_rule(current, &mut report);
            report.settle("SMA bias", outcome);
        }
        if self.settings.crossover_enabled {
            let outcome = self.crossover_rule(previous, current, &mut report);
            report.settle("SMA crossover", outcome);
        }
        if self.settings.macd_enabled {
            let outcome = self.macd_rule(current, &mut report);
            report.settle("MACD", outcome);
        }
        if self.settings.trend_enabled {
            let outcome = self.trend_rule(current, &mut report);
            report.settle("Trend", outcome);
        }
        report.finish()
    }

    fn rsi_rule(&self, current: &Row, report: &mut ReportBuilder) -> Result<()> {
        let rsi = current.require(IndicatorKind::Rsi)?;
        let zone = if rsi < self.settings.rsi_oversold {
            report.push(SignalKind::Buy, "oversold");
            "oversold"
        } else if rsi > self.settings.rsi_overbought {
            report.push(SignalKind::Sell, "overbought");
            "overbought"
        } else {
            "neutral"
        };
        report.detail(IndicatorKind::Rsi, format!("RSI = {} ({})", fmt2(rsi), zone));
        Ok(())
    }

    fn sma_bias_rule(&self, current: &Row, report: &mut ReportBuilder) -> Result<()> {
        let sma = current.require(IndicatorKind::Sma)?;
        let bias = if current.close > sma {
            report.push(SignalKind::Bullish, "price above SMA");
            "bullish bias"
        } else if current.close < sma {
            report.push(SignalKind::Bearish, "price below SMA");
            "bearish bias"
        } else {
            "at SMA"
        };
        report.detail(IndicatorKind::Sma, sma_line(current.close, sma, bias));
        Ok(())
    }

    fn crossover_rule(&self, previous: &Row, current: &Row, report: &mut ReportBuilder) -> Result<()> {
        let previous_sma = previous.require(IndicatorKind::Sma)?;
        let sma = current.require(IndicatorKind::Sma)?;
        let crossing = if previous.close < previous_sma && current.close > sma {
            report.push(SignalKind::Buy, "bullish crossover");
            "crossed above"
        } else if previous.close > previous_sma && current.close < sma {
            report.push(SignalKind::Sell, "bearish crossover");
            "crossed below"
        } else {
            "no crossover"
        };
        if !report.annotate(IndicatorKind::Sma, crossing) {
            report.detail(IndicatorKind::Sma, sma_line(current.close, sma, crossing));
        }
        Ok(())
    }

    fn macd_rule(&self, current: &Row, report: &mut ReportBuilder) -> Result<()> {
        let macd = current.require(IndicatorKind::Macd)?;
        let signal_line = current.require(IndicatorKind::SignalLine)?;
        let tone = if macd > signal_line {
            report.push(SignalKind::Buy, "bullish MACD");
            "bullish"
        } else if macd < signal_line {
            report.push(SignalKind::Sell, "bearish MACD");
            "bearish"
        } else {
            "neutral"
        };
        report.detail(
            IndicatorKind::Macd,
            format!("MACD = {}, Signal line = {} ({})", fmt2(macd), fmt2(signal_line), tone),
        );
        Ok(())
    }

    fn trend_rule(&self, current: &Row, report: &mut ReportBuilder) -> Result<()> {
        let trend = current.require(IndicatorKind::Trend)?;
        let tone = if current.close > trend {
            report.push(SignalKind::Buy, "above trend");
            "bullish"
        } else {
            report.push(SignalKind::Sell, "at/below trend");
            "bearish"
        };
        report.detail(
            IndicatorKind::Trend,
            format!("Price = {}, Trend = {} ({})", fmt2(current.close), fmt2(trend), tone),
        );
        Ok(())
    }
}

fn sma_line(close: f64, sma: f64, note: &str) -> String {
    format!("Price = {}, SMA = {} ({})", fmt2(close), fmt2(sma), note)
}
