// Engine main entry point
use clap::Parser;
use signal_engine::config::AnalysisSettings;
use signal_engine::data::CsvMarketData;
use signal_engine::services::{render_report, AnalysisService};
use std::path::PathBuf;
use tracing::{error, info, warn};

#[derive(Parser, Debug)]
#[command(author, version, about = "Indicator, signal and forecast engine over OHLCV candles")]
struct Args {
    /// Candle CSV file with timestamp, open, high, low, close and volume columns
    csv_path: PathBuf,

    /// JSON settings file; defaults apply when omitted
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Run a single refresh cycle and exit
    #[arg(long)]
    once: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let settings = match &args.settings {
        Some(path) => AnalysisSettings::load(path)?,
        None => AnalysisSettings::default(),
    };
    info!(
        symbol = %settings.symbol,
        timeframe = %settings.timeframe,
        source = %args.csv_path.display(),
        "Starting signal engine..."
    );

    let source = CsvMarketData::new(args.csv_path.clone());
    let service = AnalysisService::new(settings)?;

    if args.once {
        let evaluation = service.refresh(&source).await?;
        println!("{}", render_report(&evaluation));
        return Ok(());
    }

    let mut ticker = tokio::time::interval(service.settings().refresh_interval());
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                match service.refresh(&source).await {
                    Ok(evaluation) => println!("{}", render_report(&evaluation)),
                    Err(e) if e.is_recoverable() => warn!(error_detail = %e, "Refresh skipped"),
                    Err(e) => error!(error_detail = %e, "Refresh failed"),
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Shutting down signal engine");
                break;
            }
        }
    }
    Ok(())
}
