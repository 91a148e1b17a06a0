use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use stockscope::{
    models::{DEFAULT_END, DEFAULT_START, DEFAULT_TICKER},
    prelude::*,
    services::write_csv,
    utils::{init_logger, Timer},
};

#[derive(Parser)]
#[command(name = "stockscope")]
#[command(about = "Fetch a ticker's price history and print its analysis report")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Debug)]
pub struct HistoryArgs {
    /// Ticker symbol
    #[arg(short, long, default_value = DEFAULT_TICKER)]
    ticker: String,
    /// First date to include (YYYY-MM-DD)
    #[arg(short, long, default_value = DEFAULT_START)]
    start: String,
    /// Last date to include (YYYY-MM-DD)
    #[arg(short, long, default_value = DEFAULT_END)]
    end: String,
    /// Bar interval: 1d, 1wk or 1mo (CSV input is daily only)
    #[arg(short, long, default_value = "1d")]
    interval: String,
    /// Read history from a CSV export instead of the network
    #[arg(long)]
    csv: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch history and print the analysis report
    Analyze {
        #[command(flatten)]
        history: HistoryArgs,
        /// Print the full report as JSON instead of text
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Fetch history and write it to a CSV file
    Export {
        #[command(flatten)]
        history: HistoryArgs,
        /// Destination file
        #[arg(short, long)]
        output: PathBuf,
    },
}

async fn load_series(args: &HistoryArgs) -> anyhow::Result<PriceSeries> {
    let request = HistoryRequest::parse(&args.ticker, &args.start, &args.end, &args.interval)?;

    let source: Box<dyn PriceSource> = match &args.csv {
        Some(path) => Box::new(CsvSource::new(path)),
        None => Box::new(YahooClient::new()?),
    };

    let timer = Timer::start("History fetch");
    let series = source
        .fetch_history(&request)
        .await
        .with_context(|| format!("fetching {} from {}", request.ticker, source.name()))?;
    timer.log_elapsed("CLI");

    tracing::info!(
        ticker = %request.ticker,
        records = series.len(),
        source = source.name(),
        "Loaded price history"
    );
    Ok(series)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logger()?;

    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze { history, json } => {
            let series = load_series(&history).await?;
            let report = build_report(&series)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{}", render_text(&report));
            }
        }
        Commands::Export { history, output } => {
            let series = load_series(&history).await?;
            let file = std::fs::File::create(&output)
                .with_context(|| format!("creating {}", output.display()))?;
            write_csv(&series, file)?;

            println!("Wrote {} records to {}", series.len(), output.display());
        }
    }

    Ok(())
}
