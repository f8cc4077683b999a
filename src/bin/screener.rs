use std::io;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use stock_screener::config::{self, Config, DEFAULT_REFERENCE_YEAR};
use stock_screener::driver::{Driver, ReportSink};
use stock_screener::market_data::{FmpMetricSource, HttpJsonFetcher};
use stock_screener::report::ReportFormat;
use stock_screener::screening::{RuleCatalog, ScreeningEngine};
use stock_screener::watchlist::Watchlist;

/// Screen stocks against fixed fundamental rules
///
/// Reads FM_PREP_API_KEY from the environment or a .env file.
#[derive(Parser, Debug)]
#[command(name = "screener", version)]
struct Cli {
    /// Curated watchlist to screen
    #[arg(long, value_enum, default_value_t = Watchlist::default())]
    list: Watchlist,

    /// Comma separated symbols to screen instead of a watchlist
    #[arg(long, value_delimiter = ',', conflicts_with = "list")]
    symbols: Vec<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    format: ReportFormat,

    /// Year the company age rule measures against, or "current"
    #[arg(long, env = "SCREENER_REFERENCE_YEAR", default_value_t = DEFAULT_REFERENCE_YEAR,
          value_parser = config::parse_reference_year)]
    reference_year: i32,

    /// Print the screening rules and exit
    #[arg(long)]
    rules: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Log level (error, warn, info, debug, trace), RUST_LOG takes precedence
    #[arg(long, default_value = "warn", value_parser = ["error", "warn", "info", "debug", "trace"])]
    log_level: String,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();

    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            ExitCode::from(2)
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let reference_year = cli.reference_year;
    let catalog = RuleCatalog::new(reference_year);
    if cli.rules {
        print!("{}", catalog);
        return Ok(ExitCode::SUCCESS);
    }

    let config = Config::from_env().context("configuration")?;
    info!(base_url = %config.base_url, reference_year, "starting screener");

    let symbols: Vec<&str> = if cli.symbols.is_empty() {
        cli.list.symbols().to_vec()
    } else {
        cli.symbols.iter().map(|s| s.trim()).filter(|s| !s.is_empty()).collect()
    };

    let source = FmpMetricSource::new(HttpJsonFetcher::new(), &config.base_url, config.api_key);
    let stdout = io::stdout().lock();
    let sink = match cli.format {
        ReportFormat::Text => ReportSink::text(stdout, !cli.no_color && console::colors_enabled()),
        ReportFormat::Csv => ReportSink::csv(stdout),
    };

    let mut driver = Driver::new(source, ScreeningEngine::new(&catalog), sink);
    let summary = driver.run(&symbols).context("writing report")?;

    if summary.failed() > 0 {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}
