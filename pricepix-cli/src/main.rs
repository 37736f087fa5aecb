//! PricePix CLI: one deterministic pixel-art image per day of price data.
//!
//! Commands:
//! - `yesterday`: generate the image for the previous UTC day
//! - `date`: generate the image for one explicit day
//! - `window`: back-fill a rolling window of days ending before `--end`
//! - `config`: print the effective configuration as TOML

use anyhow::{Context, Result};
use chrono::{Days, NaiveDate, Utc};
use clap::{Args, Parser, Subcommand};
use pricepix_core::data::{CircuitBreaker, CryptoCompareProvider, PriceProvider, ReplayProvider};
use pricepix_core::GridSize;
use pricepix_runner::{
    AppConfig, ArtGenerator, BatchRunner, BatchSummary, FailurePolicy, StdoutProgress,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "pricepix",
    about = "PricePix: turn a day of crypto prices into a deterministic pixel grid"
)]
struct Cli {
    /// Path to a TOML config file.
    #[arg(long, global = true, default_value = "pricepix.toml")]
    config: PathBuf,

    /// Enable debug logging (overridden by RUST_LOG).
    #[arg(long, short, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Clone, Default)]
struct Overrides {
    /// Output directory for images.
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Pixels per grid cell along each edge.
    #[arg(long)]
    scale: Option<u32>,

    /// Grid side length.
    #[arg(long)]
    grid_size: Option<usize>,

    /// Read observations from a `time,close` CSV instead of the network.
    #[arg(long)]
    replay: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the image for yesterday (UTC).
    Yesterday {
        #[command(flatten)]
        overrides: Overrides,
    },
    /// Generate the image for one day.
    Date {
        /// Day to render (YYYY-MM-DD).
        date: String,

        #[command(flatten)]
        overrides: Overrides,
    },
    /// Generate a rolling window of days, oldest first.
    Window {
        /// Exclusive end date (YYYY-MM-DD). Defaults to today (UTC).
        #[arg(long)]
        end: Option<String>,

        /// Number of days. Defaults to the config's batch.window_days.
        #[arg(long)]
        days: Option<u32>,

        /// Record failures and continue instead of stopping at the first one.
        #[arg(long, default_value_t = false)]
        keep_going: bool,

        /// Fetch and encode days in parallel.
        #[arg(long, default_value_t = false)]
        parallel: bool,

        #[command(flatten)]
        overrides: Overrides,
    },
    /// Print the effective configuration.
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;

    let today = Utc::now().date_naive();

    let summary = match cli.command {
        Commands::Yesterday { overrides } => {
            let yesterday = today
                .checked_sub_days(Days::new(1))
                .context("date out of range")?;
            run(&mut config, &overrides, |runner| runner.run_single(yesterday))?
        }
        Commands::Date { date, overrides } => {
            let date = parse_date(&date)?;
            run(&mut config, &overrides, |runner| runner.run_single(date))?
        }
        Commands::Window {
            end,
            days,
            keep_going,
            parallel,
            overrides,
        } => {
            let end = end.as_deref().map(parse_date).transpose()?.unwrap_or(today);
            if let Some(days) = days {
                config.batch.window_days = days;
            }
            if keep_going {
                config.batch.failure_policy = FailurePolicy::Continue;
            }
            config.batch.parallel |= parallel;
            let days = config.batch.window_days;
            run(&mut config, &overrides, |runner| runner.run_window(end, days))?
        }
        Commands::Config => {
            print!("{}", config.to_toml()?);
            return Ok(());
        }
    };

    if !summary.all_succeeded() {
        for (date, err) in &summary.errors {
            eprintln!("Error for {date}: {err}");
        }
        std::process::exit(1);
    }

    Ok(())
}

/// Apply overrides, wire provider → generator → sink → runner, and execute.
fn run<F>(config: &mut AppConfig, overrides: &Overrides, execute: F) -> Result<BatchSummary>
where
    F: FnOnce(&BatchRunner<'_>) -> Result<BatchSummary, pricepix_runner::BatchError>,
{
    if let Some(dir) = &overrides.output_dir {
        config.output.dir = dir.clone();
    }
    if let Some(scale) = overrides.scale {
        config.output.scale = scale;
    }
    if let Some(size) = overrides.grid_size {
        config.grid_size = GridSize::new(size)?;
    }
    config.validate()?;

    let provider: Box<dyn PriceProvider> = match &overrides.replay {
        Some(path) => Box::new(ReplayProvider::from_path(path)?),
        None => {
            let breaker = Arc::new(CircuitBreaker::default_provider());
            Box::new(CryptoCompareProvider::new(config.crypto_compare(), breaker)?)
        }
    };
    tracing::info!(
        provider = provider.name(),
        pair = %config.pair,
        grid = %config.grid_size,
        output = %config.output.dir.display(),
        "configured"
    );

    let generator = ArtGenerator::new(provider.as_ref(), config.pair.clone(), config.grid_size);
    let sink = config.png_sink();
    let progress = StdoutProgress;
    let runner = BatchRunner::new(&generator, &sink, &progress)
        .with_policy(config.batch.failure_policy)
        .with_parallel(config.batch.parallel);

    Ok(execute(&runner)?)
}

fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").with_context(|| format!("invalid date '{s}'"))
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
