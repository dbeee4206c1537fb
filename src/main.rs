//! Table-Harvest main entry point
//!
//! This is the command-line interface for the Table-Harvest paginated table scraper.

use anyhow::Context;
use clap::Parser;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use table_harvest::config::{load_config, validate, Config};
use table_harvest::harvest::{harvest, harvest_file, HarvestOutcome};
use table_harvest::output::write_csv;
use tracing_subscriber::EnvFilter;

/// Table-Harvest: a polite paginated table scraper
///
/// Table-Harvest follows a listing's "next page" links one at a time, waits
/// between requests to the same host, and writes every table row it finds
/// to a CSV file.
#[derive(Parser, Debug)]
#[command(name = "table-harvest")]
#[command(version = "1.0.0")]
#[command(about = "A polite paginated table scraper", long_about = None)]
struct Cli {
    /// Url of site to be scraped
    #[arg(short, long)]
    url: Option<String>,

    /// Delay between page retrievals from the same host, in seconds
    #[arg(short, long)]
    delay: Option<u64>,

    /// Number of retries for 5xx responses
    #[arg(long)]
    retries: Option<u32>,

    /// Per-request timeout, in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// User-Agent header sent with each request
    #[arg(long)]
    user_agent: Option<String>,

    /// Path of the CSV file to write
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Extract a single saved HTML page instead of downloading
    #[arg(long, value_name = "HTML", conflicts_with = "url")]
    from_file: Option<PathBuf>,

    /// Write logs to this file (truncated on every run) instead of stderr
    #[arg(long, value_name = "LOG")]
    log_file: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

impl Cli {
    /// Applies command-line overrides on top of the loaded configuration
    fn apply_overrides(&self, config: &mut Config) {
        if let Some(url) = &self.url {
            config.harvest.seed_url = url.clone();
        }
        if let Some(delay) = self.delay {
            config.harvest.delay_secs = delay;
        }
        if let Some(retries) = self.retries {
            config.harvest.max_retries = retries;
        }
        if let Some(timeout) = self.timeout {
            config.harvest.request_timeout_secs = timeout;
        }
        if let Some(user_agent) = &self.user_agent {
            config.user_agent.name = user_agent.clone();
        }
        if let Some(output) = &self.output {
            config.output.csv_path = output.display().to_string();
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet, cli.log_file.as_deref())?;
    tracing::info!("Process started");

    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?
        }
        None => Config::default(),
    };
    cli.apply_overrides(&mut config);
    validate(&config).context("Invalid configuration")?;

    tracing::debug!("URL argument is: {}", config.harvest.seed_url);
    tracing::debug!("Delay argument: {}", config.harvest.delay_secs);

    let outcome = match &cli.from_file {
        Some(path) => harvest_file(path),
        None => harvest(&config).await.context("Harvest could not start")?,
    };

    handle_outcome(&outcome, Path::new(&config.output.csv_path))?;

    tracing::debug!("Process completed");
    Ok(())
}

/// Writes the harvested rows, or reports that there were none
fn handle_outcome(outcome: &HarvestOutcome, csv_path: &Path) -> anyhow::Result<()> {
    if outcome.stop.is_failure() {
        tracing::warn!("Harvest ended early: {:?}", outcome.stop);
    }

    if outcome.is_empty() {
        tracing::error!("No movie information was written to the csv file");
        return Ok(());
    }

    tracing::info!("Writing {} rows to {}", outcome.rows.len(), csv_path.display());
    let written = write_csv(csv_path, &outcome.rows)
        .with_context(|| format!("Error occurred writing to csv file {}", csv_path.display()))?;
    tracing::info!(
        "Wrote {} rows from {} pages to {}",
        written,
        outcome.pages_fetched,
        csv_path.display()
    );

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool, log_file: Option<&Path>) -> anyhow::Result<()> {
    let filter = if quiet {
        EnvFilter::new("error")
    } else if let Ok(filter) = EnvFilter::try_from_default_env() {
        filter
    } else {
        match verbose {
            0 => EnvFilter::new("table_harvest=info,warn"),
            1 => EnvFilter::new("table_harvest=debug,info"),
            2 => EnvFilter::new("table_harvest=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false);

    match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create log file {}", path.display()))?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).init();
        }
        None => builder.with_writer(std::io::stderr).init(),
    }

    Ok(())
}
