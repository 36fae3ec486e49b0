//! rfc-crawler main entry point
//!
//! This is the command-line interface for the citation crawler.

use anyhow::Context;
use clap::Parser;
use rfc_crawler::config::{read_config, validate, Config};
use rfc_crawler::crawler::crawl;
use rfc_crawler::output::print_summary;
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// rfc-crawler: follows "[RFC nnnn]" citations from a seed document
///
/// Every document reachable through citations is fetched exactly once, with a global
/// ceiling on fetches per second shared by all workers.
#[derive(Parser, Debug)]
#[command(name = "rfc-crawler")]
#[command(version)]
#[command(about = "Crawls RFC documents by following their citations", long_about = None)]
struct Cli {
    /// Amount of workers to crawl pages
    #[arg(short = 'n', long)]
    workers: Option<u32>,

    /// Pages per second crawling limit
    #[arg(short = 'r', long)]
    rate: Option<u32>,

    /// URL to start crawling from
    #[arg(short = 's', long = "start")]
    start_url: Option<String>,

    /// Path to an optional TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = build_config(&cli)?;

    let cancel = CancellationToken::new();
    tokio::spawn(cancel_on_signal(cancel.clone()));

    let summary = crawl(&config, cancel).await.context("Crawl failed")?;

    if !cli.quiet {
        print_summary(&summary);
    }
    tracing::info!("Crawling complete");

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("rfc_crawler=info,warn"),
            1 => EnvFilter::new("rfc_crawler=debug,info"),
            2 => EnvFilter::new("rfc_crawler=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads the config file (if any) and applies command-line overrides
fn build_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            read_config(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?
        }
        None => Config::default(),
    };

    if let Some(workers) = cli.workers {
        config.crawler.workers = workers;
    }
    if let Some(rate) = cli.rate {
        config.crawler.pages_per_second = rate;
    }
    if let Some(start_url) = &cli.start_url {
        config.crawler.seed_url = start_url.clone();
    }

    validate(&config).context("Invalid configuration")?;
    Ok(config)
}

/// Cancels the crawl on Ctrl-C or SIGTERM
async fn cancel_on_signal(cancel: CancellationToken) {
    wait_for_signal().await;
    tracing::info!("Received stop signal");
    cancel.cancel();
}

#[cfg(unix)]
async fn wait_for_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    let mut terminate = match signal(SignalKind::terminate()) {
        Ok(stream) => stream,
        Err(e) => {
            tracing::warn!("Cannot listen for SIGTERM: {}", e);
            let _ = tokio::signal::ctrl_c().await;
            return;
        }
    };

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {}
        _ = terminate.recv() => {}
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() {
    let _ = tokio::signal::ctrl_c().await;
}
