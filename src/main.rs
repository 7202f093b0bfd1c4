//! Tally-Harvest main entry point
//!
//! This is the command-line interface for the Tally-Harvest election results scraper.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use tally_harvest::config::{load_config_with_hash, validate, Config};
use tally_harvest::crawler::Coordinator;
use tally_harvest::output::{print_report, write_dataset, DelimitedWriter};
use tracing_subscriber::EnvFilter;

/// Tally-Harvest: election results scraper
///
/// Downloads the results of every municipality listed on a district page and
/// saves them as one table: code, location, registered voters, envelopes
/// issued, valid votes, and one column per party.
#[derive(Parser, Debug)]
#[command(name = "tally-harvest")]
#[command(version)]
#[command(about = "Download election results for a district and save them to CSV", long_about = None)]
struct Cli {
    /// URL of the district page listing municipalities
    #[arg(value_name = "URL")]
    url: String,

    /// Output file
    #[arg(value_name = "OUTPUT", required_unless_present = "dry_run")]
    output: Option<PathBuf>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Number of detail pages fetched at once (row order is preserved)
    #[arg(short = 'j', long, value_name = "N")]
    concurrency: Option<usize>,

    /// Output field delimiter
    #[arg(short, long, value_name = "CHAR")]
    delimiter: Option<char>,

    /// Fetch the listing page only and print the municipalities found
    #[arg(long)]
    dry_run: bool,

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

    setup_logging(cli.verbose, cli.quiet);

    let config = load(&cli)?;
    let coordinator = Coordinator::new(config).context("Failed to build HTTP client")?;

    if cli.dry_run {
        return handle_dry_run(&coordinator, &cli.url).await;
    }

    handle_harvest(&coordinator, &cli).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("tally_harvest=info,warn"),
            1 => EnvFilter::new("tally_harvest=debug,info"),
            2 => EnvFilter::new("tally_harvest=trace,debug"),
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

/// Loads the configuration file (if any) and applies command-line overrides
fn load(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    if let Some(n) = cli.concurrency {
        config.crawler.max_concurrent_fetches = n;
    }
    if let Some(d) = cli.delimiter {
        config.output.delimiter = d;
    }

    validate(&config).context("Invalid command-line options")?;
    Ok(config)
}

/// Handles --dry-run: lists the municipalities without visiting them
async fn handle_dry_run(coordinator: &Coordinator, url: &str) -> anyhow::Result<()> {
    let entities = coordinator.discover(url).await.map_err(|e| {
        tracing::error!("Discovery failed: {}", e);
        e
    })?;

    println!("=== Tally-Harvest Dry Run ===\n");
    println!("Municipalities ({}):", entities.len());
    for entity in &entities {
        println!("  {:>6}  {:<30} {}", entity.code, entity.name, entity.detail_url);
    }

    Ok(())
}

/// Handles the main harvest: crawl, then write the dataset
async fn handle_harvest(coordinator: &Coordinator, cli: &Cli) -> anyhow::Result<()> {
    let harvest = match coordinator.run(&cli.url).await {
        Ok(harvest) => harvest,
        Err(e) => {
            tracing::error!("Harvest failed: {}", e);
            return Err(e.into());
        }
    };

    let output = cli.output.as_deref().context("OUTPUT is required")?;
    let writer = DelimitedWriter::from_config(&coordinator.config().output);
    write_dataset(&writer, output, &harvest.dataset)
        .with_context(|| format!("Error while writing file '{}'", output.display()))?;

    if !cli.quiet {
        print_report(&harvest.report, output);
    }

    Ok(())
}
