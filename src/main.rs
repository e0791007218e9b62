//! Album-Harvest main entry point
//!
//! This is the command-line interface for the Album-Harvest gallery harvester.

use album_harvest::config::{load_config_with_hash, validate, Config};
use album_harvest::crawler::harvest;
use album_harvest::output::{digest_file, print_statistics};
use anyhow::Context;
use clap::Parser;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing_subscriber::EnvFilter;

/// Album-Harvest: a catalog gallery harvester
///
/// Album-Harvest walks a nested photo gallery from its root page, follows
/// every sub-album and pagination link, and writes one CSV row per item
/// together with the chain of album titles it was found under.
#[derive(Parser, Debug)]
#[command(name = "album-harvest")]
#[command(version)]
#[command(about = "A catalog gallery harvester", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (defaults target Australian Moths Online)
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Write the CSV here instead of the configured path
    #[arg(short, long, value_name = "CSV")]
    output: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be harvested without fetching anything
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let mut config = load(cli.config.as_deref())?;
    if let Some(output) = &cli.output {
        config.output.csv_path = output.display().to_string();
        validate(&config).context("Invalid output path")?;
    }

    if cli.dry_run {
        handle_dry_run(&config);
    } else {
        handle_harvest(&config, cli.quiet).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("album_harvest=info,warn"),
            1 => EnvFilter::new("album_harvest=debug,info"),
            2 => EnvFilter::new("album_harvest=trace,debug"),
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

/// Loads the configuration file, or the defaults when none is given
fn load(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        tracing::info!("No configuration file given, using defaults");
        return Ok(Config::default());
    };

    tracing::info!("Loading configuration from: {}", path.display());
    match load_config_with_hash(path) {
        Ok((config, hash)) => {
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            Ok(config)
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            Err(e).with_context(|| format!("Failed to load {}", path.display()))
        }
    }
}

/// Handles the --dry-run mode: shows the effective configuration
fn handle_dry_run(config: &Config) {
    println!("=== Album-Harvest Dry Run ===\n");

    println!("Site:");
    println!("  Base URL: {}", config.site.base_url);
    println!("  Start page: {}", config.start_url());
    println!("  Home title: {}", config.site.home_title);

    println!("\nFetch:");
    println!("  Timeout: {}s", config.fetch.timeout_secs);
    println!("  Accept invalid certificates: {}", config.fetch.accept_invalid_certs);
    println!("  User agent: {}", config.fetch.user_agent);

    println!("\nSelectors:");
    for (name, selector) in config.selectors.entries() {
        println!("  {}: {}", name, selector);
    }

    println!("\nOutput:");
    println!("  CSV: {}", config.output.csv_path);

    println!("\n✓ Configuration is valid");
    println!("✓ Would start harvesting at {}", config.start_url());
}

/// Handles the main harvest operation
async fn handle_harvest(config: &Config, quiet: bool) -> anyhow::Result<()> {
    let started = Instant::now();

    match harvest(config).await {
        Ok(stats) => {
            tracing::info!("Harvest completed successfully");
            let csv_path = Path::new(&config.output.csv_path);
            let digest = digest_file(csv_path)
                .with_context(|| format!("Failed to read back {}", csv_path.display()))?;

            if !quiet {
                println!();
                print_statistics(&stats, started.elapsed());
                println!("Output: {} (sha256 {})", csv_path.display(), digest);
            }
            Ok(())
        }
        Err(e) => {
            tracing::error!("Harvest failed: {}", e);
            tracing::error!(
                "Rows written before the failure remain in {}",
                config.output.csv_path
            );
            Err(e.into())
        }
    }
}
