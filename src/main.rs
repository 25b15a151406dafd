use anyhow::Result;
use chrono::Local;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

mod config;
mod error;
mod inspect;
mod models;
mod parsers;
mod pipeline;
mod scrapers;
mod storage;
mod utils;

use crate::config::{Config, DelayConfig};
use crate::pipeline::{run_scrape, ScrapeOptions};
use crate::scrapers::SrealityClient;
use crate::storage::{discover_data_files, merge_files, WriteMode};

/// Scrape Prague apartment rentals from Sreality.cz
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Number of pages to scrape (20 listings per page)
    #[arg(long, default_value_t = 30)]
    pages: u32,

    /// Output CSV filename inside the data directory. Default: generated from the current time
    #[arg(long)]
    output: Option<String>,

    /// Append to the output file instead of overwriting it
    #[arg(long, default_value_t = false)]
    append: bool,

    /// Merge all existing data files into one combined CSV
    #[arg(long, default_value_t = false)]
    merge: bool,

    /// Fetch a few listings and show all available attributes
    #[arg(long, default_value_t = false)]
    debug: bool,

    /// Number of listings to check in debug mode
    #[arg(long, default_value_t = 3)]
    count: usize,

    /// Skip the pauses between requests
    #[arg(long, default_value_t = false)]
    no_delay: bool,

    /// Configuration file (TOML). Default: ./sreality.toml when present
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log request-level details
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let default_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(format!("sreality_scraper={}", default_level).parse()?),
        )
        .with_target(false)
        .init();

    // Load configuration
    let mut config = Config::load(args.config.as_deref())?;
    if args.no_delay {
        config.delays = DelayConfig::disabled();
    }

    if args.merge {
        return merge(&config);
    }

    let client = SrealityClient::new(&config.api)?;

    if args.debug {
        info!("Inspecting attributes of {} listings", args.count);
        let inspected = inspect::inspect_listings(&client, args.count).await;
        print!("{}", inspect::render_report(&inspected));
        return Ok(());
    }

    let timestamp = Local::now().format("%Y%m%d_%H%M%S").to_string();
    let options = ScrapeOptions {
        max_pages: args.pages,
        output_path: config.output.scrape_path(args.output.as_deref(), &timestamp),
        mode: if args.append {
            WriteMode::Append
        } else {
            WriteMode::Create
        },
    };

    info!("Starting Sreality scrape of up to {} pages", options.max_pages);
    let summary = run_scrape(&config, &client, &options).await?;
    info!(
        "Done ({}): {} found, {} skipped as known, {} failed details, {} written",
        summary.stop, summary.found, summary.skipped, summary.failed_details, summary.written
    );

    Ok(())
}

fn merge(config: &Config) -> Result<()> {
    let output = &config.output;
    let files = discover_data_files(&output.dir, &output.file_prefix, Some(&output.combined_file))?;

    if files.is_empty() {
        info!("No data files found in {} directory.", output.dir.display());
        return Ok(());
    }

    let report = merge_files(&files, &output.combined_path())?;
    info!(
        "Merged: {} unique listings from {} files into {}",
        report.unique,
        report.per_file.len(),
        output.combined_path().display()
    );

    Ok(())
}
