#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for the trip dataset generator.
//!
//! Requires a WebDriver endpoint, e.g. `chromedriver --port=9515`.

use std::path::PathBuf;

use clap::Parser;
use trip_dataset_cli_utils::{IndicatifProgress, init_logger};
use trip_dataset_generate::config::GenerateConfig;

#[derive(Parser, Debug)]
#[command(
    name = "trip_dataset",
    about = "Generate driving durations between random city pairs"
)]
struct Cli {
    /// TOML config file. Flags below override its values.
    #[arg(long)]
    config: Option<PathBuf>,
    /// City catalog (JSON array of cities)
    #[arg(long)]
    input: Option<PathBuf>,
    /// Dataset file to create or append to
    #[arg(long)]
    output: Option<PathBuf>,
    /// Number of batches to run
    #[arg(long)]
    batches: Option<usize>,
    /// City pairs extracted per batch
    #[arg(long)]
    pairs_per_batch: Option<usize>,
    /// Maximum extractions in flight at once (default: pairs per batch)
    #[arg(long)]
    concurrency: Option<usize>,
    /// Seed for city pair sampling, for reproducible runs
    #[arg(long)]
    seed: Option<u64>,
    /// WebDriver endpoint URL (e.g., `http://localhost:9515`)
    #[arg(long)]
    webdriver: Option<String>,
    /// Show the browser window instead of running headless
    #[arg(long)]
    no_headless: bool,
}

impl Cli {
    fn apply(self, config: &mut GenerateConfig) {
        if let Some(input) = self.input {
            config.input_path = input;
        }
        if let Some(output) = self.output {
            config.output_path = output;
        }
        if let Some(batches) = self.batches {
            config.batch_count = batches;
        }
        if let Some(pairs) = self.pairs_per_batch {
            config.pairs_per_batch = pairs;
        }
        if self.concurrency.is_some() {
            config.concurrency = self.concurrency;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if let Some(url) = self.webdriver {
            config.extractor.webdriver_url = url;
        }
        if self.no_headless {
            config.extractor.headless = false;
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = init_logger();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => GenerateConfig::load(path)?,
        None => GenerateConfig::default(),
    };
    cli.apply(&mut config);

    let progress = IndicatifProgress::batches_bar(&multi, "Batches", config.batch_count as u64);
    let output_path = config.output_path.clone();
    let summary = trip_dataset_generate::run(config, progress).await?;

    if summary.writer.trips_lost > 0 {
        return Err(format!(
            "{} of {} extracted trip(s) could not be written to {}",
            summary.writer.trips_lost,
            summary.successful,
            output_path.display()
        )
        .into());
    }

    Ok(())
}
