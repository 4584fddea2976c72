//! Co-movement pipeline CLI.
//!
//! Seeds a working directory with synthetic return data when absent, then
//! runs the full pipeline over it and prints a run report.
//!
//! Usage: `cargo run --features cli --bin comove -- [WORKDIR] [OPTIONS]`
//! Example: `cargo run --features cli --bin comove -- ./work --entities 100 --dates 500`
//!
//! Options: `--entities N`, `--dates N`, `--seed N` (dataset generation);
//! `--strategy NAME`, `--window N`, `--partitions N` (pipeline). Without a
//! workdir a fresh directory is created under the system temp dir.

use std::path::{Path, PathBuf};
use std::{env, process};

use comove::pipeline::dataset::{self, DatasetConfig};
use comove::pipeline::{self, PipelineConfig, PipelineReport};
use comove::resample::FillStrategy;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    let args: Vec<String> = env::args().collect();
    let workdir = match workdir_from_args(&args) {
        Ok(dir) => dir,
        Err(message) => {
            eprintln!("{message}");
            process::exit(1);
        }
    };

    let mut config = PipelineConfig::default();
    if let Some(strategy) = flag_value(&args, "--strategy") {
        config.strategy = strategy.parse::<FillStrategy>()?;
    }
    if let Some(window) = flag_value(&args, "--window") {
        config.window = window.parse()?;
    }
    if let Some(partitions) = flag_value(&args, "--partitions") {
        config.partition_count = partitions.parse()?;
    }

    ensure_dataset(&workdir, &args)?;

    match pipeline::run_pipeline(&workdir, &config) {
        Ok(report) => {
            print_report(&report);
            Ok(())
        }
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Take the first positional argument as the working directory, falling
/// back to a fresh path under the system temp dir.
fn workdir_from_args(args: &[String]) -> Result<PathBuf, String> {
    let Some(raw) = args.get(1).filter(|arg| !arg.starts_with("--")) else {
        return Ok(env::temp_dir().join(format!("comove-{}.dir", process::id())));
    };
    let dir = PathBuf::from(raw);
    if dir.is_dir() {
        Ok(dir)
    } else {
        Err(format!("Not a directory: {}", dir.display()))
    }
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    for i in 0..args.len() {
        if args[i] == flag && i + 1 < args.len() {
            return Some(&args[i + 1]);
        }
    }
    None
}

/// Generate both input artifacts unless they already exist.
fn ensure_dataset(workdir: &Path, args: &[String]) -> Result<(), Box<dyn std::error::Error>> {
    let have_entities = workdir.join(pipeline::ENTITY_RETURNS_FILE).exists();
    let have_market = workdir.join(pipeline::MARKET_RETURNS_FILE).exists();
    if have_entities && have_market {
        debug!("entity and market data already exist in {}", workdir.display());
        return Ok(());
    }

    let mut shape = DatasetConfig::default();
    if let Some(entities) = flag_value(args, "--entities") {
        shape.entities = entities.parse()?;
    }
    if let Some(dates) = flag_value(args, "--dates") {
        shape.dates_per_entity = dates.parse()?;
    }
    let seed = match flag_value(args, "--seed") {
        Some(seed) => seed.parse()?,
        None => dataset::DEFAULT_RANDOM_SEED,
    };

    info!("creating dataset in {}...", workdir.display());
    dataset::write_dataset(workdir, &shape, seed)?;
    Ok(())
}

fn print_report(report: &PipelineReport) {
    println!("\nPipeline complete:");
    println!("  input rows            {:>12}", report.input_rows);
    println!("  entities              {:>12}", report.entities);
    println!("  resampled rows        {:>12}", report.resampled_rows);
    println!("  partitions written    {:>12}", report.partitions_written);
    println!("  partitions processed  {:>12}", report.partitions_processed);
    println!("  result rows           {:>12}", report.result_rows);
    println!("  result file           {}", report.result_path.display());
}
