//! Transaction Dashboard - card transaction CSV cleaning & statistics
//!
//! Stores an uploaded transactions CSV, then reloads and cleans it on every
//! command to print dashboard statistics, a page of rows or the daily series.

mod config;
mod data;
mod report;
mod stats;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs;
use std::io::{stdout, BufWriter, Write};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use config::Config;
use data::{store_upload, Page, TransactionLoader, TransactionPage};
use stats::{DailySeries, StatsCalculator};

#[derive(Parser, Debug)]
#[command(name = "txn-dashboard", version, about = "Card transaction dashboard")]
struct Cli {
    /// TOML config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding the transactions CSV (overrides the config)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Log level used when RUST_LOG is not set
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate a CSV and store it as the current transactions file
    Upload {
        /// CSV file to store
        file: PathBuf,
    },

    /// Print summary statistics
    Dashboard {
        #[arg(long)]
        json: bool,
    },

    /// Print one page of cleaned transactions
    Transactions {
        #[arg(long, default_value_t = 1)]
        page: usize,

        #[arg(long)]
        json: bool,
    },

    /// Print transactions per day, zero-filled
    TimeSeries {
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(&cli.log_level);

    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }

    let mut out = BufWriter::new(stdout().lock());

    match cli.command {
        Command::Upload { file } => {
            let file_name = file
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
            let contents =
                fs::read(&file).with_context(|| format!("read {}", file.display()))?;
            let stored = store_upload(&file_name, &contents, &config.transactions_path())?;
            writeln!(out, "Fichier {} enregistré: {}", file_name, stored.display())?;
        }

        Command::Dashboard { json } => {
            let df = load(&config)?;
            let stats = StatsCalculator::compute_dashboard(&df, config.limits())?;
            if json {
                report::write_json(&mut out, &stats)?;
            } else {
                report::write_dashboard(&mut out, &stats)?;
            }
        }

        Command::Transactions { page, json } => {
            let df = load(&config)?;
            let page = TransactionPage::from_frame(&df, Page::new(page, config.page_size))?;
            if json {
                report::write_json(&mut out, &page)?;
            } else {
                report::write_page(&mut out, &page)?;
            }
        }

        Command::TimeSeries { json } => {
            let df = load(&config)?;
            let series = DailySeries::from_frame(&df)?;
            if json {
                report::write_json(&mut out, &series)?;
            } else {
                report::write_series(&mut out, &series)?;
            }
        }
    }

    out.flush()?;
    Ok(())
}

fn load(config: &Config) -> Result<polars::prelude::DataFrame> {
    let loader = TransactionLoader::new(config.transactions_path());
    info!(path = %loader.file_path().display(), "loading transactions");
    loader
        .load()
        .context("Erreur lors du chargement des transactions")
}

fn setup_logging(level: &str) {
    // stdout carries results, so logs go to stderr.
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
