//! CLI entry point for the TBFM daily summary tool.
//!
//! Takes a batch directory and a target local day, merges the day's 23
//! hourly air-message batches, and writes one consolidated CSV record per
//! flight.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Result;
use chrono::NaiveDate;
use clap::Parser;
use tbfm_daily_summary::error::SummaryError;
use tbfm_daily_summary::merge::{FlightStore, merge_batches};
use tbfm_daily_summary::output::{summary_path, write_summary};
use tbfm_daily_summary::window::select_window;
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "tbfm_daily_summary")]
#[command(about = "Consolidate a day of TBFM SWIM air messages into one record per flight", long_about = None)]
struct Cli {
    /// Directory containing the hourly flattened air-message batches
    #[arg(value_name = "DIR")]
    dir: PathBuf,

    /// Local day to summarize, formatted YYYYMMDD
    #[arg(value_name = "TARGET_DATE")]
    target_date: String,

    /// Directory to write the daily summary CSV to
    #[arg(long, default_value = ".")]
    outdir: PathBuf,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path = std::env::var("LOG_FILE_PATH")
        .unwrap_or_else(|_| "logs/tbfm_daily_summary.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("tbfm_daily_summary.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse().unwrap()));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse().unwrap()));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    let target_date = NaiveDate::parse_from_str(&cli.target_date, "%Y%m%d")
        .map_err(|_| SummaryError::InvalidDate(cli.target_date.clone()))?;

    let start = Instant::now();

    let batches = select_window(&cli.dir, target_date)?;
    info!(
        batch_count = batches.len(),
        date = %cli.target_date,
        "Window complete, starting merge"
    );

    let mut store = FlightStore::new();
    let counts = merge_batches(&batches, &mut store)?;

    let out_path = summary_path(&cli.outdir, target_date);
    write_summary(&out_path, &store)?;

    info!(
        flights = store.len(),
        batches = counts.batches,
        records = counts.records,
        skipped = counts.skipped,
        elapsed_secs = start.elapsed().as_secs(),
        output = %out_path.display(),
        "Daily summary written"
    );

    Ok(())
}
