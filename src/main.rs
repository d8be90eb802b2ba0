//! CLI entry point for the GTFS delay cleaning pipeline.
//!
//! Provides the `transform` subcommand, which turns a date range of processed
//! stop-event tables into cleaned, feature-enriched scheduled/unscheduled
//! partitions plus quality reports.

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use gtfs_delay_cleaner::config::{CleanConfig, StorageConfig};
use gtfs_delay_cleaner::orchestrator::run_range;
use gtfs_delay_cleaner::store::{LocalStore, S3Store};
use std::ffi::OsStr;
use std::path::Path;
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "gtfs_delay_cleaner")]
#[command(about = "Cleans and enriches MTA stop-event delay tables", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Transform processed day tables into cleaned partitions with features
    Transform {
        /// First service day of the range
        #[arg(long, value_name = "YYYY-MM-DD")]
        start: String,

        /// Last service day of the range, inclusive
        #[arg(long, value_name = "YYYY-MM-DD")]
        end: String,

        /// Read and write a local directory instead of MinIO (debug mode)
        #[arg(long, value_name = "PATH")]
        local_dir: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path = std::env::var("LOG_FILE_PATH")
        .unwrap_or_else(|_| "logs/gtfs_delay_cleaner.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("gtfs_delay_cleaner.log"));

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

    match cli.command {
        Commands::Transform {
            start,
            end,
            local_dir,
        } => {
            let start = parse_day("--start", &start)?;
            let end = parse_day("--end", &end)?;
            let cfg = CleanConfig::default();

            match local_dir {
                Some(dir) => {
                    info!(dir = %dir, "using local directory store");
                    let store = LocalStore::new(dir);
                    run_range(&store, start, end, &cfg).await;
                }
                None => {
                    // Credentials are checked before the first day runs.
                    let storage = StorageConfig::from_env()?;
                    info!(endpoint = %storage.endpoint, bucket = %storage.bucket, "using MinIO store");
                    let store = S3Store::connect(&storage).await;
                    run_range(&store, start, end, &cfg).await;
                }
            }
        }
    }

    Ok(())
}

fn parse_day(flag: &str, value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| anyhow::anyhow!("{flag} must be a YYYY-MM-DD date, got '{value}'"))
}
