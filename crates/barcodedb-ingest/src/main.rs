//! BarcodeDB Ingest - build the taxon/barcode database from a BOLD dump

use anyhow::{Context, Result};
use barcodedb_common::logging::{init_logging, LogConfig, LogLevel};
use barcodedb_ingest::{progress, IngestConfig, MarkerSpec, Pipeline, PipelineReport};
use clap::Parser;
use rusqlite::Connection;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info, info_span};

#[derive(Parser, Debug)]
#[command(name = "barcodedb-ingest")]
#[command(author, version, about = "Load a BOLD data dump into a normalized SQLite database")]
struct Cli {
    /// Database file to create or extend
    #[arg(short, long)]
    database: PathBuf,

    /// BOLD data dump (TSV, optionally .gz)
    #[arg(short, long)]
    tsv: PathBuf,

    /// Marker name (e.g. COI-5P), or two codes joined by '_' (e.g. rbcL_matK)
    #[arg(short, long)]
    marker: MarkerSpec,

    /// Minimum sequence length after removing gaps (e.g. 600)
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..))]
    length: u32,

    /// Log level (e.g. DEBUG, INFO, WARNING)
    #[arg(short, long)]
    verbosity: LogLevel,

    /// Dump rows per committed chunk
    #[arg(
        long,
        env = "BARCODEDB_CHUNK_SIZE",
        default_value_t = 10_000,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    chunk_size: u32,

    /// Skip creating secondary indexes
    #[arg(long)]
    no_indexes: bool,

    /// Write the run report as JSON to this file
    #[arg(long)]
    report: Option<PathBuf>,
}

fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // LOG_* variables refine output and format; the required flag decides the level
    let mut log_config = LogConfig::from_env().unwrap_or_default();
    log_config.level = cli.verbosity;
    log_config.log_file_prefix = "barcodedb-ingest".to_string();

    let _guard = match init_logging(&log_config) {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("Warning: logging disabled: {:#}", e);
            None
        },
    };

    match run(&cli) {
        Ok(report) => {
            info!(
                taxa = report.normalize.taxa_inserted,
                barcodes = report.normalize.barcodes_inserted,
                "Ingestion complete"
            );
            ExitCode::SUCCESS
        },
        Err(e) => {
            error!(error = %format!("{:#}", e), "Ingestion failed");
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        },
    }
}

fn run(cli: &Cli) -> Result<PipelineReport> {
    let config = IngestConfig::builder()
        .database(&cli.database)
        .dump(&cli.tsv)
        .marker(cli.marker.clone())
        .min_length(cli.length as usize)
        .chunk_size(cli.chunk_size as usize)
        .create_indexes(!cli.no_indexes)
        .build()?;

    let mut conn = Connection::open(&config.database)
        .with_context(|| format!("Failed to open database {}", config.database.display()))?;

    let span = info_span!(
        "barcodedb_ingest",
        marker = %config.marker,
        min_length = config.min_length
    );
    let report = Pipeline::bootstrap(&mut conn, config, span)?
        .with_progress(progress::create_row_spinner("Staging rows"))
        .run()?;

    if let Some(path) = &cli.report {
        let file = std::fs::File::create(path)
            .with_context(|| format!("Failed to create report {}", path.display()))?;
        serde_json::to_writer_pretty(file, &report).context("Failed to write report")?;
        info!(path = %path.display(), "Wrote run report");
    }

    conn.close()
        .map_err(|(_, e)| e)
        .context("Failed to close database")?;
    Ok(report)
}
