//! BarcodeDB Ingest Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Converts a BOLD barcode data dump into a normalized SQLite schema: a
//! `taxon` table, and a `barcode` table whose rows reference it.
//!
//! # Stages
//!
//! - **Bootstrap** ([`schema`]): create `taxon` and `barcode` if absent
//! - **Ingest** ([`loader`]): stream the dump in chunks, filter rows by marker,
//!   kingdom, sequence length and species, append projections to the
//!   `taxon_temp` / `barcode_temp` staging tables
//! - **Normalize** ([`normalize`]): deduplicate the staging tables into the
//!   permanent ones, joining barcodes to taxa on their BIN, then drop staging
//!
//! [`pipeline::Pipeline`] sequences the three.
//!
//! # Example
//!
//! ```no_run
//! use barcodedb_ingest::{IngestConfig, MarkerSpec, Pipeline};
//! use rusqlite::Connection;
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = IngestConfig::builder()
//!         .database("bold.db")
//!         .dump("bold_data.tsv")
//!         .marker("COI-5P".parse::<MarkerSpec>()?)
//!         .min_length(600)
//!         .build()?;
//!
//!     let mut conn = Connection::open(&config.database)?;
//!     let span = tracing::info_span!("ingest", marker = %config.marker);
//!     let report = Pipeline::bootstrap(&mut conn, config, span)?.run()?;
//!     println!("{} barcodes", report.normalize.barcodes_inserted);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod filter;
pub mod loader;
pub mod marker;
pub mod normalize;
pub mod pipeline;
pub mod progress;
pub mod reader;
pub mod record;
pub mod schema;

// Re-export commonly used types
pub use config::IngestConfig;
pub use filter::{Rejection, RowFilter};
pub use loader::{LoadStats, StagingLoader};
pub use marker::MarkerSpec;
pub use normalize::{NormalizeStats, Normalizer};
pub use pipeline::{Pipeline, PipelineReport, PipelineStage};
