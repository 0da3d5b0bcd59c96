//! Streaming filter-loader
//!
//! Reads a dump chunk by chunk, keeps the rows the [`RowFilter`] accepts and
//! appends their projections to `taxon_temp` and `barcode_temp`. Every chunk
//! is committed in its own transaction before the next one is read, so an
//! abort leaves the staging tables holding exactly the committed chunks.

use crate::filter::{RejectionCounts, RowFilter};
use crate::reader::{open_dump, ChunkedReader};
use crate::record::{ColumnMap, DumpRow};
use crate::schema;
use barcodedb_common::Result;
use csv::StringRecord;
use indicatif::ProgressBar;
use rusqlite::{params, Connection};
use serde::Serialize;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info, Span};

/// Default number of dump rows held in memory at once
pub const DEFAULT_CHUNK_SIZE: usize = 10_000;

const INSERT_TAXON: &str = "INSERT INTO taxon_temp (taxon, kingdom, class, ord, family, genus, bin_uri)
     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)";

const INSERT_BARCODE: &str = "INSERT INTO barcode_temp (processid, marker_code, nuc, country, species, bin_uri)
     VALUES (?1, ?2, ?3, ?4, ?5, ?6)";

/// What the loader read, kept and dropped
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadStats {
    pub rows_read: u64,
    /// Rows the TSV reader could not decode
    pub rows_malformed: u64,
    pub chunks: u64,
    /// Rows accepted by the filter predicate
    pub rows_kept: u64,
    pub rejected: RejectionCounts,
    pub taxa_staged: u64,
    /// Kept rows missing a taxon column
    pub taxa_incomplete: u64,
    pub barcodes_staged: u64,
    /// Kept rows missing a non-nullable barcode column
    pub barcodes_incomplete: u64,
}

pub struct StagingLoader<'c> {
    conn: &'c mut Connection,
    filter: RowFilter,
    chunk_size: usize,
    progress: ProgressBar,
    span: Span,
}

impl<'c> StagingLoader<'c> {
    pub fn new(conn: &'c mut Connection, filter: RowFilter, chunk_size: usize, span: Span) -> Self {
        Self {
            conn,
            filter,
            chunk_size: chunk_size.max(1),
            progress: ProgressBar::hidden(),
            span,
        }
    }

    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = progress;
        self
    }

    /// Stage the dump at `path`
    pub fn load_path(&mut self, path: &Path) -> Result<LoadStats> {
        let span = self.span.clone();
        let _entered = span.enter();

        info!(
            path = %path.display(),
            marker = %self.filter.marker(),
            min_length = self.filter.min_length(),
            chunk_size = self.chunk_size,
            "Importing dump"
        );
        let source = open_dump(path)?;
        self.stage(source)
    }

    /// Stage a dump read from an arbitrary source
    pub fn load_reader<R: Read>(&mut self, source: R) -> Result<LoadStats> {
        let span = self.span.clone();
        let _entered = span.enter();
        self.stage(source)
    }

    fn stage<R: Read>(&mut self, source: R) -> Result<LoadStats> {
        let mut reader = ChunkedReader::new(source, self.chunk_size)?;
        let columns = ColumnMap::from_headers(reader.headers())?;

        schema::create_staging_tables(self.conn)?;

        let mut stats = LoadStats::default();
        while let Some(chunk) = reader.next_chunk()? {
            self.stage_chunk(&columns, &chunk, &mut stats)?;
            stats.chunks += 1;
            self.progress.inc(chunk.len() as u64);
            debug!(
                chunk = stats.chunks,
                rows = chunk.len(),
                rows_read = stats.rows_read,
                rows_kept = stats.rows_kept,
                "Committed chunk"
            );
        }
        stats.rows_malformed = reader.malformed();
        self.progress.finish_and_clear();

        info!(
            rows_read = stats.rows_read,
            rows_kept = stats.rows_kept,
            rows_rejected = stats.rejected.total(),
            rows_malformed = stats.rows_malformed,
            taxa_staged = stats.taxa_staged,
            taxa_incomplete = stats.taxa_incomplete,
            barcodes_staged = stats.barcodes_staged,
            barcodes_incomplete = stats.barcodes_incomplete,
            "Dump staged"
        );
        Ok(stats)
    }

    fn stage_chunk(
        &mut self,
        columns: &ColumnMap,
        chunk: &[StringRecord],
        stats: &mut LoadStats,
    ) -> Result<()> {
        let tx = self.conn.transaction()?;
        {
            let mut insert_taxon = tx.prepare_cached(INSERT_TAXON)?;
            let mut insert_barcode = tx.prepare_cached(INSERT_BARCODE)?;

            for record in chunk {
                stats.rows_read += 1;
                let row = DumpRow::new(columns, record);

                if let Some(rejection) = self.filter.rejection(&row) {
                    stats.rejected.record(rejection);
                    continue;
                }
                stats.rows_kept += 1;

                match row.taxon() {
                    Some(t) => {
                        insert_taxon.execute(params![
                            t.taxon, t.kingdom, t.class, t.ord, t.family, t.genus, t.bin_uri
                        ])?;
                        stats.taxa_staged += 1;
                    },
                    None => stats.taxa_incomplete += 1,
                }

                match row.barcode() {
                    Some(b) => {
                        insert_barcode.execute(params![
                            b.processid,
                            b.marker_code,
                            b.nuc,
                            b.country,
                            b.species,
                            b.bin_uri
                        ])?;
                        stats.barcodes_staged += 1;
                    },
                    None => stats.barcodes_incomplete += 1,
                }
            }
        }
        tx.commit()?;
        Ok(())
    }
}
