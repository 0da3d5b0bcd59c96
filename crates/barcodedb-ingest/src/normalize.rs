//! Staging → permanent normalization
//!
//! Deduplicates `taxon_temp` into `taxon` on the full taxon tuple, then
//! resolves each staged barcode to its taxon through `bin_uri` and
//! deduplicates the result into `barcode`. Staged barcodes whose BIN matches
//! no taxon row fall out of the inner join; they are counted, not reported as
//! errors. Both staging tables are dropped afterwards. All statements run in
//! one transaction.

use crate::schema;
use barcodedb_common::Result;
use rusqlite::{Connection, Transaction};
use serde::Serialize;
use tracing::{info, warn, Span};

const INSERT_DISTINCT_TAXA: &str = r#"
    INSERT INTO taxon (taxon, kingdom, class, ord, family, genus, bin_uri)
    SELECT taxon, kingdom, class, ord, family, genus, bin_uri FROM taxon_temp
    EXCEPT
    SELECT taxon, kingdom, class, ord, family, genus, bin_uri FROM taxon
"#;

const INSERT_DISTINCT_BARCODES: &str = r#"
    INSERT INTO barcode (processid, marker_code, nuc, country, taxon_id)
    SELECT b.processid, b.marker_code, b.nuc, b.country, t.taxon_id
    FROM barcode_temp b
    INNER JOIN taxon t ON b.bin_uri = t.bin_uri
    EXCEPT
    SELECT processid, marker_code, nuc, country, taxon_id FROM barcode
"#;

const COUNT_DISTINCT_STAGED_BARCODES: &str = r#"
    SELECT COUNT(*) FROM (
        SELECT DISTINCT processid, marker_code, nuc, country, bin_uri FROM barcode_temp
    )
"#;

const COUNT_UNMATCHED_BARCODES: &str = r#"
    SELECT COUNT(*) FROM (
        SELECT DISTINCT processid, marker_code, nuc, country, bin_uri
        FROM barcode_temp b
        WHERE NOT EXISTS (SELECT 1 FROM taxon t WHERE t.bin_uri = b.bin_uri)
    )
"#;

/// Row counts of one normalization pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NormalizeStats {
    pub taxa_staged: u64,
    pub taxa_inserted: u64,
    pub barcodes_staged: u64,
    /// Distinct (processid, marker_code, nuc, country, bin_uri) tuples staged
    pub barcodes_distinct: u64,
    /// Distinct staged tuples whose BIN matched no taxon
    pub barcodes_unmatched: u64,
    pub barcodes_inserted: u64,
}

impl NormalizeStats {
    /// Staged barcode rows that repeated an earlier tuple
    pub fn barcodes_duplicate(&self) -> u64 {
        self.barcodes_staged.saturating_sub(self.barcodes_distinct)
    }
}

pub struct Normalizer<'c> {
    conn: &'c mut Connection,
    span: Span,
}

fn count(tx: &Transaction<'_>, sql: &str) -> Result<u64> {
    let n: i64 = tx.query_row(sql, [], |row| row.get(0))?;
    Ok(n.max(0) as u64)
}

impl<'c> Normalizer<'c> {
    pub fn new(conn: &'c mut Connection, span: Span) -> Self {
        Self { conn, span }
    }

    /// Move staged rows into `taxon` and `barcode`, then drop the staging tables
    pub fn run(&mut self) -> Result<NormalizeStats> {
        let _entered = self.span.enter();
        info!("Post-processing database");

        let tx = self.conn.transaction()?;
        let mut stats = NormalizeStats {
            taxa_staged: schema::count_rows(&tx, schema::TAXON_STAGING_TABLE)?,
            barcodes_staged: schema::count_rows(&tx, schema::BARCODE_STAGING_TABLE)?,
            barcodes_distinct: count(&tx, COUNT_DISTINCT_STAGED_BARCODES)?,
            ..NormalizeStats::default()
        };

        stats.taxa_inserted = tx.execute(INSERT_DISTINCT_TAXA, [])? as u64;

        // needs the new taxa in place
        stats.barcodes_unmatched = count(&tx, COUNT_UNMATCHED_BARCODES)?;
        stats.barcodes_inserted = tx.execute(INSERT_DISTINCT_BARCODES, [])? as u64;

        schema::drop_staging_tables(&tx)?;
        tx.commit()?;

        if stats.barcodes_unmatched > 0 {
            warn!(
                unmatched = stats.barcodes_unmatched,
                "Staged barcodes without a taxon for their BIN were dropped"
            );
        }
        info!(
            taxa_staged = stats.taxa_staged,
            taxa_inserted = stats.taxa_inserted,
            barcodes_staged = stats.barcodes_staged,
            barcodes_duplicate = stats.barcodes_duplicate(),
            barcodes_inserted = stats.barcodes_inserted,
            "Normalized staging tables"
        );
        Ok(stats)
    }
}
