//! SQLite schema for the barcode database

use barcodedb_common::{BarcodeError, Result};
use rusqlite::{Connection, OptionalExtension};
use tracing::info;

pub const TAXON_TABLE: &str = "taxon";
pub const BARCODE_TABLE: &str = "barcode";
pub const TAXON_STAGING_TABLE: &str = "taxon_temp";
pub const BARCODE_STAGING_TABLE: &str = "barcode_temp";

const TABLES: [&str; 4] = [
    TAXON_TABLE,
    BARCODE_TABLE,
    TAXON_STAGING_TABLE,
    BARCODE_STAGING_TABLE,
];

/// Create the permanent `taxon` and `barcode` tables if they do not exist
pub fn init_schema(conn: &mut Connection) -> Result<()> {
    info!("Initializing database schema");

    let tx = conn.transaction()?;

    // opentol_id is filled in by a later name-matching stage
    tx.execute(
        r#"
        CREATE TABLE IF NOT EXISTS taxon (
            taxon_id INTEGER PRIMARY KEY,
            taxon TEXT NOT NULL,
            kingdom TEXT NOT NULL,
            ord TEXT NOT NULL,
            class TEXT NOT NULL,
            family TEXT NOT NULL,
            genus TEXT NOT NULL,
            bin_uri TEXT NOT NULL,
            opentol_id INTEGER
        )
        "#,
        [],
    )?;

    tx.execute(
        r#"
        CREATE TABLE IF NOT EXISTS barcode (
            barcode_id INTEGER PRIMARY KEY,
            processid TEXT NOT NULL,
            marker_code TEXT NOT NULL,
            nuc TEXT NOT NULL,
            country TEXT,
            taxon_id INTEGER NOT NULL,
            FOREIGN KEY (taxon_id) REFERENCES taxon(taxon_id)
        )
        "#,
        [],
    )?;

    tx.commit()?;
    Ok(())
}

/// Create empty staging tables, discarding any left behind by an aborted run
pub fn create_staging_tables(conn: &Connection) -> Result<()> {
    drop_staging_tables(conn)?;

    conn.execute(
        r#"
        CREATE TABLE taxon_temp (
            taxon TEXT,
            kingdom TEXT,
            class TEXT,
            ord TEXT,
            family TEXT,
            genus TEXT,
            bin_uri TEXT
        )
        "#,
        [],
    )?;

    conn.execute(
        r#"
        CREATE TABLE barcode_temp (
            processid TEXT,
            marker_code TEXT,
            nuc TEXT,
            country TEXT,
            species TEXT,
            bin_uri TEXT
        )
        "#,
        [],
    )?;

    Ok(())
}

pub fn drop_staging_tables(conn: &Connection) -> Result<()> {
    conn.execute("DROP TABLE IF EXISTS taxon_temp", [])?;
    conn.execute("DROP TABLE IF EXISTS barcode_temp", [])?;
    Ok(())
}

/// Secondary indexes used by the downstream matching queries
const INDEXES: [(&str, &str, &str); 10] = [
    ("class_idx", "taxon", "class"),
    ("ord_idx", "taxon", "ord"),
    ("family_idx", "taxon", "family"),
    ("genus_idx", "taxon", "genus"),
    ("bin_uri_idx", "taxon", "bin_uri"),
    ("opentol_id_idx", "taxon", "opentol_id"),
    ("taxon_id_idx", "barcode", "taxon_id"),
    ("country_idx", "barcode", "country"),
    ("nuc_idx", "barcode", "nuc"),
    ("processid_idx", "barcode", "processid"),
];

/// Create the secondary indexes if they do not exist
pub fn create_indexes(conn: &mut Connection) -> Result<()> {
    info!(count = INDEXES.len(), "Creating secondary indexes");

    let tx = conn.transaction()?;
    for (name, table, column) in INDEXES {
        tx.execute(
            &format!("CREATE INDEX IF NOT EXISTS {} ON {} ({})", name, table, column),
            [],
        )?;
    }
    tx.commit()?;
    Ok(())
}

pub fn table_exists(conn: &Connection, name: &str) -> Result<bool> {
    let found = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1",
            [name],
            |_| Ok(()),
        )
        .optional()?;
    Ok(found.is_some())
}

/// Row count of one of the schema's own tables
pub(crate) fn count_rows(conn: &Connection, table: &str) -> Result<u64> {
    if !TABLES.contains(&table) {
        return Err(BarcodeError::UnknownTable(table.to_string()));
    }
    let count: i64 = conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| {
        row.get(0)
    })?;
    Ok(count.max(0) as u64)
}
