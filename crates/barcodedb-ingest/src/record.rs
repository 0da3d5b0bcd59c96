//! Dump rows and their projections onto the staging tables
//!
//! A BOLD dump has dozens of columns; only eleven matter here. [`ColumnMap`]
//! resolves their positions once from the header, and [`DumpRow`] gives a
//! borrowed, gap-stripped view of one record that the filter and both
//! projections share.

use barcodedb_common::{BarcodeError, Result};
use csv::StringRecord;

/// Alignment gap symbol removed from every stored sequence
pub const GAP: char = '-';

/// Columns the loader needs, by exact header name
pub const REQUIRED_COLUMNS: [&str; 11] = [
    "processid",
    "marker_code",
    "kingdom",
    "species",
    "class",
    "order",
    "family",
    "genus",
    "nuc",
    "bin_uri",
    "country",
];

/// Placeholder values a tabular reader treats as missing by default
const MISSING_TOKENS: [&str; 18] = [
    "#N/A",
    "#N/A N/A",
    "#NA",
    "-1.#IND",
    "-1.#QNAN",
    "-NaN",
    "-nan",
    "1.#IND",
    "1.#QNAN",
    "<NA>",
    "N/A",
    "NA",
    "NULL",
    "NaN",
    "None",
    "n/a",
    "nan",
    "null",
];

/// Remove alignment gaps, leaving every other character in order
pub fn strip_gaps(sequence: &str) -> String {
    sequence.chars().filter(|&c| c != GAP).collect()
}

fn present(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    if trimmed.is_empty() || MISSING_TOKENS.contains(&trimmed) {
        None
    } else {
        Some(value)
    }
}

/// Positions of the required columns within a dump record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMap {
    processid: usize,
    marker_code: usize,
    kingdom: usize,
    species: usize,
    class: usize,
    order: usize,
    family: usize,
    genus: usize,
    nuc: usize,
    bin_uri: usize,
    country: usize,
}

impl ColumnMap {
    /// Resolve the required columns from the header record
    ///
    /// Fails with [`BarcodeError::MissingColumns`] naming every absent column.
    pub fn from_headers(headers: &StringRecord) -> Result<Self> {
        let positions: Vec<Option<usize>> = REQUIRED_COLUMNS
            .iter()
            .map(|&name| headers.iter().position(|h| h == name))
            .collect();

        let missing: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .zip(&positions)
            .filter(|(_, position)| position.is_none())
            .map(|(name, _)| name.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(BarcodeError::MissingColumns(missing));
        }

        // same order as REQUIRED_COLUMNS
        let at: Vec<usize> = positions.into_iter().flatten().collect();
        Ok(Self {
            processid: at[0],
            marker_code: at[1],
            kingdom: at[2],
            species: at[3],
            class: at[4],
            order: at[5],
            family: at[6],
            genus: at[7],
            nuc: at[8],
            bin_uri: at[9],
            country: at[10],
        })
    }
}

/// One dump record, restricted to the required columns
///
/// Short records are tolerated: fields past the end of the record read as
/// missing.
#[derive(Debug)]
pub struct DumpRow<'r> {
    record: &'r StringRecord,
    columns: &'r ColumnMap,
    sequence: Option<String>,
}

impl<'r> DumpRow<'r> {
    pub fn new(columns: &'r ColumnMap, record: &'r StringRecord) -> Self {
        // placeholders are recognized on the raw field, before gaps go
        let sequence = record
            .get(columns.nuc)
            .and_then(present)
            .map(strip_gaps)
            .filter(|s| !s.is_empty());
        Self {
            record,
            columns,
            sequence,
        }
    }

    fn field(&self, index: usize) -> Option<&'r str> {
        self.record.get(index).and_then(present)
    }

    pub fn marker_code(&self) -> Option<&'r str> {
        self.field(self.columns.marker_code)
    }

    pub fn kingdom(&self) -> Option<&'r str> {
        self.field(self.columns.kingdom)
    }

    pub fn species(&self) -> Option<&'r str> {
        self.field(self.columns.species)
    }

    /// Gap-stripped sequence
    pub fn sequence(&self) -> Option<&str> {
        self.sequence.as_deref()
    }

    /// Length of the gap-stripped sequence, zero when absent
    pub fn sequence_len(&self) -> usize {
        self.sequence.as_ref().map_or(0, |s| s.chars().count())
    }

    /// Project onto `taxon_temp`, or `None` if any taxon column is missing
    pub fn taxon(&self) -> Option<TaxonRow> {
        let c = self.columns;
        Some(TaxonRow {
            taxon: self.field(c.species)?.to_string(),
            kingdom: self.field(c.kingdom)?.to_string(),
            class: self.field(c.class)?.to_string(),
            ord: self.field(c.order)?.to_string(),
            family: self.field(c.family)?.to_string(),
            genus: self.field(c.genus)?.to_string(),
            bin_uri: self.field(c.bin_uri)?.to_string(),
        })
    }

    /// Project onto `barcode_temp`, or `None` if a non-nullable column is missing
    pub fn barcode(&self) -> Option<BarcodeRow> {
        let c = self.columns;
        Some(BarcodeRow {
            processid: self.field(c.processid)?.to_string(),
            marker_code: self.field(c.marker_code)?.to_string(),
            nuc: self.sequence.clone()?,
            country: self.field(c.country).map(str::to_string),
            species: self.field(c.species)?.to_string(),
            bin_uri: self.field(c.bin_uri)?.to_string(),
        })
    }
}

/// Row of `taxon_temp`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaxonRow {
    pub taxon: String,
    pub kingdom: String,
    pub class: String,
    pub ord: String,
    pub family: String,
    pub genus: String,
    pub bin_uri: String,
}

/// Row of `barcode_temp`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BarcodeRow {
    pub processid: String,
    pub marker_code: String,
    pub nuc: String,
    pub country: Option<String>,
    pub species: String,
    pub bin_uri: String,
}
