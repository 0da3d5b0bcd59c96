//! Shared helpers for integration tests
#![allow(dead_code)]

use rusqlite::Connection;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Header of a trimmed-down BOLD dump, with a few columns the loader ignores
pub const HEADER: [&str; 14] = [
    "processid",
    "sampleid",
    "marker_code",
    "kingdom",
    "phylum",
    "class",
    "order",
    "family",
    "genus",
    "species",
    "bin_uri",
    "country",
    "nuc",
    "identification_method",
];

/// One dump row, with sensible defaults for every column
#[derive(Debug, Clone)]
pub struct Specimen {
    pub processid: String,
    pub marker_code: String,
    pub kingdom: String,
    pub class: String,
    pub order: String,
    pub family: String,
    pub genus: String,
    pub species: String,
    pub bin_uri: String,
    pub country: String,
    pub nuc: String,
}

impl Specimen {
    pub fn animal(processid: &str, species: &str, bin: &str, nuc: &str) -> Self {
        Self {
            processid: processid.to_string(),
            marker_code: "COI-5P".to_string(),
            kingdom: "Animalia".to_string(),
            class: "Insecta".to_string(),
            order: "Diptera".to_string(),
            family: "Muscidae".to_string(),
            genus: species.split(' ').next().unwrap_or_default().to_string(),
            species: species.to_string(),
            bin_uri: bin.to_string(),
            country: "Canada".to_string(),
            nuc: nuc.to_string(),
        }
    }

    pub fn plant(processid: &str, marker: &str, species: &str, bin: &str, nuc: &str) -> Self {
        Self {
            marker_code: marker.to_string(),
            kingdom: "Plantae".to_string(),
            class: "Magnoliopsida".to_string(),
            order: "Rosales".to_string(),
            family: "Rosaceae".to_string(),
            ..Self::animal(processid, species, bin, nuc)
        }
    }

    pub fn to_line(&self) -> String {
        [
            self.processid.as_str(),
            "SAMPLE",
            &self.marker_code,
            &self.kingdom,
            "Phylum",
            &self.class,
            &self.order,
            &self.family,
            &self.genus,
            &self.species,
            &self.bin_uri,
            &self.country,
            &self.nuc,
            "morphology",
        ]
        .join("\t")
    }
}

pub fn write_dump(dir: &Path, specimens: &[Specimen]) -> PathBuf {
    let path = dir.join("bold_data.tsv");
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(file, "{}", HEADER.join("\t")).unwrap();
    for specimen in specimens {
        writeln!(file, "{}", specimen.to_line()).unwrap();
    }
    path
}

pub fn table_names(conn: &Connection) -> Vec<String> {
    let mut stmt = conn
        .prepare("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")
        .unwrap();
    stmt.query_map([], |row| row.get(0))
        .unwrap()
        .collect::<Result<Vec<_>, _>>()
        .unwrap()
}

pub fn count(conn: &Connection, table: &str) -> i64 {
    conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| row.get(0))
        .unwrap()
}

/// Taxon tuples without their surrogate ids, sorted
pub fn taxa(conn: &Connection) -> Vec<(String, String, String)> {
    let mut stmt = conn
        .prepare("SELECT taxon, kingdom, bin_uri FROM taxon ORDER BY taxon, bin_uri")
        .unwrap();
    stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)))
        .unwrap()
        .collect::<Result<Vec<_>, _>>()
        .unwrap()
}

/// Barcodes joined to their taxon name, sorted; independent of surrogate ids
pub fn barcodes(conn: &Connection) -> Vec<(String, String, String, String)> {
    let mut stmt = conn
        .prepare(
            "SELECT b.processid, b.marker_code, b.nuc, t.taxon
             FROM barcode b JOIN taxon t ON b.taxon_id = t.taxon_id
             ORDER BY b.processid, b.nuc, t.taxon",
        )
        .unwrap();
    stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)))
        .unwrap()
        .collect::<Result<Vec<_>, _>>()
        .unwrap()
}
