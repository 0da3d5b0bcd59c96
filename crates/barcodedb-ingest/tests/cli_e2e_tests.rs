//! End-to-end tests for the barcodedb-ingest binary
//!
//! These validate argument handling, exit codes and the files a run leaves
//! behind.

mod common;

use assert_cmd::Command;
use common::{count, write_dump, Specimen};
use predicates::prelude::*;
use rusqlite::Connection;
use tempfile::TempDir;

fn ingest(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("barcodedb-ingest").unwrap();
    cmd.current_dir(dir.path())
        .env_remove("BARCODEDB_CHUNK_SIZE")
        .env_remove("LOG_OUTPUT")
        .env_remove("LOG_FORMAT")
        .env_remove("LOG_FILTER")
        .env_remove("LOG_LEVEL")
        .env_remove("RUST_LOG");
    cmd
}

fn fixture(dir: &TempDir) -> std::path::PathBuf {
    write_dump(
        dir.path(),
        &[
            Specimen::animal("P1", "Musca domestica", "BOLD:AAA0001", "AC-GT"),
            Specimen::animal("P2", "Musca domestica", "BOLD:AAA0001", "ACGTT"),
            Specimen::animal("P3", "Aedes aegypti", "BOLD:AAB0002", "AC"),
        ],
    )
}

#[test]
fn test_ingest_writes_database() {
    let dir = TempDir::new().unwrap();
    let dump = fixture(&dir);
    let db = dir.path().join("bold.db");

    ingest(&dir)
        .arg("-d")
        .arg(&db)
        .arg("-t")
        .arg(&dump)
        .args(["-m", "COI-5P", "-l", "4", "-v", "INFO"])
        .assert()
        .success();

    let conn = Connection::open(&db).unwrap();
    assert_eq!(count(&conn, "taxon"), 1);
    assert_eq!(count(&conn, "barcode"), 2);

    let indexes: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'index' AND name = 'bin_uri_idx'",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(indexes, 1);
}

#[test]
fn test_ingest_writes_json_report() {
    let dir = TempDir::new().unwrap();
    let dump = fixture(&dir);
    let report = dir.path().join("report.json");

    ingest(&dir)
        .args(["--database", "bold.db", "--tsv"])
        .arg(&dump)
        .args(["--marker", "COI-5P", "--length", "4", "--verbosity", "warning"])
        .arg("--report")
        .arg(&report)
        .arg("--no-indexes")
        .assert()
        .success();

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&report).unwrap()).unwrap();
    assert_eq!(json["marker"]["mode"], "single");
    assert_eq!(json["min_length"], 4);
    assert_eq!(json["load"]["rows_read"], 3);
    assert_eq!(json["load"]["rejected"]["too_short"], 1);
    assert_eq!(json["normalize"]["barcodes_inserted"], 2);

    let conn = Connection::open(dir.path().join("bold.db")).unwrap();
    let indexes: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'index' AND name = 'bin_uri_idx'",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(indexes, 0);
}

#[test]
fn test_verbosity_flag_wins_over_rust_log() {
    let dir = TempDir::new().unwrap();
    let dump = fixture(&dir);

    ingest(&dir)
        .env("RUST_LOG", "error")
        .args(["-d", "bold.db", "-t"])
        .arg(&dump)
        .args(["-m", "COI-5P", "-l", "4", "-v", "DEBUG"])
        .assert()
        .success()
        .stderr(predicate::str::contains("DEBUG").and(predicate::str::contains("Committed chunk")));
}

#[test]
fn test_missing_required_flag_is_usage_error() {
    let dir = TempDir::new().unwrap();
    let dump = fixture(&dir);

    ingest(&dir)
        .args(["-d", "bold.db", "-t"])
        .arg(&dump)
        .args(["-m", "COI-5P", "-v", "INFO"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--length"));

    assert!(!dir.path().join("bold.db").exists());
}

#[test]
fn test_rejects_malformed_marker() {
    let dir = TempDir::new().unwrap();
    let dump = fixture(&dir);

    ingest(&dir)
        .args(["-d", "bold.db", "-t"])
        .arg(&dump)
        .args(["-m", "rbcL_matK_ITS2", "-l", "4", "-v", "INFO"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("marker"));
}

#[test]
fn test_rejects_unknown_verbosity() {
    let dir = TempDir::new().unwrap();
    let dump = fixture(&dir);

    ingest(&dir)
        .args(["-d", "bold.db", "-t"])
        .arg(&dump)
        .args(["-m", "COI-5P", "-l", "4", "-v", "LOUD"])
        .assert()
        .code(2);
}

#[test]
fn test_rejects_zero_chunk_size_from_env() {
    let dir = TempDir::new().unwrap();
    let dump = fixture(&dir);

    ingest(&dir)
        .env("BARCODEDB_CHUNK_SIZE", "0")
        .args(["-d", "bold.db", "-t"])
        .arg(&dump)
        .args(["-m", "COI-5P", "-l", "4", "-v", "INFO"])
        .assert()
        .code(2);
}

#[test]
fn test_missing_dump_fails() {
    let dir = TempDir::new().unwrap();

    ingest(&dir)
        .args(["-d", "bold.db", "-t", "absent.tsv"])
        .args(["-m", "COI-5P", "-l", "4", "-v", "ERROR"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Error:"));
}
