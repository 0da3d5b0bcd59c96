//! Error types for BarcodeDB

use thiserror::Error;

/// Result type alias for BarcodeDB operations
pub type Result<T> = std::result::Result<T, BarcodeError>;

/// Main error type for BarcodeDB
///
/// Filter misses and join misses are never errors; they are reported as
/// counts by the loader and the normalizer.
#[derive(Error, Debug)]
pub enum BarcodeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TSV read error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Dump is missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("Invalid marker '{0}': expected a single marker code or two codes joined by '_'")]
    InvalidMarker(String),

    #[error("Unknown table '{0}'")]
    UnknownTable(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Pipeline is {actual}, operation requires {expected}")]
    InvalidStage {
        expected: &'static str,
        actual: &'static str,
    },
}

impl BarcodeError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Whether the error happened inside the storage engine
    pub fn is_storage(&self) -> bool {
        matches!(self, Self::Database(_))
    }
}
