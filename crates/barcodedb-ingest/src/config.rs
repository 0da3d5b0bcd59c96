//! Ingestion run configuration

use crate::loader::DEFAULT_CHUNK_SIZE;
use crate::marker::MarkerSpec;
use barcodedb_common::{BarcodeError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Settings for one pipeline run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestConfig {
    /// SQLite database file, created if absent
    pub database: PathBuf,

    /// BOLD TSV dump, optionally gzip-compressed
    pub dump: PathBuf,

    pub marker: MarkerSpec,

    /// Minimum gap-stripped sequence length
    pub min_length: usize,

    /// Dump rows per committed chunk
    pub chunk_size: usize,

    /// Build secondary indexes after normalizing
    pub create_indexes: bool,
}

impl IngestConfig {
    pub fn builder() -> IngestConfigBuilder {
        IngestConfigBuilder::default()
    }

    pub fn validate(&self) -> Result<()> {
        if self.min_length == 0 {
            return Err(BarcodeError::config("Minimum length must be a positive integer"));
        }
        if self.chunk_size == 0 {
            return Err(BarcodeError::config("Chunk size must be greater than 0"));
        }
        if self.dump.as_os_str().is_empty() {
            return Err(BarcodeError::config("Dump path cannot be empty"));
        }
        Ok(())
    }
}

/// Builder for IngestConfig
#[derive(Debug, Default)]
pub struct IngestConfigBuilder {
    database: Option<PathBuf>,
    dump: Option<PathBuf>,
    marker: Option<MarkerSpec>,
    min_length: Option<usize>,
    chunk_size: Option<usize>,
    create_indexes: Option<bool>,
}

impl IngestConfigBuilder {
    pub fn database(mut self, path: impl Into<PathBuf>) -> Self {
        self.database = Some(path.into());
        self
    }

    pub fn dump(mut self, path: impl Into<PathBuf>) -> Self {
        self.dump = Some(path.into());
        self
    }

    pub fn marker(mut self, marker: MarkerSpec) -> Self {
        self.marker = Some(marker);
        self
    }

    pub fn min_length(mut self, length: usize) -> Self {
        self.min_length = Some(length);
        self
    }

    pub fn chunk_size(mut self, size: usize) -> Self {
        self.chunk_size = Some(size);
        self
    }

    pub fn create_indexes(mut self, enabled: bool) -> Self {
        self.create_indexes = Some(enabled);
        self
    }

    /// Build and validate; database path, dump path, marker and minimum
    /// length have no defaults
    pub fn build(self) -> Result<IngestConfig> {
        let config = IngestConfig {
            database: self
                .database
                .ok_or_else(|| BarcodeError::config("Database path is required"))?,
            dump: self
                .dump
                .ok_or_else(|| BarcodeError::config("Dump path is required"))?,
            marker: self
                .marker
                .ok_or_else(|| BarcodeError::config("Marker is required"))?,
            min_length: self
                .min_length
                .ok_or_else(|| BarcodeError::config("Minimum length is required"))?,
            chunk_size: self.chunk_size.unwrap_or(DEFAULT_CHUNK_SIZE),
            create_indexes: self.create_indexes.unwrap_or(true),
        };
        config.validate()?;
        Ok(config)
    }
}
