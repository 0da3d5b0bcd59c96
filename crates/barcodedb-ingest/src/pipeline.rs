//! Bootstrap → ingest → normalize sequencing
//!
//! The pipeline owns the stage of a run and refuses operations out of order,
//! so ingestion and normalization can never interleave. Any failure leaves the
//! pipeline in [`PipelineStage::Failed`].

use crate::config::IngestConfig;
use crate::filter::RowFilter;
use crate::loader::{LoadStats, StagingLoader};
use crate::marker::MarkerSpec;
use crate::normalize::{NormalizeStats, Normalizer};
use crate::schema;
use barcodedb_common::{BarcodeError, Result};
use indicatif::ProgressBar;
use rusqlite::Connection;
use serde::Serialize;
use std::fmt;
use tracing::{info, info_span, Span};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    Bootstrapped,
    /// Loading; stays here once ingestion completes until normalization starts
    Ingesting,
    Normalizing,
    Done,
    Failed,
}

impl PipelineStage {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Bootstrapped => "bootstrapped",
            Self::Ingesting => "ingesting",
            Self::Normalizing => "normalizing",
            Self::Done => "done",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a complete run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PipelineReport {
    pub marker: MarkerSpec,
    pub min_length: usize,
    pub load: LoadStats,
    pub normalize: NormalizeStats,
}

pub struct Pipeline<'c> {
    conn: &'c mut Connection,
    config: IngestConfig,
    stage: PipelineStage,
    progress: ProgressBar,
    span: Span,
}

impl<'c> Pipeline<'c> {
    /// Validate `config` and create the permanent schema
    ///
    /// `span` is the logging context every stage records into; it is owned by
    /// the caller.
    pub fn bootstrap(conn: &'c mut Connection, config: IngestConfig, span: Span) -> Result<Self> {
        config.validate()?;
        {
            let _entered = span.enter();
            schema::init_schema(conn)?;
        }

        Ok(Self {
            conn,
            config,
            stage: PipelineStage::Bootstrapped,
            progress: ProgressBar::hidden(),
            span,
        })
    }

    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = progress;
        self
    }

    pub fn stage(&self) -> PipelineStage {
        self.stage
    }

    pub fn config(&self) -> &IngestConfig {
        &self.config
    }

    fn require(&self, expected: PipelineStage) -> Result<()> {
        if self.stage == expected {
            Ok(())
        } else {
            Err(BarcodeError::InvalidStage {
                expected: expected.as_str(),
                actual: self.stage.as_str(),
            })
        }
    }

    fn settle<T>(&mut self, result: Result<T>) -> Result<T> {
        if result.is_err() {
            self.stage = PipelineStage::Failed;
        }
        result
    }

    /// Stream the dump into the staging tables
    pub fn ingest(&mut self) -> Result<LoadStats> {
        self.require(PipelineStage::Bootstrapped)?;
        self.stage = PipelineStage::Ingesting;

        let filter = RowFilter::new(self.config.marker.clone(), self.config.min_length);
        let span = info_span!(parent: &self.span, "ingest");
        let result = StagingLoader::new(self.conn, filter, self.config.chunk_size, span)
            .with_progress(self.progress.clone())
            .load_path(&self.config.dump);

        self.settle(result)
    }

    /// Normalize the staged rows; requires a completed ingestion
    pub fn normalize(&mut self) -> Result<NormalizeStats> {
        self.require(PipelineStage::Ingesting)?;
        self.stage = PipelineStage::Normalizing;

        let span = info_span!(parent: &self.span, "normalize");
        let result = Normalizer::new(self.conn, span.clone()).run();
        let stats = self.settle(result)?;

        if self.config.create_indexes {
            let result = {
                let _entered = span.enter();
                schema::create_indexes(self.conn)
            };
            self.settle(result)?;
        }

        self.stage = PipelineStage::Done;
        Ok(stats)
    }

    /// Ingest and normalize in one go
    pub fn run(mut self) -> Result<PipelineReport> {
        let load = self.ingest()?;
        let normalize = self.normalize()?;

        let _entered = self.span.enter();
        info!(
            taxa = normalize.taxa_inserted,
            barcodes = normalize.barcodes_inserted,
            "Pipeline complete"
        );

        Ok(PipelineReport {
            marker: self.config.marker.clone(),
            min_length: self.config.min_length,
            load,
            normalize,
        })
    }
}
