//! Chunked TSV reading
//!
//! Dumps are tab-separated with quoting disabled, since BOLD fields may
//! contain stray quote characters. Records are handed out in chunks of at most
//! `chunk_size`, so peak memory is bounded by one chunk regardless of dump
//! size.

use barcodedb_common::Result;
use csv::{ReaderBuilder, StringRecord};
use flate2::read::MultiGzDecoder;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::{debug, warn};

/// Open a dump file, transparently decompressing `.gz` files
pub fn open_dump(path: &Path) -> Result<Box<dyn Read>> {
    let file = BufReader::new(File::open(path)?);
    let is_gzip = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("gz"));

    if is_gzip {
        debug!(path = %path.display(), "Reading gzip-compressed dump");
        Ok(Box::new(MultiGzDecoder::new(file)))
    } else {
        Ok(Box::new(file))
    }
}

pub struct ChunkedReader<R: Read> {
    reader: csv::Reader<R>,
    headers: StringRecord,
    chunk_size: usize,
    line: u64,
    malformed: u64,
    finished: bool,
}

impl<R: Read> ChunkedReader<R> {
    /// Wrap `source`, reading its header row immediately
    pub fn new(source: R, chunk_size: usize) -> Result<Self> {
        let mut reader = ReaderBuilder::new()
            .delimiter(b'\t')
            .quoting(false)
            .flexible(true)
            .has_headers(true)
            .from_reader(source);
        let headers = reader.headers()?.clone();

        Ok(Self {
            reader,
            headers,
            chunk_size: chunk_size.max(1),
            line: 1,
            malformed: 0,
            finished: false,
        })
    }

    pub fn headers(&self) -> &StringRecord {
        &self.headers
    }

    /// Records skipped because they could not be decoded
    pub fn malformed(&self) -> u64 {
        self.malformed
    }

    /// Next chunk of records, or `None` once the input is exhausted
    ///
    /// Undecodable records are skipped and counted; I/O failures are returned
    /// as errors.
    pub fn next_chunk(&mut self) -> Result<Option<Vec<StringRecord>>> {
        if self.finished {
            return Ok(None);
        }

        let mut chunk = Vec::with_capacity(self.chunk_size);
        let mut record = StringRecord::new();

        while chunk.len() < self.chunk_size {
            self.line += 1;
            match self.reader.read_record(&mut record) {
                Ok(true) => chunk.push(record.clone()),
                Ok(false) => {
                    self.finished = true;
                    break;
                },
                Err(e) if matches!(e.kind(), csv::ErrorKind::Io(_)) => return Err(e.into()),
                Err(e) => {
                    self.malformed += 1;
                    warn!(line = self.line, error = %e, "Skipping malformed dump row");
                },
            }
        }

        if chunk.is_empty() && self.finished {
            Ok(None)
        } else {
            Ok(Some(chunk))
        }
    }
}
