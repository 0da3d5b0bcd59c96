//! Row filter predicate
//!
//! A row is kept when its marker code is one the run targets, its kingdom
//! matches the marker mode, its gap-stripped sequence is at least the minimum
//! length, and it names a species. The two marker modes differ only in the
//! marker-code test and the kingdom.

use crate::marker::MarkerSpec;
use crate::record::DumpRow;
use serde::Serialize;

/// First predicate condition a row failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    WrongMarker,
    WrongKingdom,
    TooShort,
    MissingSpecies,
}

/// Rejected row counts, by reason
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RejectionCounts {
    pub wrong_marker: u64,
    pub wrong_kingdom: u64,
    pub too_short: u64,
    pub missing_species: u64,
}

impl RejectionCounts {
    pub fn record(&mut self, rejection: Rejection) {
        match rejection {
            Rejection::WrongMarker => self.wrong_marker += 1,
            Rejection::WrongKingdom => self.wrong_kingdom += 1,
            Rejection::TooShort => self.too_short += 1,
            Rejection::MissingSpecies => self.missing_species += 1,
        }
    }

    pub fn total(&self) -> u64 {
        self.wrong_marker + self.wrong_kingdom + self.too_short + self.missing_species
    }
}

#[derive(Debug, Clone)]
pub struct RowFilter {
    marker: MarkerSpec,
    min_length: usize,
}

impl RowFilter {
    pub fn new(marker: MarkerSpec, min_length: usize) -> Self {
        Self { marker, min_length }
    }

    pub fn marker(&self) -> &MarkerSpec {
        &self.marker
    }

    pub fn min_length(&self) -> usize {
        self.min_length
    }

    /// Why `row` is excluded, or `None` if it is kept
    pub fn rejection(&self, row: &DumpRow<'_>) -> Option<Rejection> {
        if !row.marker_code().is_some_and(|code| self.marker.matches_code(code)) {
            return Some(Rejection::WrongMarker);
        }
        if row.kingdom() != Some(self.marker.kingdom()) {
            return Some(Rejection::WrongKingdom);
        }
        if row.sequence_len() < self.min_length {
            return Some(Rejection::TooShort);
        }
        if row.species().is_none() {
            return Some(Rejection::MissingSpecies);
        }
        None
    }
}
