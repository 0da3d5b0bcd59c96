//! Target marker selection
//!
//! A run targets either one marker code (animal barcoding, e.g. `COI-5P`) or a
//! plant locus that BOLD splits across two marker codes, written on the
//! command line as `first_second` (e.g. `rbcL_matK`). The mode also fixes the
//! kingdom a row must belong to.

use barcodedb_common::{BarcodeError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Separator between the two codes of a composite marker
pub const COMPOSITE_SEPARATOR: char = '_';

/// Kingdom required for single-marker runs
pub const ANIMAL_KINGDOM: &str = "Animalia";

/// Kingdom required for composite-marker runs
pub const PLANT_KINGDOM: &str = "Plantae";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum MarkerSpec {
    Single { name: String },
    Composite { first: String, second: String },
}

impl MarkerSpec {
    pub fn single(name: impl Into<String>) -> Self {
        Self::Single { name: name.into() }
    }

    pub fn composite(first: impl Into<String>, second: impl Into<String>) -> Self {
        Self::Composite {
            first: first.into(),
            second: second.into(),
        }
    }

    /// Kingdom a row must carry to be kept
    pub fn kingdom(&self) -> &'static str {
        match self {
            Self::Single { .. } => ANIMAL_KINGDOM,
            Self::Composite { .. } => PLANT_KINGDOM,
        }
    }

    /// Whether `code` is one of the marker codes this run targets
    pub fn matches_code(&self, code: &str) -> bool {
        match self {
            Self::Single { name } => code == name,
            Self::Composite { first, second } => code == first || code == second,
        }
    }
}

impl FromStr for MarkerSpec {
    type Err = BarcodeError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let parts: Vec<&str> = trimmed.split(COMPOSITE_SEPARATOR).collect();

        match parts.as_slice() {
            [name] if !name.is_empty() => Ok(Self::single(*name)),
            [first, second] if !first.is_empty() && !second.is_empty() => {
                Ok(Self::composite(*first, *second))
            },
            _ => Err(BarcodeError::InvalidMarker(s.to_string())),
        }
    }
}

impl fmt::Display for MarkerSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single { name } => write!(f, "{}", name),
            Self::Composite { first, second } => {
                write!(f, "{}{}{}", first, COMPOSITE_SEPARATOR, second)
            },
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_marker() {
        let spec: MarkerSpec = "COI-5P".parse().unwrap();
        assert_eq!(spec, MarkerSpec::single("COI-5P"));
        assert_eq!(spec.kingdom(), "Animalia");
        assert_eq!(spec.to_string(), "COI-5P");
    }

    #[test]
    fn test_parse_composite_marker() {
        let spec: MarkerSpec = "rbcL_matK".parse().unwrap();
        assert_eq!(spec, MarkerSpec::composite("rbcL", "matK"));
        assert_eq!(spec.kingdom(), "Plantae");
        assert!(spec.matches_code("rbcL") && spec.matches_code("matK"));
        assert!(!spec.matches_code("rbcL_matK"));
        assert_eq!(spec.to_string(), "rbcL_matK");
    }

    #[test]
    fn test_parse_rejects_malformed_markers() {
        for bad in ["", "  ", "_matK", "rbcL_", "a_b_c", "_"] {
            assert!(
                matches!(bad.parse::<MarkerSpec>(), Err(BarcodeError::InvalidMarker(_))),
                "accepted {:?}",
                bad
            );
        }
    }

    #[test]
    fn test_matches_code_is_exact() {
        let single = MarkerSpec::single("COI-5P");
        assert!(single.matches_code("COI-5P"));
        assert!(!single.matches_code("coi-5p"));
        assert!(!single.matches_code("COI-3P"));

        let composite = MarkerSpec::composite("rbcl", "matk");
        assert!(composite.matches_code("rbcl"));
        assert!(composite.matches_code("matk"));
        assert!(!composite.matches_code("rbcl_matk"));
    }
}
