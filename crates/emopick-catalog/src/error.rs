//! Error type for catalog loading.
//!
//! Lenient parsing means most source-data oddities are not errors at
//! all (see [`crate::builder`]); the failures that remain are the
//! ones a caller genuinely needs to hear about. Contract violations
//! (querying before `load`) are panics, not variants here.

use std::fmt;
use std::io;

/// Errors from building the catalog or applying annotation overlays.
#[derive(Debug)]
pub enum CatalogError {
    /// The catalog source text could not be read from the store.
    MissingCatalogSource { file_name: String },
    /// An annotation resource exists but could not be read or
    /// parsed. A *missing* resource is skipped silently; a corrupt
    /// one indicates a packaging defect and fails the load.
    CorruptResource {
        file_name: String,
        detail: String,
    },
    /// Strict parse mode only: a line looked like a data row but was
    /// malformed. Lenient mode reclassifies such lines as comments.
    StrictParse {
        line_number: usize,
        line: String,
    },
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingCatalogSource { file_name } => {
                write!(f, "catalog source '{file_name}' is missing")
            }
            Self::CorruptResource { file_name, detail } => {
                write!(f, "annotation resource '{file_name}' is corrupt: {detail}")
            }
            Self::StrictParse { line_number, line } => {
                write!(f, "malformed data row at line {line_number}: {line:?}")
            }
        }
    }
}

impl std::error::Error for CatalogError {}

impl CatalogError {
    pub(crate) fn corrupt(file_name: &str, err: &dyn fmt::Display) -> Self {
        Self::CorruptResource {
            file_name: file_name.to_string(),
            detail: err.to_string(),
        }
    }

    pub(crate) fn unreadable(file_name: &str, err: &io::Error) -> Self {
        Self::CorruptResource {
            file_name: file_name.to_string(),
            detail: err.to_string(),
        }
    }
}
