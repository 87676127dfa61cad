//! Error conversion implementations.
//!
//! This module contains From trait implementations to convert module-level
//! errors that do not map one-to-one onto a variant of the unified Error type.

use super::types::Error;

impl From<crate::production::SheetNotFoundError> for Error {
    fn from(err: crate::production::SheetNotFoundError) -> Self {
        Error::SheetNotFound { sheet: err.sheet }
    }
}

impl From<crate::quote::ReconciliationError> for Error {
    fn from(err: crate::quote::ReconciliationError) -> Self {
        match err {
            crate::quote::ReconciliationError::MissingSheet { sheet } => {
                Error::SheetNotFound { sheet }
            },
        }
    }
}
