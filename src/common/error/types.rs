//! Unified error types for quotesheet.
//!
//! Each ingestion stage has its own error enum; this module folds them into a
//! single [`Error`] so callers can match on the failure category without
//! depending on module internals.
use thiserror::Error;

use crate::llm::ExtractionError;
use crate::persist::SinkError;
use crate::quote::ValidationError;
use crate::sheet::DecodeError;

/// Main error type for quotesheet operations.
#[derive(Error, Debug)]
pub enum Error {
    /// The uploaded bytes are not a readable spreadsheet container
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// A sheet required by the ingestion mode is absent
    #[error("expected sheet '{sheet}' not found")]
    SheetNotFound { sheet: String },

    /// The model-assisted path could not produce a valid result
    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    /// A quote failed submission checks
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The persistence or asset collaborator refused the batch
    #[error(transparent)]
    Sink(#[from] SinkError),

    /// Options could not be loaded
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Result type for quotesheet operations.
pub type Result<T> = std::result::Result<T, Error>;
