//! Unified error types for quotesheet.
//!
//! This module provides a unified error type that encompasses failures from
//! decoding, reconciliation, model extraction and persistence.

// Submodule declarations
pub mod conversions;
pub mod types;

// Re-exports
pub use types::{Error, Result};
