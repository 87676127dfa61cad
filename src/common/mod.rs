//! Common types and utilities shared across ingestion modes.

// Submodule declarations
pub mod detection;
pub mod error;

// Re-exports for convenience
pub use detection::{ContainerKind, detect_container};
pub use error::{Error, Result};
