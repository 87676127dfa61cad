//! Collaborator traits for record and asset persistence.
//!
//! Records are handed over as plain data, one call per logical entity group.
//! Storage engines, schemas and deduplication are the implementor's concern.

use super::error::SinkError;
use crate::images::ExtractedImage;
use crate::production::{FileSnapshotRecord, ProductionOrderRecord};
use crate::quote::QuoteRecord;

/// Durable storage for ingested records.
///
/// Each call is one transaction: all records are written or none are.
pub trait RecordSink: Send + Sync {
    /// Persist quotes together with their nested items.
    fn save_quotes(&self, quotes: &[QuoteRecord]) -> Result<(), SinkError>;

    /// Persist one snapshot and every order parsed from it.
    fn save_snapshot(
        &self,
        snapshot: &FileSnapshotRecord,
        orders: &[ProductionOrderRecord],
    ) -> Result<(), SinkError>;
}

/// Storage for extracted image bytes.
pub trait AssetSink: Send + Sync {
    /// Store one image under a generated unique name and return that name.
    fn store(&self, image: &ExtractedImage) -> Result<String, SinkError>;

    /// Delete an asset returned by [`AssetSink::store`]. Unknown names are
    /// not an error.
    fn remove(&self, name: &str) -> Result<(), SinkError>;
}
