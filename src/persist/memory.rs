use std::collections::HashSet;
use std::sync::RwLock;

use bytes::Bytes;
use uuid::Uuid;

use super::error::SinkError;
use super::sink::{AssetSink, RecordSink};
use crate::images::ExtractedImage;
use crate::production::{FileSnapshotRecord, ProductionOrderRecord};
use crate::quote::QuoteRecord;

/// In-memory record sink.
///
/// A batch is checked in full before anything is appended, so a rejected
/// batch leaves the stored records untouched.
#[derive(Debug, Default)]
pub struct MemorySink {
    quotes: RwLock<Vec<QuoteRecord>>,
    snapshots: RwLock<Vec<(FileSnapshotRecord, Vec<ProductionOrderRecord>)>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every quote saved so far, in save order.
    pub fn quotes(&self) -> Result<Vec<QuoteRecord>, SinkError> {
        Ok(self.quotes.read().map_err(|_| poisoned())?.clone())
    }

    /// Every snapshot saved so far with its orders.
    pub fn snapshots(
        &self,
    ) -> Result<Vec<(FileSnapshotRecord, Vec<ProductionOrderRecord>)>, SinkError> {
        Ok(self.snapshots.read().map_err(|_| poisoned())?.clone())
    }
}

fn poisoned() -> SinkError {
    SinkError::Rejected("memory sink lock poisoned".to_string())
}

impl RecordSink for MemorySink {
    fn save_quotes(&self, quotes: &[QuoteRecord]) -> Result<(), SinkError> {
        let mut numbers = HashSet::new();
        for quote in quotes {
            if !quote.quote_number.is_empty() && !numbers.insert(quote.quote_number.as_str()) {
                return Err(SinkError::Rejected(format!(
                    "quote number '{}' appears twice in one batch",
                    quote.quote_number
                )));
            }
        }

        self.quotes
            .write()
            .map_err(|_| poisoned())?
            .extend_from_slice(quotes);
        Ok(())
    }

    fn save_snapshot(
        &self,
        snapshot: &FileSnapshotRecord,
        orders: &[ProductionOrderRecord],
    ) -> Result<(), SinkError> {
        if let Some(order) = orders.iter().find(|order| order.snapshot_id != snapshot.id) {
            return Err(SinkError::Rejected(format!(
                "order at row {} belongs to another snapshot",
                order.row_number
            )));
        }

        let mut snapshots = self.snapshots.write().map_err(|_| poisoned())?;
        if snapshots.iter().any(|(saved, _)| saved.id == snapshot.id) {
            return Err(SinkError::Rejected(format!(
                "snapshot {} already saved",
                snapshot.id
            )));
        }
        snapshots.push((snapshot.clone(), orders.to_vec()));
        Ok(())
    }
}

/// In-memory asset sink naming each image `<uuid>.jpg`.
#[derive(Debug, Default)]
pub struct MemoryAssetSink {
    assets: RwLock<Vec<(String, Bytes)>>,
}

impl MemoryAssetSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored bytes by name.
    pub fn get(&self, name: &str) -> Option<Bytes> {
        self.assets
            .read()
            .ok()?
            .iter()
            .find(|(stored, _)| stored == name)
            .map(|(_, bytes)| bytes.clone())
    }

    pub fn len(&self) -> usize {
        self.assets.read().map_or(0, |assets| assets.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl AssetSink for MemoryAssetSink {
    fn store(&self, image: &ExtractedImage) -> Result<String, SinkError> {
        let name = format!("{}.jpg", Uuid::new_v4());
        self.assets
            .write()
            .map_err(|_| poisoned())?
            .push((name.clone(), image.bytes.clone()));
        Ok(name)
    }

    fn remove(&self, name: &str) -> Result<(), SinkError> {
        self.assets
            .write()
            .map_err(|_| poisoned())?
            .retain(|(stored, _)| stored != name);
        Ok(())
    }
}
