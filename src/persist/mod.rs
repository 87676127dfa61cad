//! Handing ingested records and images to storage collaborators.

pub mod directory;
pub mod error;
pub mod memory;
pub mod sink;

pub use directory::DirectoryAssetSink;
pub use error::SinkError;
pub use memory::{MemoryAssetSink, MemorySink};
pub use sink::{AssetSink, RecordSink};
