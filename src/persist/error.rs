use thiserror::Error;

/// A persistence collaborator refused or failed a batch.
///
/// Batches are atomic: after an error nothing from the batch is visible.
#[derive(Error, Debug)]
pub enum SinkError {
    #[error("asset storage failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("batch rejected: {0}")]
    Rejected(String),
}
