use std::time::Duration;

use thiserror::Error;

/// Failure reported by a completion transport.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompletionError {
    #[error("completion transport failed: {0}")]
    Transport(String),

    #[error("completion endpoint returned status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("completion response carried no message content")]
    EmptyResponse,
}

/// The model-assisted path could not produce quotes.
///
/// Zero quotes is a successful empty result, never one of these.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    #[error(transparent)]
    Client(#[from] CompletionError),

    #[error("sheet {sheet:?} has {rows} filled rows, over the limit of {limit}")]
    SheetTooLarge {
        sheet: String,
        rows: usize,
        limit: usize,
    },

    #[error("model completion timed out after {0:?}")]
    Timeout(Duration),

    #[error("model response contains no JSON document")]
    NoDocument,

    #[error("model response is not valid JSON: {0}")]
    Parse(String),

    #[error("model response failed validation at {path}: {message}")]
    Schema { path: String, message: String },
}

impl ExtractionError {
    pub(crate) fn schema(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Schema {
            path: path.into(),
            message: message.into(),
        }
    }
}
