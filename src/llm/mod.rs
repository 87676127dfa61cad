//! Model-assisted extraction for free-form quote workbooks.
//!
//! Used when a workbook does not follow the three-sheet layout the
//! reconciler expects. The caller selects this path explicitly; the outcome
//! depends on the model and is not deterministic.

pub mod client;
pub mod error;
pub mod extractor;
pub mod prompt;
pub mod response;

#[cfg(feature = "http-client")]
pub use client::HttpCompletionClient;
pub use client::{CompletionClient, CompletionRequest};
pub use error::{CompletionError, ExtractionError};
pub use extractor::ModelExtractor;
pub use prompt::{RESPONSE_SHAPE, build_request};
pub use response::{extract_json_document, parse_quotes_response};
