//! Quote ingestion: records, the three-sheet reconciler and item helpers.

pub mod attach;
pub mod columns;
pub mod error;
pub mod reconcile;
pub mod spans;
pub mod types;
mod validate;

pub use attach::{attach_images, retain_known_images};
pub use error::{ReconciliationError, ValidationError, ValidationIssue};
pub use reconcile::{ItemsByQuote, ProcessGroups, ProcessRow, reconcile, reconcile_tables};
pub use spans::{ItemSpan, item_spans};
pub use types::{QuoteItemRecord, QuoteRecord, SupplierInfo};
