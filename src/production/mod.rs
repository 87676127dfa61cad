//! Production-plan ingestion.
//!
//! A production plan is a single sheet with a fixed column layout. Rows are
//! classified by position and text markers, never by header names, and every
//! field is carried as raw text. [`ProductionOrderRecord::normalized`] parses
//! quantities and dates on demand.

pub mod classify;
pub mod error;
pub mod layout;
pub mod normalize;
pub mod types;

pub use classify::{classify, classify_row, parse_production_plan};
pub use error::SheetNotFoundError;
pub use normalize::NormalizedOrder;
pub use types::{FileSnapshotRecord, ProductionOrderRecord, ProductionPlan, RowType};
