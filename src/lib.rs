//! Quotesheet - spreadsheet ingestion for quote and production-plan workbooks
//!
//! This library turns uploaded spreadsheet bytes into typed, persistence-ready
//! records. Workbooks may be password protected; decryption is attempted first
//! and the plain buffer is the fallback.
//!
//! # Features
//!
//! - **Workbook decoding**: .xlsx/.xls/.xlsb/.ods through calamine, with
//!   MS-OFFCRYPTO Agile and Standard 2007 decryption
//! - **Quote reconciliation**: joins the quote, item and process sheets into
//!   quotes with process-expanded line items and computed totals
//! - **Production plans**: positional row classification into data rows and
//!   section dividers under one immutable snapshot
//! - **Embedded images**: JPEG signature scanning of the raw upload
//! - **Model-assisted extraction**: quotes from free-form layouts through a
//!   caller-supplied completion client
//!
//! # Example - Ingesting a quote workbook
//!
//! ```no_run
//! use quotesheet::{IngestOptions, Ingestor};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let ingestor = Ingestor::new(IngestOptions::new().with_password("8715"));
//! let bytes = std::fs::read("quotes.xlsx")?;
//! let ingestion = ingestor.ingest_quotes(bytes, Some("quotes.xlsx"))?;
//!
//! for quote in &ingestion.quotes {
//!     println!("{}: {} items, total {}", quote.quote_number, quote.items.len(), quote.totals.total);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Example - Ingesting a production plan
//!
//! ```no_run
//! use quotesheet::Ingestor;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let bytes = std::fs::read("plan.xlsx")?;
//! let plan = Ingestor::default().ingest_production_plan(&bytes, "plan.xlsx")?;
//!
//! println!("{} ({})", plan.snapshot.file_name, plan.snapshot.current_week_label);
//! for order in plan.data_orders() {
//!     println!("row {}: {:?}", order.row_number, order.model_name);
//! }
//! # Ok(())
//! # }
//! ```

/// Common types shared across ingestion modes
///
/// This module provides the unified error type and container detection.
pub mod common;

/// Ingestion options
pub mod config;

/// Embedded image extraction
pub mod images;

/// Ingestion pipelines
pub mod ingest;

/// Model-assisted extraction
pub mod llm;

/// Cell coercion, dates and the quote calculator
pub mod normalize;

/// OOXML package decryption
///
/// This module provides MS-OFFCRYPTO decryption of password-protected
/// OOXML packages (.xlsx inside an OLE2 compound file).
pub mod ooxml;

/// Storage collaborators
pub mod persist;

/// Production-plan ingestion
pub mod production;

/// Quote records and the three-sheet reconciler
pub mod quote;

/// Decoded workbooks and sheet access
pub mod sheet;

// Re-export commonly used types for convenience
pub use common::{Error, Result};
pub use config::{IngestOptions, ModelOptions, ProductionLayout, QuoteSheetNames};
pub use ingest::{Ingestor, QuoteIngestion, persist_production_plan, persist_quotes};
pub use normalize::{QuoteTotals, compute_totals, to_amount};
pub use production::{FileSnapshotRecord, ProductionOrderRecord, ProductionPlan, RowType};
pub use quote::{QuoteItemRecord, QuoteRecord, SupplierInfo};
pub use sheet::{DecodeOutcome, RawCell, RawSheet, Workbook};
