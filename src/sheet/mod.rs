//! Workbook decoding and raw sheet access.
//!
//! [`Workbook::decode`] turns an uploaded buffer into named [`RawSheet`]
//! grids, removing password encryption first when a password is configured.
//! Parsers then read sheets either positionally ([`RawSheet::cell`]) or by
//! header ([`SheetTable`]).
//!
//! ```rust,no_run
//! use quotesheet::sheet::{SheetTable, Workbook};
//!
//! let bytes = std::fs::read("quotes.xlsx")?;
//! let workbook = Workbook::decode(&bytes, None)?;
//! if let Some(sheet) = workbook.sheet("견적서") {
//!     let table = SheetTable::from_sheet(sheet);
//!     println!("{} quote rows", table.len());
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod error;
pub mod table;
pub mod text;
pub mod types;
mod workbook;

pub use error::DecodeError;
pub use table::{SheetTable, TableRow};
pub use text::{render_sheet, render_sheets};
pub use types::{RawCell, RawSheet};
pub use workbook::{DecodeOutcome, Workbook};
