//! Canonical values from heterogeneous cells, and the quote calculator.
//!
//! Everything here is a pure function over values; nothing performs I/O.

pub mod coerce;
pub mod dates;
pub mod totals;

pub use coerce::{
    discount_or_zero, number_or_zero, parse_number_text, price_or_none, text_or_empty,
    text_or_none,
};
pub use dates::{excel_serial_to_date, iso_week_number, parse_raw_date};
pub use totals::{QuoteTotals, VAT_RATE, compute_totals, to_amount};
