//! Date helpers for spreadsheet serials and loosely formatted date text.
//!
//! # Excel Date System
//!
//! Cells store dates as days since the 1900 epoch; serial 25569 is
//! 1970-01-01. The fractional part is the time of day and is discarded
//! here: ingestion only keeps calendar days.

use chrono::{Datelike, Duration, NaiveDate};

/// Days between the Excel 1900 epoch and January 1, 1970
pub const EXCEL_1900_TO_UNIX_EPOCH_DAYS: i64 = 25569;

/// Largest serial Excel can display (9999-12-31)
const MAX_EXCEL_SERIAL: f64 = 2_958_465.0;

/// Convert a date serial to a calendar day, truncating any time of day.
///
/// Returns `None` for non-finite serials and serials outside Excel's range.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use quotesheet::normalize::excel_serial_to_date;
///
/// assert_eq!(excel_serial_to_date(25569.0), NaiveDate::from_ymd_opt(1970, 1, 1));
/// assert_eq!(excel_serial_to_date(44000.75), NaiveDate::from_ymd_opt(2020, 6, 18));
/// ```
pub fn excel_serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || !(0.0..=MAX_EXCEL_SERIAL).contains(&serial) {
        return None;
    }
    let days = (serial - EXCEL_1900_TO_UNIX_EPOCH_DAYS as f64).floor() as i64;
    NaiveDate::from_ymd_opt(1970, 1, 1)?.checked_add_signed(Duration::days(days))
}

/// ISO-8601 week number (1..=53) of a date.
#[inline]
pub fn iso_week_number(date: NaiveDate) -> u32 {
    date.iso_week().week()
}

/// Parse date text the way production sheets write it.
///
/// Accepts a bare serial (`45123`), `YYYY-MM-DD`, `YYYY.MM.DD`, `YYYY/MM/DD`
/// (a trailing separator is tolerated) and `M/D`, which takes
/// `reference_year`. Anything else is `None`.
pub fn parse_raw_date(raw: &str, reference_year: i32) -> Option<NaiveDate> {
    let text = raw.trim().trim_end_matches(['.', '/', '-']).trim();
    if text.is_empty() {
        return None;
    }

    if let Ok(serial) = text.parse::<f64>() {
        return excel_serial_to_date(serial);
    }

    let parts: Vec<&str> = text
        .split(['-', '.', '/'])
        .map(str::trim)
        .collect();
    let num = |s: &str| s.parse::<u32>().ok();

    match parts.as_slice() {
        [y, m, d] if y.len() == 4 => {
            NaiveDate::from_ymd_opt(y.parse().ok()?, num(m)?, num(d)?)
        },
        [m, d] => NaiveDate::from_ymd_opt(reference_year, num(m)?, num(d)?),
        _ => None,
    }
}
