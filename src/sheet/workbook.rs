//! Workbook decoding: optional password decryption, then cell grids via calamine.

use std::io::Cursor;

use calamine::{Data, Reader, open_workbook_auto_from_rs};
use tracing::{debug, warn};

use super::error::DecodeError;
use super::types::{RawCell, RawSheet};
use crate::common::detection::detect_container;
use crate::ooxml;

/// How the workbook bytes were obtained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeOutcome {
    /// The password removed the package encryption
    Decrypted,
    /// A password was supplied but decryption failed; the raw buffer was read instead
    PlainFallback { reason: String },
    /// No password was supplied
    Plain,
}

/// A decoded workbook: every readable sheet in workbook order.
#[derive(Debug, Clone)]
pub struct Workbook {
    sheets: Vec<RawSheet>,
    outcome: DecodeOutcome,
}

impl Workbook {
    /// Decode a raw spreadsheet buffer.
    ///
    /// With a password, decryption is tried first and the plain buffer is
    /// the fallback. Fails only when neither yields a readable workbook.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use quotesheet::sheet::Workbook;
    ///
    /// let bytes = std::fs::read("plan.xlsx")?;
    /// let workbook = Workbook::decode(&bytes, Some("8715"))?;
    /// for name in workbook.sheet_names() {
    ///     println!("{name}");
    /// }
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn decode(bytes: &[u8], password: Option<&str>) -> Result<Self, DecodeError> {
        if bytes.is_empty() {
            return Err(DecodeError::Empty);
        }
        debug!(
            container = detect_container(bytes).as_str(),
            size = bytes.len(),
            "decoding workbook"
        );

        let Some(password) = password else {
            return match read_sheets(bytes) {
                Ok(sheets) => Ok(Self::new(sheets, DecodeOutcome::Plain)),
                Err(_) if ooxml::is_encrypted_package(bytes) => Err(DecodeError::PasswordRequired),
                Err(reason) => Err(DecodeError::Unreadable {
                    reason,
                    decrypt_failure: None,
                }),
            };
        };

        match try_decrypted(bytes, password) {
            Ok(sheets) => {
                debug!(sheets = sheets.len(), "workbook decrypted");
                Ok(Self::new(sheets, DecodeOutcome::Decrypted))
            },
            Err(reason) => {
                warn!(%reason, "decryption failed, reading workbook without password");
                match read_sheets(bytes) {
                    Ok(sheets) => Ok(Self::new(sheets, DecodeOutcome::PlainFallback { reason })),
                    Err(plain_reason) => Err(DecodeError::Unreadable {
                        reason: plain_reason,
                        decrypt_failure: Some(reason),
                    }),
                }
            },
        }
    }

    fn new(sheets: Vec<RawSheet>, outcome: DecodeOutcome) -> Self {
        Self { sheets, outcome }
    }

    /// Build a workbook from already-decoded sheets.
    pub fn from_sheets(sheets: Vec<RawSheet>) -> Self {
        Self::new(sheets, DecodeOutcome::Plain)
    }

    pub fn outcome(&self) -> &DecodeOutcome {
        &self.outcome
    }

    /// Sheet by exact name; absent sheets are `None`, never an error.
    pub fn sheet(&self, name: &str) -> Option<&RawSheet> {
        self.sheets.iter().find(|s| s.name == name)
    }

    pub fn sheets(&self) -> &[RawSheet] {
        &self.sheets
    }

    pub fn sheet_names(&self) -> impl Iterator<Item = &str> {
        self.sheets.iter().map(|s| s.name.as_str())
    }
}

fn try_decrypted(bytes: &[u8], password: &str) -> Result<Vec<RawSheet>, String> {
    let plain = ooxml::decrypt_package(bytes, password).map_err(|e| e.to_string())?;
    read_sheets(&plain).map_err(|e| format!("decrypted package unreadable: {e}"))
}

/// Read every sheet of an unencrypted container.
///
/// A sheet calamine cannot read is skipped with a warning rather than
/// failing the whole workbook.
fn read_sheets(bytes: &[u8]) -> Result<Vec<RawSheet>, String> {
    let mut workbook =
        open_workbook_auto_from_rs(Cursor::new(bytes.to_vec())).map_err(|e| e.to_string())?;

    let names = workbook.sheet_names();
    let mut sheets = Vec::with_capacity(names.len());
    for name in names {
        match workbook.worksheet_range(&name) {
            Ok(range) => {
                let (start_row, start_col) = range
                    .start()
                    .map_or((0, 0), |(r, c)| (r as usize, c as usize));
                let mut rows = vec![Vec::new(); start_row];
                for row in range.rows() {
                    let mut cells = vec![RawCell::Empty; start_col];
                    cells.extend(row.iter().map(to_raw_cell));
                    rows.push(cells);
                }
                sheets.push(RawSheet::new(name, rows));
            },
            Err(e) => warn!(sheet = %name, error = %e, "skipping unreadable sheet"),
        }
    }
    Ok(sheets)
}

fn to_raw_cell(cell: &Data) -> RawCell {
    match cell {
        Data::Empty => RawCell::Empty,
        Data::Int(i) => RawCell::Number(*i as f64),
        Data::Float(f) => RawCell::Number(*f),
        Data::DateTime(dt) => RawCell::Number(dt.as_f64()),
        Data::String(s) => RawCell::Text(s.clone()),
        Data::Bool(b) => RawCell::Text(if *b { "TRUE" } else { "FALSE" }.to_string()),
        Data::Error(_) => RawCell::Empty,
        other => RawCell::Text(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_xlsxwriter::Workbook as XlsxWriter;

    fn sample_xlsx() -> Vec<u8> {
        let mut book = XlsxWriter::new();
        let sheet = book.add_worksheet();
        sheet.set_name("견적서").unwrap();
        sheet.write_string(2, 1, "견적번호").unwrap();
        sheet.write_number(3, 1, 44000).unwrap();
        book.add_worksheet().set_name("other").unwrap();
        book.save_to_buffer().unwrap()
    }

    #[test]
    fn test_decode_plain_keeps_absolute_positions() {
        let workbook = Workbook::decode(&sample_xlsx(), None).unwrap();
        assert_eq!(workbook.outcome(), &DecodeOutcome::Plain);
        let sheet = workbook.sheet("견적서").unwrap();
        assert_eq!(sheet.cell(2, 1), &RawCell::from("견적번호"));
        assert_eq!(sheet.cell(3, 1).as_number(), Some(44000.0));
        assert_eq!(sheet.cell(0, 0), &RawCell::Empty);
        assert_eq!(sheet.row_count(), 4);
        assert!(workbook.sheet("missing").is_none());
    }

    #[test]
    fn test_password_on_plain_file_falls_back() {
        let workbook = Workbook::decode(&sample_xlsx(), Some("8715")).unwrap();
        assert!(matches!(workbook.outcome(), DecodeOutcome::PlainFallback { .. }));
        assert!(workbook.sheet("견적서").is_some());
    }

    #[test]
    fn test_garbage_is_unreadable() {
        let err = Workbook::decode(b"definitely not a workbook", Some("8715")).unwrap_err();
        match err {
            DecodeError::Unreadable {
                decrypt_failure, ..
            } => assert!(decrypt_failure.is_some()),
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(Workbook::decode(&[], None).unwrap_err(), DecodeError::Empty);
    }

    #[cfg(feature = "ooxml_encryption")]
    mod encrypted {
        use super::*;
        use ms_offcrypto_writer::Ecma376AgileWriter;
        use rand::SeedableRng as _;
        use rand::rngs::StdRng;
        use std::io::Write as _;

        fn encrypt(plain: &[u8], password: &str) -> Vec<u8> {
            let mut cursor = Cursor::new(Vec::new());
            let mut rng = StdRng::from_seed([3u8; 32]);
            let mut writer = Ecma376AgileWriter::create(&mut rng, password, &mut cursor).unwrap();
            writer.write_all(plain).unwrap();
            writer.finalize().unwrap();
            cursor.into_inner()
        }

        #[test]
        fn test_decode_encrypted_with_password() {
            let encrypted = encrypt(&sample_xlsx(), "8715");
            let workbook = Workbook::decode(&encrypted, Some("8715")).unwrap();
            assert_eq!(workbook.outcome(), &DecodeOutcome::Decrypted);
            assert_eq!(
                workbook.sheet("견적서").unwrap().cell(3, 1).as_number(),
                Some(44000.0)
            );
        }

        #[test]
        fn test_decode_encrypted_without_password() {
            let encrypted = encrypt(&sample_xlsx(), "8715");
            let err = Workbook::decode(&encrypted, None).unwrap_err();
            assert_eq!(err, DecodeError::PasswordRequired);
        }

        #[test]
        fn test_decode_encrypted_wrong_password() {
            let encrypted = encrypt(&sample_xlsx(), "8715");
            let err = Workbook::decode(&encrypted, Some("0000")).unwrap_err();
            match err {
                DecodeError::Unreadable {
                    decrypt_failure: Some(reason),
                    ..
                } => assert!(reason.contains("password")),
                other => panic!("unexpected error: {other:?}"),
            }
        }
    }
}
