//! Header-driven view of a sheet: the first non-blank row names the columns.

use super::types::{RawCell, RawSheet};

static EMPTY_CELL: RawCell = RawCell::Empty;

/// A sheet read as records keyed by header text.
#[derive(Debug, Clone)]
pub struct SheetTable<'a> {
    headers: Vec<String>,
    /// (1-based physical row, cells)
    rows: Vec<(usize, &'a [RawCell])>,
}

/// One non-blank data row of a [`SheetTable`].
#[derive(Debug, Clone, Copy)]
pub struct TableRow<'t> {
    headers: &'t [String],
    cells: &'t [RawCell],
    pub row_number: usize,
}

impl<'a> SheetTable<'a> {
    pub fn from_sheet(sheet: &'a RawSheet) -> Self {
        let Some(header_index) = sheet.rows.iter().position(|row| !is_blank_row(row)) else {
            return Self {
                headers: Vec::new(),
                rows: Vec::new(),
            };
        };

        let headers = sheet.rows[header_index]
            .iter()
            .map(|cell| cell.to_plain_text().trim().to_string())
            .collect();

        let rows = sheet.rows[header_index + 1..]
            .iter()
            .enumerate()
            .filter(|(_, row)| !is_blank_row(row))
            .map(|(offset, cells)| (header_index + offset + 2, cells.as_slice()))
            .collect();

        Self { headers, rows }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Data rows in sheet order.
    pub fn rows(&self) -> impl Iterator<Item = TableRow<'_>> {
        self.rows.iter().map(|&(row_number, cells)| TableRow {
            headers: &self.headers,
            cells,
            row_number,
        })
    }
}

fn is_blank_row(row: &[RawCell]) -> bool {
    row.iter().all(RawCell::is_blank)
}

impl<'t> TableRow<'t> {
    /// Cell under the first column named `header`; absent columns read as empty.
    pub fn get(&self, header: &str) -> &'t RawCell {
        self.headers
            .iter()
            .position(|h| h == header)
            .and_then(|idx| self.cells.get(idx))
            .unwrap_or(&EMPTY_CELL)
    }
}
