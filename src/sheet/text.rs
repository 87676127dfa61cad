//! Plain-text rendering of sheets for the model prompt.

use std::fmt::Write as _;

use super::types::{RawCell, RawSheet};

/// Render one sheet as tab-separated rows under a section marker.
///
/// Blank rows are dropped and trailing empty cells trimmed.
pub fn render_sheet(sheet: &RawSheet) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "=== SHEET: {} ===", sheet.name);

    for row in sheet.filled_rows() {
        let used = row.iter().rposition(|c| !c.is_blank()).map_or(0, |i| i + 1);
        let line = row[..used]
            .iter()
            .map(|cell| cell.to_plain_text().replace(['\t', '\n', '\r'], " "))
            .collect::<Vec<_>>()
            .join("\t");
        out.push_str(&line);
        out.push('\n');
    }
    out.push_str("=== END SHEET ===\n");
    out
}

/// Render every non-empty sheet, in order, separated by blank lines.
pub fn render_sheets<'a>(sheets: impl IntoIterator<Item = &'a RawSheet>) -> String {
    sheets
        .into_iter()
        .filter(|sheet| !sheet.is_empty())
        .map(render_sheet)
        .collect::<Vec<_>>()
        .join("\n")
}
