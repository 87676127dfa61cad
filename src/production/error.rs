use thiserror::Error;

/// The production-plan sheet is absent from the workbook.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("expected sheet '{sheet}' not found")]
pub struct SheetNotFoundError {
    pub sheet: String,
}
