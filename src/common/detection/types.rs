//! Container kind enumeration.

/// Physical container of an uploaded spreadsheet, identified by its signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerKind {
    /// ZIP archive (.xlsx, .xlsm, .xlsb, .ods)
    Zip,
    /// OLE2 compound file (.xls, or an encrypted OOXML package)
    Ole2,
    /// Anything else
    Unknown,
}

impl ContainerKind {
    /// Short name used in log fields.
    pub fn as_str(self) -> &'static str {
        match self {
            ContainerKind::Zip => "zip",
            ContainerKind::Ole2 => "ole2",
            ContainerKind::Unknown => "unknown",
        }
    }
}
