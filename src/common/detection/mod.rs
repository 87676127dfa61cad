//! Container signature detection.
//!
//! Spreadsheets arrive either as ZIP packages or as OLE2 compound files.
//! Password-protected OOXML workbooks are always OLE2 compound files holding
//! an `EncryptionInfo` and an `EncryptedPackage` stream, so the signature
//! is enough to decide whether decryption is worth attempting.

pub mod types;

pub use types::ContainerKind;

// Magic number signatures
pub const OLE2_SIGNATURE: &[u8] = &[0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];
pub const ZIP_SIGNATURE: &[u8] = &[0x50, 0x4B, 0x03, 0x04];

/// Detect the container kind from the leading bytes of a buffer.
#[inline]
pub fn detect_container(bytes: &[u8]) -> ContainerKind {
    if bytes.starts_with(ZIP_SIGNATURE) {
        ContainerKind::Zip
    } else if bytes.starts_with(OLE2_SIGNATURE) {
        ContainerKind::Ole2
    } else {
        ContainerKind::Unknown
    }
}
