/// Error types for encrypted OOXML packages.
use thiserror::Error;

/// Result type for OOXML decryption.
pub type Result<T> = std::result::Result<T, CryptoError>;

/// Why an encrypted package could not be opened.
///
/// None of these are fatal to ingestion: the decoder treats every variant as
/// a signal to fall back to reading the buffer as an unencrypted workbook.
#[derive(Error, Debug)]
pub enum CryptoError {
    /// The buffer is not an OLE2 container with EncryptionInfo/EncryptedPackage streams
    #[error("not an encrypted OOXML package")]
    NotEncrypted,

    /// EncryptionInfo version this decryptor does not handle
    #[error("unsupported EncryptionInfo version: {major}.{minor}")]
    UnsupportedVersion { major: u16, minor: u16 },

    /// Cipher or hash outside the supported set
    #[error("unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// Password verifier did not match
    #[error("incorrect password")]
    WrongPassword,

    /// Structurally invalid encryption data
    #[error("malformed encryption data: {0}")]
    Malformed(String),

    /// Decryption support was compiled out
    #[error("Feature 'ooxml_encryption' is disabled. Enable it with --features ooxml_encryption")]
    FeatureDisabled,

    /// IO error while reading compound file streams
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(feature = "ooxml_encryption")]
impl From<quick_xml::Error> for CryptoError {
    fn from(err: quick_xml::Error) -> Self {
        CryptoError::Malformed(format!("EncryptionInfo XML: {err}"))
    }
}
