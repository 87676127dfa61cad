use thiserror::Error;

/// The uploaded buffer could not be turned into a workbook.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DecodeError {
    #[error("file could not be read: the buffer is empty")]
    Empty,

    /// Neither the decrypted package nor the raw buffer opened as a workbook
    #[error("file could not be read: {reason}")]
    Unreadable {
        reason: String,
        /// Why decryption was abandoned, when a password was tried first
        decrypt_failure: Option<String>,
    },

    /// The file is an encrypted package and no password was configured
    #[error("file could not be read: workbook is password protected")]
    PasswordRequired,
}
