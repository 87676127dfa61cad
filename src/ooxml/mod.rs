//! OOXML package support.
//!
//! Only the encryption layer lives here: cell data itself is read through
//! calamine once a package has been decrypted (see [`crate::sheet`]).

pub mod error;

#[cfg(feature = "ooxml_encryption")]
pub mod crypto;

pub use error::{CryptoError, Result};

/// Decrypt a password-protected OOXML package into its plain ZIP bytes.
///
/// Returns [`CryptoError::NotEncrypted`] for buffers that are not encrypted
/// packages, which is the common case for uploads without protection.
pub fn decrypt_package(bytes: &[u8], password: &str) -> Result<Vec<u8>> {
    #[cfg(feature = "ooxml_encryption")]
    {
        crypto::decrypt_ooxml_package(bytes, password)
    }
    #[cfg(not(feature = "ooxml_encryption"))]
    {
        let _ = (bytes, password);
        Err(CryptoError::FeatureDisabled)
    }
}

/// Whether the buffer is an OLE2 container carrying an encrypted OOXML package.
///
/// Always false when decryption support is compiled out.
pub fn is_encrypted_package(bytes: &[u8]) -> bool {
    #[cfg(feature = "ooxml_encryption")]
    {
        crypto::is_encrypted_ooxml(bytes)
    }
    #[cfg(not(feature = "ooxml_encryption"))]
    {
        let _ = bytes;
        false
    }
}
