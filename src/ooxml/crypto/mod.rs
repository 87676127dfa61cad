//! OOXML decryption (MS-OFFCRYPTO Standard 2007 and Agile).
//!
//! This module is compiled only when the `ooxml_encryption` feature is enabled.
//! An encrypted workbook is an OLE2 compound file with two root streams:
//! `EncryptionInfo` (descriptor + password verifier) and `EncryptedPackage`
//! (the original ZIP package, encrypted). Decryption yields those ZIP bytes.

pub mod agile;
pub mod encryption_info;
pub mod standard2007;

use std::io::{Cursor, Read};

use tracing::debug;

use crate::common::detection::{ContainerKind, detect_container};
use crate::ooxml::error::{CryptoError, Result};

pub use encryption_info::{AgileEncryptionInfo, EncryptionInfo, HashAlgorithm, StandardEncryptionInfo};

const ENCRYPTION_INFO_STREAM: &str = "/EncryptionInfo";
const ENCRYPTED_PACKAGE_STREAM: &str = "/EncryptedPackage";

/// Decrypt an encrypted OOXML package held in an OLE2 compound file.
pub fn decrypt_ooxml_package(bytes: &[u8], password: &str) -> Result<Vec<u8>> {
    if detect_container(bytes) != ContainerKind::Ole2 {
        return Err(CryptoError::NotEncrypted);
    }

    let mut compound = cfb::CompoundFile::open(Cursor::new(bytes))?;
    if !compound.is_stream(ENCRYPTION_INFO_STREAM) || !compound.is_stream(ENCRYPTED_PACKAGE_STREAM)
    {
        // Plain .xls workbooks are OLE2 too
        return Err(CryptoError::NotEncrypted);
    }

    let info_bytes = read_stream(&mut compound, ENCRYPTION_INFO_STREAM)?;
    let package = read_stream(&mut compound, ENCRYPTED_PACKAGE_STREAM)?;

    match EncryptionInfo::parse(&info_bytes)? {
        EncryptionInfo::Agile(info) => {
            debug!(hash = ?info.key_data.hash_algorithm, key_bits = info.key_data.key_bits, "decrypting agile package");
            agile::decrypt_agile_package(&info, &package, password)
        },
        EncryptionInfo::Standard(info) => {
            debug!(key_bits = info.key_bits, "decrypting standard 2007 package");
            standard2007::decrypt_standard2007_package(&info, &package, password)
        },
    }
}

/// True for OLE2 containers holding both encryption streams.
pub fn is_encrypted_ooxml(bytes: &[u8]) -> bool {
    if detect_container(bytes) != ContainerKind::Ole2 {
        return false;
    }
    cfb::CompoundFile::open(Cursor::new(bytes))
        .map(|compound| {
            compound.is_stream(ENCRYPTION_INFO_STREAM)
                && compound.is_stream(ENCRYPTED_PACKAGE_STREAM)
        })
        .unwrap_or(false)
}

fn read_stream(compound: &mut cfb::CompoundFile<Cursor<&[u8]>>, path: &str) -> Result<Vec<u8>> {
    let mut stream = compound.open_stream(path)?;
    let mut buf = Vec::new();
    stream.read_to_end(&mut buf)?;
    Ok(buf)
}

/// UTF-16LE encoding of the password, as every MS-OFFCRYPTO KDF expects.
pub(crate) fn password_to_utf16le(password: &str) -> Vec<u8> {
    let mut buf = Vec::with_capacity(password.len() * 2);
    for ch in password.encode_utf16() {
        buf.extend_from_slice(&ch.to_le_bytes());
    }
    buf
}

/// Split the 8-byte little-endian StreamSize prefix off an EncryptedPackage stream.
pub(crate) fn split_stream_size(package: &[u8]) -> Result<(usize, &[u8])> {
    if package.len() < 8 {
        return Err(CryptoError::Malformed(
            "EncryptedPackage stream shorter than its size prefix".to_string(),
        ));
    }
    let mut size_bytes = [0u8; 8];
    size_bytes.copy_from_slice(&package[..8]);
    let size = usize::try_from(u64::from_le_bytes(size_bytes))
        .map_err(|_| CryptoError::Malformed("EncryptedPackage size overflow".to_string()))?;
    Ok((size, &package[8..]))
}
