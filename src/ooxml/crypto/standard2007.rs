use aes::cipher::{BlockDecrypt, KeyInit, generic_array::GenericArray};
use aes::{Aes128, Aes192, Aes256};
use sha1::{Digest, Sha1};

use super::encryption_info::StandardEncryptionInfo;
use super::{password_to_utf16le, split_stream_size};
use crate::ooxml::error::{CryptoError, Result};

const STANDARD_SPIN_COUNT: u32 = 50_000;
const AES_BLOCK: usize = 16;

/// Decrypt a Standard 2007 (AES-ECB) `EncryptedPackage` stream.
pub fn decrypt_standard2007_package(
    info: &StandardEncryptionInfo,
    encrypted_package: &[u8],
    password: &str,
) -> Result<Vec<u8>> {
    let key = derive_standard2007_key(password, &info.salt, STANDARD_SPIN_COUNT, info.key_bits / 8)?;
    verify_standard2007_password(&key, info)?;

    let (stream_size, ciphertext) = split_stream_size(encrypted_package)?;
    if !ciphertext.len().is_multiple_of(AES_BLOCK) {
        return Err(CryptoError::Malformed(
            "EncryptedPackage ciphertext length is not a multiple of 16 bytes".to_string(),
        ));
    }

    let mut data = ciphertext.to_vec();
    ecb_decrypt(&key, &mut data)?;

    if data.len() < stream_size {
        return Err(CryptoError::Malformed(
            "decrypted stream smaller than declared StreamSize".to_string(),
        ));
    }
    data.truncate(stream_size);
    Ok(data)
}

fn ecb_decrypt(key: &[u8], data: &mut [u8]) -> Result<()> {
    match key.len() {
        16 => ecb_decrypt_with::<Aes128>(key, data),
        24 => ecb_decrypt_with::<Aes192>(key, data),
        32 => ecb_decrypt_with::<Aes256>(key, data),
        other => Err(CryptoError::UnsupportedAlgorithm(format!("AES key of {other} bytes"))),
    }
}

fn ecb_decrypt_with<C: BlockDecrypt + KeyInit>(key: &[u8], data: &mut [u8]) -> Result<()> {
    let cipher = C::new_from_slice(key)
        .map_err(|_| CryptoError::Malformed("invalid AES key length".to_string()))?;
    for chunk in data.chunks_exact_mut(AES_BLOCK) {
        cipher.decrypt_block(GenericArray::from_mut_slice(chunk));
    }
    Ok(())
}

fn derive_standard2007_key(
    password: &str,
    salt: &[u8; 16],
    spin_count: u32,
    key_size: usize,
) -> Result<Vec<u8>> {
    if key_size == 0 || key_size > 40 {
        return Err(CryptoError::UnsupportedAlgorithm(format!(
            "Standard 2007 key of {key_size} bytes"
        )));
    }

    let pw_bytes = password_to_utf16le(password);

    let mut sha = Sha1::new();
    sha.update(salt);
    sha.update(&pw_bytes);
    let mut hash = sha.finalize().to_vec();

    for i in 0..spin_count {
        let mut sha = Sha1::new();
        sha.update(i.to_le_bytes());
        sha.update(&hash);
        hash = sha.finalize().to_vec();
    }

    let block_key = [0u8; 4];
    let mut sha = Sha1::new();
    sha.update(&hash);
    sha.update(block_key);
    let intermediate = sha.finalize().to_vec();

    let x1 = fill_and_xor_sha1(&intermediate, 0x36);
    let x2 = fill_and_xor_sha1(&intermediate, 0x5c);

    let mut combined = Vec::with_capacity(x1.len() + x2.len());
    combined.extend_from_slice(&x1);
    combined.extend_from_slice(&x2);
    combined.truncate(key_size);
    Ok(combined)
}

fn fill_and_xor_sha1(input: &[u8], fill: u8) -> Vec<u8> {
    let mut buff = [fill; 64];
    for (b, i) in buff.iter_mut().zip(input) {
        *b ^= i;
    }
    let mut sha = Sha1::new();
    sha.update(buff);
    sha.finalize().to_vec()
}

fn verify_standard2007_password(key: &[u8], info: &StandardEncryptionInfo) -> Result<()> {
    let mut verifier = info.encrypted_verifier;
    ecb_decrypt(key, &mut verifier)?;

    let mut sha = Sha1::new();
    sha.update(verifier);
    let verifier_hash = sha.finalize();

    let mut decrypted_hash = info.encrypted_verifier_hash;
    ecb_decrypt(key, &mut decrypted_hash)?;

    if decrypted_hash[..verifier_hash.len()] != verifier_hash[..] {
        return Err(CryptoError::WrongPassword);
    }
    Ok(())
}
