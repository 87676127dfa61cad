use aes::cipher::{BlockDecryptMut, KeyIvInit, block_padding::NoPadding};
use aes::{Aes128, Aes192, Aes256};

use super::encryption_info::{AgileEncryptionInfo, HashAlgorithm};
use super::{password_to_utf16le, split_stream_size};
use crate::ooxml::error::{CryptoError, Result};

const AGILE_SEGMENT_SIZE: usize = 4096;

const K_VERIFIER_INPUT_BLOCK: [u8; 8] = [0xfe, 0xa7, 0xd2, 0x76, 0x3b, 0x4b, 0x9e, 0x79];
const K_HASHED_VERIFIER_BLOCK: [u8; 8] = [0xd7, 0xaa, 0x0f, 0x6d, 0x30, 0x61, 0x34, 0x4e];
const K_CRYPTO_KEY_BLOCK: [u8; 8] = [0x14, 0x6e, 0x0b, 0xe7, 0xab, 0xac, 0xd0, 0xd6];

macro_rules! cbc_decrypt {
    ($key:expr, $iv:expr, $buf:expr, $($len:literal => $aes:ty),+) => {
        match $key.len() {
            $($len => cbc::Decryptor::<$aes>::new_from_slices($key, $iv)
                .map_err(|_| CryptoError::Malformed("invalid AES key/iv length".to_string()))?
                .decrypt_padded_mut::<NoPadding>($buf)
                .map(|_| ())
                .map_err(|_| CryptoError::Malformed(
                    "ciphertext is not a multiple of the block size".to_string(),
                )),)+
            other => Err(CryptoError::UnsupportedAlgorithm(format!("AES key of {other} bytes"))),
        }
    };
}

/// AES-CBC decryption without padding, in place.
pub(crate) fn aes_cbc_decrypt(key: &[u8], iv: &[u8], buf: &mut [u8]) -> Result<()> {
    cbc_decrypt!(key, iv, buf, 16 => Aes128, 24 => Aes192, 32 => Aes256)
}

/// Decrypt an Agile `EncryptedPackage` stream into the plain ZIP package.
pub fn decrypt_agile_package(
    info: &AgileEncryptionInfo,
    encrypted_package: &[u8],
    password: &str,
) -> Result<Vec<u8>> {
    let secret_key = unwrap_secret_key(info, password)?;
    let (stream_size, ciphertext) = split_stream_size(encrypted_package)?;
    let key_data = &info.key_data;

    let mut out = Vec::with_capacity(ciphertext.len());
    for (index, segment) in ciphertext.chunks(AGILE_SEGMENT_SIZE).enumerate() {
        let block_key = u32::try_from(index)
            .map_err(|_| CryptoError::Malformed("too many package segments".to_string()))?
            .to_le_bytes();
        let iv = generate_iv_agile(
            key_data.hash_algorithm,
            &key_data.salt,
            Some(&block_key),
            key_data.block_size,
        );
        let mut buf = segment.to_vec();
        aes_cbc_decrypt(&secret_key, &iv, &mut buf)?;
        out.extend_from_slice(&buf);
    }

    if out.len() < stream_size {
        return Err(CryptoError::Malformed(
            "decrypted stream smaller than declared StreamSize".to_string(),
        ));
    }
    out.truncate(stream_size);
    Ok(out)
}

/// Verify the password and decrypt the package key held by the password key encryptor.
fn unwrap_secret_key(info: &AgileEncryptionInfo, password: &str) -> Result<Vec<u8>> {
    let encryptor = &info.password_key;
    let hash = encryptor.hash_algorithm;
    let key_size = encryptor.key_bits / 8;

    let pw_hash = hash_password_agile(hash, password, &encryptor.salt, encryptor.spin_count);
    let iv = generate_iv_agile(hash, &encryptor.salt, None, encryptor.block_size);

    let mut verifier_input = encryptor.encrypted_verifier_hash_input.clone();
    let key = generate_key_agile(hash, &pw_hash, &K_VERIFIER_INPUT_BLOCK, key_size);
    aes_cbc_decrypt(&key, &iv, &mut verifier_input)?;

    let mut verifier_hash = encryptor.encrypted_verifier_hash_value.clone();
    let key = generate_key_agile(hash, &pw_hash, &K_HASHED_VERIFIER_BLOCK, key_size);
    aes_cbc_decrypt(&key, &iv, &mut verifier_hash)?;

    // The verifier input is salt-sized; only its first salt bytes are hashed
    let input_len = encryptor.salt.len().min(verifier_input.len());
    let expected = hash.digest(&[&verifier_input[..input_len]]);
    let hash_len = hash.output_len();
    if verifier_hash.len() < hash_len || verifier_hash[..hash_len] != expected[..] {
        return Err(CryptoError::WrongPassword);
    }

    let mut secret_key = encryptor.encrypted_key_value.clone();
    let key = generate_key_agile(hash, &pw_hash, &K_CRYPTO_KEY_BLOCK, key_size);
    aes_cbc_decrypt(&key, &iv, &mut secret_key)?;

    let package_key_size = info.key_data.key_bits / 8;
    if secret_key.len() < package_key_size {
        return Err(CryptoError::Malformed(
            "encrypted key value shorter than the package key".to_string(),
        ));
    }
    secret_key.truncate(package_key_size);
    Ok(secret_key)
}

fn hash_password_agile(
    hash: HashAlgorithm,
    password: &str,
    salt: &[u8],
    spin_count: u32,
) -> Vec<u8> {
    let pw_bytes = password_to_utf16le(password);
    let mut digest = hash.digest(&[salt, &pw_bytes]);
    for i in 0..spin_count {
        // iteratorFirst: H(iterator || hash)
        digest = hash.digest(&[&i.to_le_bytes(), &digest]);
    }
    digest
}

fn generate_key_agile(
    hash: HashAlgorithm,
    password_hash: &[u8],
    block_key: &[u8],
    key_size: usize,
) -> Vec<u8> {
    pad_36(hash.digest(&[password_hash, block_key]), key_size)
}

fn generate_iv_agile(
    hash: HashAlgorithm,
    salt: &[u8],
    block_key: Option<&[u8]>,
    block_size: usize,
) -> Vec<u8> {
    let iv = match block_key {
        Some(block_key) => hash.digest(&[salt, block_key]),
        None => salt.to_vec(),
    };
    pad_36(iv, block_size)
}

/// Truncate, or extend with 0x36, to exactly `len` bytes.
fn pad_36(mut bytes: Vec<u8>, len: usize) -> Vec<u8> {
    bytes.resize(len, 0x36);
    bytes
}
