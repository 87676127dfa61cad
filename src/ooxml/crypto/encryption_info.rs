//! `EncryptionInfo` stream parsing.
//!
//! The stream starts with a 4-byte version (major, minor). 4.4 is Agile with
//! an XML descriptor after 8 bytes; x.2 is Standard with a binary header and
//! verifier. Extensible encryption (x.3) is not supported.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::ooxml::error::{CryptoError, Result};

const CALG_AES_128: u32 = 0x0000_660E;
const CALG_AES_192: u32 = 0x0000_660F;
const CALG_AES_256: u32 = 0x0000_6610;
const CALG_SHA1: u32 = 0x0000_8004;

/// Hash algorithms an Agile descriptor may name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashAlgorithm {
    Sha1,
    Sha256,
    Sha384,
    Sha512,
}

impl HashAlgorithm {
    fn parse(name: &str) -> Result<Self> {
        match name.to_ascii_uppercase().replace('-', "").as_str() {
            "SHA1" => Ok(HashAlgorithm::Sha1),
            "SHA256" => Ok(HashAlgorithm::Sha256),
            "SHA384" => Ok(HashAlgorithm::Sha384),
            "SHA512" => Ok(HashAlgorithm::Sha512),
            other => Err(CryptoError::UnsupportedAlgorithm(format!("hash {other}"))),
        }
    }

    /// Digest length in bytes.
    pub fn output_len(self) -> usize {
        match self {
            HashAlgorithm::Sha1 => 20,
            HashAlgorithm::Sha256 => 32,
            HashAlgorithm::Sha384 => 48,
            HashAlgorithm::Sha512 => 64,
        }
    }

    /// Hash the concatenation of `parts`.
    pub fn digest(self, parts: &[&[u8]]) -> Vec<u8> {
        match self {
            HashAlgorithm::Sha1 => digest_parts::<sha1::Sha1>(parts),
            HashAlgorithm::Sha256 => digest_parts::<sha2::Sha256>(parts),
            HashAlgorithm::Sha384 => digest_parts::<sha2::Sha384>(parts),
            HashAlgorithm::Sha512 => digest_parts::<sha2::Sha512>(parts),
        }
    }
}

fn digest_parts<D: sha2::Digest>(parts: &[&[u8]]) -> Vec<u8> {
    let mut hasher = D::new();
    for part in parts {
        hasher.update(part);
    }
    hasher.finalize().to_vec()
}

/// `keyData` element: parameters for the package stream itself.
#[derive(Debug, Clone)]
pub struct KeyData {
    pub salt: Vec<u8>,
    pub block_size: usize,
    pub key_bits: usize,
    pub hash_algorithm: HashAlgorithm,
}

/// Password `encryptedKey` element: verifier and wrapped secret key.
#[derive(Debug, Clone)]
pub struct PasswordKeyEncryptor {
    pub salt: Vec<u8>,
    pub block_size: usize,
    pub key_bits: usize,
    pub spin_count: u32,
    pub hash_algorithm: HashAlgorithm,
    pub encrypted_verifier_hash_input: Vec<u8>,
    pub encrypted_verifier_hash_value: Vec<u8>,
    pub encrypted_key_value: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct AgileEncryptionInfo {
    pub key_data: KeyData,
    pub password_key: PasswordKeyEncryptor,
}

#[derive(Debug, Clone)]
pub struct StandardEncryptionInfo {
    pub key_bits: usize,
    pub salt: [u8; 16],
    pub encrypted_verifier: [u8; 16],
    pub encrypted_verifier_hash: [u8; 32],
}

#[derive(Debug, Clone)]
pub enum EncryptionInfo {
    Agile(AgileEncryptionInfo),
    Standard(StandardEncryptionInfo),
}

impl EncryptionInfo {
    /// Parse a raw `EncryptionInfo` stream.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < 8 {
            return Err(CryptoError::Malformed(
                "EncryptionInfo stream too short for version header".to_string(),
            ));
        }
        let major = u16::from_le_bytes([bytes[0], bytes[1]]);
        let minor = u16::from_le_bytes([bytes[2], bytes[3]]);

        match (major, minor) {
            (4, 4) => parse_agile_xml(&bytes[8..]).map(EncryptionInfo::Agile),
            (2..=4, 2) => parse_standard(bytes).map(EncryptionInfo::Standard),
            _ => Err(CryptoError::UnsupportedVersion { major, minor }),
        }
    }
}

fn read_u32(bytes: &[u8], offset: usize) -> Result<u32> {
    bytes
        .get(offset..offset + 4)
        .map(|b| u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .ok_or_else(|| CryptoError::Malformed(format!("EncryptionInfo truncated at offset {offset}")))
}

fn parse_standard(info: &[u8]) -> Result<StandardEncryptionInfo> {
    let header_size = read_u32(info, 8)? as usize;
    let header_start = 12usize;

    // Header: Flags, SizeExtra, AlgID, AlgIDHash, KeySize, ...
    let alg_id = read_u32(info, header_start + 8)?;
    let alg_id_hash = read_u32(info, header_start + 12)?;
    let key_bits = read_u32(info, header_start + 16)? as usize;

    let expected_bits = match alg_id {
        CALG_AES_128 => 128,
        CALG_AES_192 => 192,
        CALG_AES_256 => 256,
        other => {
            return Err(CryptoError::UnsupportedAlgorithm(format!(
                "standard cipher AlgID 0x{other:08X}"
            )));
        },
    };
    if alg_id_hash != CALG_SHA1 && alg_id_hash != 0 {
        return Err(CryptoError::UnsupportedAlgorithm(format!(
            "standard hash AlgIDHash 0x{alg_id_hash:08X}"
        )));
    }
    let key_bits = if key_bits == 0 { expected_bits } else { key_bits };

    let mut offset = header_start.checked_add(header_size).ok_or_else(|| {
        CryptoError::Malformed("EncryptionInfo header size overflow".to_string())
    })?;

    let salt_size = read_u32(info, offset)?;
    if salt_size != 16 {
        return Err(CryptoError::Malformed(format!(
            "unexpected Standard 2007 salt size: {salt_size} (expected 16)"
        )));
    }
    offset += 4;

    let verifier = info
        .get(offset..offset + 16 + 16 + 4 + 32)
        .ok_or_else(|| CryptoError::Malformed("EncryptionInfo verifier truncated".to_string()))?;

    let mut salt = [0u8; 16];
    salt.copy_from_slice(&verifier[..16]);
    let mut encrypted_verifier = [0u8; 16];
    encrypted_verifier.copy_from_slice(&verifier[16..32]);
    let hash_size = u32::from_le_bytes([verifier[32], verifier[33], verifier[34], verifier[35]]);
    if hash_size != 20 {
        return Err(CryptoError::Malformed(format!(
            "unexpected Standard 2007 verifier hash size: {hash_size} (expected 20)"
        )));
    }
    let mut encrypted_verifier_hash = [0u8; 32];
    encrypted_verifier_hash.copy_from_slice(&verifier[36..68]);

    Ok(StandardEncryptionInfo {
        key_bits,
        salt,
        encrypted_verifier,
        encrypted_verifier_hash,
    })
}

#[derive(Default)]
struct Attrs {
    pairs: Vec<(Vec<u8>, String)>,
}

impl Attrs {
    fn collect(element: &BytesStart<'_>) -> Result<Self> {
        let mut pairs = Vec::new();
        for attr in element.attributes() {
            let attr = attr.map_err(|e| CryptoError::Malformed(format!("bad attribute: {e}")))?;
            let value = String::from_utf8_lossy(&attr.value).into_owned();
            pairs.push((attr.key.local_name().as_ref().to_vec(), value));
        }
        Ok(Self { pairs })
    }

    fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(key, _)| key.as_slice() == name.as_bytes())
            .map(|(_, value)| value.as_str())
    }

    fn required(&self, name: &str) -> Result<&str> {
        self.get(name)
            .ok_or_else(|| CryptoError::Malformed(format!("missing attribute '{name}'")))
    }

    fn number(&self, name: &str) -> Result<usize> {
        self.required(name)?
            .trim()
            .parse()
            .map_err(|_| CryptoError::Malformed(format!("attribute '{name}' is not a number")))
    }

    fn base64(&self, name: &str) -> Result<Vec<u8>> {
        BASE64_STANDARD
            .decode(self.required(name)?.trim())
            .map_err(|e| CryptoError::Malformed(format!("attribute '{name}': {e}")))
    }

    fn check_cipher(&self) -> Result<()> {
        let cipher = self.required("cipherAlgorithm")?;
        if cipher != "AES" {
            return Err(CryptoError::UnsupportedAlgorithm(format!("cipher {cipher}")));
        }
        if let Some(chaining) = self.get("cipherChaining")
            && chaining != "ChainingModeCBC"
        {
            return Err(CryptoError::UnsupportedAlgorithm(format!("chaining {chaining}")));
        }
        Ok(())
    }
}

fn parse_agile_xml(xml: &[u8]) -> Result<AgileEncryptionInfo> {
    let mut reader = Reader::from_reader(xml);
    let mut buf = Vec::new();
    let mut key_data = None;
    let mut password_key = None;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) | Event::Empty(e) => match e.local_name().as_ref() {
                b"keyData" => {
                    let attrs = Attrs::collect(&e)?;
                    attrs.check_cipher()?;
                    key_data = Some(KeyData {
                        salt: attrs.base64("saltValue")?,
                        block_size: attrs.number("blockSize")?,
                        key_bits: attrs.number("keyBits")?,
                        hash_algorithm: HashAlgorithm::parse(attrs.required("hashAlgorithm")?)?,
                    });
                },
                // Certificate key encryptors use the same local name without a spin count
                b"encryptedKey" => {
                    let attrs = Attrs::collect(&e)?;
                    if attrs.get("spinCount").is_some() && password_key.is_none() {
                        attrs.check_cipher()?;
                        password_key = Some(PasswordKeyEncryptor {
                            salt: attrs.base64("saltValue")?,
                            block_size: attrs.number("blockSize")?,
                            key_bits: attrs.number("keyBits")?,
                            spin_count: u32::try_from(attrs.number("spinCount")?).map_err(|_| {
                                CryptoError::Malformed("spinCount out of range".to_string())
                            })?,
                            hash_algorithm: HashAlgorithm::parse(
                                attrs.required("hashAlgorithm")?,
                            )?,
                            encrypted_verifier_hash_input: attrs
                                .base64("encryptedVerifierHashInput")?,
                            encrypted_verifier_hash_value: attrs
                                .base64("encryptedVerifierHashValue")?,
                            encrypted_key_value: attrs.base64("encryptedKeyValue")?,
                        });
                    }
                },
                _ => {},
            },
            Event::Eof => break,
            _ => {},
        }
        buf.clear();
    }

    match (key_data, password_key) {
        (Some(key_data), Some(password_key)) => Ok(AgileEncryptionInfo {
            key_data,
            password_key,
        }),
        (None, _) => Err(CryptoError::Malformed(
            "Agile descriptor has no keyData element".to_string(),
        )),
        (_, None) => Err(CryptoError::Malformed(
            "Agile descriptor has no password key encryptor".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const AGILE_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<encryption xmlns="http://schemas.microsoft.com/office/2006/encryption"
 xmlns:p="http://schemas.microsoft.com/office/2006/keyEncryptor/password">
  <keyData saltSize="16" blockSize="16" keyBits="256" hashSize="64"
           cipherAlgorithm="AES" cipherChaining="ChainingModeCBC" hashAlgorithm="SHA512"
           saltValue="AAECAwQFBgcICQoLDA0ODw=="/>
  <keyEncryptors>
    <keyEncryptor uri="http://schemas.microsoft.com/office/2006/keyEncryptor/password">
      <p:encryptedKey spinCount="100000" saltSize="16" blockSize="16" keyBits="256"
                      hashSize="64" cipherAlgorithm="AES" cipherChaining="ChainingModeCBC"
                      hashAlgorithm="SHA512" saltValue="AAECAwQFBgcICQoLDA0ODw=="
                      encryptedVerifierHashInput="AAECAwQFBgcICQoLDA0ODw=="
                      encryptedVerifierHashValue="AAECAwQFBgcICQoLDA0ODw=="
                      encryptedKeyValue="AAECAwQFBgcICQoLDA0ODw=="/>
    </keyEncryptor>
  </keyEncryptors>
</encryption>"#;

    fn with_version(major: u16, minor: u16, body: &[u8]) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&major.to_le_bytes());
        bytes.extend_from_slice(&minor.to_le_bytes());
        bytes.extend_from_slice(&0x40u32.to_le_bytes());
        bytes.extend_from_slice(body);
        bytes
    }

    #[test]
    fn test_parse_agile_descriptor() {
        let info = EncryptionInfo::parse(&with_version(4, 4, AGILE_XML.as_bytes())).unwrap();
        let EncryptionInfo::Agile(info) = info else {
            panic!("expected agile info");
        };
        assert_eq!(info.key_data.key_bits, 256);
        assert_eq!(info.key_data.hash_algorithm, HashAlgorithm::Sha512);
        assert_eq!(info.key_data.salt, (0u8..16).collect::<Vec<_>>());
        assert_eq!(info.password_key.spin_count, 100_000);
        assert_eq!(info.password_key.encrypted_key_value.len(), 16);
    }

    #[test]
    fn test_rejects_extensible_version() {
        let err = EncryptionInfo::parse(&with_version(4, 3, &[])).unwrap_err();
        assert!(matches!(err, CryptoError::UnsupportedVersion { major: 4, minor: 3 }));
    }

    #[test]
    fn test_agile_without_password_encryptor() {
        let xml = r#"<encryption><keyData saltSize="16" blockSize="16" keyBits="128" cipherAlgorithm="AES" hashAlgorithm="SHA1" saltValue="AAAA"/></encryption>"#;
        let err = EncryptionInfo::parse(&with_version(4, 4, xml.as_bytes())).unwrap_err();
        assert!(matches!(err, CryptoError::Malformed(_)));
    }

    #[test]
    fn test_hash_output_lengths() {
        for alg in [
            HashAlgorithm::Sha1,
            HashAlgorithm::Sha256,
            HashAlgorithm::Sha384,
            HashAlgorithm::Sha512,
        ] {
            assert_eq!(alg.digest(&[b"a", b"b"]).len(), alg.output_len());
            assert_eq!(alg.digest(&[b"ab"]), alg.digest(&[b"a", b"b"]));
        }
        assert_eq!(HashAlgorithm::parse("SHA-256").unwrap(), HashAlgorithm::Sha256);
        assert!(HashAlgorithm::parse("MD5").is_err());
    }
}
