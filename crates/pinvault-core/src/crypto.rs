//! PIN-based encryption of a recovery phrase
//!
//! The phrase is encrypted with AES-256-GCM under a key derived from the PIN
//! with Argon2id. Salt, nonce and the Argon2 cost parameters are carried in
//! the record so a record can always be opened with the settings it was
//! written with.
//!
//! # Record layout
//!
//! ```text
//! [version (1)][m_cost (4, LE)][t_cost (4, LE)][p_cost (4, LE)]
//! [salt (16)][nonce (12)][ciphertext + GCM tag (n + 16)]
//! ```
//!
//! The stored form is the standard base64 encoding of those bytes.

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Key, Nonce,
};
use argon2::{Algorithm, Argon2, Params, Version};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use rand::{rngs::OsRng, RngCore};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use zeroize::Zeroizing;

/// Current record format version
pub const RECORD_VERSION: u8 = 1;

/// Default Argon2id parameters (OWASP recommendations for 2024+)
/// - m_cost: 64 MiB memory
/// - t_cost: 3 iterations
/// - p_cost: 4 lanes
pub const DEFAULT_M_COST: u32 = 65536;
pub const DEFAULT_T_COST: u32 = 3;
pub const DEFAULT_P_COST: u32 = 4;

/// Upper bounds accepted when reading a record, so a corrupted header
/// cannot make a load allocate gigabytes or spin for hours
pub const MAX_M_COST: u32 = 1 << 20; // 1 GiB
pub const MAX_T_COST: u32 = 64;
pub const MAX_P_COST: u32 = 64;

const KEY_LEN: usize = 32; // AES-256

/// Salt length for Argon2
pub const SALT_LEN: usize = 16;

/// Nonce length for AES-256-GCM
pub const NONCE_LEN: usize = 12;

/// GCM authentication tag length
pub const TAG_LEN: usize = 16;

const HEADER_LEN: usize = 1 + 4 + 4 + 4;

/// Smallest well-formed record: header, salt, nonce, one byte of ciphertext and the tag
pub const MIN_RECORD_LEN: usize = HEADER_LEN + SALT_LEN + NONCE_LEN + 1 + TAG_LEN;

#[derive(Error, Debug)]
pub enum CryptoError {
    #[error("Random number generator unavailable: {0}")]
    RandomUnavailable(String),
    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),
    #[error("Decryption failed: {0}")]
    DecryptionFailed(String),
    #[error("Key derivation failed: {0}")]
    KeyDerivationFailed(String),
    #[error("Invalid record format")]
    InvalidFormat,
    #[error("Unsupported record version: {0}")]
    UnsupportedVersion(u8),
}

/// Argon2id cost parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KdfParams {
    /// Memory cost in KiB
    pub m_cost: u32,
    /// Number of passes
    pub t_cost: u32,
    /// Degree of parallelism
    pub p_cost: u32,
}

impl Default for KdfParams {
    fn default() -> Self {
        Self {
            m_cost: DEFAULT_M_COST,
            t_cost: DEFAULT_T_COST,
            p_cost: DEFAULT_P_COST,
        }
    }
}

impl KdfParams {
    /// Check that Argon2 accepts these parameters.
    pub fn validate(&self) -> Result<(), CryptoError> {
        self.to_argon2().map(|_| ())
    }

    fn to_argon2(self) -> Result<Params, CryptoError> {
        Params::new(self.m_cost, self.t_cost, self.p_cost, Some(KEY_LEN))
            .map_err(|e| CryptoError::KeyDerivationFailed(e.to_string()))
    }
}

/// An encrypted recovery phrase, ready to be stored as a single string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptedRecord {
    params: KdfParams,
    salt: [u8; SALT_LEN],
    nonce: [u8; NONCE_LEN],
    /// Encrypted phrase + authentication tag
    ciphertext: Vec<u8>,
}

impl EncryptedRecord {
    /// KDF parameters this record was sealed with
    pub fn params(&self) -> KdfParams {
        self.params
    }

    /// Serialize to bytes (see module docs for layout)
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes =
            Vec::with_capacity(HEADER_LEN + SALT_LEN + NONCE_LEN + self.ciphertext.len());
        bytes.push(RECORD_VERSION);
        bytes.extend_from_slice(&self.params.m_cost.to_le_bytes());
        bytes.extend_from_slice(&self.params.t_cost.to_le_bytes());
        bytes.extend_from_slice(&self.params.p_cost.to_le_bytes());
        bytes.extend_from_slice(&self.salt);
        bytes.extend_from_slice(&self.nonce);
        bytes.extend_from_slice(&self.ciphertext);
        bytes
    }

    /// Deserialize from bytes. Never panics on arbitrary input.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        let version = *bytes.first().ok_or(CryptoError::InvalidFormat)?;
        if version != RECORD_VERSION {
            return Err(CryptoError::UnsupportedVersion(version));
        }
        if bytes.len() < MIN_RECORD_LEN {
            return Err(CryptoError::InvalidFormat);
        }

        let params = KdfParams {
            m_cost: read_u32(&bytes[1..5]),
            t_cost: read_u32(&bytes[5..9]),
            p_cost: read_u32(&bytes[9..13]),
        };
        if params.m_cost > MAX_M_COST || params.t_cost > MAX_T_COST || params.p_cost > MAX_P_COST {
            return Err(CryptoError::InvalidFormat);
        }

        let mut salt = [0u8; SALT_LEN];
        let mut nonce = [0u8; NONCE_LEN];
        let salt_end = HEADER_LEN + SALT_LEN;
        let nonce_end = salt_end + NONCE_LEN;

        salt.copy_from_slice(&bytes[HEADER_LEN..salt_end]);
        nonce.copy_from_slice(&bytes[salt_end..nonce_end]);
        let ciphertext = bytes[nonce_end..].to_vec();

        Ok(Self {
            params,
            salt,
            nonce,
            ciphertext,
        })
    }

    /// Encode as the opaque string kept in storage
    pub fn encode(&self) -> String {
        STANDARD.encode(self.to_bytes())
    }

    /// Decode the opaque storage string
    pub fn decode(encoded: &str) -> Result<Self, CryptoError> {
        let bytes = STANDARD
            .decode(encoded.trim())
            .map_err(|_| CryptoError::InvalidFormat)?;
        Self::from_bytes(&bytes)
    }
}

fn read_u32(bytes: &[u8]) -> u32 {
    let mut buf = [0u8; 4];
    buf.copy_from_slice(bytes);
    u32::from_le_bytes(buf)
}

/// Fill `buf` from the OS random source
fn fill_random(buf: &mut [u8]) -> Result<(), CryptoError> {
    OsRng
        .try_fill_bytes(buf)
        .map_err(|e| CryptoError::RandomUnavailable(e.to_string()))
}

/// Derive an encryption key from a PIN using Argon2id
fn derive_key(
    pin: &str,
    salt: &[u8; SALT_LEN],
    params: KdfParams,
) -> Result<Zeroizing<[u8; KEY_LEN]>, CryptoError> {
    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params.to_argon2()?);

    let mut key = Zeroizing::new([0u8; KEY_LEN]);
    argon2
        .hash_password_into(pin.as_bytes(), salt, key.as_mut_slice())
        .map_err(|e| CryptoError::KeyDerivationFailed(e.to_string()))?;

    Ok(key)
}

/// Encrypt a recovery phrase with a PIN
///
/// Each call draws a fresh salt and nonce, so encrypting the same phrase
/// twice never yields the same record.
pub fn encrypt_mnemonic(
    phrase: &str,
    pin: &str,
    params: KdfParams,
) -> Result<EncryptedRecord, CryptoError> {
    let mut salt = [0u8; SALT_LEN];
    fill_random(&mut salt)?;

    let mut nonce = [0u8; NONCE_LEN];
    fill_random(&mut nonce)?;

    let key = derive_key(pin, &salt, params)?;

    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key.as_slice()));
    let ciphertext = cipher
        .encrypt(Nonce::from_slice(&nonce), phrase.as_bytes())
        .map_err(|e| CryptoError::EncryptionFailed(e.to_string()))?;

    Ok(EncryptedRecord {
        params,
        salt,
        nonce,
        ciphertext,
    })
}

/// Decrypt a record with a PIN
///
/// # Errors
/// `DecryptionFailed` if the PIN is wrong or any byte of the record was altered.
pub fn decrypt_mnemonic(
    record: &EncryptedRecord,
    pin: &str,
) -> Result<Zeroizing<String>, CryptoError> {
    let key = derive_key(pin, &record.salt, record.params)?;

    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key.as_slice()));
    let plaintext = Zeroizing::new(
        cipher
            .decrypt(Nonce::from_slice(&record.nonce), record.ciphertext.as_slice())
            .map_err(|_| {
                CryptoError::DecryptionFailed("Invalid PIN or corrupted data".to_string())
            })?,
    );

    let phrase = std::str::from_utf8(&plaintext)
        .map_err(|_| CryptoError::DecryptionFailed("Phrase is not valid UTF-8".to_string()))?;

    Ok(Zeroizing::new(phrase.to_owned()))
}
