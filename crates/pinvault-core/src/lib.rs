//! PinVault Core
//!
//! Shared primitives for PIN-protected recovery phrase storage.
//!
//! # Encrypted Storage
//!
//! Recovery phrases are encrypted at rest using Argon2id + AES-256-GCM and
//! serialized into a single base64 record (see [`crypto`]).
//!
//! # Signers
//!
//! [`seed::Signer`] owns a BIP-39 mnemonic in memory and is the usual
//! source of the phrase handed to the vault.

pub mod crypto;
pub mod pin;
pub mod seed;

pub use crypto::{decrypt_mnemonic, encrypt_mnemonic, CryptoError, EncryptedRecord, KdfParams};
pub use seed::{generate_mnemonic, parse_mnemonic, SeedError, Signer, WordCount};
