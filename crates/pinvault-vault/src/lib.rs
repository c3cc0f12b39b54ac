//! PinVault
//!
//! Keeps a wallet's recovery phrase in a local key-value store, encrypted
//! under a user PIN.
//!
//! # Contract
//!
//! - At most one record exists, under a single storage key. `save`
//!   overwrites it, `remove` deletes it, and a missing or empty value means
//!   no wallet has been provisioned.
//! - [`CredentialVault::save`] reports what went wrong.
//! - [`CredentialVault::load`] and [`CredentialVault::remove`] never fail:
//!   problems are logged and `load` returns `None`. A wrong PIN, a corrupted
//!   record and an empty store all look the same to the caller.
//!
//! Callers are expected to serialize calls; the vault does no locking of
//! its own.

pub mod source;

use pinvault_core::crypto::{decrypt_mnemonic, encrypt_mnemonic, CryptoError, EncryptedRecord};
use pinvault_core::KdfParams;
use pinvault_store::{KeyValueStore, StoreError};
use thiserror::Error;
use zeroize::Zeroizing;

pub use source::SecretSource;

/// Storage key used unless the vault is configured otherwise
pub const DEFAULT_STORAGE_KEY: &str = "wallet/mnemonic";

#[derive(Error, Debug)]
pub enum VaultError {
    #[error("No recovery phrase available to save")]
    SourceUnavailable,

    #[error("Cryptography unavailable: {0}")]
    CryptoUnavailable(String),

    #[error("Storage failure: {0}")]
    Persistence(#[from] StoreError),

    #[error("Invalid PIN or corrupted record")]
    DecryptionFailure,

    #[error("No wallet in storage")]
    NotProvisioned,

    #[error("Encryption failed: {0}")]
    Crypto(CryptoError),
}

impl From<CryptoError> for VaultError {
    fn from(e: CryptoError) -> Self {
        match e {
            CryptoError::RandomUnavailable(msg) => Self::CryptoUnavailable(msg),
            other => Self::Crypto(other),
        }
    }
}

impl VaultError {
    /// Message safe to show an end user after a failed save
    pub fn user_message(&self) -> &'static str {
        "Failure saving wallet"
    }
}

/// Run CPU-heavy crypto off the async workers.
///
/// Outside a Tokio runtime there is nowhere to run it, which is reported as
/// `CryptoUnavailable` rather than a panic.
async fn run_blocking<F, T>(f: F) -> Result<T, VaultError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    let handle = tokio::runtime::Handle::try_current()
        .map_err(|e| VaultError::CryptoUnavailable(e.to_string()))?;
    handle
        .spawn_blocking(f)
        .await
        .map_err(|e| VaultError::CryptoUnavailable(e.to_string()))
}

/// PIN-protected storage for a single recovery phrase
pub struct CredentialVault<S> {
    store: S,
    storage_key: String,
    kdf: KdfParams,
}

impl<S: KeyValueStore> CredentialVault<S> {
    /// Vault over `store` with the default key and Argon2 parameters
    pub fn new(store: S) -> Self {
        Self {
            store,
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            kdf: KdfParams::default(),
        }
    }

    pub fn with_storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }

    /// Argon2 parameters for records written from now on. Existing records
    /// keep the parameters they were written with.
    pub fn with_kdf_params(mut self, params: KdfParams) -> Self {
        self.kdf = params;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    pub fn kdf_params(&self) -> KdfParams {
        self.kdf
    }

    /// Whether a wallet record is present
    pub fn exists(&self) -> bool {
        match self.store.get(&self.storage_key) {
            Ok(value) => value.is_some_and(|v| !v.is_empty()),
            Err(e) => {
                log::warn!("Failed to check storage for wallet: {}", e);
                false
            }
        }
    }

    /// Encrypt the phrase from `source` under `pin` and store it, replacing
    /// any existing record. Outside a Tokio runtime this fails with
    /// [`VaultError::CryptoUnavailable`].
    pub async fn save(&self, pin: &str, source: &impl SecretSource) -> Result<(), VaultError> {
        let result = self.seal(pin, source).await;
        if let Err(e) = &result {
            log::error!("Failed to save wallet to storage: {}", e);
        }
        result
    }

    async fn seal(&self, pin: &str, source: &impl SecretSource) -> Result<(), VaultError> {
        let phrase = source
            .mnemonic_phrase()
            .ok_or(VaultError::SourceUnavailable)?;
        let pin = Zeroizing::new(pin.to_owned());
        let params = self.kdf;

        let record = run_blocking(move || encrypt_mnemonic(&phrase, &pin, params)).await??;

        self.store.set(&self.storage_key, &record.encode())?;
        log::info!("Wallet saved to storage");
        Ok(())
    }

    /// Decrypt the stored phrase with `pin`.
    ///
    /// `None` when nothing is stored, the PIN is wrong, the record is
    /// damaged, or the store can't be read. Crypto runs on the Tokio
    /// blocking pool; polled outside a runtime this also yields `None`.
    pub async fn load(&self, pin: &str) -> Option<Zeroizing<String>> {
        match self.unlock(pin).await {
            Ok(phrase) => Some(phrase),
            Err(VaultError::NotProvisioned) => {
                log::warn!("No wallet found in storage");
                None
            }
            Err(e) => {
                log::error!("Failed to load wallet from storage: {}", e);
                None
            }
        }
    }

    /// Like [`load`](Self::load) but keeps the reason for failure.
    pub(crate) async fn unlock(&self, pin: &str) -> Result<Zeroizing<String>, VaultError> {
        let encoded = self
            .store
            .get(&self.storage_key)?
            .filter(|v| !v.is_empty())
            .ok_or(VaultError::NotProvisioned)?;

        let record = EncryptedRecord::decode(&encoded).map_err(|e| {
            log::debug!("Stored wallet record is malformed: {}", e);
            VaultError::DecryptionFailure
        })?;
        let pin = Zeroizing::new(pin.to_owned());

        run_blocking(move || decrypt_mnemonic(&record, &pin))
            .await?
            .map_err(|e| {
                log::debug!("Wallet record did not open: {}", e);
                VaultError::DecryptionFailure
            })
    }

    /// Delete the stored record. Safe to call when nothing is stored.
    pub fn remove(&self) {
        match self.store.remove(&self.storage_key) {
            Ok(()) => log::info!("Wallet removed from storage"),
            Err(e) => log::error!("Failed to remove wallet from storage: {}", e),
        }
    }
}
