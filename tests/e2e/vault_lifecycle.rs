//! End-to-end vault lifecycle across the storage backends.
//!
//! Run with: cargo test --test vault_lifecycle

use pinvault_core::crypto::{EncryptedRecord, KdfParams};
use pinvault_core::seed::{Signer, WordCount};
use pinvault_store::{FileStore, KeyValueStore, MemoryStore, SqliteStore};
use pinvault_vault::{CredentialVault, VaultError, DEFAULT_STORAGE_KEY};
use std::sync::Arc;

const PHRASE: &str = "test test test test test test test test test test test junk";

fn fast() -> KdfParams {
    KdfParams {
        m_cost: 1024,
        t_cost: 1,
        p_cost: 1,
    }
}

/// Walk one store through provision → unlock → wrong PIN → remove.
async fn exercise<S: KeyValueStore>(vault: CredentialVault<S>) {
    assert!(!vault.exists(), "fresh store should be empty");
    assert!(vault.load("1234").await.is_none());

    let signer = Signer::generate(WordCount::Words12).unwrap();
    vault.save("1234", &signer).await.unwrap();
    assert!(vault.exists());

    let stored = vault.store().get(DEFAULT_STORAGE_KEY).unwrap().unwrap();
    assert!(EncryptedRecord::decode(&stored).is_ok());

    assert_eq!(vault.load("1234").await, signer.mnemonic_phrase());
    assert!(vault.load("9999").await.is_none());

    vault.remove();
    assert!(!vault.exists());
    vault.remove();
    assert!(!vault.exists());
    assert!(vault.load("1234").await.is_none());
}

#[tokio::test]
async fn test_lifecycle_memory() {
    exercise(CredentialVault::new(MemoryStore::new()).with_kdf_params(fast())).await;
}

#[tokio::test]
async fn test_lifecycle_file() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::new(dir.path().join("wallet.json"));
    exercise(CredentialVault::new(store).with_kdf_params(fast())).await;
}

#[tokio::test]
async fn test_lifecycle_sqlite() {
    let dir = tempfile::tempdir().unwrap();
    let store = SqliteStore::open(&dir.path().join("wallet.db")).unwrap();
    exercise(CredentialVault::new(store).with_kdf_params(fast())).await;
}

#[tokio::test]
async fn test_lifecycle_boxed_store() {
    let store: Box<dyn KeyValueStore> = Box::new(MemoryStore::new());
    exercise(CredentialVault::new(store).with_kdf_params(fast())).await;
}

#[tokio::test]
async fn test_documented_example() {
    let vault = CredentialVault::new(MemoryStore::new()).with_kdf_params(fast());
    let phrase = zeroize::Zeroizing::new(PHRASE.to_string());

    vault.save("1234", &phrase).await.unwrap();

    let stored = vault.store().get(DEFAULT_STORAGE_KEY).unwrap().unwrap();
    assert!(!stored.is_empty());
    assert_ne!(stored, PHRASE);

    assert_eq!(vault.load("1234").await.unwrap().as_str(), PHRASE);
    assert!(vault.load("9999").await.is_none());
}

#[tokio::test]
async fn test_many_pins_never_yield_other_secret() {
    let vault = CredentialVault::new(MemoryStore::new()).with_kdf_params(fast());
    let phrase = zeroize::Zeroizing::new(PHRASE.to_string());
    vault.save("482913", &phrase).await.unwrap();

    for candidate in ["000000", "482912", "482914", "48291", "4829130", "", "abcdef"] {
        assert!(vault.load(candidate).await.is_none(), "{} unlocked", candidate);
    }
    assert_eq!(vault.load("482913").await.unwrap().as_str(), PHRASE);
}

#[tokio::test]
async fn test_single_byte_corruption_anywhere_in_body() {
    let store = Arc::new(MemoryStore::new());
    let vault = CredentialVault::new(store.clone()).with_kdf_params(fast());
    let phrase = zeroize::Zeroizing::new(PHRASE.to_string());
    vault.save("1234", &phrase).await.unwrap();

    let original = store.get(DEFAULT_STORAGE_KEY).unwrap().unwrap();
    let bytes = EncryptedRecord::decode(&original).unwrap().to_bytes();

    // Salt, nonce, ciphertext and tag
    for idx in [13, 20, 29, 40, 41, 50, bytes.len() - 16, bytes.len() - 1] {
        let mut corrupted = bytes.clone();
        corrupted[idx] ^= 0x80;
        let encoded = EncryptedRecord::from_bytes(&corrupted).unwrap().encode();
        store.set(DEFAULT_STORAGE_KEY, &encoded).unwrap();

        assert!(vault.load("1234").await.is_none(), "byte {} not detected", idx);
    }

    store.set(DEFAULT_STORAGE_KEY, &original).unwrap();
    assert_eq!(vault.load("1234").await.unwrap().as_str(), PHRASE);
}

#[tokio::test]
async fn test_save_failures_are_typed() {
    let vault = CredentialVault::new(MemoryStore::new()).with_kdf_params(fast());

    let no_signer: Option<Signer> = None;
    let err = vault.save("1234", &no_signer).await.unwrap_err();
    assert!(matches!(err, VaultError::SourceUnavailable));
    assert!(!vault.exists());
}

#[tokio::test]
async fn test_two_keys_in_one_store() {
    let store = Arc::new(MemoryStore::new());
    let main = CredentialVault::new(store.clone()).with_kdf_params(fast());
    let spare = CredentialVault::new(store.clone())
        .with_storage_key("wallet/spare")
        .with_kdf_params(fast());

    let phrase = zeroize::Zeroizing::new(PHRASE.to_string());
    main.save("1111", &phrase).await.unwrap();
    assert!(!spare.exists());

    spare.save("2222", &phrase).await.unwrap();
    main.remove();

    assert!(!main.exists());
    assert_eq!(spare.load("2222").await.unwrap().as_str(), PHRASE);
    assert_eq!(store.len(), 1);
}
