//! Security-specific tests for the stored record format.
//!
//! These tests verify:
//! 1. Wrong PINs and tampered records are rejected
//! 2. Malformed inputs don't panic
//! 3. Nothing secret leaks into the stored string

use base64::{engine::general_purpose::STANDARD, Engine as _};
use pinvault_core::crypto::{
    decrypt_mnemonic, encrypt_mnemonic, EncryptedRecord, KdfParams, MIN_RECORD_LEN,
};
use pinvault_core::seed::{generate_mnemonic, WordCount};

const PHRASE: &str = "test test test test test test test test test test test junk";

fn fast() -> KdfParams {
    KdfParams {
        m_cost: 1024,
        t_cost: 1,
        p_cost: 1,
    }
}

// ============================================================================
// 1. Record Encryption Security Tests
// ============================================================================

#[test]
fn test_wrong_pin_fails_decryption() {
    let record = encrypt_mnemonic(PHRASE, "1234", fast()).unwrap();
    let result = decrypt_mnemonic(&record, "1235");
    assert!(result.is_err(), "Decryption with wrong PIN should fail");
}

#[test]
fn test_pin_is_not_trimmed_or_normalized() {
    let record = encrypt_mnemonic(PHRASE, "1234", fast()).unwrap();
    assert!(decrypt_mnemonic(&record, "1234 ").is_err());
    assert!(decrypt_mnemonic(&record, " 1234").is_err());
    assert!(decrypt_mnemonic(&record, "1234").is_ok());
}

#[test]
fn test_tampered_salt_fails_decryption() {
    let record = encrypt_mnemonic(PHRASE, "1234", fast()).unwrap();
    let mut bytes = record.to_bytes();

    // Salt starts right after the 13-byte header
    bytes[13] ^= 0xFF;

    let tampered = EncryptedRecord::from_bytes(&bytes).unwrap();
    assert!(decrypt_mnemonic(&tampered, "1234").is_err());
}

#[test]
fn test_tampered_nonce_fails_decryption() {
    let record = encrypt_mnemonic(PHRASE, "1234", fast()).unwrap();
    let mut bytes = record.to_bytes();

    // Nonce occupies bytes 29..41
    bytes[29] ^= 0xFF;

    let tampered = EncryptedRecord::from_bytes(&bytes).unwrap();
    assert!(decrypt_mnemonic(&tampered, "1234").is_err());
}

#[test]
fn test_tampered_ciphertext_fails_decryption() {
    let record = encrypt_mnemonic(PHRASE, "1234", fast()).unwrap();
    let mut bytes = record.to_bytes();

    bytes[45] ^= 0xFF;

    let tampered = EncryptedRecord::from_bytes(&bytes).unwrap();
    assert!(
        decrypt_mnemonic(&tampered, "1234").is_err(),
        "Tampered ciphertext should fail (GCM auth tag)"
    );
}

#[test]
fn test_truncated_record_fails() {
    let record = encrypt_mnemonic(PHRASE, "1234", fast()).unwrap();
    let bytes = record.to_bytes();

    // Header + salt + nonce only, no ciphertext
    let truncated = &bytes[..41];
    assert!(EncryptedRecord::from_bytes(truncated).is_err());

    // Dropping the tail of the tag parses but cannot authenticate
    let short_tag = &bytes[..bytes.len() - 1];
    let parsed = EncryptedRecord::from_bytes(short_tag).unwrap();
    assert!(decrypt_mnemonic(&parsed, "1234").is_err());
}

#[test]
fn test_record_length_matches_layout() {
    let record = encrypt_mnemonic(PHRASE, "1234", fast()).unwrap();
    // header 13 + salt 16 + nonce 12 + phrase + tag 16
    assert_eq!(record.to_bytes().len(), 13 + 16 + 12 + PHRASE.len() + 16);
    assert_eq!(MIN_RECORD_LEN, 58);
}

// ============================================================================
// 2. Malformed Input Tests
// ============================================================================

#[test]
fn test_arbitrary_bytes_do_not_panic() {
    for len in 0..(MIN_RECORD_LEN + 8) {
        for fill in [0x00u8, 0x01, 0x7F, 0xFF] {
            let data = vec![fill; len];
            let _ = EncryptedRecord::from_bytes(&data);
            let _ = EncryptedRecord::decode(&STANDARD.encode(&data));
        }
    }
}

#[test]
fn test_non_base64_strings_rejected() {
    for input in ["", " ", "====", "wallet/mnemonic", "💥💥💥", PHRASE] {
        assert!(EncryptedRecord::decode(input).is_err(), "{:?}", input);
    }
}

// ============================================================================
// 3. Leakage Tests
// ============================================================================

#[test]
fn test_encoded_record_reveals_no_words() {
    let mnemonic = generate_mnemonic(WordCount::Words12).unwrap().to_string();
    let record = encrypt_mnemonic(&mnemonic, "582071", fast()).unwrap();

    let encoded = record.encode();
    let decoded = STANDARD.decode(&encoded).unwrap();
    let raw = String::from_utf8_lossy(&decoded);

    for word in mnemonic.split_whitespace().filter(|w| w.len() >= 4) {
        assert!(!encoded.contains(word));
        assert!(!raw.contains(word));
    }
    assert!(!raw.contains("582071"));
}
