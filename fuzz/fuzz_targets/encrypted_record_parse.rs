#![no_main]

use libfuzzer_sys::fuzz_target;
use pinvault_core::crypto::EncryptedRecord;

fuzz_target!(|data: &[u8]| {
    // EncryptedRecord::from_bytes must never panic on arbitrary input.
    if let Ok(record) = EncryptedRecord::from_bytes(data) {
        // Re-serializing an accepted record must reproduce the input
        assert_eq!(record.to_bytes(), data);
    }

    // Same for the stored string form
    if let Ok(s) = std::str::from_utf8(data) {
        let _ = EncryptedRecord::decode(s);
    }
});
