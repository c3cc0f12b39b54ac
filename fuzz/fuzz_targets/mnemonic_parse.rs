#![no_main]

use libfuzzer_sys::fuzz_target;
use pinvault_core::seed::{parse_mnemonic, Signer};

fuzz_target!(|data: &[u8]| {
    // Parsing arbitrary text as a BIP-39 mnemonic must never panic.
    if let Ok(s) = std::str::from_utf8(data) {
        if parse_mnemonic(s).is_ok() {
            let signer = Signer::from_phrase(s).expect("parsed once, parses again");
            assert!(signer.mnemonic_phrase().is_some());
        }
    }
});
