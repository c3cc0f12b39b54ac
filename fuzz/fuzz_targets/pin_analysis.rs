#![no_main]

use libfuzzer_sys::fuzz_target;
use pinvault_core::pin::analyze_pin;

fuzz_target!(|data: &[u8]| {
    // PIN analysis must never panic, whatever the user types.
    if let Ok(s) = std::str::from_utf8(data) {
        let _ = analyze_pin(s);
    }
});
