//! Fuzz target for settings.json parsing and validation.

#![no_main]

use libfuzzer_sys::fuzz_target;
use ppc_config::{validate_settings, Settings};

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(settings) = Settings::from_json(s) {
            let _ = validate_settings(&settings);
        }
    }
});
