//! Fuzz target for inference data documents.
//!
//! Parsing and flattening must reject malformed or ragged input with an
//! error, never a panic.

#![no_main]

use libfuzzer_sys::fuzz_target;
use ppc_core::inference::InferenceData;

fuzz_target!(|data: &[u8]| {
    if let Ok(inference) = InferenceData::from_json_reader(data, "y") {
        // Every accepted document must be fully summarizable
        for i in 0..inference.n_observations() {
            let _ = ppc_core::summary::summarize_one(&inference, i.into());
        }
    }
});
