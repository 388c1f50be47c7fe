//! Fuzz target for regression target arrays.

#![no_main]

use libfuzzer_sys::fuzz_target;
use ppc_core::metrics::{regression_metrics, Targets};

fuzz_target!(|data: &[u8]| {
    if let Ok(targets) = Targets::from_json_reader(data) {
        // Scoring a target set against itself must not panic
        let _ = regression_metrics(&targets, &targets);
    }
});
