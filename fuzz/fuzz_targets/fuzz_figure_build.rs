//! Fuzz target for figure assembly from arbitrary draw pools.
//!
//! Histogram binning and axis ranges must cope with any finite pool,
//! including single values and extreme spreads.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use ppc_core::inference::InferenceData;
use ppc_core::render::{plot_posterior_predictive_comparison, ComparisonOptions};

#[derive(Debug, Arbitrary)]
struct Input {
    observed: f64,
    draws: Vec<f64>,
    bins: u8,
}

fuzz_target!(|input: Input| {
    let Ok(data) = InferenceData::new(vec![input.observed], vec![input.draws]) else {
        return;
    };
    let options = ComparisonOptions {
        bins: input.bins as usize,
        ..ComparisonOptions::default()
    };
    let _ = plot_posterior_predictive_comparison(&data, &[0.into()], &options);
});
