//! JSON interchange format for inference results.
//!
//! ```json
//! {
//!   "observed_data":        { "y": [1.0, 2.0] },
//!   "posterior_predictive": { "y": [[[1.1, 2.1], [0.9, 1.8]]] }
//! }
//! ```
//!
//! Group names follow the upstream inference-data layout; each group maps
//! variable names to arrays. Posterior predictive arrays are
//! `[chain][draw][observation]`.

use std::collections::BTreeMap;

use ppc_common::{Error, Result};
use serde::{Deserialize, Serialize};

use super::InferenceData;

/// Variable read when none is configured.
pub const DEFAULT_VAR_NAME: &str = "y";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InferenceDocument {
    pub observed_data: BTreeMap<String, Vec<f64>>,
    pub posterior_predictive: BTreeMap<String, Vec<Vec<Vec<f64>>>>,
}

impl InferenceDocument {
    /// Extract `var_name` from both groups and flatten.
    pub fn into_inference_data(mut self, var_name: &str) -> Result<InferenceData> {
        let observed = self.observed_data.remove(var_name).ok_or_else(|| {
            Error::InvalidData(format!(
                "observed_data has no variable '{}' (found: {})",
                var_name,
                key_list(&self.observed_data)
            ))
        })?;
        let draws = self.posterior_predictive.remove(var_name).ok_or_else(|| {
            Error::InvalidData(format!(
                "posterior_predictive has no variable '{}' (found: {})",
                var_name,
                key_list(&self.posterior_predictive)
            ))
        })?;
        InferenceData::from_chains(observed, draws)
    }
}

fn key_list<V>(map: &BTreeMap<String, V>) -> String {
    if map.is_empty() {
        return "none".to_string();
    }
    map.keys().map(String::as_str).collect::<Vec<_>>().join(", ")
}
