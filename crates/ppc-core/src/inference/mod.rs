//! Inference results: observed outcomes and posterior predictive draws.
//!
//! The sampler produces draws indexed by chain, draw and observation.
//! [`InferenceData`] flattens them once at ingest into one pool per
//! observation, so later lookups are a plain index.

mod document;

pub use document::{InferenceDocument, DEFAULT_VAR_NAME};

use std::io::Read;
use std::path::Path;

use ppc_common::{Error, ObservationId, Result};
use tracing::debug;

/// Observed outcomes paired with their posterior predictive draw pools.
#[derive(Debug, Clone, PartialEq)]
pub struct InferenceData {
    observed: Vec<f64>,
    pools: Vec<Vec<f64>>,
}

impl InferenceData {
    /// Build from pre-flattened pools, `pools[i]` holding every draw for
    /// observation `i`.
    pub fn new(observed: Vec<f64>, pools: Vec<Vec<f64>>) -> Result<Self> {
        if observed.is_empty() {
            return Err(Error::InvalidData("no observations".to_string()));
        }
        if pools.len() != observed.len() {
            return Err(Error::ShapeMismatch {
                expected: format!("{} draw pools", observed.len()),
                actual: format!("{} draw pools", pools.len()),
            });
        }
        if let Some(i) = observed.iter().position(|v| !v.is_finite()) {
            return Err(Error::NonFinite(format!("observed value for observation {}", i)));
        }
        for (i, pool) in pools.iter().enumerate() {
            if pool.is_empty() {
                return Err(Error::EmptyDrawPool { id: i });
            }
            if pool.iter().any(|v| !v.is_finite()) {
                return Err(Error::NonFinite(format!("draw pool of observation {}", i)));
            }
        }

        Ok(Self { observed, pools })
    }

    /// Build from sampler output laid out as
    /// `posterior_predictive[chain][draw][observation]`.
    ///
    /// Pools are filled chain-major: all draws of chain 0, then chain 1.
    pub fn from_chains(
        observed: Vec<f64>,
        posterior_predictive: Vec<Vec<Vec<f64>>>,
    ) -> Result<Self> {
        let n_obs = observed.len();
        let n_chains = posterior_predictive.len();
        if n_chains == 0 {
            return Err(Error::InvalidData(
                "posterior predictive has no chains".to_string(),
            ));
        }
        let n_draws = posterior_predictive[0].len();

        let mut pools: Vec<Vec<f64>> = (0..n_obs)
            .map(|_| Vec::with_capacity(n_chains * n_draws))
            .collect();

        for (c, chain) in posterior_predictive.iter().enumerate() {
            if chain.len() != n_draws {
                return Err(Error::ShapeMismatch {
                    expected: format!("{} draws per chain", n_draws),
                    actual: format!("{} draws in chain {}", chain.len(), c),
                });
            }
            for (d, draw) in chain.iter().enumerate() {
                if draw.len() != n_obs {
                    return Err(Error::ShapeMismatch {
                        expected: format!("{} values per draw", n_obs),
                        actual: format!("{} values in chain {} draw {}", draw.len(), c, d),
                    });
                }
                for (pool, &v) in pools.iter_mut().zip(draw) {
                    pool.push(v);
                }
            }
        }

        let data = Self::new(observed, pools)?;
        debug!(
            n_observations = n_obs,
            n_chains, n_draws, "flattened posterior predictive draws"
        );
        Ok(data)
    }

    /// Read the JSON interchange document, taking variable `var_name` from
    /// both groups.
    pub fn from_json_reader<R: Read>(reader: R, var_name: &str) -> Result<Self> {
        let doc: InferenceDocument = serde_json::from_reader(reader)?;
        doc.into_inference_data(var_name)
    }

    pub fn from_json_str(json: &str, var_name: &str) -> Result<Self> {
        Self::from_json_reader(json.as_bytes(), var_name)
    }

    pub fn from_path(path: &Path, var_name: &str) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        Self::from_json_reader(std::io::BufReader::new(file), var_name)
    }

    pub fn n_observations(&self) -> usize {
        self.observed.len()
    }

    /// Observed outcome for `id`.
    pub fn observed(&self, id: ObservationId) -> Result<f64> {
        self.check(id)?;
        Ok(self.observed[id.index()])
    }

    /// Flattened draw pool for `id`.
    pub fn draws(&self, id: ObservationId) -> Result<&[f64]> {
        self.check(id)?;
        Ok(&self.pools[id.index()])
    }

    /// Size of every observation's pool (chains × draws when built from chains).
    pub fn pool_size(&self, id: ObservationId) -> Result<usize> {
        self.draws(id).map(<[f64]>::len)
    }

    fn check(&self, id: ObservationId) -> Result<()> {
        if id.index() >= self.observed.len() {
            return Err(Error::UnknownObservation {
                id: id.index(),
                n_observations: self.observed.len(),
            });
        }
        Ok(())
    }
}
