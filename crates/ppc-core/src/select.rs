//! Row selection.
//!
//! Random selection takes the generator as an argument; nothing here
//! touches process-wide state, so two selections in one process never
//! interfere.

use ppc_common::{Error, ObservationId, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

/// Ordered observation ids chosen for plotting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Selection(Vec<ObservationId>);

impl Selection {
    /// Caller-supplied ids, kept in the given order.
    ///
    /// Every id must be below `n_total`. Repeated ids are allowed and each
    /// gets its own panel.
    pub fn explicit(ids: Vec<ObservationId>, n_total: usize) -> Result<Self> {
        if ids.is_empty() {
            return Err(Error::InvalidArgument(
                "at least one observation id is required".to_string(),
            ));
        }
        if let Some(bad) = ids.iter().find(|id| id.index() >= n_total) {
            return Err(Error::UnknownObservation {
                id: bad.index(),
                n_observations: n_total,
            });
        }
        Ok(Selection(ids))
    }

    pub fn as_slice(&self) -> &[ObservationId] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ObservationId> {
        self.0.iter()
    }
}

impl<'a> IntoIterator for &'a Selection {
    type Item = &'a ObservationId;
    type IntoIter = std::slice::Iter<'a, ObservationId>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Draw `k` distinct ids uniformly without replacement from `0..n_total`.
pub fn select_rows<R: Rng + ?Sized>(n_total: usize, k: usize, rng: &mut R) -> Result<Selection> {
    if k == 0 {
        return Err(Error::InvalidArgument(
            "number of rows to select must be at least 1".to_string(),
        ));
    }
    if k > n_total {
        return Err(Error::SampleSizeExceedsPopulation {
            requested: k,
            population: n_total,
        });
    }

    let ids = rand::seq::index::sample(rng, n_total, k)
        .into_iter()
        .map(ObservationId)
        .collect();
    Ok(Selection(ids))
}

/// Generator for [`select_rows`]: reproducible for `Some(seed)`, seeded
/// from the operating system otherwise.
pub fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}
