//! Observation identity.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Position of an observation in the observed-outcomes sequence.
///
/// Ids are dense: an inference result with `n` observations accepts
/// ids `0..n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObservationId(pub usize);

impl ObservationId {
    /// Index into per-observation storage.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for ObservationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<usize> for ObservationId {
    fn from(id: usize) -> Self {
        ObservationId(id)
    }
}

impl std::str::FromStr for ObservationId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<usize>().map(ObservationId)
    }
}
