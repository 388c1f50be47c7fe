//! Per-observation posterior predictive summaries.

use ppc_common::{Error, ObservationId, Result};
use serde::Serialize;
use tracing::debug;

use crate::inference::InferenceData;
use crate::select::Selection;

/// Interval mass used when none is given.
pub const DEFAULT_INTERVAL_LEVEL: f64 = 0.95;

/// Observed value, draw pool and its summary for one observation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryRecord {
    pub id: ObservationId,
    pub observed: f64,
    #[serde(skip)]
    pub draws: Vec<f64>,
    pub n_draws: usize,
    pub mean: f64,
    /// Lower bound of the central interval.
    pub lower: f64,
    /// Upper bound of the central interval.
    pub upper: f64,
    /// Interval mass, e.g. 0.95.
    pub level: f64,
}

impl SummaryRecord {
    /// Whether the observed value falls inside the interval.
    pub fn covers_observed(&self) -> bool {
        self.lower <= self.observed && self.observed <= self.upper
    }
}

/// One record per selected id, in selection order, with a 95% interval.
pub fn summarize(data: &InferenceData, selection: &Selection) -> Result<Vec<SummaryRecord>> {
    summarize_with_level(data, selection, DEFAULT_INTERVAL_LEVEL)
}

/// Like [`summarize`] with a custom interval mass in `(0, 1)`.
pub fn summarize_with_level(
    data: &InferenceData,
    selection: &Selection,
    level: f64,
) -> Result<Vec<SummaryRecord>> {
    check_level(level)?;
    let records = selection
        .iter()
        .map(|&id| summarize_at(data, id, level))
        .collect::<Result<Vec<_>>>()?;
    debug!(n_records = records.len(), level, "summarized selection");
    Ok(records)
}

/// 95% summary of a single observation.
pub fn summarize_one(data: &InferenceData, id: ObservationId) -> Result<SummaryRecord> {
    summarize_at(data, id, DEFAULT_INTERVAL_LEVEL)
}

fn summarize_at(data: &InferenceData, id: ObservationId, level: f64) -> Result<SummaryRecord> {
    let observed = data.observed(id)?;
    let draws = data.draws(id)?;

    let mean = ppc_math::mean(draws).ok_or(Error::EmptyDrawPool { id: id.index() })?;
    let (lower, upper) = ppc_math::central_interval(draws, level)
        .ok_or_else(|| Error::NonFinite(format!("draw pool of observation {}", id)))?;

    Ok(SummaryRecord {
        id,
        observed,
        draws: draws.to_vec(),
        n_draws: draws.len(),
        mean,
        lower,
        upper,
        level,
    })
}

fn check_level(level: f64) -> Result<()> {
    if !(level > 0.0 && level < 1.0) {
        return Err(Error::InvalidArgument(format!(
            "interval level must be between 0 and 1 (exclusive), got {}",
            level
        )));
    }
    Ok(())
}
