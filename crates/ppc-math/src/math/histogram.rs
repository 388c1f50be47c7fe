//! Equal-width density histograms.
//!
//! Binning matches numpy's `histogram(values, bins, density=True)`:
//! bins span `[min, max]` of the data, every bin is half-open except the
//! last, which also includes `max`. A degenerate range (all values equal)
//! is widened to `[v - 0.5, v + 0.5]`.

use serde::Serialize;

/// A binned sample pool.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Histogram {
    /// Bin edges, `bins + 1` ascending values.
    pub edges: Vec<f64>,
    /// Raw count per bin.
    pub counts: Vec<usize>,
    /// Normalized height per bin; bar areas sum to 1.
    pub densities: Vec<f64>,
}

impl Histogram {
    /// Bin `values` into `bins` equal-width bins and normalize to a density.
    ///
    /// Returns None if `values` is empty, `bins` is zero, any value is not
    /// finite, or the range is too narrow to split into `bins` bins.
    pub fn density(values: &[f64], bins: usize) -> Option<Self> {
        if values.is_empty() || bins == 0 || values.iter().any(|v| !v.is_finite()) {
            return None;
        }
        let (mut lo, mut hi) = super::summary::min_max(values)?;
        if lo == hi {
            lo -= 0.5;
            hi += 0.5;
        }

        // Divide before subtracting: `hi - lo` overflows for pools spanning
        // most of the f64 range.
        let n = bins as f64;
        let width = hi / n - lo / n;
        if !(width.is_finite() && width > 0.0) {
            return None;
        }
        let edges: Vec<f64> = (0..=bins)
            .map(|i| if i == bins { hi } else { lo + width * i as f64 })
            .collect();

        let mut counts = vec![0usize; bins];
        for &v in values {
            let idx = (v / width - lo / width).floor() as usize;
            counts[idx.min(bins - 1)] += 1;
        }

        let total = values.len() as f64;
        let densities = counts
            .iter()
            .zip(edges.windows(2))
            .map(|(&c, e)| c as f64 / (total * (e[1] - e[0])))
            .collect();

        Some(Histogram {
            edges,
            counts,
            densities,
        })
    }

    /// Number of bins.
    pub fn bins(&self) -> usize {
        self.counts.len()
    }

    /// Tallest bar height.
    pub fn max_density(&self) -> f64 {
        self.densities.iter().cloned().fold(0.0, f64::max)
    }

    /// `(left, right, density)` for each bar.
    pub fn bars(&self) -> impl Iterator<Item = (f64, f64, f64)> + '_ {
        self.edges
            .windows(2)
            .zip(self.densities.iter())
            .map(|(e, &d)| (e[0], e[1], d))
    }
}
