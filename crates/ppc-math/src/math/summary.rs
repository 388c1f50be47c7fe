//! Location and quantile summaries of a sample pool.
//!
//! Percentiles follow the "linear" definition used by numpy: for a sorted
//! pool `x` of length `n` and a percentile `q` in `[0, 100]`, the virtual
//! index is `h = (n - 1) * q / 100` and the result interpolates between
//! `x[floor(h)]` and `x[floor(h) + 1]`.

/// Arithmetic mean. Returns None for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let n = values.len() as f64;
    let sum: f64 = values.iter().sum();
    if sum.is_finite() || values.iter().any(|v| !v.is_finite()) {
        return Some(sum / n);
    }
    // The running sum overflowed although every value is finite.
    Some(values.iter().map(|v| v / n).sum())
}

/// Smallest and largest value. Returns None for an empty slice or if any
/// value is NaN.
pub fn min_max(values: &[f64]) -> Option<(f64, f64)> {
    if values.is_empty() || values.iter().any(|v| v.is_nan()) {
        return None;
    }
    let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    Some((min, max))
}

/// Linear-interpolated percentile of an unsorted pool.
///
/// Returns None for an empty pool, a NaN in the pool, or `q` outside `[0, 100]`.
pub fn percentile(values: &[f64], q: f64) -> Option<f64> {
    let sorted = sorted_copy(values)?;
    percentile_sorted(&sorted, q)
}

/// Several percentiles of one pool, sorting it only once.
pub fn percentiles(values: &[f64], qs: &[f64]) -> Option<Vec<f64>> {
    let sorted = sorted_copy(values)?;
    qs.iter().map(|&q| percentile_sorted(&sorted, q)).collect()
}

/// Linear-interpolated percentile of an already ascending slice.
pub fn percentile_sorted(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() || !(0.0..=100.0).contains(&q) {
        return None;
    }
    let h = (sorted.len() - 1) as f64 * q / 100.0;
    let lo = h.floor() as usize;
    let hi = (lo + 1).min(sorted.len() - 1);
    let frac = h - lo as f64;
    let (a, b) = (sorted[lo], sorted[hi]);
    let gap = b - a;
    if gap.is_finite() {
        Some(a + frac * gap)
    } else {
        Some(a * (1.0 - frac) + b * frac)
    }
}

/// Central interval covering `level` of the pool mass, e.g. 0.95 gives the
/// 2.5th and 97.5th percentiles.
pub fn central_interval(values: &[f64], level: f64) -> Option<(f64, f64)> {
    if !(level > 0.0 && level < 1.0) {
        return None;
    }
    let tail = (1.0 - level) / 2.0 * 100.0;
    let bounds = percentiles(values, &[tail, 100.0 - tail])?;
    Some((bounds[0], bounds[1]))
}

fn sorted_copy(values: &[f64]) -> Option<Vec<f64>> {
    if values.is_empty() || values.iter().any(|v| v.is_nan()) {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    Some(sorted)
}
