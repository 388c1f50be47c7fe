//! Regression error metrics over paired true/predicted values.
//!
//! Every function takes `(y_true, y_pred)` and returns None when the
//! slices differ in length or are empty.

/// Mean squared error: mean((t - p)²).
pub fn mse(y_true: &[f64], y_pred: &[f64]) -> Option<f64> {
    paired_mean(y_true, y_pred, |t, p| (t - p).powi(2))
}

/// Root mean squared error: sqrt(MSE).
pub fn rmse(y_true: &[f64], y_pred: &[f64]) -> Option<f64> {
    mse(y_true, y_pred).map(f64::sqrt)
}

/// Mean absolute error: mean(|t - p|).
pub fn mae(y_true: &[f64], y_pred: &[f64]) -> Option<f64> {
    paired_mean(y_true, y_pred, |t, p| (t - p).abs())
}

/// Coefficient of determination: 1 - SS_res / SS_tot.
///
/// When `y_true` has zero variance the ratio is undefined; the score is
/// 1.0 for a perfect prediction and 0.0 otherwise. With fewer than two
/// samples the score is not defined and NaN is returned.
pub fn r2_score(y_true: &[f64], y_pred: &[f64]) -> Option<f64> {
    if y_true.len() != y_pred.len() || y_true.is_empty() {
        return None;
    }
    if y_true.len() < 2 {
        return Some(f64::NAN);
    }

    let y_mean = y_true.iter().sum::<f64>() / y_true.len() as f64;
    let ss_res: f64 = y_true
        .iter()
        .zip(y_pred.iter())
        .map(|(t, p)| (t - p).powi(2))
        .sum();
    let ss_tot: f64 = y_true.iter().map(|t| (t - y_mean).powi(2)).sum();

    if ss_tot == 0.0 {
        return Some(if ss_res == 0.0 { 1.0 } else { 0.0 });
    }
    Some(1.0 - ss_res / ss_tot)
}

fn paired_mean(y_true: &[f64], y_pred: &[f64], f: impl Fn(f64, f64) -> f64) -> Option<f64> {
    if y_true.len() != y_pred.len() || y_true.is_empty() {
        return None;
    }
    let total: f64 = y_true.iter().zip(y_pred.iter()).map(|(&t, &p)| f(t, p)).sum();
    Some(total / y_true.len() as f64)
}
