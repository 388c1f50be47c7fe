//! Regression error report: MSE, RMSE, MAE and R².

use std::io::{self, Read, Write};
use std::path::Path;

use ppc_common::{Error, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::logging::event_names;

/// Row-major `n_samples × n_targets` matrix of target values.
#[derive(Debug, Clone, PartialEq)]
pub struct Targets {
    n_samples: usize,
    n_targets: usize,
    values: Vec<f64>,
}

/// Accepted JSON layouts: a flat array (one target) or an array of rows.
#[derive(Deserialize)]
#[serde(untagged)]
enum TargetsDocument {
    Flat(Vec<f64>),
    Rows(Vec<Vec<f64>>),
}

impl Targets {
    /// Multi-target matrix, one inner vector per sample.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self> {
        let n_samples = rows.len();
        let n_targets = rows.first().map_or(0, Vec::len);
        if let Some((i, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != n_targets) {
            return Err(Error::ShapeMismatch {
                expected: format!("{} targets per sample", n_targets),
                actual: format!("{} targets in sample {}", row.len(), i),
            });
        }
        Ok(Targets {
            n_samples,
            n_targets,
            values: rows.into_iter().flatten().collect(),
        })
    }

    pub fn from_json_reader<R: Read>(reader: R) -> Result<Self> {
        match serde_json::from_reader(reader)? {
            TargetsDocument::Flat(values) => Ok(Targets::from(values)),
            TargetsDocument::Rows(rows) => Targets::from_rows(rows),
        }
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        Self::from_json_reader(io::BufReader::new(file))
    }

    /// `(n_samples, n_targets)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.n_samples, self.n_targets)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Values of target `j` across all samples.
    pub fn column(&self, j: usize) -> Vec<f64> {
        self.values
            .iter()
            .skip(j)
            .step_by(self.n_targets.max(1))
            .copied()
            .collect()
    }

    fn shape_string(&self) -> String {
        format!("({}, {})", self.n_samples, self.n_targets)
    }
}

impl From<Vec<f64>> for Targets {
    fn from(values: Vec<f64>) -> Self {
        Targets {
            n_samples: values.len(),
            n_targets: 1,
            values,
        }
    }
}

impl From<&[f64]> for Targets {
    fn from(values: &[f64]) -> Self {
        Targets::from(values.to_vec())
    }
}

/// Regression error summary.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RegressionMetrics {
    pub mse: f64,
    pub rmse: f64,
    pub mae: f64,
    pub r2: f64,
}

impl RegressionMetrics {
    /// `(name, value)` in report order.
    pub fn named(&self) -> [(&'static str, f64); 4] {
        [
            ("MSE", self.mse),
            ("RMSE", self.rmse),
            ("MAE", self.mae),
            ("R²", self.r2),
        ]
    }

    /// Report lines, `{prefix} {name}: {value:.4}`; no separator when
    /// `prefix` is empty. An undefined value prints as `nan`.
    pub fn lines(&self, prefix: &str) -> Vec<String> {
        let lead = if prefix.is_empty() {
            String::new()
        } else {
            format!("{} ", prefix)
        };
        self.named()
            .iter()
            .map(|(name, value)| format!("{}{}: {}", lead, name, format_value(*value)))
            .collect()
    }

    pub fn write_lines<W: Write>(&self, out: &mut W, prefix: &str) -> io::Result<()> {
        for line in self.lines(prefix) {
            writeln!(out, "{}", line)?;
        }
        Ok(())
    }
}

fn format_value(value: f64) -> String {
    if value.is_nan() {
        "nan".to_string()
    } else {
        format!("{:.4}", value)
    }
}

/// Compute all four metrics.
///
/// With several targets, MSE and MAE are averaged over targets (equal to
/// the mean over every element) and R² is the mean of per-target scores.
/// RMSE is the square root of the averaged MSE.
pub fn regression_metrics(y_true: &Targets, y_pred: &Targets) -> Result<RegressionMetrics> {
    if y_true.shape() != y_pred.shape() {
        return Err(Error::ShapeMismatch {
            expected: y_true.shape_string(),
            actual: y_pred.shape_string(),
        });
    }
    if y_true.is_empty() {
        return Err(Error::EmptyInput("y_true and y_pred have no values".to_string()));
    }
    if y_true.values.iter().any(|v| !v.is_finite()) {
        return Err(Error::NonFinite("y_true".to_string()));
    }
    if y_pred.values.iter().any(|v| !v.is_finite()) {
        return Err(Error::NonFinite("y_pred".to_string()));
    }

    let (n_samples, n_targets) = y_true.shape();
    let mut mse = 0.0;
    let mut mae = 0.0;
    let mut r2 = 0.0;
    for j in 0..n_targets {
        let t = y_true.column(j);
        let p = y_pred.column(j);
        // lengths are equal and non-zero here
        mse += ppc_math::mse(&t, &p).unwrap_or(f64::NAN);
        mae += ppc_math::mae(&t, &p).unwrap_or(f64::NAN);
        r2 += ppc_math::r2_score(&t, &p).unwrap_or(f64::NAN);
    }
    let k = n_targets as f64;
    let (mse, mae, r2) = (mse / k, mae / k, r2 / k);

    if n_samples < 2 {
        warn!(
            target: event_names::METRICS_UNDEFINED_R2,
            n_samples, "R² is not well-defined with fewer than two samples"
        );
    }

    Ok(RegressionMetrics {
        mse,
        rmse: mse.sqrt(),
        mae,
        r2,
    })
}

/// Compute the metrics and write the four report lines to `out`.
pub fn report_metrics<W: Write>(
    out: &mut W,
    y_true: &Targets,
    y_pred: &Targets,
    prefix: &str,
) -> Result<RegressionMetrics> {
    let metrics = regression_metrics(y_true, y_pred)?;
    metrics.write_lines(out, prefix)?;
    Ok(metrics)
}

/// [`report_metrics`] to stdout.
pub fn print_regression_metrics(
    y_true: &Targets,
    y_pred: &Targets,
    prefix: &str,
) -> Result<RegressionMetrics> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    report_metrics(&mut out, y_true, y_pred, prefix)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    fn shifted() -> (Targets, Targets) {
        let t: Vec<f64> = (1..=10).map(f64::from).collect();
        let p: Vec<f64> = t.iter().map(|v| v + 1.0).collect();
        (t.into(), p.into())
    }

    #[test]
    fn test_shift_by_one() {
        let (t, p) = shifted();
        let m = regression_metrics(&t, &p).unwrap();
        assert!(approx_eq(m.mse, 1.0));
        assert!(approx_eq(m.rmse, 1.0));
        assert!(approx_eq(m.mae, 1.0));
        assert!(m.r2 > 0.0 && m.r2 < 1.0);
        assert!(approx_eq(m.r2, 1.0 - 10.0 / 82.5));
    }

    #[test]
    fn test_identical_arrays() {
        let t = Targets::from(vec![3.0, -0.5, 2.0, 7.0]);
        let m = regression_metrics(&t, &t).unwrap();
        assert_eq!((m.mse, m.rmse, m.mae, m.r2), (0.0, 0.0, 0.0, 1.0));
    }

    #[test]
    fn test_report_lines_with_prefix() {
        let (t, p) = shifted();
        let mut out = Vec::new();
        report_metrics(&mut out, &t, &p, "Test").unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "Test MSE: 1.0000",
                "Test RMSE: 1.0000",
                "Test MAE: 1.0000",
                "Test R²: 0.8788",
            ]
        );
    }

    #[test]
    fn test_report_lines_without_prefix() {
        let t = Targets::from(vec![3.0, -0.5, 2.0, 7.0]);
        let p = Targets::from(vec![2.5, 0.0, 2.0, 8.0]);
        let m = regression_metrics(&t, &p).unwrap();
        assert_eq!(
            m.lines(""),
            vec!["MSE: 0.3750", "RMSE: 0.6124", "MAE: 0.5000", "R²: 0.9486"]
        );
    }

    #[test]
    fn test_multi_target() {
        // scikit-learn documentation example
        let t = Targets::from_rows(vec![vec![0.5, 1.0], vec![-1.0, 1.0], vec![7.0, -6.0]]).unwrap();
        let p = Targets::from_rows(vec![vec![0.0, 2.0], vec![-1.0, 2.0], vec![8.0, -5.0]]).unwrap();
        let m = regression_metrics(&t, &p).unwrap();
        assert!(approx_eq(m.mse, 0.708_333_333_333_333_4));
        assert!(approx_eq(m.mae, 0.75));
        assert!((m.r2 - 0.936_800_526_662_277_9).abs() < 1e-12);
    }

    #[test]
    fn test_shape_mismatch_reports_both_shapes() {
        let t = Targets::from(vec![1.0, 2.0, 3.0]);
        let p = Targets::from(vec![1.0, 2.0]);
        match regression_metrics(&t, &p).unwrap_err() {
            Error::ShapeMismatch { expected, actual } => {
                assert_eq!(expected, "(3, 1)");
                assert_eq!(actual, "(2, 1)");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_empty_and_non_finite() {
        let empty = Targets::from(Vec::new());
        assert!(matches!(
            regression_metrics(&empty, &empty),
            Err(Error::EmptyInput(_))
        ));

        let t = Targets::from(vec![1.0, f64::NAN]);
        let p = Targets::from(vec![1.0, 2.0]);
        assert!(matches!(regression_metrics(&t, &p), Err(Error::NonFinite(_))));
    }

    #[test]
    fn test_single_sample_r2_is_nan() {
        let t = Targets::from(vec![1.0]);
        let p = Targets::from(vec![2.0]);
        let m = regression_metrics(&t, &p).unwrap();
        assert_eq!(m.mse, 1.0);
        assert!(m.r2.is_nan());
        assert_eq!(m.lines("Test")[3], "Test R²: nan");
        assert_eq!(m.lines("")[0], "MSE: 1.0000");
    }

    #[test]
    fn test_ragged_rows() {
        let err = Targets::from_rows(vec![vec![1.0, 2.0], vec![3.0]]).unwrap_err();
        assert!(err.to_string().contains("sample 1"));
    }

    #[test]
    fn test_json_layouts() {
        let flat = Targets::from_json_reader("[1.0, 2.0, 3.0]".as_bytes()).unwrap();
        assert_eq!(flat.shape(), (3, 1));
        let rows = Targets::from_json_reader("[[1, 2], [3, 4], [5, 6]]".as_bytes()).unwrap();
        assert_eq!(rows.shape(), (3, 2));
        assert_eq!(rows.column(1), vec![2.0, 4.0, 6.0]);
        assert!(Targets::from_json_reader(r#"{"y": [1]}"#.as_bytes()).is_err());
    }

    #[test]
    fn test_serializes_fields() {
        let m = RegressionMetrics {
            mse: 1.0,
            rmse: 1.0,
            mae: 0.5,
            r2: 0.25,
        };
        let json = serde_json::to_value(m).unwrap();
        assert_eq!(json["r2"], 0.25);
        assert_eq!(json["mae"], 0.5);
    }
}
