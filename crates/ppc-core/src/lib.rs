//! Posterior predictive plots and regression error reports.
//!
//! - [`inference`]: observed outcomes and flattened predictive draw pools
//! - [`select`]: random or explicit choice of observations
//! - [`summary`]: per-observation mean and central interval
//! - [`render`]: multi-panel figure model and SVG/PNG export
//! - [`metrics`]: MSE, RMSE, MAE and R² reports
//!
//! The `ppc` binary in `main.rs` wires these together with settings,
//! logging and exit codes.

pub mod config;
pub mod exit_codes;
pub mod inference;
pub mod logging;
pub mod metrics;
pub mod render;
pub mod select;
pub mod summary;

pub use inference::InferenceData;
pub use metrics::{
    print_regression_metrics, regression_metrics, report_metrics, RegressionMetrics, Targets,
};
pub use render::{
    plot_posterior_predictive_comparison, plot_posterior_predictive_distribution, ComparisonOptions,
    Figure, GridOptions,
};
pub use select::{seeded_rng, select_rows, Selection};
pub use summary::{summarize, summarize_one, summarize_with_level, SummaryRecord};
