//! Numerical kernels for posterior predictive reporting.

pub mod math;

pub use math::histogram::Histogram;
pub use math::regression::{mae, mse, r2_score, rmse};
pub use math::summary::*;
