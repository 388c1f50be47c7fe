//! Error types for posterior predictive reporting.
//!
//! This module provides structured error handling with:
//! - Stable error codes for machine parsing
//! - Category classification for error grouping
//! - Remediation suggestions for humans
//!
//! # Human-Facing Output
//!
//! ```text
//! ✗ Unknown Observation
//!   Reason: unknown observation id 12 (inference data has 10 observations)
//!   Fix: Observation ids are zero-based and must be below the number of observations.
//! ```
//!
//! # Machine-Facing Output
//!
//! ```json
//! {
//!   "code": 20,
//!   "category": "data",
//!   "message": "unknown observation id 12 (inference data has 10 observations)",
//!   "context": { "id": 12, "n_observations": 10 }
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Result type alias for ppc operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error categories for grouping related errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Caller-supplied arguments (sizes, shapes, id lists).
    Input,
    /// Inference data content (missing ids, empty pools, non-finite values).
    Data,
    /// Settings file errors.
    Config,
    /// Figure construction and export errors.
    Render,
    /// File I/O and serialization errors.
    Io,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCategory::Input => write!(f, "input"),
            ErrorCategory::Data => write!(f, "data"),
            ErrorCategory::Config => write!(f, "config"),
            ErrorCategory::Render => write!(f, "render"),
            ErrorCategory::Io => write!(f, "io"),
        }
    }
}

/// Unified error type for ppc operations.
#[derive(Error, Debug)]
pub enum Error {
    // Input errors (10-19)
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("requested sample size {requested} exceeds population of {population} observations")]
    SampleSizeExceedsPopulation { requested: usize, population: usize },

    #[error("shape mismatch: expected {expected}, got {actual}")]
    ShapeMismatch { expected: String, actual: String },

    #[error("empty input: {0}")]
    EmptyInput(String),

    // Data errors (20-29)
    #[error("unknown observation id {id} (inference data has {n_observations} observations)")]
    UnknownObservation { id: usize, n_observations: usize },

    #[error("observation {id} has no posterior predictive draws")]
    EmptyDrawPool { id: usize },

    #[error("non-finite value in {0}")]
    NonFinite(String),

    #[error("invalid inference data: {0}")]
    InvalidData(String),

    // Config errors (30-39)
    #[error("configuration error: {0}")]
    Config(String),

    // Render errors (40-49)
    #[error("figure rendering failed: {0}")]
    Render(String),

    #[error("unsupported export format: {0}")]
    UnsupportedExportFormat(String),

    // I/O errors (60-69)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Returns the error code for this error type.
    ///
    /// Error codes are stable and grouped by category:
    /// - 10-19: Input errors
    /// - 20-29: Data errors
    /// - 30-39: Configuration errors
    /// - 40-49: Render errors
    /// - 60-69: I/O errors
    pub fn code(&self) -> u32 {
        match self {
            Error::InvalidArgument(_) => 10,
            Error::SampleSizeExceedsPopulation { .. } => 11,
            Error::ShapeMismatch { .. } => 12,
            Error::EmptyInput(_) => 13,
            Error::UnknownObservation { .. } => 20,
            Error::EmptyDrawPool { .. } => 21,
            Error::NonFinite(_) => 22,
            Error::InvalidData(_) => 23,
            Error::Config(_) => 30,
            Error::Render(_) => 40,
            Error::UnsupportedExportFormat(_) => 41,
            Error::Io(_) => 60,
            Error::Json(_) => 61,
        }
    }

    /// Returns the error category for grouping and filtering.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::InvalidArgument(_)
            | Error::SampleSizeExceedsPopulation { .. }
            | Error::ShapeMismatch { .. }
            | Error::EmptyInput(_) => ErrorCategory::Input,

            Error::UnknownObservation { .. }
            | Error::EmptyDrawPool { .. }
            | Error::NonFinite(_)
            | Error::InvalidData(_) => ErrorCategory::Data,

            Error::Config(_) => ErrorCategory::Config,

            Error::Render(_) | Error::UnsupportedExportFormat(_) => ErrorCategory::Render,

            Error::Io(_) | Error::Json(_) => ErrorCategory::Io,
        }
    }

    /// Returns a human-readable remediation hint.
    pub fn remediation(&self) -> &'static str {
        match self {
            Error::InvalidArgument(_) => "Check the command-line arguments with 'ppc help'.",
            Error::SampleSizeExceedsPopulation { .. } => {
                "Request at most as many rows as the inference data has observations."
            }
            Error::ShapeMismatch { .. } => {
                "True and predicted arrays must have the same number of samples and targets."
            }
            Error::EmptyInput(_) => "Provide at least one value.",
            Error::UnknownObservation { .. } => {
                "Observation ids are zero-based and must be below the number of observations."
            }
            Error::EmptyDrawPool { .. } => {
                "Re-run posterior predictive sampling; every observation needs at least one draw."
            }
            Error::NonFinite(_) => "Remove NaN or infinite values from the input.",
            Error::InvalidData(_) => {
                "Export inference data with 'observed_data' and 'posterior_predictive' groups."
            }
            Error::Config(_) => "Run 'ppc config validate' to check settings.json.",
            Error::Render(_) => "Check the output path and figure size, then retry.",
            Error::UnsupportedExportFormat(_) => "Use an output path ending in .svg or .png.",
            Error::Io(_) => "Check that the file exists and is readable, then retry.",
            Error::Json(_) => "Check the JSON syntax with 'jq . <file>'.",
        }
    }

    /// Returns a short headline for human-readable output.
    pub fn headline(&self) -> &'static str {
        match self {
            Error::InvalidArgument(_) => "Invalid Argument",
            Error::SampleSizeExceedsPopulation { .. } => "Sample Size Too Large",
            Error::ShapeMismatch { .. } => "Shape Mismatch",
            Error::EmptyInput(_) => "Empty Input",
            Error::UnknownObservation { .. } => "Unknown Observation",
            Error::EmptyDrawPool { .. } => "Empty Draw Pool",
            Error::NonFinite(_) => "Non-Finite Value",
            Error::InvalidData(_) => "Invalid Inference Data",
            Error::Config(_) => "Configuration Error",
            Error::Render(_) => "Render Error",
            Error::UnsupportedExportFormat(_) => "Unsupported Export Format",
            Error::Io(_) => "I/O Error",
            Error::Json(_) => "JSON Parse Error",
        }
    }
}

/// Structured error response for JSON output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuredError {
    /// Stable error code.
    pub code: u32,

    /// Error category for grouping.
    pub category: ErrorCategory,

    /// Human-readable error message.
    pub message: String,

    /// Additional structured context (offending id, shapes).
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub context: HashMap<String, serde_json::Value>,
}

impl From<&Error> for StructuredError {
    fn from(err: &Error) -> Self {
        let mut context = HashMap::new();

        match err {
            Error::SampleSizeExceedsPopulation {
                requested,
                population,
            } => {
                context.insert("requested".to_string(), serde_json::json!(requested));
                context.insert("population".to_string(), serde_json::json!(population));
            }
            Error::ShapeMismatch { expected, actual } => {
                context.insert("expected".to_string(), serde_json::json!(expected));
                context.insert("actual".to_string(), serde_json::json!(actual));
            }
            Error::UnknownObservation { id, n_observations } => {
                context.insert("id".to_string(), serde_json::json!(id));
                context.insert(
                    "n_observations".to_string(),
                    serde_json::json!(n_observations),
                );
            }
            Error::EmptyDrawPool { id } => {
                context.insert("id".to_string(), serde_json::json!(id));
            }
            _ => {}
        }

        StructuredError {
            code: err.code(),
            category: err.category(),
            message: err.to_string(),
            context,
        }
    }
}

impl StructuredError {
    /// Serialize to JSON string.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            format!(r#"{{"code":{},"error":"serialization_failed"}}"#, self.code)
        })
    }
}

/// Format an error for human-readable stderr output.
///
/// Output format:
/// ```text
/// ✗ [Headline]
///   Reason: [Error message]
///   Fix: [Remediation hint]
/// ```
pub fn format_error_human(err: &Error, use_color: bool) -> String {
    let (red, cyan, reset) = if use_color {
        ("\x1b[31m", "\x1b[36m", "\x1b[0m")
    } else {
        ("", "", "")
    };

    format!(
        "{red}✗{reset} {headline}\n  Reason: {message}\n  {cyan}Fix:{reset} {remediation}",
        red = red,
        cyan = cyan,
        reset = reset,
        headline = err.headline(),
        message = err,
        remediation = err.remediation()
    )
}
