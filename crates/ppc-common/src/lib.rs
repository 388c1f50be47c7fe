//! Posterior predictive reporting: common types, ids, and errors.
//!
//! This crate provides foundational types shared across the ppc crates:
//! - Observation identity type
//! - Common error types with stable codes
//! - Output format selection

pub mod error;
pub mod id;
pub mod output;

pub use error::{format_error_human, Error, ErrorCategory, Result, StructuredError};
pub use id::ObservationId;
pub use output::OutputFormat;

/// Schema version for JSON payloads emitted by the CLI.
pub const SCHEMA_VERSION: &str = "1.0.0";
