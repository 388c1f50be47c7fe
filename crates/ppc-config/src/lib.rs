//! Posterior predictive reporting configuration.
//!
//! This crate provides:
//! - Typed Rust structs for settings.json
//! - Settings resolution (CLI → env → XDG → defaults)
//! - Semantic validation

pub mod resolve;
pub mod settings;
pub mod validate;

pub use resolve::{resolve_settings_path, ConfigSource, SettingsPath};
pub use settings::{ComparisonSettings, FigureSize, GridSettings, Settings};
pub use validate::{validate_settings, ValidationError, ValidationResult};

/// Schema version for settings files.
pub const CONFIG_SCHEMA_VERSION: &str = "1.0.0";
