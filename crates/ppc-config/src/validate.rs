//! Settings validation errors and semantic validation.

use thiserror::Error;

use crate::settings::{FigureSize, Settings};

/// Validation result type.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Settings validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("I/O error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("Version mismatch: expected {expected}, got {actual}")]
    VersionMismatch { expected: String, actual: String },
}

impl ValidationError {
    /// Error code for structured error reporting.
    pub fn code(&self) -> u32 {
        match self {
            ValidationError::IoError(_) => 30,
            ValidationError::ParseError(_) => 31,
            ValidationError::InvalidValue { .. } => 32,
            ValidationError::VersionMismatch { .. } => 33,
        }
    }
}

/// Validate settings semantically.
pub fn validate_settings(settings: &Settings) -> ValidationResult<()> {
    if settings.schema_version != crate::CONFIG_SCHEMA_VERSION {
        return Err(ValidationError::VersionMismatch {
            expected: crate::CONFIG_SCHEMA_VERSION.to_string(),
            actual: settings.schema_version.clone(),
        });
    }

    if settings.grid.n_rows == 0 {
        return Err(ValidationError::InvalidValue {
            field: "grid.n_rows".to_string(),
            message: "Must be at least 1".to_string(),
        });
    }
    validate_figsize("grid.figsize", &settings.grid.figsize)?;
    validate_figsize("comparison.figsize", &settings.comparison.figsize)?;

    if settings.bins == 0 {
        return Err(ValidationError::InvalidValue {
            field: "bins".to_string(),
            message: "Must be at least 1".to_string(),
        });
    }

    if !(settings.interval_level > 0.0 && settings.interval_level < 1.0) {
        return Err(ValidationError::InvalidValue {
            field: "interval_level".to_string(),
            message: format!("Must be in (0, 1), got {}", settings.interval_level),
        });
    }

    if !(settings.dpi.is_finite() && settings.dpi > 0.0) {
        return Err(ValidationError::InvalidValue {
            field: "dpi".to_string(),
            message: format!("Must be positive, got {}", settings.dpi),
        });
    }

    if settings.var_name.trim().is_empty() {
        return Err(ValidationError::InvalidValue {
            field: "var_name".to_string(),
            message: "Must not be empty".to_string(),
        });
    }

    Ok(())
}

/// Validate a figure size: both dimensions finite and positive.
pub fn validate_figsize(field: &str, size: &FigureSize) -> ValidationResult<()> {
    for (name, v) in [("width", size.width()), ("height", size.height())] {
        if !(v.is_finite() && v > 0.0) {
            return Err(ValidationError::InvalidValue {
                field: format!("{}.{}", field, name),
                message: format!("Must be positive, got {}", v),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        validate_settings(&Settings::default()).unwrap();
    }

    #[test]
    fn test_rejects_zero_bins() {
        let mut s = Settings::default();
        s.bins = 0;
        let err = validate_settings(&s).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidValue { ref field, .. } if field == "bins"));
    }

    #[test]
    fn test_rejects_interval_level_bounds() {
        for level in [0.0, 1.0, -0.5, f64::NAN] {
            let mut s = Settings::default();
            s.interval_level = level;
            assert!(validate_settings(&s).is_err(), "level {} accepted", level);
        }
    }

    #[test]
    fn test_rejects_bad_figsize() {
        let mut s = Settings::default();
        s.comparison.figsize = FigureSize(15.0, 0.0);
        let err = validate_settings(&s).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::InvalidValue { ref field, .. } if field == "comparison.figsize.height"
        ));
    }

    #[test]
    fn test_rejects_zero_rows() {
        let mut s = Settings::default();
        s.grid.n_rows = 0;
        assert!(validate_settings(&s).is_err());
    }

    #[test]
    fn test_rejects_version_mismatch() {
        let mut s = Settings::default();
        s.schema_version = "0.9.0".to_string();
        let err = validate_settings(&s).unwrap_err();
        assert!(matches!(err, ValidationError::VersionMismatch { .. }));
        assert_eq!(err.code(), 33);
    }
}
