//! Settings types.
//!
//! Every field has a default, so a settings file only needs the keys it
//! overrides.

use serde::{Deserialize, Serialize};

use crate::validate::ValidationError;

/// Figure size in inches, `(width, height)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FigureSize(pub f64, pub f64);

impl FigureSize {
    pub fn width(&self) -> f64 {
        self.0
    }

    pub fn height(&self) -> f64 {
        self.1
    }
}

impl std::str::FromStr for FigureSize {
    type Err = String;

    /// Parse `"W,H"` or `"WxH"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split([',', 'x']).map(str::trim).collect();
        if parts.len() != 2 {
            return Err(format!("expected WIDTH,HEIGHT, got '{}'", s));
        }
        let w = parts[0]
            .parse::<f64>()
            .map_err(|e| format!("invalid width '{}': {}", parts[0], e))?;
        let h = parts[1]
            .parse::<f64>()
            .map_err(|e| format!("invalid height '{}': {}", parts[1], e))?;
        Ok(FigureSize(w, h))
    }
}

impl std::fmt::Display for FigureSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.0, self.1)
    }
}

/// Randomly sampled grid of panels.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GridSettings {
    /// Number of observations to sample.
    pub n_rows: usize,
    pub figsize: FigureSize,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            n_rows: 4,
            figsize: FigureSize(12.0, 8.0),
        }
    }
}

/// Side-by-side panels for caller-chosen observations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ComparisonSettings {
    pub figsize: FigureSize,
}

impl Default for ComparisonSettings {
    fn default() -> Self {
        Self {
            figsize: FigureSize(15.0, 4.0),
        }
    }
}

/// Complete settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub schema_version: String,

    pub grid: GridSettings,

    pub comparison: ComparisonSettings,

    /// Histogram bin count per panel.
    pub bins: usize,

    /// Mass of the shaded central interval.
    pub interval_level: f64,

    /// Pixels per inch when exporting.
    pub dpi: f64,

    /// Seed for row selection; None draws from the OS.
    pub seed: Option<u64>,

    /// Posterior predictive variable to read from inference data.
    pub var_name: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: crate::CONFIG_SCHEMA_VERSION.to_string(),
            grid: GridSettings::default(),
            comparison: ComparisonSettings::default(),
            bins: 50,
            interval_level: 0.95,
            dpi: 100.0,
            seed: None,
            var_name: "y".to_string(),
        }
    }
}

impl Settings {
    /// Load settings from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, ValidationError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ValidationError::IoError(format!("Failed to read {}: {}", path.display(), e))
        })?;

        Self::from_json(&content)
    }

    /// Parse settings from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ValidationError> {
        serde_json::from_str(json)
            .map_err(|e| ValidationError::ParseError(format!("Invalid JSON: {}", e)))
    }
}
