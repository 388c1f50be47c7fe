//! Settings loading for the CLI.
//!
//! Resolution order (highest first): `--config`, `PPC_CONFIG`,
//! `PPC_CONFIG_DIR/settings.json`, `~/.config/ppc-report/settings.json`,
//! built-in defaults. Whatever file is found is parsed and validated before
//! use.

use std::path::{Path, PathBuf};

use ppc_config::{resolve_settings_path, validate_settings, ConfigSource, Settings, ValidationError};
use serde::Serialize;
use thiserror::Error;

/// Errors from settings loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("settings file not found: {path}")]
    NotFound { path: PathBuf },

    #[error("invalid settings in {path}: {source}")]
    Invalid {
        path: PathBuf,
        #[source]
        source: ValidationError,
    },
}

impl From<ConfigError> for ppc_common::Error {
    fn from(err: ConfigError) -> Self {
        ppc_common::Error::Config(err.to_string())
    }
}

/// Loaded settings with provenance.
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedSettings {
    pub settings: Settings,
    /// File the settings came from; None for built-in defaults.
    pub path: Option<PathBuf>,
    #[serde(serialize_with = "serialize_source")]
    pub source: ConfigSource,
}

fn serialize_source<S: serde::Serializer>(source: &ConfigSource, s: S) -> Result<S::Ok, S::Error> {
    s.collect_str(source)
}

/// Resolve, read and validate settings.
pub fn load_settings(cli_path: Option<&Path>) -> Result<ResolvedSettings, ConfigError> {
    let resolved = resolve_settings_path(cli_path);

    let Some(path) = resolved.path else {
        return Ok(ResolvedSettings {
            settings: Settings::default(),
            path: None,
            source: ConfigSource::BuiltinDefault,
        });
    };

    let settings = load_settings_file(&path)?;
    Ok(ResolvedSettings {
        settings,
        path: Some(path),
        source: resolved.source,
    })
}

/// Read and validate one settings file.
pub fn load_settings_file(path: &Path) -> Result<Settings, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound {
            path: path.to_path_buf(),
        });
    }
    let invalid = |source| ConfigError::Invalid {
        path: path.to_path_buf(),
        source,
    };
    let settings = Settings::from_file(path).map_err(invalid)?;
    validate_settings(&settings).map_err(invalid)?;
    Ok(settings)
}
