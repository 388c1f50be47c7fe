//! Settings resolution + validation tests against real files on disk.
//!
//! Covers:
//! - Resolution order (CLI > PPC_CONFIG > PPC_CONFIG_DIR > defaults)
//! - Loading and validating settings files

use ppc_config::resolve::{resolve_settings_path, ConfigSource, ENV_CONFIG_DIR, ENV_SETTINGS_PATH};
use ppc_config::{validate_settings, Settings, ValidationError};
use std::env;
use std::fs;
use std::path::Path;
use std::sync::{Mutex, OnceLock};
use tempfile::TempDir;

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

struct EnvGuard {
    keys: Vec<String>,
    saved: Vec<Option<String>>,
}

impl EnvGuard {
    fn new(keys: &[&str]) -> Self {
        let mut saved = Vec::with_capacity(keys.len());
        for key in keys {
            saved.push(env::var(key).ok());
        }
        Self {
            keys: keys.iter().map(|k| k.to_string()).collect(),
            saved,
        }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for (idx, key) in self.keys.iter().enumerate() {
            match self.saved.get(idx).and_then(|v| v.as_ref()) {
                Some(val) => env::set_var(key, val),
                None => env::remove_var(key),
            }
        }
    }
}

fn with_env_lock<T>(f: impl FnOnce() -> T) -> T {
    let _guard = ENV_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .expect("env lock poisoned");
    f()
}

fn write_settings(path: &Path, json: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create settings parent");
    }
    fs::write(path, json).expect("write settings");
}

#[test]
fn test_cli_over_env() {
    with_env_lock(|| {
        let _guard = EnvGuard::new(&[ENV_SETTINGS_PATH, ENV_CONFIG_DIR, "XDG_CONFIG_HOME"]);
        let tmp = TempDir::new().unwrap();
        let cli_path = tmp.path().join("cli.json");
        let env_path = tmp.path().join("env.json");
        write_settings(&cli_path, r#"{"bins": 10}"#);
        write_settings(&env_path, r#"{"bins": 20}"#);
        env::set_var(ENV_SETTINGS_PATH, &env_path);

        let resolved = resolve_settings_path(Some(&cli_path));
        assert_eq!(resolved.source, ConfigSource::CliArgument);
        let settings = Settings::from_file(resolved.path.as_deref().unwrap()).unwrap();
        assert_eq!(settings.bins, 10);
    });
}

#[test]
fn test_env_path_over_config_dir() {
    with_env_lock(|| {
        let _guard = EnvGuard::new(&[ENV_SETTINGS_PATH, ENV_CONFIG_DIR, "XDG_CONFIG_HOME"]);
        let tmp = TempDir::new().unwrap();
        let env_path = tmp.path().join("env.json");
        let dir = tmp.path().join("confdir");
        write_settings(&env_path, r#"{"bins": 20}"#);
        write_settings(&dir.join("settings.json"), r#"{"bins": 30}"#);
        env::set_var(ENV_SETTINGS_PATH, &env_path);
        env::set_var(ENV_CONFIG_DIR, &dir);

        let resolved = resolve_settings_path(None);
        assert_eq!(resolved.source, ConfigSource::Environment);
        assert_eq!(resolved.path.as_deref(), Some(env_path.as_path()));
    });
}

#[test]
fn test_config_dir_used_when_env_path_missing() {
    with_env_lock(|| {
        let _guard = EnvGuard::new(&[ENV_SETTINGS_PATH, ENV_CONFIG_DIR, "XDG_CONFIG_HOME"]);
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("confdir");
        write_settings(&dir.join("settings.json"), r#"{"interval_level": 0.9}"#);
        env::set_var(ENV_SETTINGS_PATH, tmp.path().join("missing.json"));
        env::set_var(ENV_CONFIG_DIR, &dir);

        let resolved = resolve_settings_path(None);
        assert_eq!(resolved.source, ConfigSource::Environment);
        let settings = Settings::from_file(resolved.path.as_deref().unwrap()).unwrap();
        assert_eq!(settings.interval_level, 0.9);
        validate_settings(&settings).unwrap();
    });
}

#[test]
fn test_defaults_when_nothing_found() {
    with_env_lock(|| {
        let _guard = EnvGuard::new(&[ENV_SETTINGS_PATH, ENV_CONFIG_DIR, "XDG_CONFIG_HOME", "HOME"]);
        let tmp = TempDir::new().unwrap();
        env::remove_var(ENV_SETTINGS_PATH);
        env::remove_var(ENV_CONFIG_DIR);
        env::set_var("XDG_CONFIG_HOME", tmp.path().join("xdg"));
        env::set_var("HOME", tmp.path());

        let resolved = resolve_settings_path(None);
        assert_eq!(resolved.source, ConfigSource::BuiltinDefault);
        assert!(resolved.path.is_none());
    });
}

#[test]
fn test_invalid_file_fails_validation() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("settings.json");
    write_settings(&path, r#"{"bins": 0}"#);

    let settings = Settings::from_file(&path).unwrap();
    let err = validate_settings(&settings).unwrap_err();
    assert!(matches!(err, ValidationError::InvalidValue { .. }));
}

#[test]
fn test_missing_file_is_io_error() {
    let err = Settings::from_file(Path::new("/nonexistent/ppc/settings.json")).unwrap_err();
    assert!(matches!(err, ValidationError::IoError(_)));
}
