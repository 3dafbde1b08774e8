//! Configuration directory helpers for Marketing Cloud hosts
//!
//! Settings files live in a shared directory, `<config dir>/marketingcloud/`
//! by default. Set `MARKETINGCLOUD_CONFIG_DIR` to point hosts (and tests) at
//! a different directory.
//!
//! Call [`init`] at application startup to bootstrap the directory.

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

/// Environment variable that overrides the config directory
pub const CONFIG_DIR_ENV: &str = "MARKETINGCLOUD_CONFIG_DIR";

const DIR_NAME: &str = "marketingcloud";

/// Initialize the config directory, creating it if missing.
pub fn init() -> Result<PathBuf> {
    ensure_config_dir()
}

/// Resolve the config directory, honoring [`CONFIG_DIR_ENV`]
pub fn config_dir() -> Option<PathBuf> {
    match std::env::var_os(CONFIG_DIR_ENV) {
        Some(dir) if !dir.is_empty() => Some(PathBuf::from(dir)),
        _ => dirs::config_dir().map(|p| p.join(DIR_NAME)),
    }
}

/// Path of a file inside the config directory
pub fn config_path(filename: &str) -> Option<PathBuf> {
    config_dir().map(|p| p.join(filename))
}

/// Load and parse a JSON file from an arbitrary path
pub fn load_json_file<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read settings file: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse settings file: {}", path.display()))
}

/// Load a JSON file from the config directory if it exists
///
/// Returns `Ok(None)` when the file is absent; a file that exists but does not
/// parse is still an error.
pub fn load_json_if_exists<T: DeserializeOwned>(filename: &str) -> Result<Option<T>> {
    match config_path(filename) {
        Some(path) if path.exists() => load_json_file(&path).map(Some),
        _ => Ok(None),
    }
}

/// Ensure the config directory exists
pub fn ensure_config_dir() -> Result<PathBuf> {
    let dir = config_dir().context("Could not determine config directory")?;
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create config directory: {}", dir.display()))?;
    Ok(dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Sample {
        name: String,
        enabled: bool,
    }

    #[test]
    fn test_default_dir_is_project_scoped() {
        if std::env::var_os(CONFIG_DIR_ENV).is_some() {
            return;
        }
        let dir = config_dir().unwrap();
        assert!(dir.ends_with("marketingcloud"));
    }

    #[test]
    fn test_load_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample.json");
        std::fs::write(&path, r#"{ "name": "beacon", "enabled": true }"#).unwrap();

        let sample: Sample = load_json_file(&path).unwrap();
        assert_eq!(
            sample,
            Sample {
                name: "beacon".to_string(),
                enabled: true
            }
        );
    }

    #[test]
    fn test_load_json_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = load_json_file::<Sample>(&path).unwrap_err();
        assert!(format!("{err}").contains("broken.json"));
    }
}
