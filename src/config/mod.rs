//! Application configuration
//!
//! Asset locations come from `sepsafe.toml`:
//!
//! ```toml
//! [assets]
//! scaler_params = "assets/scaler_params.json"
//! model = "assets/sepsis_model.json"
//! model_format = "gbdt"
//! ```
//!
//! Searched in order: an explicit `--config` path, `./sepsafe.toml`, then
//! `~/.config/sepsafe/config.toml`. Relative asset paths resolve against the
//! directory holding the file that named them.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::engine::ModelFormat;

pub const CONFIG_FILE_NAME: &str = "sepsafe.toml";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub assets: AssetsConfig,

    /// File this config was read from, if any
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AssetsConfig {
    /// JSON file with `mean` and `scale` arrays
    #[serde(default = "default_scaler_path")]
    pub scaler_params: PathBuf,

    /// Trained classifier artifact
    #[serde(default = "default_model_path")]
    pub model: PathBuf,

    #[serde(default)]
    pub model_format: ModelFormat,
}

fn default_scaler_path() -> PathBuf {
    PathBuf::from("assets/scaler_params.json")
}

fn default_model_path() -> PathBuf {
    PathBuf::from("assets/sepsis_model.json")
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            scaler_params: default_scaler_path(),
            model: default_model_path(),
            model_format: ModelFormat::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration.
    ///
    /// An explicit path must exist and parse. Discovered files that fail to
    /// parse are skipped with a warning.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path)
                .with_context(|| format!("Failed to load config {}", path.display()));
        }

        for candidate in Self::search_paths() {
            if !candidate.exists() {
                continue;
            }
            match Self::from_file(&candidate) {
                Ok(config) => {
                    debug!("Loaded config from {}", candidate.display());
                    return Ok(config);
                }
                Err(e) => warn!("Failed to load {}: {}", candidate.display(), e),
            }
        }

        debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Parse a TOML file and resolve its relative asset paths
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let mut config: AppConfig = toml::from_str(&content)?;
        if let Some(base) = path.parent() {
            config.assets.scaler_params = resolve(base, &config.assets.scaler_params);
            config.assets.model = resolve(base, &config.assets.model);
        }
        config.source = Some(path.to_path_buf());
        Ok(config)
    }

    /// Candidate locations, highest priority first
    pub fn search_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(CONFIG_FILE_NAME)];
        if let Some(user) = Self::user_config_path() {
            paths.push(user);
        }
        paths
    }

    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("sepsafe").join("config.toml"))
    }

    /// Apply command-line overrides (flags win over the file)
    pub fn with_overrides(
        mut self,
        scaler_params: Option<PathBuf>,
        model: Option<PathBuf>,
        model_format: Option<ModelFormat>,
    ) -> Self {
        if let Some(p) = scaler_params {
            self.assets.scaler_params = p;
        }
        if let Some(p) = model {
            self.assets.model = p;
        }
        if let Some(f) = model_format {
            self.assets.model_format = f;
        }
        self
    }

    /// Write an example config to `path` unless one is already there.
    ///
    /// Returns `false` if the file existed.
    pub fn write_example(path: &Path) -> Result<bool> {
        if path.exists() {
            return Ok(false);
        }
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, EXAMPLE_CONFIG)?;
        Ok(true)
    }
}

fn resolve(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

const EXAMPLE_CONFIG: &str = r#"# Sepsafe configuration

[assets]
# Per-feature standardization, {"mean": [...8], "scale": [...8]}
scaler_params = "assets/scaler_params.json"

# Trained classifier
model = "assets/sepsis_model.json"

# "gbdt" (gbdt-rs JSON) or "xgboost" (XGBoost JSON dump)
model_format = "gbdt"
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(
            config.assets.scaler_params,
            PathBuf::from("assets/scaler_params.json")
        );
        assert_eq!(config.assets.model_format, ModelFormat::Gbdt);
        assert!(config.source.is_none());
    }

    #[test]
    fn test_example_config_parses() {
        let config: AppConfig = toml::from_str(EXAMPLE_CONFIG).unwrap();
        assert_eq!(config.assets.model, PathBuf::from("assets/sepsis_model.json"));
    }

    #[test]
    fn test_partial_config() {
        let config: AppConfig = toml::from_str(
            r#"
[assets]
model_format = "xgboost"
"#,
        )
        .unwrap();
        assert_eq!(config.assets.model_format, ModelFormat::Xgboost);
        assert_eq!(config.assets.model, default_model_path());

        let empty: AppConfig = toml::from_str("").unwrap();
        assert_eq!(empty.assets.model_format, ModelFormat::Gbdt);
    }

    #[test]
    fn test_relative_paths_resolve_against_config_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(
            &path,
            r#"
[assets]
scaler_params = "data/scaler.json"
model = "/opt/models/sepsis.json"
"#,
        )
        .unwrap();

        let config = AppConfig::load(Some(&path)).unwrap();
        assert_eq!(config.assets.scaler_params, dir.path().join("data/scaler.json"));
        assert_eq!(config.assets.model, PathBuf::from("/opt/models/sepsis.json"));
        assert_eq!(config.source.as_deref(), Some(path.as_path()));
    }

    #[test]
    fn test_explicit_missing_config_is_error() {
        assert!(AppConfig::load(Some(Path::new("/no/such/sepsafe.toml"))).is_err());
    }

    #[test]
    fn test_invalid_toml_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "this is [[ not valid toml {{{}}}").unwrap();
        assert!(AppConfig::from_file(&path).is_err());
    }

    #[test]
    fn test_overrides_win() {
        let config = AppConfig::default().with_overrides(
            Some(PathBuf::from("s.json")),
            None,
            Some(ModelFormat::Xgboost),
        );
        assert_eq!(config.assets.scaler_params, PathBuf::from("s.json"));
        assert_eq!(config.assets.model, default_model_path());
        assert_eq!(config.assets.model_format, ModelFormat::Xgboost);
    }

    #[test]
    fn test_write_example_does_not_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        assert!(AppConfig::write_example(&path).unwrap());
        std::fs::write(&path, "# mine").unwrap();
        assert!(!AppConfig::write_example(&path).unwrap());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "# mine");
    }
}
