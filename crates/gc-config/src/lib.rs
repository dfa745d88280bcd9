//! # gc-config
//!
//! Layered configuration loading for Gravicorr using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`GRAVICORR_*` prefix, `__` as separator)
//! 2. The project config TOML passed on the command line
//! 3. Built-in defaults
//!
//! Figment maps `GRAVICORR_PATHS__EXPORT_ROOT` -> `paths.export_root`,
//! `GRAVICORR_PROCESSING__F_MAX` -> `processing.f_max`, etc.

mod error;
mod paths;
mod processing;
mod seismic;

pub use error::ConfigError;
pub use paths::PathsConfig;
pub use processing::ProcessingConfig;
pub use seismic::{FilenameMarkers, SeismicConfig};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Filename used by [`GravConfig::write_template`].
pub const TEMPLATE_NAME: &str = "gravicorr.toml";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct GravConfig {
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub seismic: SeismicConfig,
    #[serde(default)]
    pub processing: ProcessingConfig,
}

impl GravConfig {
    /// Load configuration from a project TOML file plus environment overrides.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file is missing or extraction fails.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::FileNotFound {
                path: path.display().to_string(),
            });
        }
        Self::figment(path).extract().map_err(ConfigError::from)
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests can layer additional providers on top.
    pub fn figment(path: &Path) -> Figment {
        Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed("GRAVICORR_").split("__"))
    }

    /// Write a default config template into `dir` and return its path.
    ///
    /// Replaces the original project's JSON template generator; the operator
    /// fills in the three roots before the first run.
    pub fn write_template(dir: &Path) -> Result<std::path::PathBuf, ConfigError> {
        let body = toml::to_string_pretty(&Self::default())
            .map_err(|e| ConfigError::Template(e.to_string()))?;
        let target = dir.join(TEMPLATE_NAME);
        std::fs::write(&target, body).map_err(|e| ConfigError::Template(e.to_string()))?;
        Ok(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_an_error() {
        let result = GravConfig::load(Path::new("/nonexistent/gravicorr.toml"));
        assert!(matches!(result, Err(ConfigError::FileNotFound { .. })));
    }

    #[test]
    fn template_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = GravConfig::write_template(dir.path()).unwrap();
        let config = GravConfig::load(&path).unwrap();
        assert_eq!(config.processing.window_seconds, 60);
        assert_eq!(config.seismic.extensions.len(), 3);
    }

    #[test]
    fn env_overrides_file() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "gravicorr.toml",
                r#"
                [processing]
                f_max = 5.0
                "#,
            )?;
            jail.set_env("GRAVICORR_PROCESSING__F_MAX", "20.0");
            let config: GravConfig = GravConfig::figment(Path::new("gravicorr.toml")).extract()?;
            assert_eq!(config.processing.f_max, 20.0);
            Ok(())
        });
    }
}
