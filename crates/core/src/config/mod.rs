//! Application configuration with layered loading.
//!
//! Sources, highest precedence first:
//!
//! 1. Environment variables (SITEASSET_*)
//! 2. TOML config file (if SITEASSET_CONFIG_FILE set)
//! 3. Built-in defaults

use std::path::PathBuf;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

use crate::resolver::DEFAULT_INTERNAL_SCHEME;

mod validation;

pub use validation::ConfigError;

/// Display scale factor at or above which high-density variants are requested.
pub const HIGH_DENSITY_SCALE: f64 = 2.0;

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path to the SQLite site asset cache.
    ///
    /// Set via SITEASSET_DB_PATH environment variable.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// Directory holding the default images and the `favicons/` built-in set.
    ///
    /// Set via SITEASSET_ASSETS_DIR environment variable.
    #[serde(default = "default_assets_dir")]
    pub assets_dir: PathBuf,

    /// Locator prefix served from the built-in icon set.
    ///
    /// Set via SITEASSET_INTERNAL_SCHEME environment variable.
    #[serde(default = "default_internal_scheme")]
    pub internal_scheme: String,

    /// Scale factor of the primary display.
    ///
    /// Set via SITEASSET_DISPLAY_SCALE_FACTOR environment variable.
    #[serde(default = "default_scale_factor")]
    pub display_scale_factor: f64,
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./siteasset-cache.sqlite")
}

fn default_assets_dir() -> PathBuf {
    PathBuf::from("./assets/img")
}

fn default_internal_scheme() -> String {
    DEFAULT_INTERNAL_SCHEME.into()
}

fn default_scale_factor() -> f64 {
    1.0
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            assets_dir: default_assets_dir(),
            internal_scheme: default_internal_scheme(),
            display_scale_factor: default_scale_factor(),
        }
    }
}

impl AppConfig {
    /// Whether resolutions should request high-density variants by default.
    pub fn is_high_density(&self) -> bool {
        self.display_scale_factor >= HIGH_DENSITY_SCALE
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the config file or environment cannot be
    /// parsed, or if validation fails after loading.
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("SITEASSET_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        Self::extract(figment.merge(Env::prefixed("SITEASSET_").ignore(&["config_file"])))
    }

    fn extract(figment: Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}
