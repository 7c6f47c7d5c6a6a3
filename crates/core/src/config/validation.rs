//! Configuration validation rules.

use crate::config::AppConfig;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `internal_scheme` is empty or does not end in `://`
    /// - `display_scale_factor` is not finite or outside (0, 8]
    /// - `assets_dir` is empty
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.internal_scheme.len() <= 3 || !self.internal_scheme.ends_with("://") {
            return Err(ConfigError::Invalid {
                field: "internal_scheme".into(),
                reason: "must be a scheme followed by ://".into(),
            });
        }

        let scale = self.display_scale_factor;
        if !scale.is_finite() || scale <= 0.0 || scale > 8.0 {
            return Err(ConfigError::Invalid {
                field: "display_scale_factor".into(),
                reason: "must be greater than 0 and at most 8".into(),
            });
        }

        if self.assets_dir.as_os_str().is_empty() {
            return Err(ConfigError::Invalid { field: "assets_dir".into(), reason: "must not be empty".into() });
        }

        if !self.assets_dir.exists() {
            tracing::warn!(
                assets_dir = %self.assets_dir.display(),
                "assets_dir does not exist; built-in icons and defaults will be unavailable"
            );
        }

        Ok(())
    }
}
