//! Configuration validation rules.

use crate::config::AppConfig;
use thiserror::Error;

/// Configuration validation errors.
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
    /// Returns `ConfigError::Invalid` if `browser_path` is set to an
    /// empty path.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(path) = &self.browser_path
            && path.as_os_str().is_empty()
        {
            return Err(ConfigError::Invalid {
                field: "browser_path".into(),
                reason: "must not be empty when set".into(),
            });
        }

        if !self.headless {
            tracing::warn!("running with a headed browser; intended for selector debugging only");
        }

        Ok(())
    }
}
