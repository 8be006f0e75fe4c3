//! Application configuration with layered loading.
//!
//! Loading precedence (highest wins):
//! 1. Environment variables (CARTSCOUT_*)
//! 2. TOML config file (if CARTSCOUT_CONFIG_FILE set)
//! 3. Built-in defaults
//!
//! Only deploy-environment knobs live here. Scrape timeouts, the cache
//! TTL, and the browser user-agent are fixed constants in the engine.

use std::path::PathBuf;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

/// Application configuration with layered loading.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path to a Chrome/Chromium executable.
    ///
    /// Set via CARTSCOUT_BROWSER_PATH. When unset, the browser layer
    /// autodetects an installed binary.
    #[serde(default)]
    pub browser_path: Option<PathBuf>,

    /// Whether the browser runs headless.
    ///
    /// Set via CARTSCOUT_HEADLESS. Headed mode is only useful for local
    /// selector debugging.
    #[serde(default = "default_true")]
    pub headless: bool,
}

fn default_true() -> bool {
    true
}

impl Default for AppConfig {
    fn default() -> Self {
        Self { browser_path: None, headless: true }
    }
}

impl AppConfig {
    /// Load configuration from all sources with layered precedence.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a source cannot be read or validation
    /// fails after loading.
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("CARTSCOUT_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(Env::prefixed("CARTSCOUT_").map(|key| key.as_str().to_lowercase().into()));

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert!(config.browser_path.is_none());
        assert!(config.headless);
    }
}
