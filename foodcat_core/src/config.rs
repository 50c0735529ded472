//! Configuration file support for foodcat.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/foodcat/config.toml`.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default)]
    pub rules: RulesConfig,
}

/// Derived output filename configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Suffix appended to the input stem by `categorize`
    #[serde(default = "default_categorized_suffix")]
    pub categorized_suffix: String,

    /// Suffix appended to the input stem by `fix-format`
    #[serde(default = "default_corrected_suffix")]
    pub corrected_suffix: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            categorized_suffix: default_categorized_suffix(),
            corrected_suffix: default_corrected_suffix(),
        }
    }
}

/// Rule table configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct RulesConfig {
    /// External TOML rule table used instead of the built-in one
    #[serde(default)]
    pub file: Option<PathBuf>,
}

// Default value functions
fn default_categorized_suffix() -> String {
    "-categorized".to_string()
}

fn default_corrected_suffix() -> String {
    "-corrected".to_string()
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::debug!("No config file found at {:?}, using defaults", config_path);
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir().unwrap_or_else(|| {
            let home = std::env::var("HOME").expect("HOME environment variable not set");
            PathBuf::from(home).join(".config")
        });
        base.join("foodcat").join("config.toml")
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }
}
