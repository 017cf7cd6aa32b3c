//! Configuration management

use crate::core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const APP_DIR: &str = "hourly-steps";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub sensor: SensorConfig,
    #[serde(default)]
    pub complication: ComplicationConfig,
}

impl Config {
    /// Get the configuration file path
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))?;

        let app_config_dir = config_dir.join(APP_DIR);

        if !app_config_dir.exists() {
            fs::create_dir_all(&app_config_dir)?;
        }

        Ok(app_config_dir.join("config.toml"))
    }

    /// Load configuration from disk
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from a specific file, writing defaults if it does not exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            let config = Self::default();
            config.save_to(path)?;
            return Ok(config);
        }

        let content = fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))
    }

    /// Save configuration to disk
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Serialization(e.to_string()))?;
        fs::write(path, content)?;
        Ok(())
    }
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Language: "auto", "en", "fr"
    #[serde(default = "default_language")]
    pub language: String,
    /// Scheduled complication refresh in milliseconds
    #[serde(default = "default_refresh_rate")]
    pub refresh_rate_ms: u64,
}

fn default_language() -> String { "auto".to_string() }
fn default_refresh_rate() -> u64 { 60_000 }

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            language: default_language(),
            refresh_rate_ms: default_refresh_rate(),
        }
    }
}

/// Where the hourly state is persisted
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Backend: "sqlite" or "memory"
    #[serde(default = "default_backend")]
    pub backend: String,
    /// Database file override (default: data dir)
    #[serde(default)]
    pub path: Option<PathBuf>,
}

fn default_backend() -> String { "sqlite".to_string() }

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            path: None,
        }
    }
}

impl StorageConfig {
    /// Resolved database file location
    pub fn database_path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.path {
            return Ok(path.clone());
        }

        let data_dir = dirs::data_dir()
            .ok_or_else(|| Error::Config("Could not determine data directory".to_string()))?;

        let app_dir = data_dir.join(APP_DIR);
        fs::create_dir_all(&app_dir)?;

        Ok(app_dir.join("state.db"))
    }
}

/// Step counter source settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensorConfig {
    /// Source: "simulated", "stdin", "none"
    #[serde(default = "default_source")]
    pub source: String,
    /// Delay between simulated readings in milliseconds
    #[serde(default = "default_simulated_interval")]
    pub simulated_interval_ms: u64,
    /// Steps added per simulated reading
    #[serde(default = "default_simulated_steps")]
    pub simulated_steps_per_event: i64,
}

fn default_source() -> String { "simulated".to_string() }
fn default_simulated_interval() -> u64 { 1000 }
fn default_simulated_steps() -> i64 { 3 }

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            source: default_source(),
            simulated_interval_ms: default_simulated_interval(),
            simulated_steps_per_event: default_simulated_steps(),
        }
    }
}

/// Complication display settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComplicationConfig {
    /// Hourly steps at which the goal indicator replaces the number
    #[serde(default = "default_goal_steps")]
    pub goal_steps: i64,
    /// Value rendered in the watch-face picker preview
    #[serde(default = "default_preview_steps")]
    pub preview_steps: i64,
}

fn default_goal_steps() -> i64 { 250 }
fn default_preview_steps() -> i64 { 1234 }

impl Default for ComplicationConfig {
    fn default() -> Self {
        Self {
            goal_steps: default_goal_steps(),
            preview_steps: default_preview_steps(),
        }
    }
}
