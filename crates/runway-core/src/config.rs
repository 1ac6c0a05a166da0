use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{Result, RunwayError};

/// Top-level configuration for Runway.
///
/// Loaded from a TOML file. Every section is optional and falls back to its
/// defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunwayConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub admission: AdmissionConfig,
}

impl RunwayConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: RunwayConfig = toml::from_str(&content)?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist or cannot be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| RunwayError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }
}

/// General process settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Directory holding the execution database.
    pub data_dir: String,
    /// Log level: trace, debug, info, warn, error. `RUST_LOG` overrides it.
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            data_dir: "~/.runway/data".to_string(),
            log_level: "info".to_string(),
        }
    }
}

/// Execution store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// SQLite file name, relative to `general.data_dir` unless absolute.
    pub database_file: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_file: "executions.db".to_string(),
        }
    }
}

impl StorageConfig {
    /// Resolve the database file against the data directory, expanding a
    /// leading `~` from `HOME`.
    pub fn database_path(&self, general: &GeneralConfig) -> PathBuf {
        let file = PathBuf::from(&self.database_file);
        if file.is_absolute() {
            return file;
        }
        expand_home(&general.data_dir).join(file)
    }
}

fn expand_home(dir: &str) -> PathBuf {
    if let Some(rest) = dir.strip_prefix("~/") {
        if let Ok(home) = std::env::var("HOME") {
            return PathBuf::from(home).join(rest);
        }
    }
    PathBuf::from(dir)
}

/// What to do when a request names a parent execution that does not exist.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingParentPolicy {
    /// Reject the admission.
    #[default]
    Reject,
    /// Admit without inheriting any context from the parent.
    Ignore,
}

/// Admission pipeline settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AdmissionConfig {
    pub missing_parent: MissingParentPolicy,
    /// Emit an audit event for every scheduled execution.
    pub audit: bool,
}

impl Default for AdmissionConfig {
    fn default() -> Self {
        Self {
            missing_parent: MissingParentPolicy::Reject,
            audit: true,
        }
    }
}
