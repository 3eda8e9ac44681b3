//! Configuration file management.
//!
//! Handles reading, writing, and validating `hangar.toml`. The master key is
//! not part of the file; it comes from the environment.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

use crate::core::constants;
use crate::core::tree::IdentityRetention;
use crate::error::{ConfigError, Result};

/// Contents of `hangar.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub hangar: Meta,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub dispatch: DispatchConfig,
    #[serde(default)]
    pub policy: PolicyConfig,
}

/// Metadata section of the configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meta {
    /// Configuration version
    pub version: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Store file; relative paths are taken from the config file's directory.
    pub path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(constants::STORE_FILE),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DispatchConfig {
    /// Upper bound on each external call, in seconds.
    pub timeout_secs: u64,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: constants::DEFAULT_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PolicyConfig {
    #[serde(default)]
    pub identity_retention: IdentityRetention,
}

impl Config {
    /// Create a configuration with defaults and the current version.
    pub fn new() -> Self {
        Self {
            hangar: Meta {
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            storage: StorageConfig::default(),
            dispatch: DispatchConfig::default(),
            policy: PolicyConfig::default(),
        }
    }

    /// `hangar.toml` under the user's config directory.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if the platform has no config
    /// directory.
    pub fn default_path() -> Result<PathBuf> {
        let base = dirs::config_dir().ok_or(ConfigError::InvalidValue {
            field: "config path",
            reason: "no config directory on this platform".to_string(),
        })?;
        Ok(base.join("hangar").join(constants::CONFIG_FILE))
    }

    /// Load and validate the configuration at `path`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotInitialized` if the file doesn't exist,
    /// or `ConfigError::Parse` if the TOML is malformed.
    pub fn load(path: &Path) -> Result<Self> {
        debug!(path = %path.display(), "loading config");

        if !path.exists() {
            return Err(ConfigError::NotInitialized(path.display().to_string()).into());
        }
        let contents = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        let config: Self = toml::from_str(&contents).map_err(ConfigError::Parse)?;

        config.validate()?;
        debug!(
            retention = ?config.policy.identity_retention,
            timeout_secs = config.dispatch.timeout_secs,
            "config loaded"
        );
        Ok(config)
    }

    /// Write the configuration to `path`, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns error if serialization or file write fails.
    pub fn save(&self, path: &Path) -> Result<()> {
        debug!(path = %path.display(), "saving config");

        let contents = toml::to_string_pretty(self).map_err(ConfigError::Serialize)?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Store file location for a config loaded from `config_path`.
    pub fn store_path(&self, config_path: &Path) -> PathBuf {
        if self.storage.path.is_absolute() {
            return self.storage.path.clone();
        }
        config_path
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .join(&self.storage.path)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.dispatch.timeout_secs)
    }

    /// Validate the configuration structure and contents
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` or `ConfigError::MissingField` on validation failure.
    pub fn validate(&self) -> Result<()> {
        if self.hangar.version.is_empty() {
            return Err(ConfigError::MissingField { field: "version" }.into());
        }

        let version_parts: Vec<&str> = self.hangar.version.split('.').collect();
        if version_parts.len() < 2 {
            return Err(ConfigError::InvalidValue {
                field: "version",
                reason: format!("not a valid semver: {}", self.hangar.version),
            }
            .into());
        }

        if self.dispatch.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "dispatch.timeout_secs",
                reason: "must be greater than zero".to_string(),
            }
            .into());
        }

        if self.storage.path.as_os_str().is_empty() {
            return Err(ConfigError::MissingField {
                field: "storage.path",
            }
            .into());
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
