//! Config loading, validation, and utility operations.

use super::model::LockConfig;
use crate::error::{LockError, Result};
use std::path::Path;
use std::time::Duration;

impl LockConfig {
    /// Load config from a YAML file.
    ///
    /// Unknown fields in the YAML are silently ignored for forward compatibility.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the YAML file
    ///
    /// # Returns
    ///
    /// * `Ok(LockConfig)` - Successfully loaded and validated config
    /// * `Err(LockError::Config)` - Read error, parse error or validation failure
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path).map_err(|e| {
            LockError::Config(format!(
                "failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        Self::from_yaml(&content)
    }

    /// Parse config from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: LockConfig = serde_yaml::from_str(yaml)
            .map_err(|e| LockError::Config(format!("failed to parse config YAML: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Serialize config to YAML string.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self)
            .map_err(|e| LockError::Config(format!("failed to serialize config to YAML: {}", e)))
    }

    /// Validate config values and return error on invalid values.
    ///
    /// Validation rules:
    /// - `store_url` must be non-empty
    /// - `default_ttl_secs` must be positive
    /// - `request_timeout_ms` must be positive
    pub fn validate(&self) -> Result<()> {
        if self.store_url.trim().is_empty() {
            return Err(LockError::Config("store_url must not be empty".to_string()));
        }

        if self.default_ttl_secs == 0 {
            return Err(LockError::Config(
                "default_ttl_secs must be greater than 0".to_string(),
            ));
        }

        if self.request_timeout_ms == 0 {
            return Err(LockError::Config(
                "request_timeout_ms must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// TTL applied when the caller does not pick one.
    pub fn default_ttl(&self) -> Duration {
        Duration::from_secs(self.default_ttl_secs)
    }

    /// Deadline for one store round trip.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}
