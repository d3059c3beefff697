// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Transfer configuration.
//!
//! The transport's largest single message, `max_transfer_bytes`, bounds
//! every remote memory chunk. It comes from, in increasing priority:
//!
//! 1. The default ([`DEFAULT_MAX_TRANSFER_BYTES`])
//! 2. A TOML file or string ([`TransferSettings::from_file`])
//! 3. The `RPCWIRE_MAX_TRANSFER_BYTES` environment variable
//!
//! [`TransferConfig`] holds the live value. Regions read it at the start
//! of each operation, so an update applies to the next call.
//!
//! # Example
//!
//! ```
//! use rpcwire::config::{TransferConfig, TransferSettings};
//!
//! let settings = TransferSettings::from_toml_str("max_transfer_bytes = 4096").unwrap();
//! let config = TransferConfig::new(settings);
//! assert_eq!(config.max_transfer_bytes(), 4096);
//!
//! config.set_max_transfer_bytes(1024).unwrap();
//! assert_eq!(config.max_transfer_bytes(), 1024);
//! ```

use arc_swap::ArcSwap;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::{Arc, OnceLock};
use thiserror::Error;

/// Default transport limit: 10 MiB.
pub const DEFAULT_MAX_TRANSFER_BYTES: usize = 10 * 1024 * 1024;

/// Environment override for `max_transfer_bytes`.
pub const MAX_TRANSFER_BYTES_ENV: &str = "RPCWIRE_MAX_TRANSFER_BYTES";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Transfer settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferSettings {
    /// Largest single message the transport accepts (bytes).
    #[serde(default = "default_max_transfer_bytes")]
    pub max_transfer_bytes: usize,
}

fn default_max_transfer_bytes() -> usize {
    DEFAULT_MAX_TRANSFER_BYTES
}

impl Default for TransferSettings {
    fn default() -> Self {
        Self {
            max_transfer_bytes: default_max_transfer_bytes(),
        }
    }
}

impl TransferSettings {
    /// Load from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse from a TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let settings: Self = toml::from_str(content)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Defaults, then the environment override.
    pub fn from_env() -> Self {
        let mut settings = Self::default();
        settings.apply_env();
        settings
    }

    /// Apply `RPCWIRE_MAX_TRANSFER_BYTES` if set.
    ///
    /// A value that does not parse as a positive integer is ignored.
    pub fn apply_env(&mut self) {
        if let Ok(raw) = std::env::var(MAX_TRANSFER_BYTES_ENV) {
            self.apply_override(&raw);
        }
    }

    fn apply_override(&mut self, raw: &str) {
        match raw.trim().parse::<usize>() {
            Ok(bytes) if bytes > 0 => self.max_transfer_bytes = bytes,
            _ => log::warn!(
                "[config] ignoring {}={:?}: expected a positive integer",
                MAX_TRANSFER_BYTES_ENV,
                raw
            ),
        }
    }

    /// Validate settings.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_transfer_bytes == 0 {
            return Err(ConfigError::Invalid(
                "max_transfer_bytes must be greater than 0".into(),
            ));
        }
        Ok(())
    }

    /// Serialize to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string(self).map_err(|e| ConfigError::Invalid(e.to_string()))
    }
}

/// Live transfer settings, swappable without locking readers.
#[derive(Debug)]
pub struct TransferConfig {
    settings: ArcSwap<TransferSettings>,
}

impl TransferConfig {
    pub fn new(settings: TransferSettings) -> Self {
        Self {
            settings: ArcSwap::from_pointee(settings),
        }
    }

    /// Process-wide instance, built once from defaults and the environment.
    pub fn global() -> Arc<TransferConfig> {
        static GLOBAL: OnceLock<Arc<TransferConfig>> = OnceLock::new();
        let config =
            GLOBAL.get_or_init(|| Arc::new(TransferConfig::new(TransferSettings::from_env())));
        Arc::clone(config)
    }

    pub fn settings(&self) -> Arc<TransferSettings> {
        self.settings.load_full()
    }

    pub fn max_transfer_bytes(&self) -> usize {
        self.settings.load().max_transfer_bytes
    }

    pub fn set_max_transfer_bytes(&self, bytes: usize) -> Result<(), ConfigError> {
        self.update(TransferSettings {
            max_transfer_bytes: bytes,
        })
    }

    /// Replace the settings after validating them.
    pub fn update(&self, settings: TransferSettings) -> Result<(), ConfigError> {
        settings.validate()?;
        log::debug!(
            "[config] max_transfer_bytes -> {}",
            settings.max_transfer_bytes
        );
        self.settings.store(Arc::new(settings));
        Ok(())
    }
}

impl Default for TransferConfig {
    fn default() -> Self {
        Self::new(TransferSettings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let settings = TransferSettings::default();
        assert_eq!(settings.max_transfer_bytes, 10 * 1024 * 1024);
        assert!(settings.validate().is_ok());
        assert_eq!(
            TransferSettings::from_toml_str("").unwrap(),
            TransferSettings::default()
        );
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "max_transfer_bytes = 65536").unwrap();
        let settings = TransferSettings::from_file(file.path()).unwrap();
        assert_eq!(settings.max_transfer_bytes, 65536);
    }

    #[test]
    fn test_invalid_settings() {
        assert!(matches!(
            TransferSettings::from_toml_str("max_transfer_bytes = 0"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            TransferSettings::from_toml_str("max_transfer_bytes = \"big\""),
            Err(ConfigError::Toml(_))
        ));
        assert!(matches!(
            TransferSettings::from_file("/nonexistent/rpcwire.toml"),
            Err(ConfigError::Io(_))
        ));
    }

    #[test]
    fn test_env_override_parsing() {
        let mut settings = TransferSettings::default();
        settings.apply_override("2048");
        assert_eq!(settings.max_transfer_bytes, 2048);
        settings.apply_override("lots");
        assert_eq!(settings.max_transfer_bytes, 2048);
        settings.apply_override("0");
        assert_eq!(settings.max_transfer_bytes, 2048);
    }

    #[test]
    fn test_live_update() {
        let config = TransferConfig::default();
        config.set_max_transfer_bytes(512).unwrap();
        assert_eq!(config.max_transfer_bytes(), 512);
        assert!(config.set_max_transfer_bytes(0).is_err());
        assert_eq!(config.max_transfer_bytes(), 512);
    }

    #[test]
    fn test_toml_roundtrip() {
        let settings = TransferSettings {
            max_transfer_bytes: 777,
        };
        let text = settings.to_toml().unwrap();
        assert_eq!(TransferSettings::from_toml_str(&text).unwrap(), settings);
    }
}
