//! Configuration file loading for the resume arena.
//!
//! Both binaries read `rank.toml` from the working directory. Every field
//! has a default, so the file is optional and may name only the values it
//! changes.

use rank_core::RatingConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when loading or parsing configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    /// Failed to parse the configuration file as valid TOML.
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Main arena configuration structure.
#[derive(Debug, Deserialize, Serialize)]
pub struct ArenaConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database")]
    pub database: PathBuf,
    /// Address the HTTP server binds to.
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Rating engine parameters (`[rating]` section).
    #[serde(default)]
    pub rating: RatingConfig,
}

fn default_database() -> PathBuf {
    PathBuf::from("data/rank.db")
}

fn default_bind() -> String {
    "127.0.0.1:3000".to_string()
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            database: default_database(),
            bind: default_bind(),
            rating: RatingConfig::default(),
        }
    }
}

impl ArenaConfig {
    /// Loads the arena configuration from disk.
    ///
    /// Reads and parses the file at [`Self::config_path()`]. A missing file
    /// yields the default configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ReadError`] if the file exists but cannot be
    /// read, or [`ConfigError::ParseError`] if it contains invalid TOML.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_path();
        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            Ok(toml::from_str(&content)?)
        } else {
            Ok(Self::default())
        }
    }

    /// Returns the path to the configuration file.
    pub fn config_path() -> PathBuf {
        PathBuf::from("rank.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_is_default() {
        let config: ArenaConfig = toml::from_str("").unwrap();
        assert_eq!(config.database, PathBuf::from("data/rank.db"));
        assert_eq!(config.bind, "127.0.0.1:3000");
        assert_eq!(config.rating.k_factor, 32.0);
    }

    #[test]
    fn test_full_toml() {
        let config: ArenaConfig = toml::from_str(
            r#"
            database = "/tmp/test.db"
            bind = "0.0.0.0:8080"

            [rating]
            k_factor = 24.0
            promoted_bias = 0.75
            "#,
        )
        .unwrap();
        assert_eq!(config.database, PathBuf::from("/tmp/test.db"));
        assert_eq!(config.bind, "0.0.0.0:8080");
        assert_eq!(config.rating.k_factor, 24.0);
        assert_eq!(config.rating.promoted_bias, 0.75);
        // Unnamed rating fields keep their defaults.
        assert_eq!(config.rating.initial_rating, 1200);
    }

    #[test]
    fn test_invalid_toml_is_parse_error() {
        let result: Result<ArenaConfig, _> = toml::from_str("bind = [not valid");
        assert!(result.is_err());
    }
}
