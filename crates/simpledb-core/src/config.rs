//! Application configuration
//!
//! Configuration is loaded from:
//! 1. Default values
//! 2. Config file (~/.config/simpledb/config.toml)
//! 3. Environment variables (SIMPLEDB_* prefix)
//!
//! Environment variables take precedence over config file values.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::warn;

use crate::database::DatabaseOptions;
use crate::storage::file::document_file_name;

/// Environment variable prefix
const ENV_PREFIX: &str = "SIMPLEDB";

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding one document per database
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Persist the whole database after every mutation
    #[serde(default = "default_autocommit")]
    pub autocommit: bool,

    /// Pretty-print stored documents
    #[serde(default)]
    pub pretty: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            autocommit: default_autocommit(),
            pretty: false,
        }
    }
}

impl Config {
    /// Load configuration from default location and environment
    ///
    /// Order of precedence (highest to lowest):
    /// 1. Environment variables (SIMPLEDB_DATA_DIR, SIMPLEDB_AUTOCOMMIT, SIMPLEDB_PRETTY)
    /// 2. Config file (~/.config/simpledb/config.toml or SIMPLEDB_CONFIG)
    /// 3. Default values
    pub fn load() -> Result<Self> {
        Self::load_from_path(&Self::config_file_path())
    }

    /// Load configuration from a specific path
    ///
    /// Environment variables are still applied as overrides.
    /// If the file doesn't exist, defaults are used.
    pub fn load_from_path(path: &PathBuf) -> Result<Self> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {:?}", path))?;
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?
        } else {
            Self::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Load configuration from a TOML string (useful for testing)
    pub fn load_from_str(toml_content: &str) -> Result<Self> {
        let mut config: Config =
            toml::from_str(toml_content).context("Failed to parse config TOML")?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) {
        // SIMPLEDB_DATA_DIR
        if let Ok(val) = std::env::var(format!("{}_DATA_DIR", ENV_PREFIX)) {
            self.data_dir = PathBuf::from(val);
        }

        // SIMPLEDB_AUTOCOMMIT: true/1/yes/on or false/0/no/off, anything
        // else is ignored and the current value kept
        if let Ok(val) = std::env::var(format!("{}_AUTOCOMMIT", ENV_PREFIX)) {
            if let Some(flag) = parse_flag("AUTOCOMMIT", &val) {
                self.autocommit = flag;
            }
        }

        // SIMPLEDB_PRETTY: same values as SIMPLEDB_AUTOCOMMIT
        if let Ok(val) = std::env::var(format!("{}_PRETTY", ENV_PREFIX)) {
            if let Some(flag) = parse_flag("PRETTY", &val) {
                self.pretty = flag;
            }
        }
    }

    /// Get the config file path
    ///
    /// Can be overridden with SIMPLEDB_CONFIG environment variable
    pub fn config_file_path() -> PathBuf {
        if let Ok(path) = std::env::var(format!("{}_CONFIG", ENV_PREFIX)) {
            return PathBuf::from(path);
        }

        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("simpledb")
            .join("config.toml")
    }

    /// Get the path to the stored document of a database
    pub fn database_path(&self, name: &str) -> PathBuf {
        self.data_dir.join(document_file_name(name))
    }

    /// Options for databases opened with this configuration
    pub fn database_options(&self) -> DatabaseOptions {
        DatabaseOptions {
            autocommit: self.autocommit,
        }
    }
}

/// Parse a boolean environment flag, case-insensitively
///
/// Returns `None` (and logs a warning) for unrecognized values.
fn parse_flag(key: &str, val: &str) -> Option<bool> {
    match val.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => {
            warn!(
                "Ignoring {}_{}={:?}: expected true/false, 1/0, yes/no or on/off",
                ENV_PREFIX, key, val
            );
            None
        }
    }
}

/// Get the default data directory
fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("simpledb")
}

fn default_autocommit() -> bool {
    true
}
