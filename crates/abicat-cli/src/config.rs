//! CLI configuration
//!
//! Two sources:
//! - environment variables for output preferences ([`Config`])
//! - an optional `abicat.toml` for header generation ([`ProjectConfig`])
//!
//! Precedence: CLI flags > environment > `abicat.toml` > defaults.

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File looked up in the working directory when `--config` is not given
pub const CONFIG_FILE: &str = "abicat.toml";

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid TOML in {file}: {error}")]
    TomlParseError {
        file: PathBuf,
        error: toml::de::Error,
    },

    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// CLI configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Default to JSON output (ABICAT_JSON=1)
    pub default_json: bool,
    /// Disable colored output (ABICAT_NO_COLOR=1 or NO_COLOR=1)
    pub no_color: bool,
    /// Log filter directive (ABICAT_LOG)
    pub log_filter: Option<String>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            default_json: env::var("ABICAT_JSON")
                .map(|v| {
                    let lower = v.to_lowercase();
                    lower == "1" || lower == "true" || lower == "json"
                })
                .unwrap_or(false),
            no_color: env::var("ABICAT_NO_COLOR").is_ok() || env::var("NO_COLOR").is_ok(),
            log_filter: env::var(abicat_native::logging::LOG_ENV).ok(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

/// Contents of `abicat.toml`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectConfig {
    #[serde(default)]
    pub header: HeaderConfig,
}

/// `[header]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HeaderConfig {
    /// Include guard macro
    pub guard: String,
    /// Emit `free_*` prototypes
    pub include_release: bool,
    /// Comment line at the top of the header
    pub banner: String,
}

impl Default for HeaderConfig {
    fn default() -> Self {
        Self {
            guard: "ABICAT_H".to_string(),
            include_release: true,
            banner: "Generated by abicat".to_string(),
        }
    }
}

impl HeaderConfig {
    fn validate(&self) -> ConfigResult<()> {
        let valid_start = self
            .guard
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
        let valid_rest = self
            .guard
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_');
        if !valid_start || !valid_rest {
            return Err(ConfigError::InvalidValue {
                field: "header.guard".to_string(),
                reason: format!("'{}' is not a C identifier", self.guard),
            });
        }
        if self.banner.contains("*/") {
            return Err(ConfigError::InvalidValue {
                field: "header.banner".to_string(),
                reason: "must not contain '*/'".to_string(),
            });
        }
        Ok(())
    }
}

impl ProjectConfig {
    /// Parse and validate a config file
    pub fn load_from_file(path: &Path) -> ConfigResult<Self> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        let content = fs::read_to_string(path)?;
        let config: ProjectConfig =
            toml::from_str(&content).map_err(|error| ConfigError::TomlParseError {
                file: path.to_path_buf(),
                error,
            })?;
        config.header.validate()?;
        tracing::debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// `--config` if given, else `./abicat.toml` if present, else defaults
    pub fn discover(explicit: Option<&Path>, dir: &Path) -> ConfigResult<Self> {
        match explicit {
            Some(path) => Self::load_from_file(path),
            None => {
                let candidate = dir.join(CONFIG_FILE);
                if candidate.exists() {
                    Self::load_from_file(&candidate)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }
}
