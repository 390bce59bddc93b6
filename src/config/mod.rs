//! Configuration management for compadre
//!
//! This module handles loading, parsing, and managing configuration from:
//! - Configuration files (TOML format)
//! - Command-line arguments
//!
//! Configuration precedence (highest to lowest):
//! 1. Command-line arguments
//! 2. Configuration file
//! 3. Default values

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{ConfigError, Result};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Provider-side configuration
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Adapter-side configuration
    #[serde(default)]
    pub adapter: AdapterConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Provider-side configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Directories searched for completion spec files
    #[serde(default = "default_spec_dirs")]
    pub spec_dirs: Vec<PathBuf>,

    /// Deadline for `exec` value sources, in milliseconds
    #[serde(default = "default_exec_timeout_ms")]
    pub exec_timeout_ms: u64,
}

/// Adapter-side configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdapterConfig {
    /// Deadline for one provider subprocess round-trip, in milliseconds
    ///
    /// The adapter blocks the shell's keystroke loop while it waits, so
    /// this stays low. A timed-out call counts as an empty response.
    #[serde(default = "default_provider_timeout_ms")]
    pub provider_timeout_ms: u64,

    /// Always offer a static `--help` entry at the top level
    #[serde(default = "default_inject_help")]
    pub inject_help: bool,

    /// Drop duplicate candidates before display (first occurrence wins)
    #[serde(default = "default_dedup")]
    pub dedup: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: LogLevel,

    /// Enable timestamps in logs
    #[serde(default = "default_log_timestamps")]
    pub timestamps: bool,
}

/// Log level options
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

// Default value functions
fn default_spec_dirs() -> Vec<PathBuf> {
    vec![
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("compadre")
            .join("specs"),
    ]
}

fn default_exec_timeout_ms() -> u64 {
    200
}

fn default_provider_timeout_ms() -> u64 {
    200
}

fn default_inject_help() -> bool {
    true
}

fn default_dedup() -> bool {
    true
}

fn default_log_level() -> LogLevel {
    LogLevel::Warn
}

fn default_log_timestamps() -> bool {
    false
}

impl Default for Config {
    fn default() -> Self {
        Self {
            provider: ProviderConfig::default(),
            adapter: AdapterConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            spec_dirs: default_spec_dirs(),
            exec_timeout_ms: default_exec_timeout_ms(),
        }
    }
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            provider_timeout_ms: default_provider_timeout_ms(),
            inject_help: default_inject_help(),
            dedup: default_dedup(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            timestamps: default_log_timestamps(),
        }
    }
}

impl Config {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the default configuration file path
    ///
    /// # Returns
    /// * `PathBuf` - Path to default configuration file
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("compadre")
            .join("config.toml")
    }

    /// Load configuration from a file, falling back to defaults
    ///
    /// A missing file at the default location is not an error; an explicit
    /// path that does not exist is.
    ///
    /// # Arguments
    /// * `path` - Explicit config file path, or `None` for the default
    ///
    /// # Returns
    /// * `Result<Config>` - Loaded configuration or error
    pub fn load_from_file(path: Option<&Path>) -> Result<Self> {
        let (path, explicit) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => (Self::default_path(), false),
        };

        if !path.exists() {
            if explicit {
                return Err(
                    ConfigError::FileNotFound(path.display().to_string()).into()
                );
            }
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&path)?;
        let config: Config = toml::from_str(&contents)
            .map_err(|e| ConfigError::InvalidFormat(e.to_string()))?;

        Ok(config)
    }

    /// Save configuration to a file
    ///
    /// # Arguments
    /// * `path` - Path where to save the configuration
    ///
    /// # Returns
    /// * `Result<()>` - Success or error
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::Generic(e.to_string()))?;
        std::fs::write(path, contents)?;

        Ok(())
    }

    /// Validate the configuration
    ///
    /// # Returns
    /// * `Result<()>` - Ok if valid, error otherwise
    pub fn validate(&self) -> Result<()> {
        if self.adapter.provider_timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "adapter.provider_timeout_ms".to_string(),
                value: "0".to_string(),
            }
            .into());
        }

        if self.provider.exec_timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "provider.exec_timeout_ms".to_string(),
                value: "0".to_string(),
            }
            .into());
        }

        if self.provider.spec_dirs.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "provider.spec_dirs".to_string(),
                value: "[]".to_string(),
            }
            .into());
        }

        Ok(())
    }

    /// Get the provider round-trip deadline as Duration
    pub fn provider_timeout(&self) -> Duration {
        Duration::from_millis(self.adapter.provider_timeout_ms)
    }

    /// Get the exec value-source deadline as Duration
    pub fn exec_timeout(&self) -> Duration {
        Duration::from_millis(self.provider.exec_timeout_ms)
    }
}

impl LogLevel {
    /// Convert to tracing::Level
    pub fn to_tracing_level(&self) -> tracing::Level {
        match self {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }
}
