// Configuration File Support
//
// This module provides configuration file parsing for the pentest gateway.
// Supports TOML format with environment variable overrides.
// Configuration files are loaded from XDG config directory: ~/.config/pentest-gateway/config.toml

use crate::tools::ExecutorConfig;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Smallest accepted per-stream output cap
pub const MIN_OUTPUT_BYTES: usize = 1024;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Logging configuration
    pub logging: LoggingConfig,

    /// Process executor configuration
    pub executor: ExecutorSettings,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (json, pretty, compact)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "compact".to_string(),
        }
    }
}

impl LoggingConfig {
    /// Convert log level string to tracing::Level
    pub fn level(&self) -> Result<tracing::Level> {
        self.level
            .to_lowercase()
            .parse()
            .map_err(|e| anyhow::anyhow!("Failed to parse log level: {}", e))
    }
}

/// Process executor settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ExecutorSettings {
    /// Maximum bytes kept per output stream
    pub max_output_bytes: usize,

    /// Working directory for launched tools
    pub working_dir: Option<PathBuf>,
}

impl Default for ExecutorSettings {
    fn default() -> Self {
        Self {
            max_output_bytes: crate::tools::MAX_OUTPUT_SIZE,
            working_dir: None,
        }
    }
}

impl Config {
    /// Load configuration from the default XDG config directory
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed.
    /// If the config file does not exist, returns default configuration.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();
        Self::load_from_path(&config_path)
    }

    /// Load configuration from a specific path
    ///
    /// Environment overrides are applied whether or not the file exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if the
    /// resulting configuration fails [`Config::validate`].
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let config = if path.exists() {
            let content = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file from {:?}", path))?;
            toml::from_str::<Config>(&content)
                .with_context(|| format!("Failed to parse config file from {:?}", path))?
        } else {
            tracing::debug!("Config file not found at {:?}, using defaults", path);
            Self::default()
        };

        let config = config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;

        tracing::debug!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Get the default configuration file path
    ///
    /// Returns `~/.config/pentest-gateway/config.toml` on Linux
    pub fn config_path() -> PathBuf {
        if let Some(proj_dirs) =
            directories::ProjectDirs::from("com", "pentest-gateway", "pentest-gateway")
        {
            proj_dirs.config_dir().join("config.toml")
        } else {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home)
                .join(".config")
                .join("pentest-gateway")
                .join("config.toml")
        }
    }

    /// Apply overrides looked up by environment variable name
    ///
    /// Variables take precedence over config file values:
    /// - PENTEST_GATEWAY_LOG_LEVEL
    /// - PENTEST_GATEWAY_LOG_FORMAT
    /// - PENTEST_GATEWAY_MAX_OUTPUT_BYTES
    /// - PENTEST_GATEWAY_WORKING_DIR
    ///
    /// Unparseable numeric values are ignored.
    pub fn apply_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(level) = lookup("PENTEST_GATEWAY_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = lookup("PENTEST_GATEWAY_LOG_FORMAT") {
            self.logging.format = format;
        }
        if let Some(bytes) = lookup("PENTEST_GATEWAY_MAX_OUTPUT_BYTES") {
            if let Ok(bytes) = bytes.parse::<usize>() {
                self.executor.max_output_bytes = bytes;
            }
        }
        if let Some(dir) = lookup("PENTEST_GATEWAY_WORKING_DIR") {
            if !dir.is_empty() {
                self.executor.working_dir = Some(PathBuf::from(dir));
            }
        }

        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        match self.logging.level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => anyhow::bail!(
                "Invalid log level: {}. Must be one of: trace, debug, info, warn, error",
                self.logging.level
            ),
        }

        match self.logging.format.to_lowercase().as_str() {
            "json" | "pretty" | "compact" => {}
            _ => anyhow::bail!(
                "Invalid log format: {}. Must be one of: json, pretty, compact",
                self.logging.format
            ),
        }

        if self.executor.max_output_bytes < MIN_OUTPUT_BYTES {
            anyhow::bail!(
                "Executor max_output_bytes must be at least {}",
                MIN_OUTPUT_BYTES
            );
        }

        if let Some(ref dir) = self.executor.working_dir {
            if !dir.is_dir() {
                anyhow::bail!("Executor working_dir {:?} is not a directory", dir);
            }
        }

        Ok(())
    }

    /// Executor configuration derived from these settings
    pub fn executor_config(&self) -> ExecutorConfig {
        ExecutorConfig {
            max_output_size: self.executor.max_output_bytes,
            working_dir: self.executor.working_dir.clone(),
        }
    }
}
