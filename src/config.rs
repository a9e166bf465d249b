//! Configuration module for the log generator.
//!
//! This module provides environment-based configuration: the optional single
//! service name, the generation interval, and the logs directory.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::log_generator::DEFAULT_SERVICE_NAMES;
use crate::rotation::DEFAULT_MAX_HISTORY;
use crate::sink::SinkConfig;

/// Identifier used in file names when no service name is configured
const DEFAULT_FILE_IDENTIFIER: &str = "service";

/// Default generation interval in milliseconds
const DEFAULT_INTERVAL_MS: u64 = 1000;

/// Longest allowed generation interval (one hour)
const MAX_INTERVAL_MS: u64 = 3_600_000;

/// Default logs directory, relative to the working directory
const DEFAULT_LOGS_DIR: &str = "logs";

const SERVICE_NAME_VAR: &str = "SERVICE_NAME";
const INTERVAL_VAR: &str = "LOG_GENERATOR_INTERVAL_MS";
const LOGS_DIR_VAR: &str = "LOG_GENERATOR_LOGS_DIR";

/// Configuration for the log generator.
///
/// All settings can be configured via environment variables:
/// - `SERVICE_NAME`: single service name and file identifier (default: unset)
/// - `LOG_GENERATOR_INTERVAL_MS`: milliseconds between records (default: 1000)
/// - `LOG_GENERATOR_LOGS_DIR`: directory for rotation files (default: logs)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Single configured service name; `None` cycles through the defaults
    pub service_name: Option<String>,

    /// Pause between two generated records
    pub interval: Duration,

    /// Directory holding the hourly log files
    pub logs_dir: PathBuf,
}

/// Error type for configuration loading failures
#[derive(Debug)]
pub struct ConfigError {
    pub message: String,
    pub env_var: Option<String>,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.env_var {
            Some(var) => write!(f, "Configuration error for {}: {}", var, self.message),
            None => write!(f, "Configuration error: {}", self.message),
        }
    }
}

impl std::error::Error for ConfigError {}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `LOG_GENERATOR_INTERVAL_MS` is not a valid
    /// number, is zero, or exceeds one hour.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use microservice_log_generator::config::Config;
    ///
    /// let config = Config::from_env().expect("Failed to load config");
    /// println!("Writing to {}", config.logs_dir.display());
    /// ```
    pub fn from_env() -> Result<Self, ConfigError> {
        // An empty SERVICE_NAME counts as unset
        let service_name = env::var(SERVICE_NAME_VAR)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());

        let interval = Duration::from_millis(Self::parse_interval()?);

        let logs_dir = env::var(LOGS_DIR_VAR)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LOGS_DIR));

        Ok(Self {
            service_name,
            interval,
            logs_dir,
        })
    }

    /// Parse the generation interval from the environment with validation.
    fn parse_interval() -> Result<u64, ConfigError> {
        match env::var(INTERVAL_VAR) {
            Ok(value) => {
                let interval: u64 = value.trim().parse().map_err(|_| ConfigError {
                    message: format!("'{}' is not a valid number", value),
                    env_var: Some(INTERVAL_VAR.to_string()),
                })?;

                if interval == 0 {
                    return Err(ConfigError {
                        message: "interval must be greater than 0".to_string(),
                        env_var: Some(INTERVAL_VAR.to_string()),
                    });
                }

                if interval > MAX_INTERVAL_MS {
                    return Err(ConfigError {
                        message: format!(
                            "interval {}ms exceeds maximum ({}ms)",
                            interval, MAX_INTERVAL_MS
                        ),
                        env_var: Some(INTERVAL_VAR.to_string()),
                    });
                }

                Ok(interval)
            }
            Err(_) => Ok(DEFAULT_INTERVAL_MS),
        }
    }

    /// Service names eligible for random selection.
    pub fn allow_list(&self) -> Vec<String> {
        match &self.service_name {
            Some(name) => vec![name.clone()],
            None => DEFAULT_SERVICE_NAMES.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Fixed identifier used in rotation file names.
    pub fn file_identifier(&self) -> &str {
        self.service_name.as_deref().unwrap_or(DEFAULT_FILE_IDENTIFIER)
    }

    /// Sink settings derived from this configuration.
    pub fn sink_config(&self) -> SinkConfig {
        SinkConfig {
            logs_dir: self.logs_dir.clone(),
            identifier: self.file_identifier().to_string(),
            max_history: DEFAULT_MAX_HISTORY,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service_name: None,
            interval: Duration::from_millis(DEFAULT_INTERVAL_MS),
            logs_dir: PathBuf::from(DEFAULT_LOGS_DIR),
        }
    }
}
