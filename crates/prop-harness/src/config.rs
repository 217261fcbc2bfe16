// crates/prop-harness/src/config.rs
// ============================================================================
// Module: Harness Configuration
// Description: Optional TOML configuration for test runs.
// Purpose: Let a checkout tune sample counts and run logging without code
//          changes.
// Dependencies: serde, thiserror, toml
// ============================================================================

//! ## Overview
//! Configuration is resolved from an explicit path, then the
//! `PROP_HARNESS_CONFIG` environment variable, then `prop-harness.toml` in the
//! working directory. Only the default file may be absent; an explicit or
//! environment path that cannot be read is an error. Every loaded file is
//! size-limited, must be utf-8 and is validated before use.
//!
//! ```toml
//! [run]
//! samples_override = 500
//!
//! [log]
//! sink = "file"
//! path = "harness.jsonl"
//! ```

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::audit::FileRunSink;
use crate::audit::NoopRunSink;
use crate::audit::RunSink;
use crate::audit::StderrRunSink;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
pub const DEFAULT_CONFIG_NAME: &str = "prop-harness.toml";
/// Environment variable used to override the config path.
pub const CONFIG_ENV_VAR: &str = "PROP_HARNESS_CONFIG";
/// Maximum configuration file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 64 * 1024;
/// Maximum total path length.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Upper bound for `run.samples_override`.
pub const MAX_SAMPLES: usize = 1_000_000;

// ============================================================================
// SECTION: Configuration Types
// ============================================================================

/// Harness configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HarnessConfig {
    /// Run settings.
    #[serde(default)]
    pub run: RunConfig,
    /// Run-event logging settings.
    #[serde(default)]
    pub log: LogConfig,
}

/// Run settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunConfig {
    /// Replaces every test's sample count when set.
    #[serde(default)]
    pub samples_override: Option<usize>,
}

/// Destination of run events.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogSinkKind {
    /// Drop events.
    #[default]
    None,
    /// JSON lines on stderr.
    Stderr,
    /// JSON lines appended to `log.path`.
    File,
}

/// Run-event logging settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LogConfig {
    /// Selected sink.
    #[serde(default)]
    pub sink: LogSinkKind,
    /// Log file path for the file sink.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl HarnessConfig {
    /// Loads configuration using the standard resolution rules.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when an explicit or environment path cannot be
    /// read, or when the file is oversized, not utf-8, unparsable or invalid.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(resolved) = resolve_path(path)? else {
            return Ok(Self::default());
        };
        let bytes = fs::read(&resolved).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        Self::from_toml_str(content)
    }

    /// Parses and validates configuration text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML and
    /// [`ConfigError::Invalid`] when validation fails.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] describing the first violated rule.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.run.validate()?;
        self.log.validate()
    }
}

impl RunConfig {
    /// Validates run settings.
    fn validate(&self) -> Result<(), ConfigError> {
        match self.samples_override {
            Some(0) => Err(ConfigError::Invalid(
                "run.samples_override must be greater than zero".to_string(),
            )),
            Some(samples) if samples > MAX_SAMPLES => Err(ConfigError::Invalid(format!(
                "run.samples_override must not exceed {MAX_SAMPLES}"
            ))),
            _ => Ok(()),
        }
    }
}

impl LogConfig {
    /// Validates logging settings.
    fn validate(&self) -> Result<(), ConfigError> {
        match (self.sink, &self.path) {
            (LogSinkKind::File, None) => {
                Err(ConfigError::Invalid("log.path is required for the file sink".to_string()))
            }
            (LogSinkKind::File, Some(path)) => validate_path(path),
            (_, Some(_)) => {
                Err(ConfigError::Invalid("log.path is only valid for the file sink".to_string()))
            }
            (_, None) => Ok(()),
        }
    }

    /// Opens the configured sink.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] when the log file cannot be opened.
    pub fn open_sink(&self) -> Result<Arc<dyn RunSink>, ConfigError> {
        match (self.sink, &self.path) {
            (LogSinkKind::None, _) => Ok(Arc::new(NoopRunSink)),
            (LogSinkKind::Stderr, _) => Ok(Arc::new(StderrRunSink)),
            (LogSinkKind::File, Some(path)) => FileRunSink::new(path)
                .map(|sink| Arc::new(sink) as Arc<dyn RunSink>)
                .map_err(|err| ConfigError::Io(err.to_string())),
            (LogSinkKind::File, None) => {
                Err(ConfigError::Invalid("log.path is required for the file sink".to_string()))
            }
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration loading or validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration or opening a sink.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves the config path; `None` means "use defaults".
fn resolve_path(path: Option<&Path>) -> Result<Option<PathBuf>, ConfigError> {
    if let Some(path) = path {
        validate_path(path)?;
        return Ok(Some(path.to_path_buf()));
    }
    if let Ok(env_path) = env::var(CONFIG_ENV_VAR) {
        let env_path = PathBuf::from(env_path);
        validate_path(&env_path)?;
        return Ok(Some(env_path));
    }
    let default_path = PathBuf::from(DEFAULT_CONFIG_NAME);
    Ok(default_path.is_file().then_some(default_path))
}

/// Validates a path against length limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.trim().is_empty() {
        return Err(ConfigError::Invalid("config path must be non-empty".to_string()));
    }
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    Ok(())
}
