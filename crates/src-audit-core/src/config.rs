//! Runtime settings.
//!
//! The audits themselves are not configurable: thresholds, extensions and
//! excluded directories are constants. What can be tuned is the ambient
//! behavior (log level, log directory), read from defaults merged with
//! `SRC_AUDIT_`-prefixed environment variables.
//!
//! # Example
//! ```no_run
//! use src_audit_core::config::ConfigLoader;
//!
//! let config = ConfigLoader::new().load().unwrap();
//! println!("log level: {}", config.log_level.as_str());
//! ```

use camino::Utf8PathBuf;
use figment::Figment;
use figment::providers::{Env, Serialized};
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};

/// Application name for platform directory lookup.
const APP_NAME: &str = "src-audit";

/// Prefix for environment overrides (`SRC_AUDIT_LOG_LEVEL=debug`).
pub const ENV_PREFIX: &str = "SRC_AUDIT_";

/// The configuration for src-audit.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Log level for the application (e.g., "debug", "info", "warn", "error").
    pub log_level: LogLevel,
    /// Directory for log files (no file logging if unset).
    pub log_dir: Option<Utf8PathBuf>,
}

/// Log level configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Verbose output for debugging and development.
    Debug,
    /// Standard operational information (default).
    #[default]
    Info,
    /// Warnings about potential issues.
    Warn,
    /// Errors that indicate failures.
    Error,
}

impl LogLevel {
    /// Returns the log level as a lowercase string slice.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

/// Builder for loading configuration.
#[derive(Debug)]
pub struct ConfigLoader {
    env_prefix: String,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Create a loader reading the standard `SRC_AUDIT_` variables.
    pub fn new() -> Self {
        Self {
            env_prefix: ENV_PREFIX.to_string(),
        }
    }

    /// Read environment overrides under a different prefix.
    pub fn with_env_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// Load configuration: defaults, then environment overrides.
    #[tracing::instrument(skip(self), fields(env_prefix = %self.env_prefix))]
    pub fn load(self) -> ConfigResult<Config> {
        tracing::debug!("loading configuration");
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Env::prefixed(&self.env_prefix).lowercase(true))
            .extract()
            .map_err(|e| ConfigError::Deserialize(Box::new(e)))?;
        tracing::debug!(
            log_level = config.log_level.as_str(),
            "configuration loaded"
        );
        Ok(config)
    }
}

fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("", "", APP_NAME)
}

/// Get the user cache directory path.
///
/// Returns `~/.cache/src-audit/` on Linux, `~/Library/Caches/src-audit/`
/// on macOS, and equivalent on other platforms.
pub fn user_cache_dir() -> Option<Utf8PathBuf> {
    let proj_dirs = project_dirs()?;
    Utf8PathBuf::from_path_buf(proj_dirs.cache_dir().to_path_buf()).ok()
}
