//! Error types for src-audit-core.

use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors that can occur when working with configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to deserialize configuration.
    #[error("invalid configuration: {0}")]
    Deserialize(#[from] Box<figment::Error>),
}

/// Result type alias using [`ConfigError`].
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors that can occur while scanning a source tree.
#[derive(Error, Debug)]
pub enum ScanError {
    /// The scan root does not exist or is not a directory.
    #[error("scan root is not a directory: {path}")]
    RootNotFound {
        /// The root that was requested.
        path: Utf8PathBuf,
    },

    /// A file could not be read.
    #[error("failed to read {path}: {source}")]
    Read {
        /// Path of the unreadable file.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A file is not valid UTF-8 text.
    #[error("{path} is not valid UTF-8 text")]
    Decode {
        /// Path of the undecodable file.
        path: Utf8PathBuf,
    },
}

/// Result type alias using [`ScanError`].
pub type ScanResult<T> = Result<T, ScanError>;
