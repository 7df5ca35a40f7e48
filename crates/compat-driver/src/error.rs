//! Error types for the batch driver
//!
//! Rules never fail, so everything here comes from the edges:
//! - Validating the input path
//! - Reading, decoding and writing source files
//! - Walking directories
//! - Loading configuration

use compat_engine::RuleError;
use std::path::{Path, PathBuf};

/// Errors raised at the driver boundary
#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    /// Input path is missing or is neither a file nor a directory
    #[error("invalid path {path}: {reason}")]
    InvalidInput {
        /// Offending path
        path: PathBuf,
        /// What is wrong with it
        reason: &'static str,
    },

    /// File could not be read or is not UTF-8
    #[error("io error reading {path}: {source}")]
    Read {
        /// File path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// File could not be written back
    #[error("io error writing {path}: {source}")]
    Write {
        /// File path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Directory traversal failed
    #[error("directory traversal failed: {0}")]
    Walk(#[from] walkdir::Error),

    /// Configuration file could not be read
    #[error("failed to read config {path}: {source}")]
    ConfigRead {
        /// Config path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Configuration file is not valid TOML for [`crate::DriverConfig`]
    #[error("invalid config {path}: {source}")]
    ConfigParse {
        /// Config path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: toml::de::Error,
    },

    /// Engine configuration rejected
    #[error(transparent)]
    Engine(#[from] RuleError),

    /// JSON report rendering failed
    #[error("failed to render report: {0}")]
    Report(#[from] serde_json::Error),

    /// A file failed under the `abort` policy
    #[error("batch aborted at {path}: {source}")]
    Aborted {
        /// File that failed
        path: PathBuf,
        /// Original failure
        #[source]
        source: Box<DriverError>,
    },
}

impl DriverError {
    /// Create invalid input error
    pub fn invalid_input(path: impl Into<PathBuf>, reason: &'static str) -> Self {
        Self::InvalidInput {
            path: path.into(),
            reason,
        }
    }

    /// Create read error for path
    pub fn read(path: &Path, source: std::io::Error) -> Self {
        Self::Read {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Create write error for path
    pub fn write(path: &Path, source: std::io::Error) -> Self {
        Self::Write {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Wrap a per-file failure as a batch abort
    pub fn aborted(path: &Path, source: DriverError) -> Self {
        Self::Aborted {
            path: path.to_path_buf(),
            source: Box::new(source),
        }
    }

    /// Whether the error concerns the invocation rather than a file
    #[must_use]
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidInput { .. }
                | Self::ConfigRead { .. }
                | Self::ConfigParse { .. }
                | Self::Engine(_)
        )
    }
}

/// Result alias for driver operations
pub type DriverResult<T> = Result<T, DriverError>;
