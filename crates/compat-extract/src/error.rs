//! Error types for code-block extraction

use std::path::PathBuf;

/// Errors while loading a markdown document
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    /// IO or UTF-8 decode failure
    #[error("io error reading {path}: {source}")]
    Io {
        /// Document path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },
}

impl ExtractError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result alias for extraction
pub type ExtractResult<T> = Result<T, ExtractError>;
