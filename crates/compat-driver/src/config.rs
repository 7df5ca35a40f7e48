//! Driver configuration
//!
//! Loaded from an optional TOML file; every field has a default, so an empty
//! file is a valid configuration.
//!
//! ```toml
//! extensions = ["zig"]
//! excluded_dirs = ["zig-cache", "zig-out"]
//! on_error = "abort"
//!
//! [engine]
//! handle = "gpa"
//! disabled_rules = ["to-owned-slice"]
//! ```

use crate::error::{DriverError, DriverResult};
use compat_engine::EngineConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

/// Default size ceiling for candidate files (10 MiB)
pub const DEFAULT_MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// What to do when one file cannot be read or written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorPolicy {
    /// Report the file as skipped and continue
    #[default]
    Skip,
    /// Stop the batch
    Abort,
}

impl FromStr for ErrorPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "skip" => Ok(Self::Skip),
            "abort" => Ok(Self::Abort),
            other => Err(format!("unknown error policy '{other}' (expected skip or abort)")),
        }
    }
}

/// Batch driver configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverConfig {
    /// Candidate file extensions, without the dot
    pub extensions: Vec<String>,
    /// Directory names never descended into
    pub excluded_dirs: Vec<String>,
    /// Report changes without writing
    pub dry_run: bool,
    /// Read and write failure handling
    pub on_error: ErrorPolicy,
    /// Files larger than this many bytes are skipped
    pub max_file_size: u64,
    /// Rule settings
    pub engine: EngineConfig,
}

impl DriverConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from a TOML file
    ///
    /// # Errors
    /// Returns [`DriverError::ConfigRead`] or [`DriverError::ConfigParse`].
    pub fn load(path: &Path) -> DriverResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| DriverError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| DriverError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// With dry-run flag
    #[inline]
    #[must_use]
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// With error policy
    #[inline]
    #[must_use]
    pub fn with_error_policy(mut self, policy: ErrorPolicy) -> Self {
        self.on_error = policy;
        self
    }

    /// With size ceiling
    #[inline]
    #[must_use]
    pub fn with_max_file_size(mut self, bytes: u64) -> Self {
        self.max_file_size = bytes;
        self
    }

    /// With engine configuration
    #[inline]
    #[must_use]
    pub fn with_engine(mut self, engine: EngineConfig) -> Self {
        self.engine = engine;
        self
    }

    /// Whether `path` has a candidate extension
    #[must_use]
    pub fn is_candidate(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|e| e == ext))
    }

    /// Whether a directory named `name` is pruned
    #[must_use]
    pub fn is_excluded(&self, name: &str) -> bool {
        self.excluded_dirs.iter().any(|d| d == name)
    }
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            extensions: vec!["zig".to_string()],
            excluded_dirs: ["zig-cache", ".zig-cache", "zig-out", ".git"]
                .into_iter()
                .map(String::from)
                .collect(),
            dry_run: false,
            on_error: ErrorPolicy::Skip,
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            engine: EngineConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults() {
        let config = DriverConfig::new();
        assert!(config.is_candidate(Path::new("src/main.zig")));
        assert!(!config.is_candidate(Path::new("build.zig.zon")));
        assert!(!config.is_candidate(Path::new("README.md")));
        assert!(config.is_excluded(".zig-cache"));
        assert!(!config.is_excluded("src"));
        assert_eq!(config.on_error, ErrorPolicy::Skip);
    }

    #[test]
    fn load_partial_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "on_error = \"abort\"\nmax_file_size = 64\n\n[engine]\nhandle = \"gpa\""
        )
        .unwrap();

        let config = DriverConfig::load(file.path()).unwrap();
        assert_eq!(config.on_error, ErrorPolicy::Abort);
        assert_eq!(config.max_file_size, 64);
        assert_eq!(config.engine.handle, "gpa");
        assert_eq!(config.extensions, vec!["zig".to_string()]);
    }

    #[test]
    fn load_rejects_bad_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "on_error = \"sometimes\"").unwrap();
        assert!(matches!(
            DriverConfig::load(file.path()),
            Err(DriverError::ConfigParse { .. })
        ));
    }

    #[test]
    fn load_missing_file() {
        assert!(matches!(
            DriverConfig::load(Path::new("/nonexistent/compat.toml")),
            Err(DriverError::ConfigRead { .. })
        ));
    }

    #[test]
    fn policy_from_str() {
        assert_eq!("abort".parse::<ErrorPolicy>(), Ok(ErrorPolicy::Abort));
        assert!("never".parse::<ErrorPolicy>().is_err());
    }
}
