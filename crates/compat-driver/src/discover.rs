//! Candidate file discovery

use crate::config::{DriverConfig, ErrorPolicy};
use crate::error::{DriverError, DriverResult};
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Kind of path a batch was started on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    /// A single file, listed whatever its extension
    File,
    /// A directory tree, filtered by extension
    Directory,
}

/// Classify the input path
///
/// # Errors
/// Returns [`DriverError::InvalidInput`] if the path does not exist or is
/// neither a file nor a directory.
pub fn classify(root: &Path) -> DriverResult<InputKind> {
    if !root.exists() {
        return Err(DriverError::invalid_input(root, "path does not exist"));
    }
    if root.is_file() {
        Ok(InputKind::File)
    } else if root.is_dir() {
        Ok(InputKind::Directory)
    } else {
        Err(DriverError::invalid_input(root, "not a file or directory"))
    }
}

/// Candidate files under `root`, sorted
///
/// A file root is returned as is; the batch driver checks its extension.
/// Excluded directories are pruned. Traversal errors are logged and skipped
/// under [`ErrorPolicy::Skip`].
///
/// # Errors
/// Invalid input, or a traversal error under [`ErrorPolicy::Abort`].
pub fn discover(root: &Path, config: &DriverConfig) -> DriverResult<Vec<PathBuf>> {
    if classify(root)? == InputKind::File {
        return Ok(vec![root.to_path_buf()]);
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_entry(|e| should_walk(e, config))
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) if config.on_error == ErrorPolicy::Skip => {
                tracing::warn!("Skipping unreadable entry: {}", err);
                continue;
            }
            Err(err) => return Err(err.into()),
        };
        if entry.file_type().is_file() && config.is_candidate(entry.path()) {
            files.push(entry.into_path());
        }
    }
    files.sort();

    tracing::debug!("Discovered {} candidate files in {}", files.len(), root.display());
    Ok(files)
}

fn should_walk(entry: &DirEntry, config: &DriverConfig) -> bool {
    if entry.depth() == 0 || !entry.file_type().is_dir() {
        return true;
    }
    entry
        .file_name()
        .to_str()
        .map_or(true, |name| !config.is_excluded(name))
}
