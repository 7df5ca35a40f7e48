//! Batch fix operation
//!
//! Each file goes through two steps:
//! - `plan`: read, decode and run the pipeline (no side effects)
//! - `commit`: write the new text back, unless this is a dry run
//!
//! With the `parallel` feature, planning runs on a rayon pool while commits
//! and error-policy decisions stay sequential, in discovery order.

use crate::config::{DriverConfig, ErrorPolicy};
use crate::discover::{self, InputKind};
use crate::error::{DriverError, DriverResult};
use compat_engine::{ChangeRecord, Pipeline, RunResult};
use indexmap::IndexMap;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// What happened to one file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum FileOutcome {
    /// No rule fired
    Unchanged,
    /// Rewritten on disk
    Fixed {
        /// Fired categories
        changes: Vec<ChangeRecord>,
    },
    /// Would be rewritten (dry run)
    WouldFix {
        /// Fired categories
        changes: Vec<ChangeRecord>,
    },
    /// Not processed
    Skipped {
        /// Why
        reason: String,
    },
}

impl FileOutcome {
    /// Whether the file was or would be rewritten
    #[inline]
    #[must_use]
    pub fn is_change(&self) -> bool {
        matches!(self, Self::Fixed { .. } | Self::WouldFix { .. })
    }

    /// Fired categories, empty unless changed
    #[must_use]
    pub fn changes(&self) -> &[ChangeRecord] {
        match self {
            Self::Fixed { changes } | Self::WouldFix { changes } => changes,
            Self::Unchanged | Self::Skipped { .. } => &[],
        }
    }
}

/// Outcome for one path
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileReport {
    /// Path relative to the batch root (as given for a single file)
    pub path: PathBuf,
    /// Outcome
    #[serde(flatten)]
    pub outcome: FileOutcome,
}

/// Outcome of a whole batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    /// Path the batch was started on
    pub root: PathBuf,
    /// Whether the root was a directory
    pub directory: bool,
    /// Whether nothing was written
    pub dry_run: bool,
    /// Candidate extensions, without the dot
    pub extensions: Vec<String>,
    /// Per-file outcomes in discovery order
    pub files: Vec<FileReport>,
}

impl BatchReport {
    /// Candidate files found
    #[inline]
    #[must_use]
    pub fn scanned(&self) -> usize {
        self.files.len()
    }

    /// Files fixed (or that would be fixed)
    #[must_use]
    pub fn changed(&self) -> usize {
        self.files.iter().filter(|f| f.outcome.is_change()).count()
    }

    /// Files skipped after an error
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.files
            .iter()
            .filter(|f| matches!(f.outcome, FileOutcome::Skipped { .. }))
            .count()
    }

    /// Number of files each category fired in, first-seen order
    #[must_use]
    pub fn category_totals(&self) -> IndexMap<String, usize> {
        let mut totals = IndexMap::new();
        for record in self.files.iter().flat_map(|f| f.outcome.changes()) {
            *totals.entry(record.description.clone()).or_insert(0) += 1;
        }
        totals
    }
}

/// Skip reason for a file whose extension is not configured
pub const NOT_CANDIDATE: &str = "not a candidate extension";

/// Result of planning one file
#[derive(Debug)]
enum Plan {
    Unchanged,
    Skip(String),
    Rewrite(RunResult),
}

/// Runs the pipeline over files and directories
#[derive(Debug, Clone)]
pub struct BatchDriver {
    pipeline: Pipeline,
    config: DriverConfig,
}

impl BatchDriver {
    /// Create driver with the Zig 0.15 catalog
    ///
    /// # Errors
    /// Returns [`DriverError::Engine`] if the engine configuration is invalid.
    pub fn new(config: DriverConfig) -> DriverResult<Self> {
        let pipeline = Pipeline::zig_015(config.engine.clone())?;
        Ok(Self { pipeline, config })
    }

    /// Create driver with an explicit pipeline
    #[must_use]
    pub fn with_pipeline(pipeline: Pipeline, config: DriverConfig) -> Self {
        Self { pipeline, config }
    }

    /// Driver configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &DriverConfig {
        &self.config
    }

    /// Pipeline in use
    #[inline]
    #[must_use]
    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    /// Fix one file
    ///
    /// # Errors
    /// Read, decode or write failures for this file.
    pub fn fix_file(&self, path: &Path) -> DriverResult<FileOutcome> {
        let plan = self.plan(path)?;
        self.commit(path, plan)
    }

    /// Fix a file or every candidate under a directory
    ///
    /// # Errors
    /// - [`DriverError::InvalidInput`] before any file is touched
    /// - [`DriverError::Aborted`] on the first file failure under [`ErrorPolicy::Abort`]
    pub fn run(&self, root: &Path) -> DriverResult<BatchReport> {
        let kind = discover::classify(root)?;
        let files = discover::discover(root, &self.config)?;
        tracing::info!("Found {} candidate files in {}", files.len(), root.display());

        let mut reports = Vec::with_capacity(files.len());

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            let plans: Vec<_> = files.par_iter().map(|path| self.plan(path)).collect();
            for (path, plan) in files.iter().zip(plans) {
                reports.push(self.settle(root, kind, path, plan)?);
            }
        }

        #[cfg(not(feature = "parallel"))]
        for path in &files {
            reports.push(self.settle(root, kind, path, self.plan(path))?);
        }

        let report = BatchReport {
            root: root.to_path_buf(),
            directory: kind == InputKind::Directory,
            dry_run: self.config.dry_run,
            extensions: self.config.extensions.clone(),
            files: reports,
        };
        tracing::info!(
            "{} {}/{} files",
            if report.dry_run { "Would fix" } else { "Fixed" },
            report.changed(),
            report.scanned()
        );
        Ok(report)
    }

    fn plan(&self, path: &Path) -> DriverResult<Plan> {
        if !self.config.is_candidate(path) {
            return Ok(Plan::Skip(NOT_CANDIDATE.to_string()));
        }

        let metadata = fs::metadata(path).map_err(|e| DriverError::read(path, e))?;
        if metadata.len() > self.config.max_file_size {
            return Ok(Plan::Skip(format!(
                "file is {} bytes, limit is {}",
                metadata.len(),
                self.config.max_file_size
            )));
        }

        let text = fs::read_to_string(path).map_err(|e| DriverError::read(path, e))?;
        let result = self.pipeline.run(&text);
        if result.changed {
            Ok(Plan::Rewrite(result))
        } else {
            Ok(Plan::Unchanged)
        }
    }

    fn commit(&self, path: &Path, plan: Plan) -> DriverResult<FileOutcome> {
        match plan {
            Plan::Unchanged => {
                tracing::debug!("No changes needed: {}", path.display());
                Ok(FileOutcome::Unchanged)
            }
            Plan::Skip(reason) => {
                tracing::warn!("Skipping {}: {}", path.display(), reason);
                Ok(FileOutcome::Skipped { reason })
            }
            Plan::Rewrite(result) if self.config.dry_run => {
                tracing::info!("Would fix {}", path.display());
                Ok(FileOutcome::WouldFix {
                    changes: result.records,
                })
            }
            Plan::Rewrite(result) => {
                fs::write(path, &result.text).map_err(|e| DriverError::write(path, e))?;
                tracing::info!("Fixed {}", path.display());
                Ok(FileOutcome::Fixed {
                    changes: result.records,
                })
            }
        }
    }

    /// Commit a plan and apply the error policy
    fn settle(
        &self,
        root: &Path,
        kind: InputKind,
        path: &Path,
        plan: DriverResult<Plan>,
    ) -> DriverResult<FileReport> {
        let outcome = match plan.and_then(|plan| self.commit(path, plan)) {
            Ok(outcome) => outcome,
            Err(err) => match self.config.on_error {
                ErrorPolicy::Skip => {
                    tracing::warn!("Skipping {}: {}", path.display(), err);
                    FileOutcome::Skipped {
                        reason: err.to_string(),
                    }
                }
                ErrorPolicy::Abort => {
                    tracing::error!("Aborting batch: {}", err);
                    return Err(DriverError::aborted(path, err));
                }
            },
        };

        let shown = match kind {
            InputKind::Directory => path.strip_prefix(root).unwrap_or(path),
            InputKind::File => path,
        };
        Ok(FileReport {
            path: shown.to_path_buf(),
            outcome,
        })
    }
}
