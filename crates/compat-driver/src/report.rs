//! Batch report rendering

use crate::batch::{BatchReport, FileOutcome};
use crate::error::DriverResult;
use indexmap::IndexMap;
use serde::Serialize;
use std::fmt::Write as _;
use std::path::Path;
use std::str::FromStr;

const RULE_WIDTH: usize = 60;

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    /// Human-readable listing
    #[default]
    Text,
    /// Pretty-printed JSON
    Json,
}

impl FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown format '{other}' (expected text or json)")),
        }
    }
}

/// Summary line: `Fixed X/Y files`, or `[DRY RUN] Would fix X/Y files`
#[must_use]
pub fn summary_line(report: &BatchReport) -> String {
    if report.dry_run {
        format!("[DRY RUN] Would fix {}/{} files", report.changed(), report.scanned())
    } else {
        format!("✅ Fixed {}/{} files", report.changed(), report.scanned())
    }
}

/// Render `report` in `format`
///
/// # Errors
/// Only if JSON serialization fails.
pub fn render(report: &BatchReport, format: ReportFormat) -> DriverResult<String> {
    match format {
        ReportFormat::Text => Ok(render_text(report)),
        ReportFormat::Json => render_json(report),
    }
}

/// Text layout
///
/// Directories get a header, one block per changed or skipped file and a
/// ruled summary. A single file also reports "no changes needed".
#[must_use]
pub fn render_text(report: &BatchReport) -> String {
    let mut out = String::new();
    let prefix = if report.dry_run { "[DRY RUN] " } else { "" };

    if report.directory {
        let _ = writeln!(
            out,
            "Found {} {} in {}\n",
            report.scanned(),
            file_label(&report.extensions),
            report.root.display()
        );
    }

    for file in &report.files {
        let path = file.path.display();
        match &file.outcome {
            FileOutcome::Fixed { changes } | FileOutcome::WouldFix { changes } => {
                let _ = writeln!(out, "{prefix}✅ Fixed: {path}");
                for change in changes {
                    let _ = writeln!(out, "    - {}", change.description);
                }
                if report.directory {
                    out.push('\n');
                }
            }
            FileOutcome::Skipped { reason } => {
                let _ = writeln!(out, "⚠️  Skipped: {path} ({reason})");
            }
            FileOutcome::Unchanged if !report.directory => {
                let _ = writeln!(out, "ℹ️  No changes needed: {path}");
            }
            FileOutcome::Unchanged => {}
        }
    }

    let rule = "=".repeat(RULE_WIDTH);
    if report.directory {
        let _ = writeln!(out, "\n{rule}");
    }
    let _ = writeln!(out, "{}", summary_line(report));
    if report.directory {
        let _ = writeln!(out, "{rule}");
    }
    out
}

/// `.zig files` for one extension, `candidate files` otherwise
fn file_label(extensions: &[String]) -> String {
    match extensions {
        [ext] => format!(".{ext} files"),
        _ => "candidate files".to_string(),
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    root: &'a Path,
    dry_run: bool,
    scanned: usize,
    changed: usize,
    skipped: usize,
    categories: IndexMap<String, usize>,
    files: &'a [crate::batch::FileReport],
}

/// JSON document with totals and per-file outcomes
///
/// # Errors
/// Only if serialization fails.
pub fn render_json(report: &BatchReport) -> DriverResult<String> {
    let doc = JsonReport {
        root: &report.root,
        dry_run: report.dry_run,
        scanned: report.scanned(),
        changed: report.changed(),
        skipped: report.skipped(),
        categories: report.category_totals(),
        files: &report.files,
    };
    Ok(serde_json::to_string_pretty(&doc)?)
}
