//! Change ledger
//!
//! Records which rewrite categories fired during one pipeline run, one entry
//! per category, in the order the rules are registered.

use indexmap::IndexMap;
use serde::Serialize;

/// One rewrite category that fired at least once
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangeRecord {
    /// Rule name (the deduplication key)
    pub rule: String,
    /// Human-readable description of the rewrite
    pub description: String,
    /// Rewritten line numbers (1-based), in order of rewriting
    pub lines: Vec<usize>,
}

/// Per-document accumulation of [`ChangeRecord`]s
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeLedger {
    entries: IndexMap<String, ChangeRecord>,
}

impl ChangeLedger {
    /// Create empty ledger
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `rule` rewrote `lines`
    ///
    /// A repeated category keeps its first position and extends its lines.
    /// Recording no lines is a no-op.
    pub fn record(&mut self, rule: &str, description: &str, lines: &[usize]) {
        if lines.is_empty() {
            return;
        }
        self.entries
            .entry(rule.to_string())
            .and_modify(|record| record.lines.extend_from_slice(lines))
            .or_insert_with(|| ChangeRecord {
                rule: rule.to_string(),
                description: description.to_string(),
                lines: lines.to_vec(),
            });
    }

    /// Records in registration order
    pub fn records(&self) -> impl Iterator<Item = &ChangeRecord> {
        self.entries.values()
    }

    /// Descriptions in registration order
    pub fn descriptions(&self) -> impl Iterator<Item = &str> {
        self.entries.values().map(|r| r.description.as_str())
    }

    /// Whether `rule` fired
    #[inline]
    #[must_use]
    pub fn contains(&self, rule: &str) -> bool {
        self.entries.contains_key(rule)
    }

    /// Number of categories
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing fired
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Consume into an ordered list
    #[must_use]
    pub fn into_records(self) -> Vec<ChangeRecord> {
        self.entries.into_values().collect()
    }
}
