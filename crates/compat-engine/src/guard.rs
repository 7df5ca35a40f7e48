//! Guard predicates
//!
//! A guard gates a rule on document-wide evidence so an identically named
//! method on an unrelated type is left alone. Each rule carries at most one
//! guard; guards are never combined.

use crate::document::DocumentContext;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Container families whose 0.15 API takes an explicit allocator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContainerFamily {
    /// `std.ArrayList` and relatives
    ArrayList,
    /// `std.HashMap`, `AutoHashMap`, `StringHashMap`, `ArrayHashMap`, ...
    HashMap,
}

impl ContainerFamily {
    /// All families
    pub const ALL: [ContainerFamily; 2] = [ContainerFamily::ArrayList, ContainerFamily::HashMap];

    /// Substring whose presence counts as evidence of the family
    #[inline]
    #[must_use]
    pub fn marker(self) -> &'static str {
        match self {
            ContainerFamily::ArrayList => "ArrayList",
            ContainerFamily::HashMap => "HashMap",
        }
    }
}

impl fmt::Display for ContainerFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.marker())
    }
}

/// Document-level check consulted before a rule fires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GuardPredicate {
    /// No evidence required
    #[default]
    Always,
    /// Document must use the given family
    Uses(ContainerFamily),
    /// Document must use at least one container family
    UsesAnyContainer,
}

impl GuardPredicate {
    /// Check against a precomputed context
    #[inline]
    #[must_use]
    pub fn check(self, ctx: &DocumentContext) -> bool {
        match self {
            GuardPredicate::Always => true,
            GuardPredicate::Uses(family) => ctx.uses(family),
            GuardPredicate::UsesAnyContainer => ctx.uses_any_container(),
        }
    }

    /// Evaluate directly against document text
    ///
    /// Pure and total: absence of a marker is simply `false`.
    #[must_use]
    pub fn evaluate(self, text: &str) -> bool {
        self.check(&DocumentContext::scan(text, ""))
    }
}

impl fmt::Display for GuardPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GuardPredicate::Always => f.write_str("always"),
            GuardPredicate::Uses(family) => write!(f, "uses {family}"),
            GuardPredicate::UsesAnyContainer => f.write_str("uses any container"),
        }
    }
}
