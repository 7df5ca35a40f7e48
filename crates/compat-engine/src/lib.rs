//! Zig compatibility migration engine
//!
//! Detects container call sites written against the pre-0.15 standard library
//! and rewrites them, line by line, to the 0.15 shape.
//!
//! # Core Concepts
//!
//! - [`PatternRule`]: one detect-and-rewrite unit (constructor, leading-argument or suffix)
//! - [`GuardPredicate`]: document-wide evidence a rule needs before it fires
//! - [`DocumentContext`]: guard flags computed once per document
//! - [`Pipeline`]: ordered rules folded over a document
//! - [`ChangeLedger`]: categories that fired, deduplicated, in registration order
//!
//! # Architecture
//!
//! ```text
//! text → Document ─┬→ rule 1 → rule 2 → … → rule n → text'
//!                  └→ DocumentContext (guards)   ↓
//!                                          ChangeLedger
//! ```
//!
//! The engine never builds a syntax tree. Calls that span lines are left
//! alone, and a rule that cannot decide does not fire.
//!
//! # Example
//!
//! ```rust
//! use compat_engine::{EngineConfig, Pipeline};
//!
//! let pipeline = Pipeline::zig_015(EngineConfig::default()).unwrap();
//! let result = pipeline.run("var l = std.ArrayList(u8).init(allocator);\nl.append(5);");
//!
//! assert_eq!(result.text, "var l = std.ArrayList(u8){};\nl.append(allocator, 5);");
//! assert!(!pipeline.run(&result.text).changed);
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

// Core modules
pub mod catalog;
pub mod config;
pub mod document;
pub mod error;
pub mod guard;
pub mod ledger;
pub mod pipeline;
pub mod rule;

// Re-exports for convenience
pub use config::{EngineConfig, DEFAULT_HANDLE};
pub use document::{Document, DocumentContext};
pub use error::{RuleError, RuleResult};
pub use guard::{ContainerFamily, GuardPredicate};
pub use ledger::{ChangeLedger, ChangeRecord};
pub use pipeline::{Pipeline, RunResult};
pub use rule::{
    ConstructorRewrite, DroppedArgument, LeadingArgument, LineRewrite, PatternRule, RuleKind,
    RuleOutcome, SuffixRewrite,
};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for running migrations
    pub use crate::{
        ChangeRecord, EngineConfig, GuardPredicate, PatternRule, Pipeline, RunResult,
    };
}
