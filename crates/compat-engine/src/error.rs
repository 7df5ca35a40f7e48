//! Error types for the migration engine
//!
//! Applying a rule never fails: a rule that cannot decide reports "no match".
//! The only fallible step is *building* rules and configuration:
//! - Compiling a rule's call-shape pattern
//! - Validating the resource-handle identifier

/// Errors raised while constructing rules or validating engine configuration
#[derive(Debug, thiserror::Error)]
pub enum RuleError {
    /// A rule's detection pattern failed to compile
    #[error("invalid pattern for rule '{rule}': {source}")]
    InvalidPattern {
        /// Rule name
        rule: String,
        /// Underlying regex error
        #[source]
        source: regex::Error,
    },

    /// The configured resource handle is not a plain identifier
    #[error("invalid resource handle '{0}': expected an identifier like `allocator`")]
    InvalidHandle(String),

    /// The configured resource handle would itself look like container usage
    #[error("resource handle '{handle}' contains container marker '{marker}'")]
    HandleContainsMarker {
        /// Offending handle
        handle: String,
        /// Marker found inside it
        marker: &'static str,
    },

    /// A disabled rule name does not exist in the catalog
    #[error("unknown rule: '{0}'")]
    UnknownRule(String),
}

impl RuleError {
    /// Create invalid pattern error for a rule
    pub fn invalid_pattern(rule: impl Into<String>, source: regex::Error) -> Self {
        Self::InvalidPattern {
            rule: rule.into(),
            source,
        }
    }
}

/// Result alias for rule construction
pub type RuleResult<T> = Result<T, RuleError>;
