//! Engine configuration

use crate::error::{RuleError, RuleResult};
use crate::guard::ContainerFamily;
use serde::{Deserialize, Serialize};

/// Default resource-handle identifier
pub const DEFAULT_HANDLE: &str = "allocator";

/// Settings shared by every rule in a pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Identifier inserted as the resource handle, and the only argument
    /// a constructor rewrite may drop
    pub handle: String,
    /// Rule names to skip
    pub disabled_rules: Vec<String>,
}

impl EngineConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With resource handle
    #[inline]
    #[must_use]
    pub fn with_handle(mut self, handle: impl Into<String>) -> Self {
        self.handle = handle.into();
        self
    }

    /// With a disabled rule
    #[inline]
    #[must_use]
    pub fn with_disabled_rule(mut self, rule: impl Into<String>) -> Self {
        self.disabled_rules.push(rule.into());
        self
    }

    /// Whether `rule` runs
    #[must_use]
    pub fn is_enabled(&self, rule: &str) -> bool {
        !self.disabled_rules.iter().any(|r| r == rule)
    }

    /// Check the handle is usable
    ///
    /// # Errors
    /// - [`RuleError::InvalidHandle`] if it is not an identifier
    /// - [`RuleError::HandleContainsMarker`] if inserting it would create
    ///   container evidence on a second run
    pub fn validate(&self) -> RuleResult<()> {
        let mut chars = self.handle.chars();
        let starts_ok = chars
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
        if !starts_ok || !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(RuleError::InvalidHandle(self.handle.clone()));
        }
        for family in ContainerFamily::ALL {
            if self.handle.contains(family.marker()) {
                return Err(RuleError::HandleContainsMarker {
                    handle: self.handle.clone(),
                    marker: family.marker(),
                });
            }
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            handle: DEFAULT_HANDLE.to_string(),
            disabled_rules: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_handle_is_valid() {
        let config = EngineConfig::new();
        assert_eq!(config.handle, "allocator");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_non_identifiers() {
        for handle in ["", "1abc", "my alloc", "a.b", "x,y"] {
            let config = EngineConfig::new().with_handle(handle);
            assert!(
                matches!(config.validate(), Err(RuleError::InvalidHandle(_))),
                "{handle:?} accepted"
            );
        }
    }

    #[test]
    fn rejects_marker_handles() {
        let config = EngineConfig::new().with_handle("myHashMapAlloc");
        assert!(matches!(
            config.validate(),
            Err(RuleError::HandleContainsMarker { marker: "HashMap", .. })
        ));
    }

    #[test]
    fn disabled_rules() {
        let config = EngineConfig::new().with_disabled_rule("to-owned-slice");
        assert!(!config.is_enabled("to-owned-slice"));
        assert!(config.is_enabled("arraylist-append"));
    }
}
