//! Rule pipeline
//!
//! Folds an ordered rule list over one document. Each rule sees the text left
//! by the rules before it, while every guard sees the [`DocumentContext`]
//! computed from the text the run started with.

use crate::catalog;
use crate::config::EngineConfig;
use crate::document::{Document, DocumentContext};
use crate::error::{RuleError, RuleResult};
use crate::ledger::{ChangeLedger, ChangeRecord};
use crate::rule::PatternRule;

/// Outcome of one pipeline run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunResult {
    /// Whether the final text differs from the input
    pub changed: bool,
    /// Final text
    pub text: String,
    /// Fired categories in registration order
    pub records: Vec<ChangeRecord>,
}

/// Ordered rule set bound to an engine configuration
#[derive(Debug, Clone)]
pub struct Pipeline {
    rules: Vec<PatternRule>,
    config: EngineConfig,
}

impl Pipeline {
    /// Create pipeline from explicit rules
    ///
    /// Rules named in `config.disabled_rules` are dropped.
    ///
    /// # Errors
    /// Returns an error if the configured handle is invalid.
    pub fn new(rules: Vec<PatternRule>, config: EngineConfig) -> RuleResult<Self> {
        config.validate()?;
        let rules = rules
            .into_iter()
            .filter(|rule| config.is_enabled(rule.name()))
            .collect();
        Ok(Self { rules, config })
    }

    /// Pipeline with the built-in Zig 0.15 catalog
    ///
    /// # Errors
    /// Returns an error if the handle is invalid or a disabled rule is unknown.
    pub fn zig_015(config: EngineConfig) -> RuleResult<Self> {
        if let Some(unknown) = config
            .disabled_rules
            .iter()
            .find(|name| !catalog::RULE_NAMES.contains(&name.as_str()))
        {
            return Err(RuleError::UnknownRule(unknown.clone()));
        }
        Self::new(catalog::zig_015_rules()?, config)
    }

    /// Active rules in application order
    #[inline]
    #[must_use]
    pub fn rules(&self) -> &[PatternRule] {
        &self.rules
    }

    /// Engine configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Run every rule once over `text`
    #[must_use]
    pub fn run(&self, text: &str) -> RunResult {
        let ctx = DocumentContext::scan(text, &self.config.handle);

        let (document, ledger) = self.rules.iter().fold(
            (Document::from_text(text), ChangeLedger::new()),
            |(document, mut ledger), rule| {
                let outcome = rule.apply(document, &ctx);
                if outcome.changed {
                    tracing::debug!(
                        rule = %outcome.rule,
                        lines = ?outcome.lines,
                        "rule fired"
                    );
                    ledger.record(&outcome.rule, &outcome.category, &outcome.lines);
                }
                (outcome.document, ledger)
            },
        );

        let text_out = document.to_text();
        RunResult {
            changed: text_out != text,
            text: text_out,
            records: ledger.into_records(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{ARRAYLIST_APPEND, ARRAYLIST_INIT, CONTAINER_DEINIT, HASHMAP_PUT, TO_OWNED_SLICE};
    use pretty_assertions::assert_eq;

    fn pipeline() -> Pipeline {
        Pipeline::zig_015(EngineConfig::default()).unwrap()
    }

    #[test]
    fn end_to_end_arraylist() {
        let input = "var list = std.ArrayList(u8).init(allocator);\nlist.append(5);\nlist.deinit();\n";
        let result = pipeline().run(input);
        assert!(result.changed);
        assert_eq!(
            result.text,
            "var list = std.ArrayList(u8){};\nlist.append(allocator, 5);\nlist.deinit(allocator);\n"
        );
        let rules: Vec<_> = result.records.iter().map(|r| r.rule.as_str()).collect();
        assert_eq!(rules, vec![ARRAYLIST_INIT, ARRAYLIST_APPEND, CONTAINER_DEINIT]);
    }

    #[test]
    fn second_run_is_noop() {
        let p = pipeline();
        let first = p.run("var l = std.ArrayList(u8).init(allocator);\nl.append(1);\n");
        let second = p.run(&first.text);
        assert!(!second.changed);
        assert!(second.records.is_empty());
        assert_eq!(second.text, first.text);
    }

    #[test]
    fn hashmap_file() {
        let input = "var m = std.AutoHashMapUnmanaged(u32, u8).init();\ntry m.put(1, 2);\nm.deinit();";
        let result = pipeline().run(input);
        assert_eq!(
            result.text,
            "var m = std.AutoHashMapUnmanaged(u32, u8){};\ntry m.put(allocator, 1, 2);\nm.deinit(allocator);"
        );
        assert!(result.records.iter().any(|r| r.rule == HASHMAP_PUT));
    }

    #[test]
    fn unrelated_file_is_untouched() {
        let input = "const w = std.io.getStdOut().writer();\nw.deinit();\nq.append(3);\nx.put(1, 2);";
        let result = pipeline().run(input);
        assert!(!result.changed);
        assert_eq!(result.text, input);
        assert!(result.records.is_empty());
    }

    #[test]
    fn disabled_rule_is_skipped() {
        let config = EngineConfig::default().with_disabled_rule(TO_OWNED_SLICE);
        let p = Pipeline::zig_015(config).unwrap();
        assert_eq!(p.rules().len(), catalog::RULE_NAMES.len() - 1);
        let result = p.run("var l: std.ArrayList(u8) = .{};\nconst s = try l.toOwnedSlice();");
        assert!(!result.changed);
    }

    #[test]
    fn unknown_disabled_rule_is_rejected() {
        let config = EngineConfig::default().with_disabled_rule("no-such-rule");
        assert!(matches!(
            Pipeline::zig_015(config),
            Err(RuleError::UnknownRule(name)) if name == "no-such-rule"
        ));
    }

    #[test]
    fn custom_handle_threads_through() {
        let p = Pipeline::zig_015(EngineConfig::default().with_handle("gpa")).unwrap();
        let result = p.run("var l = std.ArrayList(u8).init(gpa);\nl.append(1);");
        assert_eq!(result.text, "var l = std.ArrayList(u8){};\nl.append(gpa, 1);");
    }

    #[test]
    fn constructor_keeps_foreign_handle() {
        let result = pipeline().run("var l = std.ArrayList(u8).init(gpa);");
        assert!(!result.changed);
    }

    #[test]
    fn nested_type_constructor_is_left_alone() {
        let input = "var l = std.ArrayList(std.StringHashMap(u8)).init(allocator);\ns.put(1, 2);";
        let result = pipeline().run(input);
        assert!(result.text.starts_with("var l = std.ArrayList(std.StringHashMap(u8)).init(allocator);"));
        assert!(result.text.ends_with("s.put(allocator, 1, 2);"));
    }
}
