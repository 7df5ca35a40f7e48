//! Pattern rules
//!
//! A [`PatternRule`] pairs a name and change category with an optional
//! [`GuardPredicate`] and one of three rewrite kinds:
//!
//! - [`ConstructorRewrite`]: `Type(T).init(x)` becomes `Type(T){}`
//! - [`LeadingArgument`]: `recv.method(args)` becomes `recv.method(handle, args)`
//! - [`SuffixRewrite`]: `.method()` becomes `.method(handle)`
//!
//! Every rewrite is line-local. A call whose argument list does not close on
//! the line it opens on is never touched.

use crate::document::{Document, DocumentContext};
use crate::error::{RuleError, RuleResult};
use crate::guard::GuardPredicate;
use regex::{Captures, Regex};
use std::borrow::Cow;
use std::fmt::Debug;

/// Rewrite applied to a single line
///
/// Implement this trait to add a new kind of call-shape migration.
pub trait LineRewrite: Debug + Send + Sync {
    /// Rewritten line, or `None` when nothing on the line matched
    fn rewrite_line(&self, line: &str, ctx: &DocumentContext) -> Option<String>;
}

/// What a constructor rewrite is allowed to discard from `.init(..)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DroppedArgument {
    /// Exactly the configured resource handle (re-supplied by the other rules)
    Handle,
    /// Nothing: only an empty `.init()` is rewritten
    Nothing,
}

/// `Type(T).init(x)` → `Type(T){}`
#[derive(Debug, Clone)]
pub struct ConstructorRewrite {
    pattern: Regex,
    drops: DroppedArgument,
}

impl ConstructorRewrite {
    /// Build from a regex fragment matching the type path (e.g. `std\.ArrayList`)
    ///
    /// # Errors
    /// Returns [`RuleError::InvalidPattern`] if the fragment does not compile.
    pub fn new(rule: &str, type_path: &str, drops: DroppedArgument) -> RuleResult<Self> {
        let source =
            format!(r"(?P<head>\b(?:{type_path})\([^()\n]+\))\.init\((?P<arg>[^()\n]*)\)");
        let pattern = Regex::new(&source).map_err(|e| RuleError::invalid_pattern(rule, e))?;
        Ok(Self { pattern, drops })
    }

    /// Argument policy
    #[inline]
    #[must_use]
    pub fn drops(&self) -> DroppedArgument {
        self.drops
    }
}

impl LineRewrite for ConstructorRewrite {
    fn rewrite_line(&self, line: &str, ctx: &DocumentContext) -> Option<String> {
        let handle = ctx.handle();
        let rewritten = self.pattern.replace_all(line, |caps: &Captures<'_>| {
            let arg = caps.name("arg").map_or("", |m| m.as_str()).trim();
            let droppable = match self.drops {
                DroppedArgument::Handle => arg == handle,
                DroppedArgument::Nothing => arg.is_empty(),
            };
            if droppable {
                format!("{}{{}}", &caps["head"])
            } else {
                caps[0].to_string()
            }
        });
        changed_line(line, rewritten)
    }
}

/// `recv.method(args)` → `recv.method(handle, args)`
#[derive(Debug, Clone)]
pub struct LeadingArgument {
    method: String,
    call: Regex,
}

impl LeadingArgument {
    /// Build for a method name
    ///
    /// # Errors
    /// Returns [`RuleError::InvalidPattern`] if the call pattern does not compile.
    pub fn new(rule: &str, method: &str) -> RuleResult<Self> {
        let source = format!(r"\b\w+\.{}\(", regex::escape(method));
        let call = Regex::new(&source).map_err(|e| RuleError::invalid_pattern(rule, e))?;
        Ok(Self {
            method: method.to_string(),
            call,
        })
    }

    /// Method whose calls gain the leading argument
    #[inline]
    #[must_use]
    pub fn method(&self) -> &str {
        &self.method
    }
}

impl LineRewrite for LeadingArgument {
    fn rewrite_line(&self, line: &str, ctx: &DocumentContext) -> Option<String> {
        let handle = ctx.handle();
        let mut out = String::with_capacity(line.len() + handle.len() + 2);
        let mut copied = 0;

        for call in self.call.find_iter(line) {
            let open = call.end();
            let Some(args) = call_arguments(&line[open..]) else {
                continue;
            };
            if args.trim().is_empty() || leads_with(args, handle) {
                continue;
            }
            let padding = args.len() - args.trim_start().len();
            out.push_str(&line[copied..open]);
            out.push_str(handle);
            out.push_str(", ");
            copied = open + padding;
        }

        if copied == 0 {
            return None;
        }
        out.push_str(&line[copied..]);
        Some(out)
    }
}

/// `.method()` → `.method(handle)`
///
/// Receivers declared from `std.heap.*` are allocators and keep their
/// empty call.
#[derive(Debug, Clone)]
pub struct SuffixRewrite {
    method: String,
    call: Regex,
}

impl SuffixRewrite {
    /// Build for a method name
    ///
    /// # Errors
    /// Returns [`RuleError::InvalidPattern`] if the call pattern does not compile.
    pub fn new(rule: &str, method: &str) -> RuleResult<Self> {
        let source = format!(r"(?:\b(?P<recv>\w+))?\.{}\(\s*\)", regex::escape(method));
        let call = Regex::new(&source).map_err(|e| RuleError::invalid_pattern(rule, e))?;
        Ok(Self {
            method: method.to_string(),
            call,
        })
    }

    /// Method whose empty calls gain the handle
    #[inline]
    #[must_use]
    pub fn method(&self) -> &str {
        &self.method
    }
}

impl LineRewrite for SuffixRewrite {
    fn rewrite_line(&self, line: &str, ctx: &DocumentContext) -> Option<String> {
        let rewritten = self.call.replace_all(line, |caps: &Captures<'_>| {
            match caps.name("recv") {
                Some(recv) if ctx.is_allocator(recv.as_str()) => caps[0].to_string(),
                Some(recv) => format!("{}.{}({})", recv.as_str(), self.method, ctx.handle()),
                None => format!(".{}({})", self.method, ctx.handle()),
            }
        });
        changed_line(line, rewritten)
    }
}

/// Rewrite kinds
#[derive(Debug, Clone)]
pub enum RuleKind {
    /// Constructor call replaced by empty-initializer construction
    Constructor(ConstructorRewrite),
    /// Handle inserted as the first argument
    LeadingArgument(LeadingArgument),
    /// Handle supplied to an empty call
    Suffix(SuffixRewrite),
}

impl RuleKind {
    /// Short label for reports
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            RuleKind::Constructor(_) => "constructor-rewrite",
            RuleKind::LeadingArgument(_) => "leading-argument",
            RuleKind::Suffix(_) => "suffix-rewrite",
        }
    }

    /// Call shape the rule matches, e.g. `.init(handle)` or `.append(..)`
    #[must_use]
    pub fn target(&self) -> String {
        match self {
            RuleKind::Constructor(r) => match r.drops() {
                DroppedArgument::Handle => ".init(handle)".to_string(),
                DroppedArgument::Nothing => ".init()".to_string(),
            },
            RuleKind::LeadingArgument(r) => format!(".{}(..)", r.method()),
            RuleKind::Suffix(r) => format!(".{}()", r.method()),
        }
    }

    fn rewriter(&self) -> &dyn LineRewrite {
        match self {
            RuleKind::Constructor(r) => r,
            RuleKind::LeadingArgument(r) => r,
            RuleKind::Suffix(r) => r,
        }
    }
}

/// One detect-and-rewrite unit
#[derive(Debug, Clone)]
pub struct PatternRule {
    name: String,
    category: String,
    guard: GuardPredicate,
    kind: RuleKind,
}

impl PatternRule {
    /// Create an unguarded rule
    #[must_use]
    pub fn new(name: impl Into<String>, category: impl Into<String>, kind: RuleKind) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
            guard: GuardPredicate::Always,
            kind,
        }
    }

    /// Constructor-rewrite rule
    ///
    /// # Errors
    /// Returns [`RuleError::InvalidPattern`] if `type_path` does not compile.
    pub fn constructor(
        name: &str,
        category: &str,
        type_path: &str,
        drops: DroppedArgument,
    ) -> RuleResult<Self> {
        let kind = RuleKind::Constructor(ConstructorRewrite::new(name, type_path, drops)?);
        Ok(Self::new(name, category, kind))
    }

    /// Leading-argument rule
    ///
    /// # Errors
    /// Returns [`RuleError::InvalidPattern`] if the call pattern does not compile.
    pub fn leading_argument(name: &str, category: &str, method: &str) -> RuleResult<Self> {
        let kind = RuleKind::LeadingArgument(LeadingArgument::new(name, method)?);
        Ok(Self::new(name, category, kind))
    }

    /// Suffix rule
    ///
    /// # Errors
    /// Returns [`RuleError::InvalidPattern`] if the call pattern does not compile.
    pub fn suffix(name: &str, category: &str, method: &str) -> RuleResult<Self> {
        let kind = RuleKind::Suffix(SuffixRewrite::new(name, method)?);
        Ok(Self::new(name, category, kind))
    }

    /// Set guard
    #[inline]
    #[must_use]
    pub fn with_guard(mut self, guard: GuardPredicate) -> Self {
        self.guard = guard;
        self
    }

    /// Rule name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Change category recorded when the rule fires
    #[inline]
    #[must_use]
    pub fn category(&self) -> &str {
        &self.category
    }

    /// Guard
    #[inline]
    #[must_use]
    pub fn guard(&self) -> GuardPredicate {
        self.guard
    }

    /// Rewrite kind
    #[inline]
    #[must_use]
    pub fn kind(&self) -> &RuleKind {
        &self.kind
    }

    /// Apply to every line of `document`
    ///
    /// The guard is checked once against `ctx`; the document is returned
    /// unchanged when it fails.
    #[must_use]
    pub fn apply(&self, mut document: Document, ctx: &DocumentContext) -> RuleOutcome {
        let mut lines = Vec::new();

        if self.guard.check(ctx) {
            let rewriter = self.kind.rewriter();
            for (index, line) in document.lines_mut().iter_mut().enumerate() {
                if let Some(rewritten) = rewriter.rewrite_line(line, ctx) {
                    *line = rewritten;
                    lines.push(index + 1);
                }
            }
        }

        RuleOutcome {
            changed: !lines.is_empty(),
            document,
            lines,
            rule: self.name.clone(),
            category: self.category.clone(),
        }
    }

    /// Apply to raw text, building the context from that text
    #[must_use]
    pub fn apply_text(&self, text: &str, handle: &str) -> (String, bool) {
        let ctx = DocumentContext::scan(text, handle);
        let outcome = self.apply(Document::from_text(text), &ctx);
        (outcome.document.to_text(), outcome.changed)
    }
}

/// Result of applying one rule
#[derive(Debug, Clone)]
pub struct RuleOutcome {
    /// Whether any line changed
    pub changed: bool,
    /// Document after the rule
    pub document: Document,
    /// Rewritten line numbers (1-based)
    pub lines: Vec<usize>,
    /// Rule name
    pub rule: String,
    /// Change category
    pub category: String,
}

fn changed_line(line: &str, rewritten: Cow<'_, str>) -> Option<String> {
    match rewritten {
        Cow::Owned(text) if text != line => Some(text),
        _ => None,
    }
}

/// Text between an opening parenthesis (already consumed) and its match
///
/// `None` when the call does not close on this line.
fn call_arguments(rest: &str) -> Option<&str> {
    find_top_level(rest, |c| c == ')').map(|end| &rest[..end])
}

/// Whether the first argument is already the handle (spacing and case ignored)
fn leads_with(args: &str, handle: &str) -> bool {
    let first = match find_top_level(args, |c| c == ',') {
        Some(comma) => &args[..comma],
        None => args,
    };
    first.trim().eq_ignore_ascii_case(handle)
}

/// Byte offset of the first depth-zero character accepted by `stop`
///
/// Quoted literals are skipped. An unmatched closing bracket or the end of
/// text yields `None`.
fn find_top_level(text: &str, stop: impl Fn(char) -> bool) -> Option<usize> {
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for (i, c) in text.char_indices() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }
        if depth == 0 && stop(c) {
            return Some(i);
        }
        match c {
            '"' | '\'' => quote = Some(c),
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => {
                if depth == 0 {
                    return None;
                }
                depth -= 1;
            }
            _ => {}
        }
    }
    None
}
