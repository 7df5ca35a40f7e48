//! Source documents and their per-pass context
//!
//! A [`Document`] is the text of one file split into lines. Splitting and
//! joining on `\n` is lossless, so an untouched document round-trips
//! byte-for-byte (including `\r` line endings and a trailing newline).

use crate::guard::ContainerFamily;
use std::collections::BTreeSet;
use std::fmt;

/// Namespace whose values are allocators rather than containers
const ALLOCATOR_NAMESPACE: &str = "std.heap.";

/// Full text of one source file as an ordered sequence of lines
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Document {
    lines: Vec<String>,
}

impl Document {
    /// Split text into a document
    #[must_use]
    pub fn from_text(text: &str) -> Self {
        Self {
            lines: text.split('\n').map(str::to_owned).collect(),
        }
    }

    /// Lines in order (without the `\n` separators)
    #[inline]
    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Number of lines
    #[inline]
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Join lines back into text
    #[must_use]
    pub fn to_text(&self) -> String {
        self.lines.join("\n")
    }

    pub(crate) fn lines_mut(&mut self) -> &mut [String] {
        &mut self.lines
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

/// Flags computed once per document, consulted by every guard
///
/// The context is built from the text a pipeline pass *starts* with, so a
/// rule's own output can never satisfy or violate its guard mid-pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentContext {
    uses_array_list: bool,
    uses_hash_map: bool,
    handle: String,
    allocators: BTreeSet<String>,
}

impl DocumentContext {
    /// Scan text for container-family markers
    #[must_use]
    pub fn scan(text: &str, handle: &str) -> Self {
        Self {
            uses_array_list: text.contains(ContainerFamily::ArrayList.marker()),
            uses_hash_map: text.contains(ContainerFamily::HashMap.marker()),
            handle: handle.to_string(),
            allocators: text.split('\n').filter_map(allocator_binding).collect(),
        }
    }

    /// Whether the document shows evidence of `family`
    #[inline]
    #[must_use]
    pub fn uses(&self, family: ContainerFamily) -> bool {
        match family {
            ContainerFamily::ArrayList => self.uses_array_list,
            ContainerFamily::HashMap => self.uses_hash_map,
        }
    }

    /// Whether any container family is present
    #[inline]
    #[must_use]
    pub fn uses_any_container(&self) -> bool {
        self.uses_array_list || self.uses_hash_map
    }

    /// Resource-handle identifier that rules insert
    #[inline]
    #[must_use]
    pub fn handle(&self) -> &str {
        &self.handle
    }

    /// Whether `name` is declared from `std.heap.*` (an allocator, not a container)
    #[inline]
    #[must_use]
    pub fn is_allocator(&self, name: &str) -> bool {
        self.allocators.contains(name)
    }
}

/// Name declared by `var|const name[: T] = std.heap.…`
fn allocator_binding(line: &str) -> Option<String> {
    let line = line.trim_start();
    let rest = line
        .strip_prefix("var ")
        .or_else(|| line.strip_prefix("const "))?
        .trim_start();
    let end = rest
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .unwrap_or(rest.len());
    let (name, tail) = rest.split_at(end);
    if name.is_empty() {
        return None;
    }
    let value = &tail[tail.find('=')? + 1..];
    value
        .trim_start()
        .starts_with(ALLOCATOR_NAMESPACE)
        .then(|| name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_exactly() {
        for text in ["", "a", "a\n", "a\r\nb\r\n", "\n\n", "x\ny"] {
            assert_eq!(Document::from_text(text).to_text(), text);
        }
    }

    #[test]
    fn trailing_newline_is_an_empty_last_line() {
        let doc = Document::from_text("one\ntwo\n");
        assert_eq!(doc.line_count(), 3);
        assert_eq!(doc.lines()[2], "");
    }

    #[test]
    fn context_detects_families() {
        let ctx = DocumentContext::scan("var m = std.AutoHashMap(u32, u8){};", "allocator");
        assert!(ctx.uses(ContainerFamily::HashMap));
        assert!(!ctx.uses(ContainerFamily::ArrayList));
        assert!(ctx.uses_any_container());
        assert_eq!(ctx.handle(), "allocator");
    }

    #[test]
    fn context_collects_heap_bindings() {
        let text = "var gpa = std.heap.GeneralPurposeAllocator(.{}){};\n\
                    const arena: std.heap.ArenaAllocator = std.heap.ArenaAllocator.init(a);\n\
                    var list = std.ArrayList(u8){};\n\
                    const alloc = gpa.allocator();";
        let ctx = DocumentContext::scan(text, "allocator");
        assert!(ctx.is_allocator("gpa"));
        assert!(ctx.is_allocator("arena"));
        assert!(!ctx.is_allocator("list"));
        assert!(!ctx.is_allocator("alloc"));
    }

    #[test]
    fn context_empty_text() {
        let ctx = DocumentContext::scan("", "gpa");
        assert!(!ctx.uses_any_container());
    }
}
