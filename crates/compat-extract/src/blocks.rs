//! Fenced code-block scanning
//!
//! Built on the pulldown-cmark offset iterator so fences inside lists or
//! block quotes are found the same way a markdown renderer would find them.

use crate::error::{ExtractError, ExtractResult};
use pulldown_cmark::{CodeBlockKind, Event, Parser as MdParser, Tag, TagEnd};
use serde::Serialize;
use std::path::Path;

/// How many lines above a fence are searched for a title heading
const TITLE_WINDOW: usize = 10;

/// One non-empty fenced block
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CodeBlock {
    /// Position among extracted blocks (1-based)
    pub index: usize,
    /// Line of the opening fence (1-based)
    pub start_line: usize,
    /// Line of the closing fence (1-based)
    pub end_line: usize,
    /// Code between the fences, without the final newline
    pub code: String,
    /// Complete program or test rather than a fragment
    pub is_runnable: bool,
    /// Nearest `###` heading above the fence
    pub title: Option<String>,
    /// Fence language
    pub language: String,
}

impl CodeBlock {
    /// Number of code lines
    #[inline]
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.code.lines().count()
    }

    /// First code line
    #[must_use]
    pub fn first_line(&self) -> &str {
        self.code.lines().next().unwrap_or_default()
    }
}

/// Extract every non-empty block fenced with `language`
#[must_use]
pub fn extract_code_blocks(markdown: &str, language: &str) -> Vec<CodeBlock> {
    let lines: Vec<&str> = markdown.split('\n').collect();
    let mut blocks = Vec::new();
    let mut current: Option<(usize, String)> = None;

    for (event, range) in MdParser::new(markdown).into_offset_iter() {
        match event {
            Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(info)))
                if fence_language(&info) == Some(language) =>
            {
                current = Some((range.start, String::new()));
            }
            Event::Text(text) => {
                if let Some((_, code)) = current.as_mut() {
                    code.push_str(&text);
                }
            }
            Event::End(TagEnd::CodeBlock) => {
                let Some((start, mut code)) = current.take() else {
                    continue;
                };
                if code.ends_with('\n') {
                    code.pop();
                }
                if code.trim().is_empty() {
                    continue;
                }

                let start_line = line_number(markdown, start);
                let end_line = line_number(markdown, range.end.saturating_sub(1).max(start));
                blocks.push(CodeBlock {
                    index: blocks.len() + 1,
                    start_line,
                    end_line,
                    is_runnable: is_runnable(&code),
                    title: nearest_title(&lines, start_line).map(str::to_string),
                    code,
                    language: language.to_string(),
                });
            }
            _ => {}
        }
    }

    blocks
}

/// Read and extract a markdown file
///
/// # Errors
/// Returns [`ExtractError::Io`] if the file cannot be read as UTF-8.
pub fn extract_file(path: &Path, language: &str) -> ExtractResult<Vec<CodeBlock>> {
    let markdown =
        std::fs::read_to_string(path).map_err(|e| ExtractError::io_error(path, e))?;
    let blocks = extract_code_blocks(&markdown, language);
    tracing::debug!(path = %path.display(), blocks = blocks.len(), "extracted code blocks");
    Ok(blocks)
}

/// Whether `code` is a complete program or test
///
/// Requires an `@import` plus either `pub fn main()` or a `test ` declaration.
#[must_use]
pub fn is_runnable(code: &str) -> bool {
    let has_entry = code.contains("pub fn main()") || code.contains("test ");
    has_entry && code.contains("@import")
}

/// Split into (runnable, fragments), keeping order
#[must_use]
pub fn partition(blocks: Vec<CodeBlock>) -> (Vec<CodeBlock>, Vec<CodeBlock>) {
    blocks.into_iter().partition(|b| b.is_runnable)
}

fn fence_language(info: &str) -> Option<&str> {
    info.split_whitespace().next()
}

fn line_number(text: &str, offset: usize) -> usize {
    text.as_bytes()[..offset.min(text.len())]
        .iter()
        .filter(|&&b| b == b'\n')
        .count()
        + 1
}

/// Nearest usable heading in the lines just above `fence_line`
fn nearest_title<'a>(lines: &[&'a str], fence_line: usize) -> Option<&'a str> {
    let above = fence_line.saturating_sub(1);
    let first = above.saturating_sub(TITLE_WINDOW);
    lines[first..above.min(lines.len())]
        .iter()
        .rev()
        .find_map(|&line| heading_title(line))
}

/// Title of a `###` heading
///
/// `Example N: Title` yields `Title`; any other heading starting with
/// `Example` yields nothing.
fn heading_title(line: &str) -> Option<&str> {
    let rest = line.strip_prefix("###")?;
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    let text = rest.trim();
    if text.is_empty() {
        return None;
    }
    match text.strip_prefix("Example") {
        None => Some(text),
        Some(after) => numbered_title(after),
    }
}

fn numbered_title(after: &str) -> Option<&str> {
    let after = after.strip_prefix(char::is_whitespace)?.trim_start();
    let digits = after.len() - after.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    if digits == 0 {
        return None;
    }
    let title = after[digits..].strip_prefix(':')?;
    if !title.starts_with(char::is_whitespace) {
        return None;
    }
    let title = title.trim();
    (!title.is_empty()).then_some(title)
}

#[cfg(test)]
mod tests {
    use super::*;
    use compat_test_utils::GUIDE_MARKDOWN;
    use pretty_assertions::assert_eq;

    #[test]
    fn guide_blocks() {
        let blocks = extract_code_blocks(GUIDE_MARKDOWN, "zig");
        let spans: Vec<_> = blocks
            .iter()
            .map(|b| (b.index, b.start_line, b.end_line))
            .collect();
        assert_eq!(spans, vec![(1, 5, 11), (2, 15, 17), (3, 21, 26)]);

        assert!(blocks[0].is_runnable);
        assert!(!blocks[1].is_runnable);
        assert!(blocks[2].is_runnable);

        assert_eq!(blocks[0].title.as_deref(), Some("Growing a List"));
        assert_eq!(blocks[1].title, None);
        assert_eq!(blocks[2].title.as_deref(), Some("Testing Lists"));
    }

    #[test]
    fn code_excludes_fences() {
        let blocks = extract_code_blocks(GUIDE_MARKDOWN, "zig");
        assert_eq!(blocks[1].code, "const x = 1;");
        assert_eq!(blocks[0].first_line(), "const std = @import(\"std\");");
        assert_eq!(blocks[0].line_count(), 5);
    }

    #[test]
    fn other_languages() {
        let blocks = extract_code_blocks(GUIDE_MARKDOWN, "python");
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].code, "print(\"ignored\")");
        assert_eq!(blocks[0].language, "python");
    }

    #[test]
    fn info_string_extras() {
        let md = "```zig title=demo\nconst a = 1;\n```\n";
        let blocks = extract_code_blocks(md, "zig");
        assert_eq!(blocks.len(), 1);
        assert_eq!((blocks[0].start_line, blocks[0].end_line), (1, 3));
    }

    #[test]
    fn runnable_rules() {
        assert!(is_runnable("const std = @import(\"std\");\npub fn main() void {}"));
        assert!(is_runnable("const std = @import(\"std\");\ntest \"x\" {}"));
        assert!(!is_runnable("pub fn main() void {}"));
        assert!(!is_runnable("const std = @import(\"std\");"));
    }

    #[test]
    fn heading_titles() {
        assert_eq!(heading_title("### Example 3: Sorting"), Some("Sorting"));
        assert_eq!(heading_title("###   Memory Pools  "), Some("Memory Pools"));
        assert_eq!(heading_title("### Examples"), None);
        assert_eq!(heading_title("### Example: Missing number"), None);
        assert_eq!(heading_title("#### Deeper"), None);
        assert_eq!(heading_title("## Section"), None);
        assert_eq!(heading_title("###"), None);
    }

    #[test]
    fn title_window_is_bounded() {
        let mut md = String::from("### Far Away\n");
        md.push_str(&"\n".repeat(TITLE_WINDOW));
        md.push_str("```zig\nconst a = 1;\n```\n");
        let blocks = extract_code_blocks(&md, "zig");
        assert_eq!(blocks[0].start_line, TITLE_WINDOW + 2);
        assert_eq!(blocks[0].title, None);
    }

    #[test]
    fn partition_keeps_order() {
        let (runnable, fragments) = partition(extract_code_blocks(GUIDE_MARKDOWN, "zig"));
        let indices: Vec<_> = runnable.iter().map(|b| b.index).collect();
        assert_eq!(indices, vec![1, 3]);
        assert_eq!(fragments.len(), 1);
    }

    #[test]
    fn extract_file_reports_missing() {
        let dir = tempfile::tempdir().unwrap();
        let err = extract_file(&dir.path().join("absent.md"), "zig").unwrap_err();
        assert!(err.to_string().contains("absent.md"));
    }
}
