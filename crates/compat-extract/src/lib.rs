//! Guide code-block extraction
//!
//! Finds fenced code blocks of one language in a markdown document and
//! reports, per block:
//! - 1-based line numbers of the opening and closing fences
//! - the code text
//! - whether it looks like a complete program or test
//! - the nearest `###` heading as a title
//!
//! # Example
//!
//! ```rust
//! use compat_extract::extract_code_blocks;
//!
//! let md = "### Example 1: Hello\n\n```zig\nconst std = @import(\"std\");\npub fn main() void {}\n```\n";
//! let blocks = extract_code_blocks(md, "zig");
//!
//! assert_eq!(blocks.len(), 1);
//! assert_eq!(blocks[0].start_line, 3);
//! assert_eq!(blocks[0].title.as_deref(), Some("Hello"));
//! assert!(blocks[0].is_runnable);
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod blocks;
pub mod error;

pub use blocks::{extract_code_blocks, extract_file, is_runnable, partition, CodeBlock};
pub use error::{ExtractError, ExtractResult};

/// Default fence language
pub const ZIG: &str = "zig";
