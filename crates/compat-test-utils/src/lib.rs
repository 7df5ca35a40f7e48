//! Testing utilities for the compatibility workspace
//!
//! Sample Zig sources in their legacy and migrated shapes, a markdown guide
//! for the extractor, and a temporary source-tree builder.

#![allow(missing_docs)]

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const LEGACY_ARRAYLIST: &str = r#"const std = @import("std");

pub fn main() !void {
    const allocator = std.heap.page_allocator;
    var list = std.ArrayList(u8).init(allocator);
    defer list.deinit();
    try list.append(42);
    try list.appendSlice("abc");
    const owned = try list.toOwnedSlice();
    _ = owned;
}
"#;

pub const MIGRATED_ARRAYLIST: &str = r#"const std = @import("std");

pub fn main() !void {
    const allocator = std.heap.page_allocator;
    var list = std.ArrayList(u8){};
    defer list.deinit(allocator);
    try list.append(allocator, 42);
    try list.appendSlice(allocator, "abc");
    const owned = try list.toOwnedSlice(allocator);
    _ = owned;
}
"#;

pub const LEGACY_HASHMAP: &str = r#"const std = @import("std");

pub fn main() !void {
    const allocator = std.heap.page_allocator;
    var map = std.AutoHashMapUnmanaged(u32, u32).init();
    defer map.deinit();
    try map.put(1, 100);
}
"#;

pub const MIGRATED_HASHMAP: &str = r#"const std = @import("std");

pub fn main() !void {
    const allocator = std.heap.page_allocator;
    var map = std.AutoHashMapUnmanaged(u32, u32){};
    defer map.deinit(allocator);
    try map.put(allocator, 1, 100);
}
"#;

/// No container usage: every rule stays quiet
pub const UNRELATED: &str = r#"const std = @import("std");

pub fn main() void {
    const stdout = std.io.getStdOut().writer();
    stdout.print("hello\n", .{}) catch {};
    queue.append(1);
    cache.put(1, 2);
}
"#;

/// Allocator-owned `deinit` next to a list; only the list call migrates
pub const HEAP_ALLOCATORS: &str = r#"var gpa = std.heap.GeneralPurposeAllocator(.{}){};
defer _ = gpa.deinit();
var arena = std.heap.ArenaAllocator.init(gpa.allocator());
defer arena.deinit();
var list = std.ArrayList(u8).init(allocator);
defer list.deinit();
"#;

/// [`HEAP_ALLOCATORS`] after migration
pub const MIGRATED_HEAP_ALLOCATORS: &str = r#"var gpa = std.heap.GeneralPurposeAllocator(.{}){};
defer _ = gpa.deinit();
var arena = std.heap.ArenaAllocator.init(gpa.allocator());
defer arena.deinit();
var list = std.ArrayList(u8){};
defer list.deinit(allocator);
"#;

/// Calls split across lines are never rewritten
pub const MULTI_LINE_CALLS: &str = r#"var list = std.ArrayList(u8).init(
    allocator,
);
try list.append(
    42,
);
"#;

/// Guide with two runnable Zig blocks, one fragment and one foreign block
pub const GUIDE_MARKDOWN: &str = r#"# Container Guide

### Example 1: Growing a List

```zig
const std = @import("std");

pub fn main() void {
    std.debug.print("hi\n", .{});
}
```

A fragment that is not runnable:

```zig
const x = 1;
```

### Testing Lists

```zig
const std = @import("std");
test "adds" {
    try std.testing.expect(1 + 1 == 2);
}
```

```python
print("ignored")
```

```zig
```
"#;

/// Temporary directory populated with source files
pub struct SourceTree {
    dir: TempDir,
}

impl SourceTree {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    /// Add a file, creating parent directories
    pub fn with_file(self, relative: &str, contents: impl AsRef<[u8]>) -> Self {
        let path = self.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, contents).unwrap();
        self
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn join(&self, relative: &str) -> PathBuf {
        self.dir.path().join(relative)
    }

    pub fn read(&self, relative: &str) -> String {
        fs::read_to_string(self.join(relative)).unwrap()
    }
}

impl Default for SourceTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Tree with one legacy ArrayList file, one legacy HashMap file and one
/// unrelated file, plus a cache directory that must be skipped
pub fn legacy_tree() -> SourceTree {
    SourceTree::new()
        .with_file("src/list.zig", LEGACY_ARRAYLIST)
        .with_file("src/map.zig", LEGACY_HASHMAP)
        .with_file("src/plain.zig", UNRELATED)
        .with_file("zig-cache/stale.zig", LEGACY_ARRAYLIST)
        .with_file("README.md", "list.append(1);\n")
}
