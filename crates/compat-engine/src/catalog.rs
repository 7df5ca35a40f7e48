//! Built-in rule catalog for the Zig 0.15 container API
//!
//! Registration order is application order and ledger order.

use crate::error::RuleResult;
use crate::guard::{ContainerFamily, GuardPredicate};
use crate::rule::{DroppedArgument, PatternRule};

/// `std.ArrayList(T).init(allocator)` → `std.ArrayList(T){}`
pub const ARRAYLIST_INIT: &str = "arraylist-init";
/// `list.append(x)` → `list.append(allocator, x)`
pub const ARRAYLIST_APPEND: &str = "arraylist-append";
/// `c.deinit()` → `c.deinit(allocator)`
pub const CONTAINER_DEINIT: &str = "container-deinit";
/// `list.appendSlice(s)` → `list.appendSlice(allocator, s)`
pub const ARRAYLIST_APPEND_SLICE: &str = "arraylist-append-slice";
/// `std.*HashMap*(K, V).init()` → `std.*HashMap*(K, V){}`
pub const HASHMAP_INIT: &str = "hashmap-init";
/// `map.put(k, v)` → `map.put(allocator, k, v)`
pub const HASHMAP_PUT: &str = "hashmap-put";
/// `.toOwnedSlice()` → `.toOwnedSlice(allocator)`
pub const TO_OWNED_SLICE: &str = "to-owned-slice";

/// Rule names in registration order
pub const RULE_NAMES: [&str; 7] = [
    ARRAYLIST_INIT,
    ARRAYLIST_APPEND,
    CONTAINER_DEINIT,
    ARRAYLIST_APPEND_SLICE,
    HASHMAP_INIT,
    HASHMAP_PUT,
    TO_OWNED_SLICE,
];

/// Build every Zig 0.15 rule, in registration order
///
/// # Errors
/// Only if a built-in pattern fails to compile.
pub fn zig_015_rules() -> RuleResult<Vec<PatternRule>> {
    let array_list = GuardPredicate::Uses(ContainerFamily::ArrayList);
    let hash_map = GuardPredicate::Uses(ContainerFamily::HashMap);

    Ok(vec![
        PatternRule::constructor(
            ARRAYLIST_INIT,
            "ArrayList initialization: .init(allocator) -> {}",
            r"std\.ArrayList",
            DroppedArgument::Handle,
        )?,
        PatternRule::leading_argument(
            ARRAYLIST_APPEND,
            "ArrayList.append: Added allocator parameter",
            "append",
        )?
        .with_guard(array_list),
        PatternRule::suffix(
            CONTAINER_DEINIT,
            "Container.deinit: Added allocator parameter",
            "deinit",
        )?
        .with_guard(GuardPredicate::UsesAnyContainer),
        PatternRule::leading_argument(
            ARRAYLIST_APPEND_SLICE,
            "ArrayList.appendSlice: Added allocator parameter",
            "appendSlice",
        )?
        .with_guard(array_list),
        PatternRule::constructor(
            HASHMAP_INIT,
            "HashMap initialization: .init() -> {}",
            r"std\.\w*HashMap\w*",
            DroppedArgument::Nothing,
        )?,
        PatternRule::leading_argument(
            HASHMAP_PUT,
            "HashMap.put: Added allocator parameter",
            "put",
        )?
        .with_guard(hash_map),
        PatternRule::suffix(
            TO_OWNED_SLICE,
            "toOwnedSlice: Added allocator parameter",
            "toOwnedSlice",
        )?
        .with_guard(array_list),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_matches_names() {
        let rules = zig_015_rules().unwrap();
        let names: Vec<_> = rules.iter().map(PatternRule::name).collect();
        assert_eq!(names, RULE_NAMES);
    }

    #[test]
    fn categories_are_unique() {
        let rules = zig_015_rules().unwrap();
        let mut categories: Vec<_> = rules.iter().map(PatternRule::category).collect();
        categories.sort_unstable();
        categories.dedup();
        assert_eq!(categories.len(), rules.len());
    }

    #[test]
    fn only_constructors_are_unguarded() {
        for rule in zig_015_rules().unwrap() {
            let is_constructor = rule.kind().label() == "constructor-rewrite";
            assert_eq!(rule.guard() == GuardPredicate::Always, is_constructor, "{}", rule.name());
        }
    }
}
