//! Property-based tests for lens laws.
//!
//! This module verifies that the stock lenses satisfy the required laws:
//!
//! - **GetPut Law**: `lens.set(root, lens.get(&root)?)` is structurally
//!   equal to `root`
//! - **PutGet Law**: `lens.get(&lens.set(root, value)?)` equals `value`
//! - **PutPut Law**: two consecutive sets are equivalent to the last set
//! - **Associativity**: `a.then(b).then(c)` and `a.then(b.then(c))` behave
//!   identically for both get and set
//!
//! Using proptest, we generate random inputs to thoroughly verify these laws
//! across a wide range of values.

use focal::{Value, at, key};
use proptest::prelude::*;

// =============================================================================
// Test Structures
// =============================================================================

fn nested_state(inner: i64, name: &str, sibling: i64) -> Value {
    Value::from_entries([
        (
            "a",
            Value::from_entries([
                ("b", Value::from_entries([("c", Value::Int(inner))])),
                ("x", Value::Int(sibling)),
            ]),
        ),
        ("name", Value::from(name)),
    ])
}

fn deep_lens() -> focal::Lens<Value, Value> {
    key("a").then(key("b")).then(key("c"))
}

// =============================================================================
// Lens Laws for composed property access
// =============================================================================

proptest! {
    /// GetPut Law: getting and setting back yields the original
    #[test]
    fn prop_get_put_law(inner in any::<i64>(), name in "[a-z]{0,8}", sibling in any::<i64>()) {
        let root = nested_state(inner, &name, sibling);
        let lens = deep_lens();
        let value = lens.get(&root).unwrap();
        let result = lens.set(root.clone(), value).unwrap();
        prop_assert_eq!(result, root);
    }

    /// PutGet Law: setting then getting yields the set value
    #[test]
    fn prop_put_get_law(
        inner in any::<i64>(),
        name in "[a-z]{0,8}",
        sibling in any::<i64>(),
        new_value in any::<i64>()
    ) {
        let root = nested_state(inner, &name, sibling);
        let lens = deep_lens();
        let updated = lens.set(root, Value::Int(new_value)).unwrap();
        prop_assert_eq!(lens.get(&updated).unwrap(), Value::Int(new_value));
    }

    /// PutPut Law: two consecutive sets are equivalent to the last set
    #[test]
    fn prop_put_put_law(
        inner in any::<i64>(),
        name in "[a-z]{0,8}",
        sibling in any::<i64>(),
        first in any::<i64>(),
        second in any::<i64>()
    ) {
        let root = nested_state(inner, &name, sibling);
        let lens = deep_lens();
        let twice = lens
            .set(lens.set(root.clone(), Value::Int(first)).unwrap(), Value::Int(second))
            .unwrap();
        let once = lens.set(root, Value::Int(second)).unwrap();
        prop_assert_eq!(twice, once);
    }

    /// Setting leaves every unfocused slot untouched
    #[test]
    fn prop_set_preserves_siblings(
        inner in any::<i64>(),
        name in "[a-z]{0,8}",
        sibling in any::<i64>(),
        new_value in any::<i64>()
    ) {
        let root = nested_state(inner, &name, sibling);
        let updated = deep_lens().set(root, Value::Int(new_value)).unwrap();
        prop_assert_eq!(updated.key("name"), Some(&Value::from(name)));
        prop_assert_eq!(
            updated.key("a").unwrap().key("x"),
            Some(&Value::Int(sibling))
        );
    }

    /// Immutability: the original root is unchanged by a set
    #[test]
    fn prop_set_never_mutates_the_original(
        inner in any::<i64>(),
        name in "[a-z]{0,8}",
        sibling in any::<i64>(),
        new_value in any::<i64>()
    ) {
        let root = nested_state(inner, &name, sibling);
        let _updated = deep_lens().set(root.clone(), Value::Int(new_value)).unwrap();
        prop_assert_eq!(
            root.key("a").unwrap().key("b").unwrap().key("c"),
            Some(&Value::Int(inner))
        );
    }
}

// =============================================================================
// Composition associativity
// =============================================================================

proptest! {
    /// Associativity for get: grouping of `then` does not change the read
    #[test]
    fn prop_then_is_associative_for_get(
        inner in any::<i64>(),
        name in "[a-z]{0,8}",
        sibling in any::<i64>()
    ) {
        let root = nested_state(inner, &name, sibling);
        let left = key("a").then(key("b")).then(key("c"));
        let right = key("a").then(key("b").then(key("c")));
        prop_assert_eq!(left.get(&root).unwrap(), right.get(&root).unwrap());
    }

    /// Associativity for set: grouping of `then` does not change the write
    #[test]
    fn prop_then_is_associative_for_set(
        inner in any::<i64>(),
        name in "[a-z]{0,8}",
        sibling in any::<i64>(),
        new_value in any::<i64>()
    ) {
        let root = nested_state(inner, &name, sibling);
        let left = key("a").then(key("b")).then(key("c"));
        let right = key("a").then(key("b").then(key("c")));
        prop_assert_eq!(
            left.set(root.clone(), Value::Int(new_value)).unwrap(),
            right.set(root, Value::Int(new_value)).unwrap()
        );
    }
}

// =============================================================================
// Lens Laws for index access
// =============================================================================

proptest! {
    /// GetPut Law for index access over non-empty sequences
    #[test]
    fn prop_index_get_put_law(
        elements in prop::collection::vec(any::<i64>(), 1..16),
        pick in any::<prop::sample::Index>()
    ) {
        let index = pick.index(elements.len());
        let root = Value::from_values(elements.iter().copied().map(Value::Int).collect::<Vec<_>>());
        let lens = at(index);
        let value = lens.get(&root).unwrap();
        let result = lens.set(root.clone(), value).unwrap();
        prop_assert_eq!(result, root);
    }

    /// PutGet Law for index access over non-empty sequences
    #[test]
    fn prop_index_put_get_law(
        elements in prop::collection::vec(any::<i64>(), 1..16),
        pick in any::<prop::sample::Index>(),
        new_value in any::<i64>()
    ) {
        let index = pick.index(elements.len());
        let root = Value::from_values(elements.iter().copied().map(Value::Int).collect::<Vec<_>>());
        let lens = at(index);
        let updated = lens.set(root, Value::Int(new_value)).unwrap();
        prop_assert_eq!(lens.get(&updated).unwrap(), Value::Int(new_value));
    }
}
