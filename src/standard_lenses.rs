//! Stock lenses over [`Value`]: property access, index access, and search.
//!
//! These factories are the from-type construction entry points. Each returns
//! a plain [`Lens<Value, Value>`] that composes with [`Lens::then`] like any
//! other lens.
//!
//! Reads treat absence as data: a missing field, an out-of-range index, or a
//! match-free search yields [`Value::Null`]. Failures are reserved for
//! accesses the data shape cannot support, such as reading a key *of* an
//! absent value or replacing an index of a non-sequence.
//!
//! # Examples
//!
//! ```
//! use focal::{find_by, key, Direction, Value};
//!
//! let inventory = Value::from_entries([(
//!     "items",
//!     Value::from_values([
//!         Value::from_entries([("sku", "a"), ("qty", "1")]),
//!         Value::from_entries([("sku", "b"), ("qty", "2")]),
//!     ]),
//! )]);
//!
//! let qty_of_b = key("items")
//!     .then(find_by("sku", Value::from("b"), Direction::Forward))
//!     .then(key("qty"));
//! assert_eq!(qty_of_b.get(&inventory).unwrap(), Value::from("2"));
//! ```

use std::sync::Arc;

use indexmap::IndexMap;

use crate::failure::DynError;
use crate::lens::{Lens, LensPath};
use crate::value::Value;

/// The default root label carried by factory-built paths. Logging rebases it
/// onto a caller-supplied name.
const ROOT_LABEL: &str = "root";

/// Scan direction for [`find_by`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    /// Match the first occurrence.
    Forward,
    /// Match the last occurrence.
    Reverse,
}

/// Focuses a named field of a map, or a position of a sequence.
///
/// The container shape is dispatched at runtime:
///
/// - map get: the field's value, or `Null` when missing;
/// - sequence get: the element at the numeric position the key spells, or
///   `Null` out of range;
/// - `Null` get: a failure (reading a key of an absent value);
/// - any other scalar get: `Null`.
///
/// Writes are copy-on-write: a map is shallow-copied with the field
/// replaced (or appended, preserving the positions of existing keys), a
/// sequence gets a positional replacement, and a `Null` or scalar container
/// is superseded by a fresh single-entry map.
pub fn key(name: impl Into<String>) -> Lens<Value, Value> {
    let name = name.into();
    let path = LensPath::new(ROOT_LABEL, name.as_str());

    let getter_name = name.clone();
    let getter = move |source: &Value| -> Result<Value, DynError> {
        match source {
            Value::Map(entries) => Ok(entries
                .get(&getter_name)
                .cloned()
                .unwrap_or(Value::Null)),
            Value::Seq(items) => Ok(getter_name
                .parse::<usize>()
                .ok()
                .and_then(|index| items.get(index).cloned())
                .unwrap_or(Value::Null)),
            Value::Null => Err(format!("cannot read {getter_name:?} of null").into()),
            _ => Ok(Value::Null),
        }
    };

    let setter = move |source: Value, value: Value| -> Result<Value, DynError> {
        match source {
            Value::Map(entries) => {
                let mut next = entries.as_ref().clone();
                next.insert(name.clone(), value);
                Ok(Value::Map(Arc::new(next)))
            }
            Value::Seq(items) => {
                let mut next = items.as_ref().clone();
                if let Some(index) = name.parse::<usize>().ok().filter(|i| *i < next.len()) {
                    next[index] = value;
                }
                Ok(Value::Seq(Arc::new(next)))
            }
            _ => {
                let mut next = IndexMap::new();
                next.insert(name.clone(), value);
                Ok(Value::Map(Arc::new(next)))
            }
        }
    };

    Lens::new(getter, setter, path)
}

/// [`key`], marked optional: chains built through it no-op on absence.
pub fn key_opt(name: impl Into<String>) -> Lens<Value, Value> {
    key(name).optional()
}

/// [`key`] with a fallback substituted for an absent read.
///
/// The setter is untouched, so a write through an absent field grafts the
/// written value onto a copy derived from the fallback. The lens is *not*
/// optional: the fallback guarantees a present view.
///
/// # Examples
///
/// ```
/// use focal::{key, key_or, Value};
///
/// let fallback = Value::from_entries([("name", "default")]);
/// let lens = key_or("a", fallback).then(key("name"));
///
/// let bare = Value::from_entries([("b", "world")]);
/// assert_eq!(lens.get(&bare).unwrap(), Value::from("default"));
/// ```
pub fn key_or(name: impl Into<String>, fallback: Value) -> Lens<Value, Value> {
    let base = key(name);
    let path = base.path().clone();
    let reading = base.clone();

    let getter = move |source: &Value| -> Result<Value, DynError> {
        let current = reading.get(source)?;
        Ok(if current.is_null() {
            fallback.clone()
        } else {
            current
        })
    };
    let setter =
        move |source: Value, value: Value| -> Result<Value, DynError> { Ok(base.set(source, value)?) };

    Lens::new(getter, setter, path)
}

/// Focuses the element at a numeric position of a sequence.
///
/// An out-of-range read is `Null`, not an error. Writes replace in range and
/// leave the rest untouched; writing through anything that is not a
/// sequence is a failure.
pub fn at(index: usize) -> Lens<Value, Value> {
    let path = LensPath::new(ROOT_LABEL, index.to_string());

    let getter = move |source: &Value| -> Result<Value, DynError> {
        match source {
            Value::Seq(items) => Ok(items.get(index).cloned().unwrap_or(Value::Null)),
            Value::Null => Err(format!("cannot read index {index} of null").into()),
            _ => Ok(Value::Null),
        }
    };

    let setter = move |source: Value, value: Value| -> Result<Value, DynError> {
        match source {
            Value::Seq(items) => {
                let mut next = items.as_ref().clone();
                if index < next.len() {
                    next[index] = value;
                }
                Ok(Value::Seq(Arc::new(next)))
            }
            other => Err(format!("cannot replace index {index} of {}", other.kind()).into()),
        }
    };

    Lens::new(getter, setter, path)
}

/// Focuses the first sequence element satisfying `predicate`.
///
/// The write direction is deliberately asymmetric: `set` replaces **every**
/// matching element, not just the first. A match-free write returns the
/// sequence untouched (same allocation). Anything that is not a sequence
/// fails in both directions.
///
/// # Examples
///
/// ```
/// use focal::{find, Value};
///
/// let seq = Value::from_values([1, 2, 1]);
/// let ones = find(|element| element == &Value::Int(1));
///
/// assert_eq!(ones.get(&seq).unwrap(), Value::Int(1));
/// let replaced = ones.set(seq, Value::Int(9)).unwrap();
/// assert_eq!(replaced, Value::from_values([9, 2, 9]));
/// ```
pub fn find<P>(predicate: P) -> Lens<Value, Value>
where
    P: Fn(&Value) -> bool + Send + Sync + 'static,
{
    let path = LensPath::new(ROOT_LABEL, "find()");
    let predicate = Arc::new(predicate);

    let getter = {
        let predicate = Arc::clone(&predicate);
        move |source: &Value| -> Result<Value, DynError> {
            match source {
                Value::Seq(items) => Ok(items
                    .iter()
                    .find(|element| predicate.as_ref()(element))
                    .cloned()
                    .unwrap_or(Value::Null)),
                other => Err(no_search(other)),
            }
        }
    };

    let setter = move |source: Value, value: Value| -> Result<Value, DynError> {
        match source {
            Value::Seq(items) => {
                let matched: Vec<usize> = items
                    .iter()
                    .enumerate()
                    .filter(|(_, element)| predicate.as_ref()(element))
                    .map(|(index, _)| index)
                    .collect();
                if matched.is_empty() {
                    return Ok(Value::Seq(items));
                }
                let mut next = items.as_ref().clone();
                for index in matched {
                    next[index] = value.clone();
                }
                Ok(Value::Seq(Arc::new(next)))
            }
            other => Err(no_search(&other)),
        }
    };

    Lens::new(getter, setter, path)
}

/// Focuses the sequence element whose `field` equals `target`.
///
/// `Direction::Forward` matches the first occurrence, `Direction::Reverse`
/// the last; `set` replaces exactly the one matched element. With no match,
/// the read is `Null` and the write returns the sequence untouched (same
/// allocation), a confirmed no-op rather than an error.
pub fn find_by(
    field: impl Into<String>,
    target: Value,
    direction: Direction,
) -> Lens<Value, Value> {
    let field = field.into();
    let path = LensPath::new(ROOT_LABEL, format!("{field} == {target:?}"));

    let getter = {
        let field = field.clone();
        let target = target.clone();
        move |source: &Value| -> Result<Value, DynError> {
            match source {
                Value::Seq(items) => {
                    let found = match direction {
                        Direction::Forward => items
                            .iter()
                            .find(|element| field_matches(element, &field, &target)),
                        Direction::Reverse => items
                            .iter()
                            .rev()
                            .find(|element| field_matches(element, &field, &target)),
                    };
                    Ok(found.cloned().unwrap_or(Value::Null))
                }
                other => Err(no_search(other)),
            }
        }
    };

    let setter = move |source: Value, value: Value| -> Result<Value, DynError> {
        match source {
            Value::Seq(items) => {
                let position = match direction {
                    Direction::Forward => items
                        .iter()
                        .position(|element| field_matches(element, &field, &target)),
                    Direction::Reverse => items
                        .iter()
                        .rposition(|element| field_matches(element, &field, &target)),
                };
                match position {
                    Some(index) => {
                        let mut next = items.as_ref().clone();
                        next[index] = value;
                        Ok(Value::Seq(Arc::new(next)))
                    }
                    None => Ok(Value::Seq(items)),
                }
            }
            other => Err(no_search(&other)),
        }
    };

    Lens::new(getter, setter, path)
}

/// The whole-root lens: reads the root itself, writes replace it outright.
///
/// This is the from-type entry point for whole-root recordings.
pub fn identity<S>() -> Lens<S, S>
where
    S: Clone + 'static,
{
    Lens::new(
        |source: &S| Ok(source.clone()),
        |_source: S, value: S| Ok(value),
        LensPath::new(ROOT_LABEL, ROOT_LABEL),
    )
}

fn field_matches(element: &Value, field: &str, target: &Value) -> bool {
    element.key(field).unwrap_or(&Value::Null) == target
}

fn no_search(value: &Value) -> DynError {
    format!("cannot search {} for a matching element", value.kind()).into()
}
