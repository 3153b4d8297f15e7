//! Dynamic structural values that lenses focus into.
//!
//! A [`Value`] is an immutable, JSON-shaped tree: scalars, ordered sequences,
//! and insertion-ordered maps. Containers are shared through [`Arc`], so
//! cloning a value is cheap and an operation that leaves a subtree untouched
//! returns the *same allocation*, so callers can detect "nothing changed" with
//! [`Value::ptr_eq`] instead of a deep comparison.
//!
//! Absence is data, not an error: a missing map field, an out-of-range index,
//! or a match-free search all read as [`Value::Null`]. The [`Absence`] trait
//! is the seam through which lens composition recognizes absent values
//! without committing to a concrete data model.
//!
//! # Examples
//!
//! ```
//! use focal::Value;
//!
//! let state = Value::from_entries([
//!     ("name", Value::from("hello")),
//!     ("count", Value::from(3)),
//! ]);
//!
//! assert_eq!(state.key("count"), Some(&Value::Int(3)));
//! assert_eq!(state.key("missing"), None);
//! assert_eq!(state.to_string(), r#"{"name": "hello", "count": 3}"#);
//! ```

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

/// An immutable structural value: scalar, sequence, or insertion-ordered map.
///
/// Containers (`Str`, `Seq`, `Map`) are reference-counted; [`Clone`] bumps a
/// counter rather than copying the tree. All updates performed by lenses are
/// copy-on-write: the affected container is shallow-copied and everything
/// else keeps its original allocation.
#[derive(Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum Value {
    /// The absent marker. Missing fields and failed searches read as `Null`.
    #[default]
    Null,
    /// A boolean scalar.
    Bool(bool),
    /// An integer scalar.
    Int(i64),
    /// A floating-point scalar.
    Float(f64),
    /// A shared string.
    Str(Arc<str>),
    /// A shared sequence of values.
    Seq(Arc<Vec<Value>>),
    /// A shared map with insertion-ordered keys.
    Map(Arc<IndexMap<String, Value>>),
}

impl Value {
    /// Builds a sequence from anything convertible to values.
    ///
    /// # Examples
    ///
    /// ```
    /// use focal::Value;
    ///
    /// let seq = Value::from_values([1, 2, 3]);
    /// assert_eq!(seq.at(2), Some(&Value::Int(3)));
    /// ```
    pub fn from_values<I>(values: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Self>,
    {
        Self::Seq(Arc::new(values.into_iter().map(Into::into).collect()))
    }

    /// Builds a map from key/value pairs, preserving insertion order.
    pub fn from_entries<K, V, I>(entries: I) -> Self
    where
        K: Into<String>,
        V: Into<Self>,
        I: IntoIterator<Item = (K, V)>,
    {
        Self::Map(Arc::new(
            entries
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        ))
    }

    /// Returns `true` for [`Value::Null`].
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns `true` for sequences.
    #[must_use]
    pub const fn is_seq(&self) -> bool {
        matches!(self, Self::Seq(_))
    }

    /// Returns `true` for maps.
    #[must_use]
    pub const fn is_map(&self) -> bool {
        matches!(self, Self::Map(_))
    }

    /// The boolean payload, if this is a `Bool`.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            _ => None,
        }
    }

    /// The integer payload, if this is an `Int`.
    #[must_use]
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(value) => Some(*value),
            _ => None,
        }
    }

    /// The float payload, if this is a `Float`.
    #[must_use]
    pub const fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(value) => Some(*value),
            _ => None,
        }
    }

    /// The string payload, if this is a `Str`.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(value) => Some(value),
            _ => None,
        }
    }

    /// The elements, if this is a sequence.
    #[must_use]
    pub fn as_seq(&self) -> Option<&[Self]> {
        match self {
            Self::Seq(items) => Some(items),
            _ => None,
        }
    }

    /// The entries, if this is a map.
    #[must_use]
    pub fn as_map(&self) -> Option<&IndexMap<String, Self>> {
        match self {
            Self::Map(entries) => Some(entries),
            _ => None,
        }
    }

    /// Looks up a map field. `None` for missing fields and non-maps.
    #[must_use]
    pub fn key(&self, name: &str) -> Option<&Self> {
        self.as_map().and_then(|entries| entries.get(name))
    }

    /// Looks up a sequence element. `None` out of range and for non-sequences.
    #[must_use]
    pub fn at(&self, index: usize) -> Option<&Self> {
        self.as_seq().and_then(|items| items.get(index))
    }

    /// Iterates a map's own keys in insertion order; empty for non-maps.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.as_map()
            .into_iter()
            .flat_map(IndexMap::keys)
            .map(String::as_str)
    }

    /// A short name for this value's shape, used in diagnostics.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Int(_) => "integer",
            Self::Float(_) => "float",
            Self::Str(_) => "string",
            Self::Seq(_) => "sequence",
            Self::Map(_) => "map",
        }
    }

    /// Identity comparison: same allocation for containers, equality for
    /// scalars.
    ///
    /// A lens `set` that short-circuits returns its input unmoved, so this
    /// distinguishes "untouched" from "replaced with an equal copy".
    ///
    /// # Examples
    ///
    /// ```
    /// use focal::Value;
    ///
    /// let original = Value::from_values([1, 2]);
    /// let shared = original.clone();
    /// let rebuilt = Value::from_values([1, 2]);
    ///
    /// assert!(original.ptr_eq(&shared));
    /// assert!(original == rebuilt && !original.ptr_eq(&rebuilt));
    /// ```
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(left), Self::Bool(right)) => left == right,
            (Self::Int(left), Self::Int(right)) => left == right,
            (Self::Float(left), Self::Float(right)) => left == right,
            (Self::Str(left), Self::Str(right)) => Arc::ptr_eq(left, right),
            (Self::Seq(left), Self::Seq(right)) => Arc::ptr_eq(left, right),
            (Self::Map(left), Self::Map(right)) => Arc::ptr_eq(left, right),
            _ => false,
        }
    }
}

/// Types with a distinguished absent element.
///
/// Lens composition short-circuits through optional hops by asking the
/// intermediate value whether it is absent, and by producing an absent leaf
/// when the chain stops early. [`Value`] answers with [`Value::Null`];
/// `Option<T>` answers with `None`, so custom typed lenses can participate.
pub trait Absence {
    /// The absent element of this type.
    fn absent() -> Self;

    /// Whether this value is the absent element.
    fn is_absent(&self) -> bool;
}

impl Absence for Value {
    fn absent() -> Self {
        Self::Null
    }

    fn is_absent(&self) -> bool {
        self.is_null()
    }
}

impl<T> Absence for Option<T> {
    fn absent() -> Self {
        None
    }

    fn is_absent(&self) -> bool {
        self.is_none()
    }
}

impl fmt::Display for Value {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => formatter.write_str("null"),
            Self::Bool(value) => write!(formatter, "{value}"),
            Self::Int(value) => write!(formatter, "{value}"),
            Self::Float(value) => write!(formatter, "{value}"),
            Self::Str(value) => write!(formatter, "{value:?}"),
            Self::Seq(items) => {
                formatter.write_str("[")?;
                for (index, item) in items.iter().enumerate() {
                    if index > 0 {
                        formatter.write_str(", ")?;
                    }
                    write!(formatter, "{item}")?;
                }
                formatter.write_str("]")
            }
            Self::Map(entries) => {
                formatter.write_str("{")?;
                for (index, (key, value)) in entries.iter().enumerate() {
                    if index > 0 {
                        formatter.write_str(", ")?;
                    }
                    write!(formatter, "{key:?}: {value}")?;
                }
                formatter.write_str("}")
            }
        }
    }
}

// Debug matches Display: the JSON-like form is what diagnostics,
// descriptions, and failure messages embed.
impl fmt::Debug for Value {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, formatter)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Str(Arc::from(value))
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Str(Arc::from(value))
    }
}

impl From<Arc<str>> for Value {
    fn from(value: Arc<str>) -> Self {
        Self::Str(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(values: Vec<Value>) -> Self {
        Self::Seq(Arc::new(values))
    }
}

impl From<IndexMap<String, Value>> for Value {
    fn from(entries: IndexMap<String, Value>) -> Self {
        Self::Map(Arc::new(entries))
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

impl FromIterator<Value> for Value {
    fn from_iter<I: IntoIterator<Item = Self>>(iter: I) -> Self {
        Self::Seq(Arc::new(iter.into_iter().collect()))
    }
}

impl FromIterator<(String, Value)> for Value {
    fn from_iter<I: IntoIterator<Item = (String, Self)>>(iter: I) -> Self {
        Self::Map(Arc::new(iter.into_iter().collect()))
    }
}

static_assertions::assert_impl_all!(Value: Clone, Send, Sync);
