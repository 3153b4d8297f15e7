//! The lens primitive: paired get/set with path labels and composition.
//!
//! A [`Lens<S, A>`] is an immutable value describing a bidirectional view
//! from a root structure `S` onto an embedded value `A`. Reading never
//! touches the root; writing returns a new root with only the focused slot
//! replaced. Lenses compose with [`Lens::then`] into deeper views, and every
//! lens carries a human-readable [`LensPath`] used purely for diagnostics.
//!
//! # Laws
//!
//! For any non-optional lens and any representable `value`:
//!
//! 1. `lens.set(root, lens.get(&root)?)` is structurally equal to `root`.
//! 2. `lens.get(&lens.set(root, value)?)` equals `value`.
//! 3. Composition is associative: `a.then(b).then(c)` behaves exactly like
//!    `a.then(b.then(c))` for both directions.
//!
//! # Optional chains
//!
//! A lens marked optional short-circuits instead of failing when its view is
//! absent: `modify` returns the root untouched (same allocation, so callers
//! can detect the no-op by identity), and anything composed *after* an
//! optional hop inherits the short-circuit. Optionality is monotonic:
//! composing with an optional lens on either side yields an optional lens.
//!
//! # Examples
//!
//! ```
//! use focal::{key, key_opt, Value};
//!
//! let state = Value::from_entries([
//!     ("user", Value::from_entries([("name", "ada")])),
//! ]);
//!
//! let name = key("user").then(key("name"));
//! assert_eq!(name.get(&state).unwrap(), Value::from("ada"));
//!
//! let renamed = name.set(state.clone(), Value::from("grace")).unwrap();
//! assert_eq!(renamed.key("user").unwrap().key("name"), Some(&Value::from("grace")));
//! // The original root is untouched.
//! assert_eq!(state.key("user").unwrap().key("name"), Some(&Value::from("ada")));
//!
//! // Absent optional hop: the write is a confirmed no-op.
//! let bare = Value::from_entries([("other", 1)]);
//! let through_missing = key_opt("user").then(key("name"));
//! let unchanged = through_missing.set(bare.clone(), Value::from("x")).unwrap();
//! assert!(unchanged.ptr_eq(&bare));
//! ```

use std::fmt;
use std::sync::Arc;

use smallvec::SmallVec;

use crate::failure::{DynError, LensFailure};
use crate::value::{Absence, Value};

/// The diagnostic access path of a lens: a chain of `from` labels plus the
/// `to` label of the focused slot.
///
/// Paths are labels only; they carry no identity and no behavior. Composed
/// lenses extend the chain; [`LensPath::rebased`] substitutes the root label
/// when a recording is logged under a caller-chosen name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LensPath {
    from: SmallVec<[Arc<str>; 4]>,
    to: Arc<str>,
}

impl LensPath {
    /// A single-hop path `from -> to`.
    pub fn new(from: impl Into<Arc<str>>, to: impl Into<Arc<str>>) -> Self {
        let mut segments = SmallVec::new();
        segments.push(from.into());
        Self {
            from: segments,
            to: to.into(),
        }
    }

    // Composition folds the outer leaf into the chain and adopts the inner
    // leaf; the inner lens's own root label is discarded.
    pub(crate) fn composed(outer: &Self, inner: &Self) -> Self {
        let mut from = outer.from.clone();
        from.push(Arc::clone(&outer.to));
        Self {
            from,
            to: Arc::clone(&inner.to),
        }
    }

    /// The `from` labels, root first.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.from.iter().map(AsRef::as_ref)
    }

    /// The label of the focused slot.
    #[must_use]
    pub fn leaf(&self) -> &str {
        &self.to
    }

    /// Renders the path with the root label replaced by `root_label`.
    ///
    /// This is the form recordings log: the first `from` segment names
    /// whatever root the caller applies the recording to.
    #[must_use]
    pub fn rebased(&self, root_label: &str) -> String {
        let mut rendered = String::from(root_label);
        for segment in self.from.iter().skip(1) {
            rendered.push_str(" -> ");
            rendered.push_str(segment);
        }
        rendered.push_str(" -> ");
        rendered.push_str(&self.to);
        rendered
    }
}

impl fmt::Display for LensPath {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.from {
            write!(formatter, "{segment} -> ")?;
        }
        write!(formatter, "{}", self.to)
    }
}

type RawGetter<S, A> = dyn Fn(&S) -> Result<A, DynError> + Send + Sync;
type RawSetter<S, A> = dyn Fn(S, A) -> Result<S, DynError> + Send + Sync;

/// A bidirectional view from a root `S` onto an embedded value `A`.
///
/// Built from a fallible getter/setter pair by [`Lens::new`] or by one of
/// the stock factories over [`Value`], and composed with [`Lens::then`].
/// Lenses are immutable once built and cheap to clone (the closures are
/// shared).
///
/// Getters return an owned `A`: the structural data model hands out shared
/// allocations, and derived reads (such as fallback substitution) produce
/// values that do not live inside the root at all.
pub struct Lens<S, A> {
    getter: Arc<RawGetter<S, A>>,
    setter: Arc<RawSetter<S, A>>,
    path: LensPath,
    optional: bool,
}

impl<S, A> Lens<S, A> {
    /// Builds a lens from raw getter and setter closures.
    ///
    /// The closures report exceptional conditions through [`DynError`];
    /// absence is expressed in the value domain (see
    /// [`Absence`]), never as an error.
    ///
    /// # Examples
    ///
    /// ```
    /// use focal::{Lens, LensPath};
    ///
    /// #[derive(Clone, Debug, PartialEq)]
    /// struct Point { x: i64, y: i64 }
    ///
    /// let x = Lens::new(
    ///     |point: &Point| Ok(Some(point.x)),
    ///     |point: Point, x: Option<i64>| Ok(Point { x: x.unwrap_or_default(), ..point }),
    ///     LensPath::new("point", "x"),
    /// );
    ///
    /// let point = Point { x: 1, y: 2 };
    /// assert_eq!(x.get(&point).unwrap(), Some(1));
    /// assert_eq!(x.set(point, Some(9)).unwrap(), Point { x: 9, y: 2 });
    /// ```
    pub fn new<G, St>(getter: G, setter: St, path: LensPath) -> Self
    where
        G: Fn(&S) -> Result<A, DynError> + Send + Sync + 'static,
        St: Fn(S, A) -> Result<S, DynError> + Send + Sync + 'static,
    {
        Self {
            getter: Arc::new(getter),
            setter: Arc::new(setter),
            path,
            optional: false,
        }
    }

    /// The diagnostic path of this lens.
    #[must_use]
    pub const fn path(&self) -> &LensPath {
        &self.path
    }

    /// Whether this lens short-circuits on absent values.
    #[must_use]
    pub const fn is_optional(&self) -> bool {
        self.optional
    }

    /// Marks this lens optional: `modify` becomes a no-op when the read
    /// value is absent, and composition built on top inherits the
    /// short-circuit.
    #[must_use]
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Reads the focused value.
    ///
    /// Absence is a normal result, not an error. A failure means the
    /// underlying getter raised; it is wrapped with this lens's path, with
    /// the innermost cause preserved verbatim through composed layers.
    pub fn get(&self, source: &S) -> Result<A, LensFailure> {
        self.getter.as_ref()(source).map_err(|error| LensFailure::getting(&self.path, error))
    }

    /// Writes the focused slot, returning a new root.
    ///
    /// The original root is never mutated. Failures are wrapped with this
    /// lens's path and carry a rendering of the attempted value.
    pub fn set(&self, source: S, value: A) -> Result<S, LensFailure>
    where
        A: Clone + fmt::Debug,
    {
        let kept = value.clone();
        self.setter.as_ref()(source, value)
            .map_err(|error| LensFailure::setting(&self.path, format!("{kept:?}"), error))
    }

    /// Replaces the focused value with `function` applied to the current one.
    ///
    /// For an optional lens, an absent current value short-circuits: the
    /// root is returned untouched (same allocation) and `function` is never
    /// invoked.
    pub fn modify<F>(&self, source: S, function: F) -> Result<S, LensFailure>
    where
        F: FnOnce(A) -> A,
        A: Absence + Clone + fmt::Debug,
    {
        let current = self.get(&source)?;
        if self.optional && current.is_absent() {
            return Ok(source);
        }
        self.set(source, function(current))
    }

    /// Composes this lens with a lens focused inside its view.
    ///
    /// The composed getter reads the intermediate value and feeds it to
    /// `inner`; the composed setter writes through `inner` and feeds the
    /// replaced intermediate back through this lens. When this lens is
    /// optional and the intermediate is absent, both directions
    /// short-circuit: reads produce an absent leaf, writes return the root
    /// untouched. The result is optional if either side is.
    pub fn then<V>(self, inner: Lens<A, V>) -> Lens<S, V>
    where
        S: 'static,
        A: Absence + Clone + fmt::Debug + 'static,
        V: Absence + Clone + fmt::Debug + 'static,
    {
        let path = LensPath::composed(&self.path, &inner.path);
        let optional = self.optional || inner.optional;
        let outer_optional = self.optional;

        let getter = {
            let outer = self.clone();
            let inner = inner.clone();
            move |source: &S| -> Result<V, DynError> {
                let intermediate = outer.get(source)?;
                if outer_optional && intermediate.is_absent() {
                    return Ok(V::absent());
                }
                Ok(inner.get(&intermediate)?)
            }
        };

        let setter = {
            let outer = self;
            move |source: S, value: V| -> Result<S, DynError> {
                let intermediate = outer.get(&source)?;
                if outer_optional && intermediate.is_absent() {
                    return Ok(source);
                }
                let replaced = inner.set(intermediate, value)?;
                Ok(outer.set(source, replaced)?)
            }
        };

        Lens {
            getter: Arc::new(getter),
            setter: Arc::new(setter),
            path,
            optional,
        }
    }

    /// Binds this lens to a concrete root, yielding an instance-scoped view.
    pub fn bind(self, root: S) -> BoundLens<S, A> {
        BoundLens { lens: self, root }
    }
}

impl<S, A> Clone for Lens<S, A> {
    fn clone(&self) -> Self {
        Self {
            getter: Arc::clone(&self.getter),
            setter: Arc::clone(&self.setter),
            path: self.path.clone(),
            optional: self.optional,
        }
    }
}

impl<S, A> fmt::Debug for Lens<S, A> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Lens")
            .field("path", &self.path)
            .field("optional", &self.optional)
            .finish_non_exhaustive()
    }
}

impl<S, A> fmt::Display for Lens<S, A> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.path, formatter)
    }
}

/// A lens bound to a concrete root value.
///
/// This is the instance-scoped entry point: the root is captured once and
/// `get`/`set`/`modify` run against it directly.
///
/// # Examples
///
/// ```
/// use focal::{key, Value};
///
/// let state = Value::from_entries([("count", 1)]);
/// let bumped = key("count").bind(state).modify(|v| match v {
///     Value::Int(n) => Value::Int(n + 1),
///     other => other,
/// }).unwrap();
/// assert_eq!(bumped.key("count"), Some(&Value::Int(2)));
/// ```
#[derive(Clone, Debug)]
pub struct BoundLens<S, A> {
    lens: Lens<S, A>,
    root: S,
}

impl<S, A> BoundLens<S, A> {
    /// Reads the focused value from the bound root.
    pub fn get(&self) -> Result<A, LensFailure> {
        self.lens.get(&self.root)
    }

    /// Writes the focused slot, consuming the binding.
    pub fn set(self, value: A) -> Result<S, LensFailure>
    where
        A: Clone + fmt::Debug,
    {
        self.lens.set(self.root, value)
    }

    /// Modifies the focused value, consuming the binding.
    pub fn modify<F>(self, function: F) -> Result<S, LensFailure>
    where
        F: FnOnce(A) -> A,
        A: Absence + Clone + fmt::Debug,
    {
        self.lens.modify(self.root, function)
    }

    /// The underlying lens.
    #[must_use]
    pub const fn lens(&self) -> &Lens<S, A> {
        &self.lens
    }

    /// The bound root.
    #[must_use]
    pub const fn root(&self) -> &S {
        &self.root
    }
}

static_assertions::assert_impl_all!(Lens<Value, Value>: Clone, Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::standard_lenses::{key, key_opt};

    fn nested() -> Value {
        Value::from_entries([
            ("a", Value::from_entries([("name", "hello")])),
            ("b", Value::from("world")),
        ])
    }

    #[test]
    fn test_get_through_composition() {
        let lens = key("a").then(key("name"));
        assert_eq!(lens.get(&nested()).unwrap(), Value::from("hello"));
    }

    #[test]
    fn test_set_replaces_only_the_focused_slot() {
        let lens = key("a").then(key("name"));
        let updated = lens.set(nested(), Value::from("updated")).unwrap();
        assert_eq!(
            updated.key("a").unwrap().key("name"),
            Some(&Value::from("updated"))
        );
        assert_eq!(updated.key("b"), Some(&Value::from("world")));
    }

    #[test]
    fn test_modify_applies_the_function() {
        let lens = key("b");
        let updated = lens
            .modify(nested(), |value| match value {
                Value::Str(s) => Value::from(format!("{s}!")),
                other => other,
            })
            .unwrap();
        assert_eq!(updated.key("b"), Some(&Value::from("world!")));
    }

    #[test]
    fn test_optional_modify_short_circuits_on_absent() {
        let root = Value::from_entries([("b", "world")]);
        let lens = key_opt("a");
        let mut called = false;
        let result = lens
            .modify(root.clone(), |value| {
                called = true;
                value
            })
            .unwrap();
        assert!(!called);
        assert!(result.ptr_eq(&root));
    }

    #[test]
    fn test_optionality_is_monotonic_through_composition() {
        let lens = key("a").then(key_opt("x")).then(key("y"));
        assert!(lens.is_optional());
    }

    #[test]
    fn test_display_renders_the_composed_path() {
        let lens = key("a").then(key("name"));
        assert_eq!(lens.to_string(), "root -> a -> name");
    }

    #[test]
    fn test_rebased_path_substitutes_root_label() {
        let lens = key("a").then(key("name"));
        assert_eq!(lens.path().rebased("state"), "state -> a -> name");
    }

    #[test]
    fn test_custom_typed_lens_round_trip() {
        #[derive(Clone, Debug, PartialEq)]
        struct Config {
            retries: Option<u8>,
        }

        let retries = Lens::new(
            |config: &Config| Ok(config.retries),
            |config: Config, retries| Ok(Config { retries, ..config }),
            LensPath::new("config", "retries"),
        );

        let config = Config { retries: Some(2) };
        assert_eq!(retries.get(&config).unwrap(), Some(2));
        let updated = retries.set(config, Some(5)).unwrap();
        assert_eq!(updated.retries, Some(5));
    }
}
