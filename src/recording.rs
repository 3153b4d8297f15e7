//! Recordings: deferred, replayable units of mutation.
//!
//! A [`Recording`] packages a lens together with either a literal
//! replacement value or a transform function, as a value that can be
//! applied later, possibly to a larger structure than it was built for.
//! Everything a recording needs is held explicitly (the lens, the payload,
//! the named auxiliary getters), so [`Recording::prepend`] can mechanically
//! rebuild it under a new outer lens without touching the original.
//!
//! Applying a recording is a pure function of the supplied root. The value
//! actually written is returned alongside the new root by
//! [`Recording::apply_captured`], so callers can inspect it without
//! re-deriving. There is no mutable state anywhere in the model, and
//! recordings are freely shareable across threads.
//!
//! # Examples
//!
//! ```
//! use focal::{key, Value};
//!
//! let state = Value::from_entries([("count", 1)]);
//!
//! let recording = key("count").record(Value::Int(5)).named("reset count");
//! assert_eq!(recording.description(), "root -> count = 5");
//!
//! let applied = recording.apply(state).unwrap();
//! assert_eq!(applied.key("count"), Some(&Value::Int(5)));
//! ```

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::failure::LensFailure;
use crate::lens::Lens;
use crate::value::{Absence, Value};

/// Apply-time outputs of a recording's auxiliary getters, keyed by name in
/// insertion order.
pub type GetterValues = IndexMap<String, Value>;

type TransformFn<A> = dyn Fn(A, &GetterValues) -> A + Send + Sync;

/// Whether a recording replaces with a literal or applies a transform.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecordingKind {
    /// Replace the focused value with a recorded literal.
    Set,
    /// Replace the focused value with `transform(current, getter_values)`.
    Modify,
}

/// The result of [`Recording::apply_captured`]: the new root plus the value
/// that was written, if any.
///
/// `written` is always present for set recordings; for modify recordings it
/// is present exactly when the transform ran (an optional short-circuit
/// leaves it `None`).
#[derive(Clone, Debug)]
pub struct Applied<S, A> {
    /// The root after the recorded mutation.
    pub root: S,
    /// The value written into the focused slot, when one was written.
    pub written: Option<A>,
}

enum Payload<S, A> {
    Set(A),
    Modify {
        transform: Arc<TransformFn<A>>,
        getters: IndexMap<String, Lens<S, Value>>,
    },
}

impl<S, A: Clone> Clone for Payload<S, A> {
    fn clone(&self) -> Self {
        match self {
            Self::Set(value) => Self::Set(value.clone()),
            Self::Modify { transform, getters } => Self::Modify {
                transform: Arc::clone(transform),
                getters: getters.clone(),
            },
        }
    }
}

/// A deferred, named, replayable unit of mutation bound to a lens.
///
/// Built with [`Lens::record`], [`Lens::record_modify`], or
/// [`Lens::record_modify_with`]; immutable once built.
pub struct Recording<S, A> {
    lens: Lens<S, A>,
    payload: Payload<S, A>,
    name: Option<String>,
    description: String,
}

impl<S, A> Lens<S, A> {
    /// Records replacing this lens's view with a literal value.
    ///
    /// The description renders as `<path> = <value>`.
    pub fn record(&self, value: A) -> Recording<S, A>
    where
        A: Clone + fmt::Debug,
    {
        Recording {
            description: format!("{} = {:?}", self.path(), value),
            lens: self.clone(),
            payload: Payload::Set(value),
            name: None,
        }
    }

    /// Records transforming this lens's view with a function.
    ///
    /// The transform receives the current value and the (empty, here)
    /// auxiliary getter outputs. The description renders as
    /// ``<path> = `modify` ``.
    pub fn record_modify<F>(&self, transform: F) -> Recording<S, A>
    where
        F: Fn(A, &GetterValues) -> A + Send + Sync + 'static,
    {
        Recording {
            description: format!("{} = `modify`", self.path()),
            lens: self.clone(),
            payload: Payload::Modify {
                transform: Arc::new(transform),
                getters: IndexMap::new(),
            },
            name: None,
        }
    }

    /// Records a transform that also reads named auxiliary values.
    ///
    /// Each auxiliary lens is evaluated against the root at apply time; the
    /// outputs are handed to the transform as a name-to-value mapping in the
    /// order given here.
    ///
    /// # Examples
    ///
    /// ```
    /// use focal::{key, Value};
    ///
    /// let state = Value::from_entries([("price", 10), ("qty", 3)]);
    /// let recording = key("price").record_modify_with(
    ///     [("qty", key("qty"))],
    ///     |price, aux| match (price, aux.get("qty")) {
    ///         (Value::Int(p), Some(Value::Int(q))) => Value::Int(p * q),
    ///         (price, _) => price,
    ///     },
    /// );
    /// let applied = recording.apply(state).unwrap();
    /// assert_eq!(applied.key("price"), Some(&Value::Int(30)));
    /// ```
    pub fn record_modify_with<K, G, F>(&self, getters: G, transform: F) -> Recording<S, A>
    where
        K: Into<String>,
        G: IntoIterator<Item = (K, Lens<S, Value>)>,
        F: Fn(A, &GetterValues) -> A + Send + Sync + 'static,
    {
        Recording {
            description: format!("{} = `modify`", self.path()),
            lens: self.clone(),
            payload: Payload::Modify {
                transform: Arc::new(transform),
                getters: getters
                    .into_iter()
                    .map(|(name, lens)| (name.into(), lens))
                    .collect(),
            },
            name: None,
        }
    }
}

impl<S, A> Recording<S, A> {
    /// Attaches a display name, shown as a header line by [`Recording::log`].
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// The precomputed human-readable description of the mutation.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// The display name, if one was attached.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Whether this is a set or a modify recording.
    #[must_use]
    pub const fn kind(&self) -> RecordingKind {
        match self.payload {
            Payload::Set(_) => RecordingKind::Set,
            Payload::Modify { .. } => RecordingKind::Modify,
        }
    }

    /// The lens this recording is built on.
    #[must_use]
    pub const fn lens(&self) -> &Lens<S, A> {
        &self.lens
    }

    /// The named auxiliary getters, in insertion order. Empty for set
    /// recordings.
    pub fn getter_lenses(&self) -> impl Iterator<Item = (&str, &Lens<S, Value>)> {
        let getters = match &self.payload {
            Payload::Modify { getters, .. } => Some(getters),
            Payload::Set(_) => None,
        };
        getters
            .into_iter()
            .flat_map(IndexMap::iter)
            .map(|(name, lens)| (name.as_str(), lens))
    }

    /// Replays the recorded mutation against `root`.
    pub fn apply(&self, root: S) -> Result<S, LensFailure>
    where
        A: Absence + Clone + fmt::Debug,
    {
        Ok(self.apply_captured(root)?.root)
    }

    /// Replays the recorded mutation and reports the value written.
    ///
    /// For a set recording the written value is the recorded literal. For a
    /// modify recording the auxiliary getters are evaluated against `root`
    /// first, then the transform runs through the lens's `modify`. An
    /// optional lens over an absent value therefore short-circuits: the root
    /// comes back untouched and `written` is `None`.
    pub fn apply_captured(&self, root: S) -> Result<Applied<S, A>, LensFailure>
    where
        A: Absence + Clone + fmt::Debug,
    {
        match &self.payload {
            Payload::Set(value) => {
                let root = self.lens.set(root, value.clone())?;
                Ok(Applied {
                    root,
                    written: Some(value.clone()),
                })
            }
            Payload::Modify { transform, getters } => {
                let mut outputs = GetterValues::new();
                for (name, getter) in getters {
                    outputs.insert(name.clone(), getter.get(&root)?);
                }
                let mut written = None;
                let root = self.lens.modify(root, |current| {
                    let next = transform.as_ref()(current, &outputs);
                    written = Some(next.clone());
                    next
                })?;
                Ok(Applied { root, written })
            }
        }
    }

    /// Re-roots this recording under `outer`, producing a new recording
    /// scoped to the larger structure.
    ///
    /// The recorded lens becomes `outer.then(lens)` and every auxiliary
    /// getter is recomposed the same way; kind, payload, and name are
    /// carried over. The original recording is untouched.
    ///
    /// # Examples
    ///
    /// ```
    /// use focal::{key, Value};
    ///
    /// let recording = key("name").record(Value::from("updated"));
    /// let rerooted = recording.prepend(&key("state"));
    /// assert_eq!(rerooted.description(), "root -> state -> name = \"updated\"");
    ///
    /// let root = Value::from_entries([(
    ///     "state",
    ///     Value::from_entries([("name", "hello")]),
    /// )]);
    /// let applied = rerooted.apply(root).unwrap();
    /// assert_eq!(
    ///     applied.key("state").unwrap().key("name"),
    ///     Some(&Value::from("updated"))
    /// );
    /// ```
    pub fn prepend<S2>(&self, outer: &Lens<S2, S>) -> Recording<S2, A>
    where
        S2: 'static,
        S: Absence + Clone + fmt::Debug + 'static,
        A: Absence + Clone + fmt::Debug + 'static,
    {
        let composed = outer.clone().then(self.lens.clone());
        let rebuilt = match &self.payload {
            Payload::Set(value) => composed.record(value.clone()),
            Payload::Modify { transform, getters } => {
                let recomposed: IndexMap<String, Lens<S2, Value>> = getters
                    .iter()
                    .map(|(name, getter)| (name.clone(), outer.clone().then(getter.clone())))
                    .collect();
                Recording {
                    description: format!("{} = `modify`", composed.path()),
                    lens: composed,
                    payload: Payload::Modify {
                        transform: Arc::clone(transform),
                        getters: recomposed,
                    },
                    name: None,
                }
            }
        };
        match &self.name {
            Some(name) => rebuilt.named(name.clone()),
            None => rebuilt,
        }
    }

    /// The diagnostic lines [`Recording::log`] emits, with the path's root
    /// label replaced by `root_label`.
    ///
    /// Modify recordings lead with one `getter: <path>` line per auxiliary
    /// getter; a `<name>:` header follows if the recording is named; the
    /// final line is `` <path> = <value-or-`modify`> ``.
    pub fn log_lines(&self, root_label: &str) -> Vec<String>
    where
        A: fmt::Debug,
    {
        let mut lines = Vec::new();
        if let Payload::Modify { getters, .. } = &self.payload {
            for getter in getters.values() {
                lines.push(format!("getter: {}", getter.path().rebased(root_label)));
            }
        }
        if let Some(name) = &self.name {
            lines.push(format!("{name}:"));
        }
        let rendered = match &self.payload {
            Payload::Set(value) => format!("{value:?}"),
            Payload::Modify { .. } => "`modify`".to_string(),
        };
        lines.push(format!(
            "{} = {}",
            self.lens.path().rebased(root_label),
            rendered
        ));
        lines
    }

    /// Emits [`Recording::log_lines`] through `tracing` at info level under
    /// the `focal::recording` target.
    pub fn log(&self, root_label: &str)
    where
        A: fmt::Debug,
    {
        for line in self.log_lines(root_label) {
            tracing::info!(target: "focal::recording", "{line}");
        }
    }
}

impl<S, A: Clone> Clone for Recording<S, A> {
    fn clone(&self) -> Self {
        Self {
            lens: self.lens.clone(),
            payload: self.payload.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
        }
    }
}

impl<S, A> fmt::Display for Recording<S, A> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.description)
    }
}

impl<S, A> fmt::Debug for Recording<S, A> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Recording")
            .field("description", &self.description)
            .field("kind", &self.kind())
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

static_assertions::assert_impl_all!(Recording<Value, Value>: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::standard_lenses::key;

    fn state() -> Value {
        Value::from_entries([("count", 1), ("limit", 10)])
    }

    #[test]
    fn test_set_recording_description() {
        let recording = key("count").record(Value::Int(5));
        assert_eq!(recording.description(), "root -> count = 5");
        assert_eq!(recording.kind(), RecordingKind::Set);
        assert_eq!(recording.to_string(), recording.description());
    }

    #[test]
    fn test_modify_recording_description_uses_marker() {
        let recording = key("count").record_modify(|value, _| value);
        assert_eq!(recording.description(), "root -> count = `modify`");
        assert_eq!(recording.kind(), RecordingKind::Modify);
    }

    #[test]
    fn test_apply_set_matches_lens_set() {
        let recording = key("count").record(Value::Int(5));
        let applied = recording.apply_captured(state()).unwrap();
        assert_eq!(applied.root, key("count").set(state(), Value::Int(5)).unwrap());
        assert_eq!(applied.written, Some(Value::Int(5)));
    }

    #[test]
    fn test_apply_modify_sees_auxiliary_values() {
        let recording = key("count").record_modify_with(
            [("limit", key("limit"))],
            |current, aux| match (current, aux.get("limit")) {
                (Value::Int(count), Some(Value::Int(limit))) => Value::Int((count + 9).min(*limit)),
                (current, _) => current,
            },
        );
        let applied = recording.apply_captured(state()).unwrap();
        assert_eq!(applied.root.key("count"), Some(&Value::Int(10)));
        assert_eq!(applied.written, Some(Value::Int(10)));
    }

    #[test]
    fn test_named_header_and_getter_lines() {
        let recording = key("count")
            .record_modify_with([("limit", key("limit"))], |value, _| value)
            .named("clamp");
        assert_eq!(
            recording.log_lines("state"),
            vec![
                "getter: state -> limit".to_string(),
                "clamp:".to_string(),
                "state -> count = `modify`".to_string(),
            ]
        );
    }

    #[test]
    fn test_getter_lenses_are_introspectable() {
        let recording =
            key("count").record_modify_with([("limit", key("limit"))], |value, _| value);
        let names: Vec<&str> = recording.getter_lenses().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["limit"]);
        assert_eq!(key("count").record(Value::Null).getter_lenses().count(), 0);
    }
}
