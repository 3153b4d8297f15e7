//! Typed failures raised by lens operations.
//!
//! A [`LensFailure`] decorates the lowest-level cause with the path of the
//! lens that was executing and the operation that failed. When lenses are
//! stacked by composition, each layer re-wraps with its own path but keeps
//! the *innermost* cause verbatim, so the cause never grows into a chain of
//! wrappers no matter how deep the composition is.
//!
//! Absence is not a failure: a missing field or a match-free search is a
//! normal result. Failures come from genuinely exceptional conditions:
//! user-supplied getter or setter logic reporting an error, or an access
//! that the data shape cannot support (reading a key *of* an absent value).

use std::error::Error;
use std::fmt;
use std::sync::Arc;

use crate::lens::LensPath;

/// Boxed error type accepted from raw getter and setter closures.
pub type DynError = Box<dyn Error + Send + Sync + 'static>;

/// Which lens operation failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LensOp {
    /// The read direction.
    Get,
    /// The write direction.
    Set,
}

impl fmt::Display for LensOp {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Get => formatter.write_str("get"),
            Self::Set => formatter.write_str("set"),
        }
    }
}

/// A failed lens operation: path context, direction, and the root cause.
///
/// The failure is cheap to clone (the cause is shared) and carries, for set
/// failures, a rendering of the value that was being written.
///
/// # Examples
///
/// ```
/// use focal::{key, Value};
///
/// let lens = key("a").then(key("b"));
/// // Reading "b" of null is an exceptional access, not an absence.
/// let failure = lens.get(&Value::from_entries([("x", 1)])).unwrap_err();
/// assert_eq!(failure.op(), focal::LensOp::Get);
/// assert!(failure.to_string().contains("root -> a -> b"));
/// ```
#[derive(Clone)]
pub struct LensFailure {
    message: String,
    path: LensPath,
    op: LensOp,
    cause: Arc<dyn Error + Send + Sync + 'static>,
    written: Option<String>,
}

impl LensFailure {
    pub(crate) fn getting(path: &LensPath, error: DynError) -> Self {
        let cause = Self::innermost(error);
        Self {
            message: format!("error getting {path} ({cause})"),
            path: path.clone(),
            op: LensOp::Get,
            cause,
            written: None,
        }
    }

    pub(crate) fn setting(path: &LensPath, written: String, error: DynError) -> Self {
        let cause = Self::innermost(error);
        Self {
            message: format!("error setting {path} = {written} ({cause})"),
            path: path.clone(),
            op: LensOp::Set,
            cause,
            written: Some(written),
        }
    }

    // A failure bubbling out of a composed hop is already wrapped; reuse its
    // cause instead of stacking wrappers.
    fn innermost(error: DynError) -> Arc<dyn Error + Send + Sync + 'static> {
        match error.downcast::<Self>() {
            Ok(wrapped) => wrapped.cause,
            Err(other) => Arc::from(other),
        }
    }

    /// The path of the lens whose operation failed.
    #[must_use]
    pub const fn path(&self) -> &LensPath {
        &self.path
    }

    /// Whether the get or the set direction failed.
    #[must_use]
    pub const fn op(&self) -> LensOp {
        self.op
    }

    /// The innermost cause, unwrapped through any composed layers.
    #[must_use]
    pub fn cause(&self) -> &(dyn Error + Send + Sync + 'static) {
        &*self.cause
    }

    /// For set failures, a rendering of the value that was being written.
    #[must_use]
    pub fn written(&self) -> Option<&str> {
        self.written.as_deref()
    }
}

impl fmt::Display for LensFailure {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.message)
    }
}

impl fmt::Debug for LensFailure {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("LensFailure")
            .field("message", &self.message)
            .field("op", &self.op)
            .field("written", &self.written)
            .finish_non_exhaustive()
    }
}

impl Error for LensFailure {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        let cause: &(dyn Error + 'static) = &*self.cause;
        Some(cause)
    }
}

static_assertions::assert_impl_all!(LensFailure: Clone, Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(message: &str) -> DynError {
        message.to_string().into()
    }

    #[test]
    fn test_get_failure_message_names_path_and_cause() {
        let path = LensPath::new("root", "field");
        let failure = LensFailure::getting(&path, plain("boom"));
        assert_eq!(failure.to_string(), "error getting root -> field (boom)");
        assert_eq!(failure.op(), LensOp::Get);
        assert!(failure.written().is_none());
    }

    #[test]
    fn test_set_failure_carries_written_value() {
        let path = LensPath::new("root", "field");
        let failure = LensFailure::setting(&path, "42".to_string(), plain("boom"));
        assert_eq!(
            failure.to_string(),
            "error setting root -> field = 42 (boom)"
        );
        assert_eq!(failure.written(), Some("42"));
        assert_eq!(failure.op(), LensOp::Set);
    }

    #[test]
    fn test_rewrapping_keeps_innermost_cause() {
        let inner_path = LensPath::new("root", "inner");
        let inner = LensFailure::getting(&inner_path, plain("original"));

        let outer_path = LensPath::new("root", "outer");
        let outer = LensFailure::getting(&outer_path, Box::new(inner));

        assert_eq!(outer.cause().to_string(), "original");
        assert_eq!(outer.to_string(), "error getting root -> outer (original)");
    }

    #[test]
    fn test_error_source_is_the_cause() {
        let failure = LensFailure::getting(&LensPath::new("root", "x"), plain("why"));
        let source = failure.source().expect("cause");
        assert_eq!(source.to_string(), "why");
    }
}
