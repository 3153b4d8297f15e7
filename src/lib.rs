//! # focal
//!
//! Composable, immutable lenses over structural data, with recordable and
//! replayable mutations.
//!
//! A lens is a reusable accessor into a deeply nested immutable value: a
//! paired getter and setter with a diagnostic path. Lenses compose with
//! [`Lens::then`] into views of arbitrary depth; reading never touches the
//! root, and writing returns a new root that shares everything it did not
//! change. On top of the primitive sit:
//!
//! - **Stock factories** over the dynamic [`Value`] model: [`key`] property
//!   access (with optional and fallback flavors), [`at`] index access,
//!   [`find`] first-match search, and [`find_by`] key/value search with a
//!   scan direction.
//! - **Optional chains**: a lens built through [`key_opt`] short-circuits
//!   instead of failing when the value is absent: writes return the root
//!   untouched, detectable by allocation identity.
//! - **Recordings**: a mutation captured as a value ([`Lens::record`],
//!   [`Lens::record_modify`]) that can be described, logged, re-rooted under
//!   a larger structure ([`Recording::prepend`]), and applied later.
//!
//! ## Example
//!
//! ```
//! use focal::{key, key_opt, Value};
//!
//! let state = Value::from_entries([
//!     ("profile", Value::from_entries([("name", "ada")])),
//!     ("theme", Value::from("dark")),
//! ]);
//!
//! // Compose, read, and write without nested-copy boilerplate.
//! let name = key("profile").then(key("name"));
//! let renamed = name.set(state.clone(), Value::from("grace")).unwrap();
//! assert_eq!(renamed.key("profile").unwrap().key("name"), Some(&Value::from("grace")));
//!
//! // Capture the same write as a replayable recording.
//! let recording = name.record(Value::from("grace"));
//! assert_eq!(recording.description(), r#"root -> profile -> name = "grace""#);
//! assert_eq!(recording.apply(state.clone()).unwrap(), renamed);
//!
//! // Optional hops make missing structure a no-op instead of an error.
//! let nickname = key_opt("nickname").then(key("short"));
//! let untouched = nickname.set(state.clone(), Value::from("g")).unwrap();
//! assert!(untouched.ptr_eq(&state));
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: untagged (JSON-shaped) serialization for [`Value`].

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

mod failure;
mod lens;
mod recording;
mod standard_lenses;
mod value;

pub use failure::DynError;
pub use failure::LensFailure;
pub use failure::LensOp;

pub use lens::BoundLens;
pub use lens::Lens;
pub use lens::LensPath;

pub use recording::Applied;
pub use recording::GetterValues;
pub use recording::Recording;
pub use recording::RecordingKind;

pub use standard_lenses::Direction;
pub use standard_lenses::at;
pub use standard_lenses::find;
pub use standard_lenses::find_by;
pub use standard_lenses::identity;
pub use standard_lenses::key;
pub use standard_lenses::key_opt;
pub use standard_lenses::key_or;

pub use value::Absence;
pub use value::Value;
