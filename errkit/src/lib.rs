//! # errkit
//!
//! Structured errors that carry a message, the call site that produced them,
//! key/value details and an optional cause, and that render as a JSON tree
//! mirroring the causal chain.
//!
//! ## Design Philosophy
//!
//! - **Error**: a message plus [`Location`], [`ErrorDetails`] and a cause
//! - **Sentinel**: a comparable, message-only identity for well-known errors
//! - **ErrorList**: independent errors folded into one value, no causality implied
//! - **Matching**: [`is`], [`find`] and [`unwrap`] walk `source()` chains, so
//!   foreign errors take part transparently
//!
//! ## Usage
//!
//! ```rust
//! use errkit::Sentinel;
//!
//! static NOT_FOUND: Sentinel = Sentinel::new("resource not found");
//!
//! fn load(id: u32) -> errkit::Result<()> {
//!     let io = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
//!     Err(errkit::with_cause!(NOT_FOUND.clone(), io, "id", id))
//! }
//!
//! let err = load(7).unwrap_err();
//! assert!(err.is(&NOT_FOUND));
//! assert_eq!(err.message(), "resource not found");
//! assert!(err.to_string().starts_with(r#"{"message":"resource not found","#));
//! ```
//!
//! ## Principles
//!
//! - Constructors never fail; malformed details degrade into synthetic keys
//! - Composition returns new values, nothing is mutated in place
//! - Causes are kept as-is so `source()`, [`is`] and [`find`] still see them
//! - Stringifying an error never fails: JSON first, plain text as fallback

mod caller;
mod chain;
mod details;
mod error;
pub mod json;
mod list;
mod macros;
mod sentinel;

pub use caller::Location;
pub use chain::{chain, find, is, unwrap, Chain};
pub use details::{normalize, to_value, DetailArg, ErrorDetails, BAD_KEY, NO_VALUE};
pub use error::{BoxError, Error};
pub use json::{JsonCause, JsonError, JsonErrorList};
pub use list::{append, ErrorList};
pub use sentinel::Sentinel;

pub use serde_json::Value;

#[doc(hidden)]
pub mod __private {
    pub use crate::details::kind::{ExactKind, KeyKind, Tagged, ValueKind};
}

/// Result type alias using errkit Error
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Create an error with the given message and details.
///
/// The location is the caller of this function; the function name is left
/// empty. Use [`new!`] to capture it as well.
#[track_caller]
pub fn new<D>(message: impl Into<String>, details: D) -> Error
where
    D: IntoIterator,
    D::Item: Into<DetailArg>,
{
    Error::new(message).with_details(details)
}

/// Create an error with the given message that has `err` as its cause.
///
/// Records file and line of the caller but no function name; [`wrap!`]
/// records all three.
#[track_caller]
pub fn wrap<E, D>(err: E, message: impl Into<String>, details: D) -> Error
where
    E: Into<BoxError>,
    D: IntoIterator,
    D::Item: Into<DetailArg>,
{
    Error::wrap(err, message).with_details(details)
}

/// Like [`wrap`], but the cause keeps its own serde representation on the wire.
///
/// Records file and line of the caller but no function name.
#[track_caller]
pub fn wrap_serializable<E, D>(err: E, message: impl Into<String>, details: D) -> Error
where
    E: std::error::Error + serde::Serialize + Send + Sync + 'static,
    D: IntoIterator,
    D::Item: Into<DetailArg>,
{
    Error::wrap_serializable(err, message).with_details(details)
}

/// Bind an existing error to the current call site.
///
/// Returns `None` when `err` is `None`. Records file and line of the caller
/// but no function name; [`with_stack!`] records all three.
///
/// ```rust
/// use errkit::Sentinel;
///
/// static TIMEOUT: Sentinel = Sentinel::new("timed out");
///
/// let err = errkit::with_stack(Some(TIMEOUT.clone()), errkit::details!["attempt", 3]).unwrap();
/// assert_eq!(err.message(), "timed out");
/// assert!(err.is(&TIMEOUT));
///
/// assert!(errkit::with_stack(None::<Sentinel>, errkit::details![]).is_none());
/// ```
#[track_caller]
pub fn with_stack<E, D>(err: Option<E>, details: D) -> Option<Error>
where
    E: Into<BoxError>,
    D: IntoIterator,
    D::Item: Into<DetailArg>,
{
    match err {
        Some(err) => Some(Error::with_stack(err).with_details(details)),
        None => None,
    }
}

/// Report the well-known condition `base`, explaining it with `cause`.
///
/// Returns `None` when `base` is `None`. The result matches both `base` and
/// `cause` through [`is`]. Records file and line of the caller but no function
/// name; [`with_cause!`] records all three.
#[track_caller]
pub fn with_cause<B, C, D>(base: Option<B>, cause: C, details: D) -> Option<Error>
where
    B: Into<BoxError>,
    C: Into<BoxError>,
    D: IntoIterator,
    D::Item: Into<DetailArg>,
{
    match base {
        Some(base) => Some(Error::with_cause(base, cause).with_details(details)),
        None => None,
    }
}
