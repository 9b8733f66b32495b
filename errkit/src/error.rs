//! The main Error type for errkit

use crate::{normalize, to_value, DetailArg, ErrorDetails, Location, Value};
use serde::Serialize;
use std::error::Error as StdError;
use std::fmt;

/// Owned, thread-safe, type-erased error. Causes and list members are stored
/// in this form.
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Serializes a cause through its own `Serialize` impl. Returns `None` when
/// the cause is not of the type the hook was instantiated for.
pub(crate) type MarshalFn = fn(&(dyn StdError + 'static)) -> Option<serde_json::Result<Value>>;

fn marshal_as<E>(err: &(dyn StdError + 'static)) -> Option<serde_json::Result<Value>>
where
    E: StdError + Serialize + 'static,
{
    err.downcast_ref::<E>().map(serde_json::to_value)
}

pub(crate) struct Cause {
    pub(crate) error: BoxError,
    pub(crate) marshal: Option<MarshalFn>,
}

/// A structured error.
///
/// This error type provides:
/// - `message`: Human-readable description, excluding the cause
/// - `location`: Where the error was created
/// - `details`: Key-value pairs for debugging
/// - `cause`: The underlying error (if any)
///
/// Its `Display` form is a compact JSON object; `{:#}` gives plain text.
///
/// The `Error::*` constructors record file and line of their caller only. The
/// function name is filled in by the construction macros ([`new!`](crate::new!),
/// [`wrap!`](crate::wrap!), ...) or by `.at(errkit::here!())`.
///
/// # Example
///
/// ```rust
/// use errkit::Error;
///
/// let io = std::io::Error::new(std::io::ErrorKind::Other, "disk full");
/// let err = Error::wrap(io, "failed to persist checkpoint")
///     .with_detail("path", "/var/lib/app/ckpt")
///     .with_detail("bytes", 4096);
///
/// assert_eq!(err.message(), "failed to persist checkpoint");
/// assert_eq!(errkit::unwrap(&err).unwrap().to_string(), "disk full");
/// ```
pub struct Error {
    message: String,
    base: Option<BoxError>,
    location: Option<Location>,
    details: ErrorDetails,
    cause: Option<Cause>,
}

impl Error {
    /// Create an error with the given message at the caller's location.
    /// No function name is recorded, see [`new!`](crate::new!).
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            base: None,
            location: Some(Location::caller()),
            details: ErrorDetails::new(),
            cause: None,
        }
    }

    /// Create an error with the given message and `err` as its cause
    #[track_caller]
    pub fn wrap(err: impl Into<BoxError>, message: impl Into<String>) -> Self {
        Self::new(message).caused_by(err.into(), None)
    }

    /// Like [`Error::wrap`], but the JSON form of the cause comes from its own
    /// `Serialize` impl instead of `{"message": <text>}`.
    #[track_caller]
    pub fn wrap_serializable<E>(err: E, message: impl Into<String>) -> Self
    where
        E: StdError + Serialize + Send + Sync + 'static,
    {
        Self::new(message).caused_by(Box::new(err), Some(marshal_as::<E>))
    }

    /// Bind `err` to the caller's location.
    ///
    /// The new error takes over the message text of `err` and keeps `err` as
    /// its cause. When `err` is itself an [`Error`], only its message is
    /// reused, never its JSON form.
    #[track_caller]
    pub fn with_stack(err: impl Into<BoxError>) -> Self {
        let err = err.into();
        Self::new(message_of(&*err)).caused_by(err, None)
    }

    /// Report the well-known condition `base` with `cause` as the reason.
    ///
    /// The message is the text of `base`. The result still matches `base`
    /// through [`is`](crate::is), while [`unwrap`](crate::unwrap) yields
    /// `cause`.
    #[track_caller]
    pub fn with_cause(base: impl Into<BoxError>, cause: impl Into<BoxError>) -> Self {
        let base = base.into();
        let mut err = Self::new(message_of(&*base)).caused_by(cause.into(), None);
        err.base = Some(base);
        err
    }

    fn caused_by(mut self, error: BoxError, marshal: Option<MarshalFn>) -> Self {
        self.cause = Some(Cause { error, marshal });
        self
    }

    // =========================================================================
    // Getters
    // =========================================================================

    /// Get the error message, without any cause text
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the location this error was created at
    pub fn location(&self) -> Option<&Location> {
        self.location.as_ref()
    }

    /// Function the error originated from, empty if unknown
    pub fn function(&self) -> &str {
        self.location.as_ref().map_or("", Location::function)
    }

    /// Source file the error originated from, empty if unknown
    pub fn file(&self) -> &str {
        self.location.as_ref().map_or("", Location::file)
    }

    /// Line the error originated from, `0` if unknown
    pub fn line_number(&self) -> u32 {
        self.location.as_ref().map_or(0, Location::line)
    }

    /// Get the details
    pub fn details(&self) -> &ErrorDetails {
        &self.details
    }

    /// The well-known error passed to [`Error::with_cause`], if any
    pub fn base(&self) -> Option<&(dyn StdError + 'static)> {
        self.base.as_ref().map(|e| e.as_ref() as &(dyn StdError + 'static))
    }

    /// Get the cause (if any)
    pub fn cause(&self) -> Option<&(dyn StdError + 'static)> {
        self.cause
            .as_ref()
            .map(|c| c.error.as_ref() as &(dyn StdError + 'static))
    }

    /// Take the cause out of this error
    pub fn into_cause(self) -> Option<BoxError> {
        self.cause.map(|c| c.error)
    }

    pub(crate) fn cause_parts(&self) -> Option<&Cause> {
        self.cause.as_ref()
    }

    /// Whether this error or anything in its chain equals `target`
    pub fn is<T>(&self, target: &T) -> bool
    where
        T: StdError + PartialEq + 'static,
    {
        crate::is(self, target)
    }

    /// First error of type `T` in this error's chain
    pub fn find<T>(&self) -> Option<&T>
    where
        T: StdError + 'static,
    {
        crate::find(self)
    }

    // =========================================================================
    // Builders (chainable)
    // =========================================================================

    /// Add details from a positional argument list, see [`normalize`].
    ///
    /// Keys already present are overwritten.
    pub fn with_details<I>(self, args: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<DetailArg>,
    {
        self.merge_details(normalize(args))
    }

    /// Add a single detail
    pub fn with_detail(self, key: impl Into<String>, value: impl Serialize) -> Self {
        self.merge_details(ErrorDetails::new().with(key, to_value(&value)))
    }

    /// Rebind the error to `location`
    pub fn at(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    fn merge_details(mut self, details: ErrorDetails) -> Self {
        if !details.is_empty() {
            self.details = std::mem::take(&mut self.details).merge(details);
        }
        self
    }

    // =========================================================================
    // Plain-text rendering
    // =========================================================================

    fn write_plain(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)?;
        if let Some(location) = &self.location {
            write!(f, " at {}", location)?;
        }
        if !self.details.is_empty() {
            write!(f, " {}", self.details)?;
        }
        if let Some(cause) = self.cause() {
            match cause.downcast_ref::<Error>() {
                Some(cause) => write!(f, ": {:#}", cause)?,
                None => write!(f, ": {}", cause)?,
            }
        }
        Ok(())
    }
}

/// Message text of an error; an [`Error`] contributes its message only.
fn message_of(err: &(dyn StdError + 'static)) -> String {
    match err.downcast_ref::<Error>() {
        Some(err) => err.message.clone(),
        None => err.to_string(),
    }
}

// =============================================================================
// Display - compact JSON, plain text with `{:#}` or when encoding fails
// =============================================================================

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            return self.write_plain(f);
        }

        match serde_json::to_string(self) {
            Ok(json) => f.write_str(&json),
            Err(err) => {
                tracing::debug!(error = %err, "JSON encoding failed, rendering error as plain text");
                self.write_plain(f)
            }
        }
    }
}

// =============================================================================
// Debug - verbose, multi-line format for debugging
// =============================================================================

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.message)?;

        if let Some(location) = &self.location {
            writeln!(f, "    at {}", location)?;
        }

        if !self.details.is_empty() {
            writeln!(f)?;
            writeln!(f, "    Details:")?;
            for (key, value) in &self.details {
                writeln!(f, "        {}: {}", key, value)?;
            }
        }

        if let Some(cause) = &self.cause {
            writeln!(f)?;
            writeln!(f, "    Caused by: {:?}", cause.error)?;
        }

        Ok(())
    }
}

// =============================================================================
// std::error::Error implementation
// =============================================================================

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.cause()
    }
}
