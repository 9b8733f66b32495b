//! Well-known error identities

use std::borrow::Cow;
use thiserror::Error;

/// A message-only error used as a stable identity for matching.
///
/// Sentinels carry no location, details or cause. Two sentinels are equal when
/// their messages are equal, which is what [`is`](crate::is) compares.
///
/// ```rust
/// use errkit::Sentinel;
///
/// static CONFLICT: Sentinel = Sentinel::new("version conflict");
///
/// let err = errkit::with_stack!(CONFLICT.clone(), "expected", 3, "actual", 5);
/// assert!(err.is(&CONFLICT));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
#[error("{message}")]
pub struct Sentinel {
    message: Cow<'static, str>,
}

impl Sentinel {
    pub const fn new(message: &'static str) -> Self {
        Self {
            message: Cow::Borrowed(message),
        }
    }

    /// Create a sentinel from a runtime string
    pub fn owned(message: impl Into<String>) -> Self {
        Self {
            message: Cow::Owned(message.into()),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static PREDEFINED: Sentinel = Sentinel::new("TEST_ERR: Sample of sentinel error");

    #[test]
    fn test_sentinel_text() {
        assert_eq!(PREDEFINED.to_string(), "TEST_ERR: Sample of sentinel error");
        assert_eq!(PREDEFINED.message(), "TEST_ERR: Sample of sentinel error");
    }

    #[test]
    fn test_sentinel_equality() {
        assert_eq!(
            PREDEFINED.clone(),
            Sentinel::owned("TEST_ERR: Sample of sentinel error")
        );
        assert_ne!(PREDEFINED.clone(), Sentinel::new("something else"));
    }
}
