//! Matching protocol over causal chains
//!
//! These functions walk `std::error::Error::source` links, so they work on any
//! error, not only on errkit values. Two errkit types get special treatment:
//! an [`Error`] created by [`Error::with_cause`] also matches its base error,
//! and an [`ErrorList`] matches if any of its members does.

use crate::{Error, ErrorList};
use std::error::Error as StdError;
use std::iter::FusedIterator;

/// Iterator over an error and its causes, outermost first
#[derive(Clone)]
pub struct Chain<'a> {
    next: Option<&'a (dyn StdError + 'static)>,
}

impl<'a> Iterator for Chain<'a> {
    type Item = &'a (dyn StdError + 'static);

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.source();
        Some(current)
    }
}

impl FusedIterator for Chain<'_> {}

/// Iterate over `err` and every error reachable through `source()`.
pub fn chain<'a>(err: &'a (dyn StdError + 'static)) -> Chain<'a> {
    Chain { next: Some(err) }
}

/// Single-level unwrap: the direct cause of `err`.
///
/// Always `None` for an [`ErrorList`]; its members are siblings, not causes.
pub fn unwrap<'a>(err: &'a (dyn StdError + 'static)) -> Option<&'a (dyn StdError + 'static)> {
    err.source()
}

/// Whether `err` or anything in its causal chain equals `target`.
///
/// ```rust
/// use errkit::{Error, Sentinel};
///
/// static NOT_FOUND: Sentinel = Sentinel::new("not found");
///
/// let err = Error::wrap(Error::with_stack(NOT_FOUND.clone()), "lookup failed");
/// assert!(errkit::is(&err, &NOT_FOUND));
/// assert!(!errkit::is(&err, &Sentinel::new("other")));
/// ```
pub fn is<T>(err: &(dyn StdError + 'static), target: &T) -> bool
where
    T: StdError + PartialEq + 'static,
{
    chain(err).any(|node| {
        if node.downcast_ref::<T>() == Some(target) {
            return true;
        }
        if let Some(err) = node.downcast_ref::<Error>() {
            if err.base().is_some_and(|base| is(base, target)) {
                return true;
            }
        }
        if let Some(list) = node.downcast_ref::<ErrorList>() {
            return list.iter().any(|member| is(member, target));
        }
        false
    })
}

/// First error of type `T` in the causal chain of `err`.
///
/// ```rust
/// use errkit::Error;
///
/// let io = std::io::Error::new(std::io::ErrorKind::TimedOut, "read timed out");
/// let err = Error::wrap(io, "sync failed");
///
/// let io = errkit::find::<std::io::Error>(&err).unwrap();
/// assert_eq!(io.kind(), std::io::ErrorKind::TimedOut);
/// ```
pub fn find<'a, T>(err: &'a (dyn StdError + 'static)) -> Option<&'a T>
where
    T: StdError + 'static,
{
    chain(err).find_map(|node| {
        if let Some(found) = node.downcast_ref::<T>() {
            return Some(found);
        }
        if let Some(base) = node.downcast_ref::<Error>().and_then(Error::base) {
            if let Some(found) = find::<T>(base) {
                return Some(found);
            }
        }
        node.downcast_ref::<ErrorList>()
            .and_then(|list| list.iter().find_map(find::<T>))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Sentinel;
    use std::fmt;

    static STD_LIKE: Sentinel = Sentinel::new("TEST_ERR: Sample of predefined std error");

    #[derive(Debug, Clone, PartialEq)]
    struct TestError {
        message: String,
    }

    impl TestError {
        fn new(message: &str) -> Self {
            Self {
                message: message.to_string(),
            }
        }
    }

    impl fmt::Display for TestError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "{}", self.message)
        }
    }

    impl StdError for TestError {}

    #[test]
    fn test_chain_order() {
        let err = Error::wrap(Error::wrap(STD_LIKE.clone(), "middle"), "outer");
        let texts: Vec<String> = chain(&err)
            .map(|e| match e.downcast_ref::<Error>() {
                Some(e) => e.message().to_string(),
                None => e.to_string(),
            })
            .collect();
        assert_eq!(texts, ["outer", "middle", STD_LIKE.message()]);
    }

    #[test]
    fn test_unwrap_terminal_is_none() {
        let err = Error::new("terminal");
        assert!(unwrap(&err).is_none());
    }

    #[test]
    fn test_is_through_foreign_and_errkit_layers() {
        let err = Error::wrap(TestError::new("custom"), "wrapped");
        assert!(is(&err, &TestError::new("custom")));
        assert!(!is(&err, &TestError::new("different")));
        assert!(!is(&err, &STD_LIKE));
    }

    #[test]
    fn test_is_matches_base_and_cause() {
        let err = Error::with_cause(STD_LIKE.clone(), TestError::new("why"));
        assert!(is(&err, &STD_LIKE));
        assert!(is(&err, &TestError::new("why")));
    }

    #[test]
    fn test_is_matches_nested_base() {
        let inner = Error::with_cause(STD_LIKE.clone(), TestError::new("why"));
        let err = Error::wrap(inner, "outer");
        assert!(is(&err, &STD_LIKE));
    }

    #[test]
    fn test_find_returns_first_of_type() {
        let err = Error::wrap(Error::wrap(TestError::new("deep"), "middle"), "outer");
        assert_eq!(find::<TestError>(&err), Some(&TestError::new("deep")));
        assert_eq!(find::<Error>(&err).unwrap().message(), "outer");
        assert!(find::<Sentinel>(&err).is_none());
    }

    fn root_cause(err: &Error) -> &(dyn StdError + 'static) {
        chain(err).last().unwrap_or(err)
    }

    fn first_custom(err: &Error) -> Option<&TestError> {
        find(err)
    }

    #[test]
    fn test_results_borrow_from_the_error() {
        let err = Error::wrap(Error::wrap(TestError::new("deep"), "middle"), "outer");
        assert_eq!(root_cause(&err).to_string(), "deep");
        assert_eq!(first_custom(&err), Some(&TestError::new("deep")));

        let direct = unwrap(&err).and_then(unwrap);
        assert_eq!(direct.unwrap().to_string(), "deep");
    }

    #[test]
    fn test_find_looks_into_base() {
        let err = Error::with_cause(STD_LIKE.clone(), TestError::new("why"));
        assert_eq!(find::<Sentinel>(&err), Some(&STD_LIKE));
    }
}
