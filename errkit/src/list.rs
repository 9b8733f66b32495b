//! Aggregation of independent errors

use crate::BoxError;
use std::error::Error as StdError;
use std::fmt;

/// Independent errors presented as one.
///
/// Members are siblings: `source()` is always `None`, while
/// [`is`](crate::is) and [`find`](crate::find) scan the members in order.
/// Lists are only built by [`append`] and always hold at least two members.
#[derive(Debug)]
pub struct ErrorList {
    errors: Vec<BoxError>,
}

impl ErrorList {
    /// Number of members
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Members in append order
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &(dyn StdError + 'static)> + '_ {
        self.errors
            .iter()
            .map(|e| e.as_ref() as &(dyn StdError + 'static))
    }

    /// Member at `index`
    pub fn get(&self, index: usize) -> Option<&(dyn StdError + 'static)> {
        self.errors
            .get(index)
            .map(|e| e.as_ref() as &(dyn StdError + 'static))
    }

    /// Whether any member, or anything in a member's chain, equals `target`
    pub fn is<T>(&self, target: &T) -> bool
    where
        T: StdError + PartialEq + 'static,
    {
        crate::is(self, target)
    }

    /// First error of type `T` found in the members, in order
    pub fn find<T>(&self) -> Option<&T>
    where
        T: StdError + 'static,
    {
        crate::find(self)
    }

    /// Summary used as the `message` of the JSON form
    pub(crate) fn summary(&self) -> String {
        format!("{} errors have occurred", self.errors.len())
    }
}

impl IntoIterator for ErrorList {
    type Item = BoxError;
    type IntoIter = std::vec::IntoIter<BoxError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

// =============================================================================
// Display - JSON array of member texts
// =============================================================================

impl fmt::Display for ErrorList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let texts: Vec<String> = self.errors.iter().map(|e| e.to_string()).collect();
        match serde_json::to_string(&texts) {
            Ok(json) => f.write_str(&json),
            Err(err) => {
                tracing::debug!(error = %err, "JSON encoding failed, rendering error list as plain text");
                write!(f, "[{}]", texts.join(", "))
            }
        }
    }
}

impl StdError for ErrorList {}

/// Combine two errors into one.
///
/// `None` on either side returns the other side unchanged. Otherwise the
/// result is an [`ErrorList`] whose members follow call order: an existing
/// list keeps its members and gains the other error at the matching end, two
/// lists are concatenated.
///
/// Not synchronized: fold results from concurrent work on a single owner,
/// e.g. the receiving end of a channel.
///
/// ```rust
/// use errkit::{append, ErrorList, Sentinel};
///
/// static FAILED: Sentinel = Sentinel::new("worker failed");
///
/// let mut result = None;
/// for id in [1, 2, 3] {
///     let outcome = (id != 2).then(|| errkit::with_stack!(FAILED.clone(), "id", id));
///     result = append(result, outcome);
/// }
///
/// let result = result.unwrap();
/// let list = result.downcast_ref::<ErrorList>().unwrap();
/// assert_eq!(list.len(), 2);
/// assert!(list.is(&FAILED));
/// ```
pub fn append<A, B>(a: Option<A>, b: Option<B>) -> Option<BoxError>
where
    A: Into<BoxError>,
    B: Into<BoxError>,
{
    let (a, b) = match (a, b) {
        (None, b) => return b.map(Into::into),
        (a, None) => return a.map(Into::into),
        (Some(a), Some(b)) => (a.into(), b.into()),
    };

    let list = match (a.downcast::<ErrorList>(), b.downcast::<ErrorList>()) {
        (Ok(mut first), Ok(second)) => {
            first.errors.extend(second.errors);
            first
        }
        (Ok(mut list), Err(err)) => {
            list.errors.push(err);
            list
        }
        (Err(err), Ok(mut list)) => {
            list.errors.insert(0, err);
            list
        }
        (Err(first), Err(second)) => Box::new(ErrorList {
            errors: vec![first, second],
        }),
    };
    Some(list as BoxError)
}
