//! Key/value details attached to errors

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::btree_map::{self, BTreeMap};
use std::fmt;

/// Value stored under the last key of an odd-length detail list
pub const NO_VALUE: &str = "NOVAL";

/// Prefix of the synthetic key used when a key position holds a non-string
pub const BAD_KEY: &str = "BADKEY";

/// Diagnostic details of an error: string keys mapped to arbitrary JSON values.
///
/// Keys are kept sorted so the serialized form is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ErrorDetails(BTreeMap<String, Value>);

impl ErrorDetails {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, Value> {
        self.0.iter()
    }

    /// Insert a detail, replacing any previous value under the same key
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Merge `other` into these details. Keys of `other` win on collision.
    pub fn merge(mut self, other: ErrorDetails) -> Self {
        if self.0.is_empty() {
            return other;
        }
        self.0.extend(other.0);
        self
    }
}

impl From<ErrorDetails> for Value {
    fn from(details: ErrorDetails) -> Self {
        Value::Object(details.0.into_iter().collect())
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for ErrorDetails {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl IntoIterator for ErrorDetails {
    type Item = (String, Value);
    type IntoIter = btree_map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a ErrorDetails {
    type Item = (&'a String, &'a Value);
    type IntoIter = btree_map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for ErrorDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (key, value)) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", key, value)?;
        }
        write!(f, "}}")
    }
}

/// One positional argument of a detail list.
///
/// Built by [`details!`](crate::details), which picks the variant from the
/// static type of each argument: [`ErrorDetails`] stays a map, `&str` and
/// `String` become keys, everything else is serialized to a [`Value`].
#[derive(Debug, Clone, PartialEq)]
pub enum DetailArg {
    /// Ready-made details
    Details(ErrorDetails),
    /// A string, usable as a key as-is
    Key(String),
    /// Any other serialized value
    Value(Value),
}

impl DetailArg {
    fn into_key(self) -> String {
        match self {
            DetailArg::Key(key) => key,
            DetailArg::Details(details) => bad_key(&Value::from(details)),
            DetailArg::Value(value) => bad_key(&value),
        }
    }

    fn into_value(self) -> Value {
        match self {
            DetailArg::Key(key) => Value::String(key),
            DetailArg::Details(details) => Value::from(details),
            DetailArg::Value(value) => value,
        }
    }
}

fn bad_key(key: &Value) -> String {
    match key {
        Value::String(key) => format!("{}:({})", BAD_KEY, key),
        other => format!("{}:({})", BAD_KEY, other),
    }
}

impl From<ErrorDetails> for DetailArg {
    fn from(details: ErrorDetails) -> Self {
        DetailArg::Details(details)
    }
}

impl From<&str> for DetailArg {
    fn from(key: &str) -> Self {
        DetailArg::Key(key.to_string())
    }
}

impl From<String> for DetailArg {
    fn from(key: String) -> Self {
        DetailArg::Key(key)
    }
}

/// Raw JSON: a string is a key, an object is a plain value, not details.
impl From<Value> for DetailArg {
    fn from(value: Value) -> Self {
        match value {
            Value::String(key) => DetailArg::Key(key),
            other => DetailArg::Value(other),
        }
    }
}

/// Turn a positional argument list into [`ErrorDetails`].
///
/// - no arguments give empty details
/// - a single [`DetailArg::Details`] is taken as ready-made details and copied
/// - anything else is read as `key, value, key, value, ...`; an odd list gets
///   [`NO_VALUE`] appended, a key that is not a string becomes
///   `BADKEY:(<key>)`, and later duplicates overwrite earlier ones
///
/// ```rust
/// use errkit::{details, normalize, Value};
///
/// let details = normalize(details!["host", "db-1", "port", 5432, 7]);
/// assert_eq!(details.get("port"), Some(&Value::from(5432)));
/// assert_eq!(details.get("BADKEY:(7)"), Some(&Value::from("NOVAL")));
/// ```
pub fn normalize<I>(args: I) -> ErrorDetails
where
    I: IntoIterator,
    I::Item: Into<DetailArg>,
{
    let mut args: Vec<DetailArg> = args.into_iter().map(Into::into).collect();
    if args.is_empty() {
        return ErrorDetails::new();
    }

    if args.len() == 1 && matches!(args[0], DetailArg::Details(_)) {
        if let Some(DetailArg::Details(details)) = args.pop() {
            return details;
        }
    }

    if args.len() % 2 != 0 {
        args.push(DetailArg::Key(NO_VALUE.to_string()));
    }

    let mut details = BTreeMap::new();
    let mut args = args.into_iter();
    while let (Some(key), Some(value)) = (args.next(), args.next()) {
        details.insert(key.into_key(), value.into_value());
    }
    ErrorDetails(details)
}

/// Serialize a detail value.
///
/// Values serde cannot represent as JSON (maps with non-string keys, failing
/// `Serialize` impls) are kept as a string describing the failure, so a bad
/// detail never costs the error itself.
pub fn to_value<T>(value: &T) -> Value
where
    T: Serialize + ?Sized,
{
    match serde_json::to_value(value) {
        Ok(value) => value,
        Err(err) => {
            tracing::debug!(error = %err, "detail value is not serializable");
            Value::String(format!("!ERROR({})", err))
        }
    }
}

/// Argument classification for [`details!`](crate::details).
///
/// Method resolution tries `&&&Tagged` first, then `&&Tagged`, then
/// `&Tagged`, so the most specific impl that applies wins.
#[doc(hidden)]
pub mod kind {
    use super::{to_value, DetailArg, ErrorDetails};
    use serde::Serialize;
    use serde_json::Value;
    use std::borrow::Cow;

    pub struct Tagged<'a, T: ?Sized>(pub &'a T);

    /// Types whose value is used verbatim as a detail key
    pub trait StrKey {
        fn as_key(&self) -> &str;
    }

    impl StrKey for str {
        fn as_key(&self) -> &str {
            self
        }
    }

    impl StrKey for String {
        fn as_key(&self) -> &str {
            self
        }
    }

    impl StrKey for Cow<'_, str> {
        fn as_key(&self) -> &str {
            self
        }
    }

    impl<T: StrKey + ?Sized> StrKey for &T {
        fn as_key(&self) -> &str {
            (**self).as_key()
        }
    }

    pub trait ExactKind {
        fn detail_arg(&self) -> DetailArg;
    }

    impl ExactKind for &&Tagged<'_, ErrorDetails> {
        fn detail_arg(&self) -> DetailArg {
            DetailArg::Details(self.0.clone())
        }
    }

    impl ExactKind for &&Tagged<'_, Value> {
        fn detail_arg(&self) -> DetailArg {
            DetailArg::from(self.0.clone())
        }
    }

    pub trait KeyKind {
        fn detail_arg(&self) -> DetailArg;
    }

    impl<T: StrKey + ?Sized> KeyKind for &Tagged<'_, T> {
        fn detail_arg(&self) -> DetailArg {
            DetailArg::Key(self.0.as_key().to_string())
        }
    }

    pub trait ValueKind {
        fn detail_arg(&self) -> DetailArg;
    }

    impl<T: Serialize + ?Sized> ValueKind for Tagged<'_, T> {
        fn detail_arg(&self) -> DetailArg {
            DetailArg::Value(to_value(self.0))
        }
    }
}

/// Build a positional detail list from expressions of any `Serialize` type.
///
/// ```rust
/// let args = errkit::details!["user", "alice", "retries", 3, "ok", false];
/// assert_eq!(args.len(), 6);
/// ```
#[macro_export]
macro_rules! details {
    () => {
        ::std::vec::Vec::<$crate::DetailArg>::new()
    };
    ($($arg:expr),+ $(,)?) => {{
        #[allow(unused_imports)]
        use $crate::__private::{ExactKind as _, KeyKind as _, ValueKind as _};
        ::std::vec![$((&&&$crate::__private::Tagged(&$arg)).detail_arg()),+]
    }};
}
