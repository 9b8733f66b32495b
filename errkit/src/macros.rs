//! Construction macros
//!
//! Each macro takes trailing detail arguments like [`details!`](crate::details)
//! and records the full call site, including the enclosing function name.

/// Create an [`Error`](crate::Error) with a message and details.
///
/// ```rust
/// fn main() {
///     let err = errkit::new!("quota exceeded", "limit", 10, "used", 12);
///     assert_eq!(err.message(), "quota exceeded");
///     assert!(err.function().ends_with("main"));
/// }
/// ```
#[macro_export]
macro_rules! new {
    ($message:expr $(, $detail:expr)* $(,)?) => {
        $crate::Error::new($message)
            .with_details($crate::details![$($detail),*])
            .at($crate::here!())
    };
}

/// Wrap an error with a new message, see [`Error::wrap`](crate::Error::wrap).
#[macro_export]
macro_rules! wrap {
    ($err:expr, $message:expr $(, $detail:expr)* $(,)?) => {
        $crate::Error::wrap($err, $message)
            .with_details($crate::details![$($detail),*])
            .at($crate::here!())
    };
}

/// Bind an error to this call site, see [`Error::with_stack`](crate::Error::with_stack).
#[macro_export]
macro_rules! with_stack {
    ($err:expr $(, $detail:expr)* $(,)?) => {
        $crate::Error::with_stack($err)
            .with_details($crate::details![$($detail),*])
            .at($crate::here!())
    };
}

/// Report a well-known error with a cause, see
/// [`Error::with_cause`](crate::Error::with_cause).
#[macro_export]
macro_rules! with_cause {
    ($base:expr, $cause:expr $(, $detail:expr)* $(,)?) => {
        $crate::Error::with_cause($base, $cause)
            .with_details($crate::details![$($detail),*])
            .at($crate::here!())
    };
}
