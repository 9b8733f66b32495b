//! Call-site capture

use std::fmt;

/// The place an error was created: function, file and line.
///
/// Captured once at construction and never changed afterwards. The function
/// name is only known when the location comes from [`here!`](crate::here);
/// [`Location::caller`] leaves it empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Location {
    function: String,
    file: String,
    line: u32,
}

impl Location {
    /// Create a location from its parts
    pub fn new(function: impl Into<String>, file: impl Into<String>, line: u32) -> Self {
        Self {
            function: function.into(),
            file: file.into(),
            line,
        }
    }

    /// The location of the caller.
    ///
    /// `#[track_caller]` propagates through every public constructor, so this
    /// resolves to the first frame outside the chain of tracked functions.
    #[track_caller]
    pub fn caller() -> Self {
        let location = std::panic::Location::caller();
        Self {
            function: String::new(),
            file: location.file().to_string(),
            line: location.line(),
        }
    }

    /// Fully qualified name of the enclosing function, empty if unknown
    pub fn function(&self) -> &str {
        &self.function
    }

    /// Source file path
    pub fn file(&self) -> &str {
        &self.file
    }

    /// Line number, `0` if unknown
    pub fn line(&self) -> u32 {
        self.line
    }

    /// `path:line`, the form written to the `file` JSON field
    pub(crate) fn file_with_line(&self) -> String {
        format!("{}:{}", self.file, self.line)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.function.is_empty() {
            write!(f, "{} ", self.function)?;
        }
        write!(f, "{}:{}", self.file, self.line)
    }
}

/// Name of the function the macro is expanded in.
///
/// Resolves to the full path, e.g. `my_crate::storage::save`. Inside closures
/// the path ends with `{{closure}}`.
#[macro_export]
macro_rules! function_name {
    () => {{
        fn __errkit_here() {}
        let name = ::std::any::type_name_of_val(&__errkit_here);
        name.strip_suffix("::__errkit_here").unwrap_or(name)
    }};
}

/// [`Location`] of the macro invocation, including the function name.
#[macro_export]
macro_rules! here {
    () => {
        $crate::Location::new($crate::function_name!(), ::std::file!(), ::std::line!())
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_caller_captures_file_and_line() {
        let (location, line) = (Location::caller(), line!());
        assert_eq!(location.file(), file!());
        assert_eq!(location.line(), line);
        assert!(location.function().is_empty());
    }

    #[test]
    fn test_here_names_enclosing_function() {
        let location = here!();
        assert_eq!(
            location.function(),
            "errkit::caller::tests::test_here_names_enclosing_function"
        );
        assert_eq!(location.file(), file!());
    }

    #[test]
    fn test_here_inside_closure() {
        let capture = || here!();
        assert!(capture()
            .function()
            .starts_with("errkit::caller::tests::test_here_inside_closure"));
    }

    #[test]
    fn test_display() {
        let location = Location::new("app::run", "src/app.rs", 42);
        assert_eq!(location.to_string(), "app::run src/app.rs:42");
        assert_eq!(location.file_with_line(), "src/app.rs:42");

        let location = Location::new("", "src/app.rs", 7);
        assert_eq!(location.to_string(), "src/app.rs:7");
    }
}
