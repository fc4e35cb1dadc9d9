//! core::errors
//!
//! The uniform error value shared by the dispatch engine and the command
//! handlers.
//!
//! # Design
//!
//! Every failure point inside a function carries its own sequential number,
//! so two failures with the same message raised from different places stay
//! distinguishable in the log trail. Wrapping an error pushes a new trail
//! line while keeping the kind of the innermost engine error, which lets the
//! caller ask "was this a validation failure?" without walking the chain.
//!
//! # Example
//!
//! ```
//! use ngsiwork::core::errors::{ErrorCategory, ErrorKind, NgsiError};
//!
//! let inner = NgsiError::new("read_all", 5, "file name error", ErrorKind::Action);
//! let outer = NgsiError::wrap("make_app_body", 1, inner);
//!
//! assert_eq!(outer.trail_line(), "make_app_body001 file name error");
//! assert_eq!(outer.category(), ErrorCategory::Action);
//! assert_eq!(outer.chain().count(), 2);
//! ```

use std::error::Error as StdError;

use thiserror::Error;

/// Boxed cause attached to an [`NgsiError`].
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Coarse grouping of [`ErrorKind`]s.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// The command tree itself is malformed.
    Definition,
    /// argv could not be matched against the command tree.
    Parse,
    /// Flags were bound but do not satisfy the command's rules.
    Validation,
    /// The host or the profile store could not be resolved.
    Resolution,
    /// Raised by a command handler.
    Action,
}

/// What went wrong, independent of where.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Duplicate flag names, dangling references in the command tree.
    Definition,
    UnknownCommand,
    UnknownFlag,
    /// A string or integer flag was the last token.
    MissingValue,
    /// An integer flag received a non-numeric token.
    TypeConversion,
    MissingRequiredFlags,
    EmptyValue,
    /// An option group rule was not satisfied.
    ValidationFailed,
    InvalidChoice,
    UnsupportedServerKind,
    UnknownHost,
    /// The profile store could not be read or is invalid.
    Config,
    Action,
}

impl ErrorKind {
    /// The category this kind belongs to.
    pub fn category(self) -> ErrorCategory {
        match self {
            ErrorKind::Definition => ErrorCategory::Definition,
            ErrorKind::UnknownCommand
            | ErrorKind::UnknownFlag
            | ErrorKind::MissingValue
            | ErrorKind::TypeConversion => ErrorCategory::Parse,
            ErrorKind::MissingRequiredFlags
            | ErrorKind::EmptyValue
            | ErrorKind::ValidationFailed
            | ErrorKind::InvalidChoice
            | ErrorKind::UnsupportedServerKind => ErrorCategory::Validation,
            ErrorKind::UnknownHost | ErrorKind::Config => ErrorCategory::Resolution,
            ErrorKind::Action => ErrorCategory::Action,
        }
    }
}

/// An error raised at a numbered failure point inside a named function.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct NgsiError {
    function: &'static str,
    errno: u32,
    message: String,
    kind: ErrorKind,
    #[source]
    source: Option<BoxError>,
}

impl NgsiError {
    /// Create a leaf error.
    pub fn new(
        function: &'static str,
        errno: u32,
        message: impl Into<String>,
        kind: ErrorKind,
    ) -> Self {
        Self {
            function,
            errno,
            message: message.into(),
            kind,
            source: None,
        }
    }

    /// Shorthand for a leaf error raised by a command handler.
    pub fn action(function: &'static str, errno: u32, message: impl Into<String>) -> Self {
        Self::new(function, errno, message, ErrorKind::Action)
    }

    /// Wrap another engine error, inheriting its message and kind.
    pub fn wrap(function: &'static str, errno: u32, inner: NgsiError) -> Self {
        Self {
            function,
            errno,
            message: inner.message.clone(),
            kind: inner.kind,
            source: Some(Box::new(inner)),
        }
    }

    /// Wrap a foreign error; its display text becomes the message.
    pub fn from_source<E>(function: &'static str, errno: u32, kind: ErrorKind, err: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self {
            function,
            errno,
            message: err.to_string(),
            kind,
            source: Some(Box::new(err)),
        }
    }

    pub fn function(&self) -> &'static str {
        self.function
    }

    pub fn errno(&self) -> u32 {
        self.errno
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn category(&self) -> ErrorCategory {
        self.kind.category()
    }

    /// The line written to the error log for this level of the chain.
    ///
    /// Trailing newlines of the message are dropped.
    pub fn trail_line(&self) -> String {
        format!(
            "{}{:03} {}",
            self.function,
            self.errno,
            self.message.trim_end_matches('\n')
        )
    }

    /// This error followed by every cause, outermost first.
    pub fn chain(&self) -> impl Iterator<Item = &(dyn StdError + 'static)> {
        let mut next: Option<&(dyn StdError + 'static)> = Some(self);
        std::iter::from_fn(move || {
            let current = next?;
            next = current.source();
            Some(current)
        })
    }

    /// Find the level of the chain raised by `function`.
    pub fn find(&self, function: &str) -> Option<&NgsiError> {
        self.chain()
            .filter_map(|e| e.downcast_ref::<NgsiError>())
            .find(|e| e.function == function)
    }

    /// The innermost engine error of the chain.
    pub fn root(&self) -> &NgsiError {
        self.chain()
            .filter_map(|e| e.downcast_ref::<NgsiError>())
            .last()
            .unwrap_or(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trail_line_pads_errno() {
        let err = NgsiError::new("run", 1, "boom", ErrorKind::Action);
        assert_eq!(err.trail_line(), "run001 boom");

        let err = NgsiError::new("run", 12, "boom", ErrorKind::Action);
        assert_eq!(err.trail_line(), "run012 boom");
    }

    #[test]
    fn trail_line_drops_trailing_newlines() {
        let err = NgsiError::action("applications_delete", 3, "error 404 Not Found gone\n\n");
        assert_eq!(err.trail_line(), "applications_delete003 error 404 Not Found gone");
        assert_eq!(err.message(), "error 404 Not Found gone\n\n");
    }

    #[test]
    fn derived_source_exposes_the_cause() {
        let leaf = NgsiError::action("read_all", 2, "empty");
        assert!(StdError::source(&leaf).is_none());

        let top = NgsiError::wrap("run", 1, leaf);
        let cause = StdError::source(&top).and_then(|e| e.downcast_ref::<NgsiError>());
        assert_eq!(cause.map(|e| e.function()), Some("read_all"));
        assert_eq!(format!("{}", top), "empty");
    }

    #[test]
    fn wrap_keeps_inner_kind_and_message() {
        let inner = NgsiError::new("check_required", 1, "missing", ErrorKind::MissingRequiredFlags);
        let outer = NgsiError::wrap("run", 1, inner);

        assert_eq!(outer.kind(), ErrorKind::MissingRequiredFlags);
        assert_eq!(outer.category(), ErrorCategory::Validation);
        assert_eq!(outer.message(), "missing");
        assert_eq!(outer.to_string(), "missing");
    }

    #[test]
    fn chain_walks_every_level() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let leaf = NgsiError::from_source("read_all", 4, ErrorKind::Action, io);
        let mid = NgsiError::wrap("make_app_body", 1, leaf);
        let top = NgsiError::wrap("applications_create", 1, mid);

        let lines: Vec<String> = top.chain().map(|e| e.to_string()).collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[3], "no such file");

        assert_eq!(top.find("make_app_body").map(|e| e.errno()), Some(1));
        assert_eq!(top.root().function(), "read_all");
        assert!(top.find("nowhere").is_none());
    }

    #[test]
    fn categories() {
        assert_eq!(ErrorKind::UnknownFlag.category(), ErrorCategory::Parse);
        assert_eq!(ErrorKind::InvalidChoice.category(), ErrorCategory::Validation);
        assert_eq!(ErrorKind::UnknownHost.category(), ErrorCategory::Resolution);
        assert_eq!(ErrorKind::Definition.category(), ErrorCategory::Definition);
    }
}
