//! Error types for binding key-value sources into records

use std::fmt;
use std::num::ParseIntError;
use std::path::PathBuf;

/// Option tokens a directive may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionKind {
    /// `rune`
    Rune,
    /// `base:N`
    Base,
    /// `bitsize:N`
    BitSize,
    /// `sep:S`
    Sep,
}

impl fmt::Display for OptionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionKind::Rune => write!(f, "rune"),
            OptionKind::Base => write!(f, "base"),
            OptionKind::BitSize => write!(f, "bitsize"),
            OptionKind::Sep => write!(f, "sep"),
        }
    }
}

/// Errors raised while parsing a field directive such as `"PORT,base:16"`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DirectiveError {
    /// The directive is empty or its key segment is empty.
    #[error("directive must contain at minimum a key name")]
    MissingData,

    /// An option token that is not one of `rune`, `base:`, `bitsize:`, `sep:`.
    #[error("unsupported directive option '{option}'")]
    UnsupportedOption {
        /// The offending option token, verbatim
        option: String,
    },

    /// The same option was given more than once.
    #[error("directive option '{0}' must only be provided once")]
    DuplicateOption(OptionKind),

    /// A numeric option whose value is not a decimal integer.
    #[error("{option} option: invalid value '{value}': {source}")]
    InvalidOptionValue {
        /// Option the value belongs to
        option: OptionKind,
        /// Text after the option prefix
        value: String,
        /// Underlying integer parse failure
        source: ParseIntError,
    },

    /// `sep:` with nothing after the colon.
    #[error("list separator must not be empty string")]
    EmptySeparator,
}

/// Errors raised while converting a raw string into a field.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoerceError {
    /// Text does not match the grammar of the target type.
    #[error("failed to parse '{value}' as {target}: {reason}")]
    Parse {
        /// Raw text that failed to parse
        value: String,
        /// Name of the target type
        target: &'static str,
        /// What was wrong with the text or the options
        reason: String,
    },

    /// Text parses but the value does not fit the requested or actual width.
    #[error("value '{value}' overflows {target}")]
    Overflow {
        /// Raw text that was parsed
        value: String,
        /// Width description, e.g. `i8` or `8-bit signed integer`
        target: String,
    },

    /// A character field received zero or several code points.
    #[error("expected exactly 1 character, found {count}")]
    InvalidRuneLength {
        /// Number of code points found
        count: usize,
    },

    /// The field's type cannot be populated from a single string.
    #[error("unsupported field type: {kind}")]
    UnsupportedType {
        /// Kind of the rejected field (e.g. `array`, `map`, `record`)
        kind: &'static str,
    },

    /// The field cannot be written.
    ///
    /// Never returned: every slot is reached through a `&mut` borrow, so
    /// there is always a writable target. Kept so the error set covers
    /// non-writable fields if a future source of slots has them.
    #[error("can't set field")]
    NotSettable,
}

impl CoerceError {
    pub(crate) fn parse(
        value: &str,
        target: &'static str,
        reason: impl fmt::Display,
    ) -> Self {
        Self::Parse {
            value: value.to_string(),
            target,
            reason: reason.to_string(),
        }
    }

    pub(crate) fn overflow(value: &str, target: impl Into<String>) -> Self {
        Self::Overflow {
            value: value.to_string(),
            target: target.into(),
        }
    }

    pub(crate) fn unsupported(kind: &'static str) -> Self {
        Self::UnsupportedType { kind }
    }
}

/// Errors produced by the field binder.
///
/// Per-field failures are wrapped in [`BindError::Field`] once for every
/// record level they pass through, so the message reads like
/// `field "database": field "port": value '70000' overflows u16`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BindError {
    /// The target handed to `load` is not a record.
    #[error("input must be a mutable reference to a record")]
    NotAStructPointer,

    /// A failure inside the named field.
    #[error("field \"{field}\": {cause}")]
    Field {
        /// Declared name of the field
        field: &'static str,
        /// What went wrong inside it
        cause: Box<BindError>,
    },

    /// The field's directive is malformed.
    #[error(transparent)]
    Directive(#[from] DirectiveError),

    /// The source value could not be converted.
    #[error(transparent)]
    Coerce(#[from] CoerceError),
}

impl BindError {
    pub(crate) fn in_field(field: &'static str, cause: impl Into<BindError>) -> Self {
        Self::Field {
            field,
            cause: Box::new(cause.into()),
        }
    }

    /// Innermost error, past every [`BindError::Field`] wrapper.
    pub fn root_cause(&self) -> &BindError {
        let mut current = self;
        while let BindError::Field { cause, .. } = current {
            current = cause;
        }
        current
    }

    /// Names of the fields the error passed through, outermost first.
    pub fn field_path(&self) -> Vec<&'static str> {
        let mut path = Vec::new();
        let mut current = self;
        while let BindError::Field { field, cause } = current {
            path.push(*field);
            current = cause;
        }
        path
    }

    /// The directive error at the root, if that is what failed.
    pub fn directive_error(&self) -> Option<&DirectiveError> {
        match self.root_cause() {
            BindError::Directive(e) => Some(e),
            _ => None,
        }
    }

    /// The coercion error at the root, if that is what failed.
    pub fn coerce_error(&self) -> Option<&CoerceError> {
        match self.root_cause() {
            BindError::Coerce(e) => Some(e),
            _ => None,
        }
    }
}

/// Error returned by [`load`](crate::load) and [`load_with`](crate::load_with).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("envbind: {inner}")]
pub struct Error {
    inner: BindError,
}

impl Error {
    /// Innermost cause, past every field wrapper.
    pub fn cause(&self) -> &BindError {
        self.inner.root_cause()
    }

    /// Names of the fields the error passed through, outermost first.
    pub fn field_path(&self) -> Vec<&'static str> {
        self.inner.field_path()
    }

    /// `true` if the target was not a record.
    pub fn is_not_a_struct_pointer(&self) -> bool {
        matches!(self.inner, BindError::NotAStructPointer)
    }

    /// The directive error at the root, if any.
    pub fn directive_error(&self) -> Option<&DirectiveError> {
        self.inner.directive_error()
    }

    /// The coercion error at the root, if any.
    pub fn coerce_error(&self) -> Option<&CoerceError> {
        self.inner.coerce_error()
    }

    /// The wrapped binder error.
    pub fn as_bind_error(&self) -> &BindError {
        &self.inner
    }

    /// Unwrap into the binder error.
    pub fn into_inner(self) -> BindError {
        self.inner
    }
}

impl From<BindError> for Error {
    fn from(inner: BindError) -> Self {
        Self { inner }
    }
}

/// Errors raised by key-value sources that read from disk.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// The file could not be read.
    #[error("Failed to read source file '{}': {source}", path.display())]
    Read {
        /// Path that failed to be read
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// A non-blank, non-comment line without `=`.
    #[error("{}:{line}: expected KEY=VALUE", path.display())]
    Syntax {
        /// Path of the offending file
        path: PathBuf,
        /// 1-based line number
        line: usize,
    },
}
