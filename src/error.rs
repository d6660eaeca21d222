//! Error types for GBLN parsing, validation, ownership and conversion.
//!
//! ## Error Categories
//!
//! - **Syntax**: malformed source text, reported by the parser with line/column
//! - **Validation**: a value does not fit its type hint (range, length, duplicate key, ...)
//! - **Ownership**: a handle was used after release or handed to the wrong allocator
//! - **Serialize**: a native value has no GBLN representation (cycles, opaque host values)
//! - **I/O**: reader/writer failures passed through from the adapters in the crate root
//!
//! ## Examples
//!
//! ```rust
//! use serde_gbln::{parse_to_native, ErrorCode};
//!
//! let err = parse_to_native("age<i8>(999)").unwrap_err();
//! assert_eq!(err.code(), Some(ErrorCode::IntOutOfRange));
//! assert!(err.to_string().contains("[-128, 127]"));
//! ```

use std::fmt;
use thiserror::Error;

/// Stable error codes shared with the parser and with foreign callers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    UnexpectedChar,
    UnterminatedString,
    UnexpectedToken,
    UnexpectedEof,
    InvalidSyntax,
    IntOutOfRange,
    StringTooLong,
    TypeMismatch,
    InvalidTypeHint,
    DuplicateKey,
    NullPointer,
    Io,
}

impl ErrorCode {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::UnexpectedChar => "unexpected character",
            ErrorCode::UnterminatedString => "unterminated string",
            ErrorCode::UnexpectedToken => "unexpected token",
            ErrorCode::UnexpectedEof => "unexpected end of input",
            ErrorCode::InvalidSyntax => "invalid syntax",
            ErrorCode::IntOutOfRange => "integer out of range",
            ErrorCode::StringTooLong => "string too long",
            ErrorCode::TypeMismatch => "type mismatch",
            ErrorCode::InvalidTypeHint => "invalid type hint",
            ErrorCode::DuplicateKey => "duplicate key",
            ErrorCode::NullPointer => "null pointer",
            ErrorCode::Io => "I/O error",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A structured parser error: code, message and the position it was raised at.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseError {
    pub code: ErrorCode,
    pub message: String,
    pub line: usize,
    pub column: usize,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} at line {}, column {}: {}",
            self.code, self.line, self.column, self.message
        )
    }
}

/// Misuse of a value-tree handle. Always a programming defect.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum OwnershipError {
    #[error("handle {0} was already released")]
    Released(String),

    #[error("handle {handle} belongs to allocator #{owner}, not #{used_with}")]
    ForeignAllocator {
        handle: String,
        owner: u32,
        used_with: u32,
    },

    #[error("handle {0} is owned by a container and cannot be used on its own")]
    Transferred(String),

    #[error("container {container} cannot adopt {child}: children must be created after their container")]
    CreationOrder { container: String, child: String },
}

/// Represents all possible errors raised by this crate.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Malformed source text, or a validation failure detected while parsing
    #[error("Parse error: {0}")]
    Parse(ParseError),

    /// Integer outside the bounds of its declared width
    #[error("integer {value} out of range for {hint} [{min}, {max}]")]
    Range {
        hint: String,
        value: String,
        min: i128,
        max: i128,
    },

    /// String longer than its tier (or than the largest tier)
    #[error("string of {len} bytes exceeds {limit}-byte limit")]
    Length { len: usize, limit: usize },

    /// Accessor used on the wrong variant
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    #[error("duplicate key `{0}`")]
    DuplicateKey(String),

    #[error("invalid type hint `{0}`")]
    InvalidTypeHint(String),

    #[error("key `{0}` not found")]
    KeyNotFound(String),

    #[error("index {index} out of range for array of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("ownership violation: {0}")]
    Ownership(#[from] OwnershipError),

    /// A native value that cannot be represented in GBLN
    #[error("Serialize error: {0}")]
    Serialize(String),

    #[error("IO error: {0}")]
    Io(String),

    #[error("Error: {0}")]
    Custom(String),

    /// An error raised inside a converted value, with the path to that value
    #[error("{path}: {source}")]
    At {
        path: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Creates a parse error at the given position.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_gbln::{Error, ErrorCode};
    ///
    /// let err = Error::parse(ErrorCode::UnexpectedEof, 3, 7, "expected `)`");
    /// assert!(err.to_string().contains("line 3, column 7"));
    /// ```
    pub fn parse(code: ErrorCode, line: usize, column: usize, message: &str) -> Self {
        Error::Parse(ParseError {
            code,
            message: message.to_string(),
            line,
            column,
        })
    }

    pub fn serialize<T: fmt::Display>(msg: T) -> Self {
        Error::Serialize(msg.to_string())
    }

    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }

    pub fn io(msg: &str) -> Self {
        Error::Io(msg.to_string())
    }

    /// The path of the value that failed, for errors raised during conversion.
    #[must_use]
    pub fn path(&self) -> Option<&str> {
        match self {
            Error::At { path, .. } => Some(path),
            _ => None,
        }
    }

    /// The error itself, with any conversion path stripped.
    ///
    /// ```rust
    /// use serde_gbln::{native_to_serialized, Error, NativeValue, RenderOptions};
    ///
    /// let value = NativeValue::object([("bio", NativeValue::from("x".repeat(2000)))]);
    /// let err = native_to_serialized(&value, &RenderOptions::new()).unwrap_err();
    /// assert_eq!(err.path(), Some("bio"));
    /// assert_eq!(err.without_path(), &Error::Length { len: 2000, limit: 1024 });
    /// ```
    #[must_use]
    pub fn without_path(&self) -> &Error {
        match self {
            Error::At { source, .. } => source.without_path(),
            other => other,
        }
    }

    /// The closest stable code for this error, if there is one.
    #[must_use]
    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            Error::At { source, .. } => source.code(),
            Error::Parse(e) => Some(e.code),
            Error::Range { .. } => Some(ErrorCode::IntOutOfRange),
            Error::Length { .. } => Some(ErrorCode::StringTooLong),
            Error::TypeMismatch { .. } => Some(ErrorCode::TypeMismatch),
            Error::DuplicateKey(_) => Some(ErrorCode::DuplicateKey),
            Error::InvalidTypeHint(_) => Some(ErrorCode::InvalidTypeHint),
            Error::Ownership(_) => Some(ErrorCode::NullPointer),
            Error::Io(_) => Some(ErrorCode::Io),
            Error::KeyNotFound(_)
            | Error::IndexOutOfRange { .. }
            | Error::Serialize(_)
            | Error::Custom(_) => None,
        }
    }

    /// Returns `true` for validation failures (range, length, type, key, hint).
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(
            self.without_path(),
            Error::Range { .. }
                | Error::Length { .. }
                | Error::TypeMismatch { .. }
                | Error::DuplicateKey(_)
                | Error::InvalidTypeHint(_)
        )
    }

    /// Attaches the path of the value an error was raised under.
    ///
    /// Serialize errors take the path into their message; every other kind
    /// is wrapped in [`Error::At`] so it stays matchable through
    /// [`Error::without_path`].
    pub(crate) fn at_path(self, path: &str) -> Self {
        match self {
            Error::Serialize(msg) => Error::Serialize(format!("{}: {}", path, msg)),
            err @ Error::At { .. } => err,
            other => Error::At {
                path: path.to_string(),
                source: Box::new(other),
            },
        }
    }
}

impl serde::ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

impl serde::de::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_message_cites_bounds() {
        let err = Error::Range {
            hint: "i8".to_string(),
            value: "999".to_string(),
            min: -128,
            max: 127,
        };
        assert_eq!(err.to_string(), "integer 999 out of range for i8 [-128, 127]");
        assert_eq!(err.code(), Some(ErrorCode::IntOutOfRange));
        assert!(err.is_validation());
    }

    #[test]
    fn test_parse_error_display() {
        let err = Error::parse(ErrorCode::UnterminatedString, 1, 12, "missing `)`");
        assert_eq!(
            err.to_string(),
            "Parse error: unterminated string at line 1, column 12: missing `)`"
        );
        assert_eq!(err.code(), Some(ErrorCode::UnterminatedString));
    }

    #[test]
    fn test_at_path_prefixes_serialize_errors() {
        let err = Error::serialize("circular reference").at_path("user");
        assert_eq!(err, Error::Serialize("user: circular reference".to_string()));
        assert_eq!(err.path(), None);
    }

    #[test]
    fn test_at_path_wraps_validation_errors() {
        let err = Error::Length {
            len: 2000,
            limit: 1024,
        }
        .at_path("user.tags[2]");
        assert_eq!(
            err.to_string(),
            "user.tags[2]: string of 2000 bytes exceeds 1024-byte limit"
        );
        assert_eq!(err.path(), Some("user.tags[2]"));
        assert_eq!(err.code(), Some(ErrorCode::StringTooLong));
        assert!(err.is_validation());
        assert_eq!(
            err.without_path(),
            &Error::Length {
                len: 2000,
                limit: 1024
            }
        );

        // the innermost path wins
        let err = err.at_path("user");
        assert_eq!(err.path(), Some("user.tags[2]"));
    }
}
