//! Error types for DSN decoding, encoding and serde conversion.
//!
//! Decoding a DSN string fails in exactly two ways:
//!
//! - **Parse errors**: malformed syntax such as a stray `=`, a key without a value,
//!   an unknown escape or input ending inside an escape
//! - **Duplicate keys**: the same key committed twice
//!
//! Both reject the whole input. No partially decoded mapping is ever returned.
//!
//! The serde layer adds type mismatches (a value that does not parse as the field's
//! type) and unsupported shapes (nested structures, sequences).
//!
//! ## Examples
//!
//! ```rust
//! use serde_dsn::{decode, Error};
//!
//! let err = decode("test==true").unwrap_err();
//! assert!(err.is_parse());
//! assert!(err.to_string().contains("column 6"));
//!
//! let err = decode("a=1 a=2").unwrap_err();
//! assert!(matches!(err, Error::KeyAlreadyExists { ref key, .. } if key == "a"));
//! ```

use std::fmt;
use thiserror::Error;

/// Represents all possible errors produced by this crate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Malformed DSN syntax.
    ///
    /// `column` is the 1-based code point position of the offending character, or one
    /// past the last character when the input ended too early.
    #[error("Parse error at column {column}: {msg}")]
    Parse { column: usize, msg: String },

    /// A key appeared a second time.
    ///
    /// `column` is where the repeated key starts.
    #[error("Key already exists at column {column}: {key:?}")]
    KeyAlreadyExists { key: String, column: usize },

    /// A stored value could not be converted to the requested type.
    #[error("Type mismatch for key {key:?}: expected {expected}, found {found:?}")]
    TypeMismatch {
        key: String,
        expected: String,
        found: String,
    },

    /// The value shape has no flat `key=value` representation.
    #[error("Unsupported type: {0}")]
    UnsupportedType(String),

    /// IO error during reading or writing
    #[error("IO error: {0}")]
    Io(String),

    /// Custom error
    #[error("Error: {0}")]
    Custom(String),
}

impl Error {
    /// Creates a parse error at the given column.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_dsn::Error;
    ///
    /// let err = Error::parse(4, "unexpected '='");
    /// assert!(err.to_string().contains("column 4"));
    /// ```
    pub fn parse(column: usize, msg: &str) -> Self {
        Error::Parse {
            column,
            msg: msg.to_string(),
        }
    }

    /// Creates a duplicate key error.
    pub fn key_already_exists(key: &str, column: usize) -> Self {
        Error::KeyAlreadyExists {
            key: key.to_string(),
            column,
        }
    }

    /// Creates a type mismatch error for a value that failed to convert.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_dsn::Error;
    ///
    /// let err = Error::type_mismatch("port", "u16", "eighty");
    /// assert!(err.to_string().contains("expected u16"));
    /// ```
    pub fn type_mismatch(key: &str, expected: &str, found: &str) -> Self {
        Error::TypeMismatch {
            key: key.to_string(),
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }

    /// Creates an unsupported type error for shapes DSN cannot hold.
    pub fn unsupported_type(msg: &str) -> Self {
        Error::UnsupportedType(msg.to_string())
    }

    /// Creates a custom error with a display message.
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }

    /// Creates an I/O error for reading/writing failures.
    pub fn io(msg: &str) -> Self {
        Error::Io(msg.to_string())
    }

    /// Returns `true` for malformed-syntax errors.
    #[must_use]
    pub fn is_parse(&self) -> bool {
        matches!(self, Error::Parse { .. })
    }

    /// Returns `true` for duplicate key errors.
    #[must_use]
    pub fn is_key_already_exists(&self) -> bool {
        matches!(self, Error::KeyAlreadyExists { .. })
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
    fn test_predicates() {
        assert!(Error::parse(1, "x").is_parse());
        assert!(!Error::parse(1, "x").is_key_already_exists());
        assert!(Error::key_already_exists("k", 3).is_key_already_exists());
        assert!(!Error::custom("boom").is_parse());
    }

    #[test]
    fn test_display() {
        let err = Error::key_already_exists("port", 12);
        assert_eq!(err.to_string(), "Key already exists at column 12: \"port\"");

        let err = Error::type_mismatch("debug", "bool", "maybe");
        assert_eq!(
            err.to_string(),
            "Type mismatch for key \"debug\": expected bool, found \"maybe\""
        );
    }
}
