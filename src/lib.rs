//! # serde_dsn
//!
//! A codec for DSN strings: compact, single-line lists of `key=value` pairs, with
//! Serde support for reading and writing flat structs.
//!
//! ## What is DSN?
//!
//! A DSN ("data source name") packs a set of connection or configuration parameters
//! into one line of text:
//!
//! ```text
//! host=127.0.0.1 port=5432 user=admin password=p\=ss\sword
//! ```
//!
//! - Pairs are separated by whitespace
//! - A key and its value are joined by `=`
//! - Reserved characters inside keys and values (space, `=`, `\`, quotes, tab,
//!   CR, LF) are written as backslash escapes such as `\s` and `\=`
//!
//! See the [`format`] module for the full grammar.
//!
//! ## Key Features
//!
//! - **Strict decoding**: a hand-written state machine rejects stray `=`, bare keys,
//!   unknown escapes and duplicate keys, with the column of the offending character
//! - **Minimal encoding**: only reserved characters are escaped
//! - **Round-trip safe**: decoding an encoded mapping always gives back the same pairs
//! - **Typed accessors**: `get_int`, `get_bool`, `set_float` and friends with defaults
//! - **Serde Compatible**: flat structs via `#[derive(Serialize, Deserialize)]`
//!
//! ## Quick Start
//!
//! ```rust
//! use serde_dsn::{decode, encode};
//!
//! let dsn = decode(r"message=Hello,\sWorld! answer=42").unwrap();
//! assert_eq!(dsn.get("message"), Some("Hello, World!"));
//! assert_eq!(dsn.get_int("answer", 0), 42);
//!
//! assert_eq!(encode(&dsn), r"message=Hello,\sWorld! answer=42");
//! ```
//!
//! ### Serde
//!
//! ```rust
//! use serde::{Deserialize, Serialize};
//! use serde_dsn::{from_str, to_string};
//!
//! #[derive(Serialize, Deserialize, PartialEq, Debug)]
//! struct Database {
//!     host: String,
//!     port: u16,
//!     sslmode: bool,
//!     password: Option<String>,
//! }
//!
//! let db = Database {
//!     host: "db.internal".to_string(),
//!     port: 5432,
//!     sslmode: true,
//!     password: Some("s3cr3t pass".to_string()),
//! };
//!
//! let text = to_string(&db).unwrap();
//! assert_eq!(text, r"host=db.internal port=5432 sslmode=true password=s3cr3t\spass");
//!
//! let back: Database = from_str(&text).unwrap();
//! assert_eq!(db, back);
//! ```
//!
//! ## Safety Guarantees
//!
//! - No `unsafe` code blocks
//! - Decoding is atomic: errors never leave a partial mapping behind
//! - Encoding never fails
//!
//! ## Examples
//!
//! See the `demos/` directory:
//!
//! - **`simple.rs`** - Decoding and encoding a DSN string
//! - **`macro.rs`** - Building mappings with the dsn! macro
//! - **`typed_accessors.rs`** - Reading and writing typed values with defaults
//! - **`custom_options.rs`** - Canonical ordering and separators
//!
//! Run any example with: `cargo run --example <name>`

pub mod de;
pub mod error;
pub mod escape;
pub mod format;
pub mod macros;
pub mod map;
pub mod options;
pub mod ser;

pub use de::{decode, Decoder, Deserializer};
pub use error::{Error, Result};
pub use map::Dsn;
pub use options::{DsnOptions, Separator};
pub use ser::{encode, encode_with_options, Serializer};

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io;

/// Flatten any `T: Serialize` struct or map into a [`Dsn`] mapping.
///
/// `None` fields are left out.
///
/// # Errors
///
/// Returns [`Error::UnsupportedType`] if the value is not a struct or map, or if a
/// field holds a sequence, a nested struct or bytes.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_dsn<T>(value: &T) -> Result<Dsn>
where
    T: ?Sized + Serialize,
{
    let mut serializer = Serializer::new();
    value.serialize(&mut serializer)?;
    Ok(serializer.into_inner())
}

/// Serialize any `T: Serialize` struct or map to a DSN string.
///
/// # Examples
///
/// ```rust
/// use serde_dsn::to_string;
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Point { x: i32, y: i32 }
///
/// assert_eq!(to_string(&Point { x: 1, y: -2 }).unwrap(), "x=1 y=-2");
/// ```
///
/// # Errors
///
/// Returns an error if the value has no flat `key=value` representation.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string<T>(value: &T) -> Result<String>
where
    T: ?Sized + Serialize,
{
    to_string_with_options(value, &DsnOptions::default())
}

/// Serialize any `T: Serialize` to a DSN string with custom options.
///
/// # Examples
///
/// ```rust
/// use serde_dsn::{to_string_with_options, DsnOptions};
/// use std::collections::HashMap;
///
/// let mut params = HashMap::new();
/// params.insert("b", "2");
/// params.insert("a", "1");
///
/// let text = to_string_with_options(&params, &DsnOptions::canonical()).unwrap();
/// assert_eq!(text, "a=1 b=2");
/// ```
///
/// # Errors
///
/// Returns an error if the value has no flat `key=value` representation.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string_with_options<T>(value: &T, options: &DsnOptions) -> Result<String>
where
    T: ?Sized + Serialize,
{
    to_dsn(value).map(|map| encode_with_options(&map, options))
}

/// Serialize any `T: Serialize` to a writer as a DSN string.
///
/// # Errors
///
/// Returns an error if serialization fails or writing to the writer fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer<W, T>(writer: W, value: &T) -> Result<()>
where
    W: io::Write,
    T: ?Sized + Serialize,
{
    to_writer_with_options(writer, value, &DsnOptions::default())
}

/// Serialize any `T: Serialize` to a writer with custom options.
///
/// # Errors
///
/// Returns an error if serialization fails or writing to the writer fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer_with_options<W, T>(mut writer: W, value: &T, options: &DsnOptions) -> Result<()>
where
    W: io::Write,
    T: ?Sized + Serialize,
{
    let text = to_string_with_options(value, options)?;
    writer
        .write_all(text.as_bytes())
        .map_err(|e| Error::io(&e.to_string()))?;
    Ok(())
}

/// Deserialize an instance of type `T` from an already decoded mapping.
///
/// # Errors
///
/// Returns [`Error::TypeMismatch`] if a value does not parse as its field's type.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_dsn<T>(map: Dsn) -> Result<T>
where
    T: DeserializeOwned,
{
    T::deserialize(Deserializer::from_dsn(map))
}

/// Deserialize an instance of type `T` from a DSN string.
///
/// # Examples
///
/// ```rust
/// use serde_dsn::from_str;
/// use serde::Deserialize;
///
/// #[derive(Deserialize, PartialEq, Debug)]
/// struct Point { x: i32, y: i32 }
///
/// let point: Point = from_str("y=2 x=1").unwrap();
/// assert_eq!(point, Point { x: 1, y: 2 });
/// ```
///
/// # Errors
///
/// Returns the decoder's errors for malformed input, and [`Error::TypeMismatch`] if a
/// value cannot be converted to its field's type.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_str<T>(s: &str) -> Result<T>
where
    T: DeserializeOwned,
{
    T::deserialize(Deserializer::from_str(s)?)
}

/// Deserialize an instance of type `T` from an I/O stream holding a DSN string.
///
/// # Errors
///
/// Returns an error if reading fails, the input is not valid DSN, or the data cannot
/// be deserialized to type `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_reader<R, T>(mut reader: R) -> Result<T>
where
    R: io::Read,
    T: DeserializeOwned,
{
    let mut string = String::new();
    reader
        .read_to_string(&mut string)
        .map_err(|e| Error::io(&e.to_string()))?;
    from_str(&string)
}

/// Deserialize an instance of type `T` from bytes of DSN text.
///
/// # Errors
///
/// Returns an error if the bytes are not valid UTF-8, not valid DSN, or cannot be
/// deserialized to type `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_slice<T>(v: &[u8]) -> Result<T>
where
    T: DeserializeOwned,
{
    let s = std::str::from_utf8(v).map_err(|e| Error::custom(e.to_string()))?;
    from_str(s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::io::Cursor;

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Point {
        x: i32,
        y: i32,
    }

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Server {
        host: String,
        port: u16,
        secure: bool,
        label: Option<String>,
    }

    #[test]
    fn test_serialize_deserialize_point() {
        let point = Point { x: 1, y: 2 };
        let text = to_string(&point).unwrap();
        let point_back: Point = from_str(&text).unwrap();
        assert_eq!(point, point_back);
    }

    #[test]
    fn test_serialize_deserialize_server() {
        let server = Server {
            host: "my host".to_string(),
            port: 443,
            secure: true,
            label: Some("a=b".to_string()),
        };

        let text = to_string(&server).unwrap();
        assert_eq!(text, r"host=my\shost port=443 secure=true label=a\=b");
        let server_back: Server = from_str(&text).unwrap();
        assert_eq!(server, server_back);
    }

    #[test]
    fn test_writer_and_reader() {
        let point = Point { x: -5, y: 7 };
        let mut buffer = Vec::new();
        to_writer(&mut buffer, &point).unwrap();
        assert_eq!(buffer, b"x=-5 y=7");

        let back: Point = from_reader(Cursor::new(&buffer)).unwrap();
        assert_eq!(back, point);
        let back: Point = from_slice(&buffer).unwrap();
        assert_eq!(back, point);
    }

    #[test]
    fn test_from_slice_rejects_invalid_utf8() {
        let err = from_slice::<Point>(&[0x78, 0x3d, 0xff]).unwrap_err();
        assert!(matches!(err, Error::Custom(_)));
    }

    #[test]
    fn test_from_dsn() {
        let map = crate::dsn! { "x" => 3, "y" => 4 };
        let point: Point = from_dsn(map).unwrap();
        assert_eq!(point, Point { x: 3, y: 4 });
    }
}
