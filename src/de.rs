//! DSN decoding.
//!
//! This module provides the [`Decoder`] that scans DSN text into a [`Dsn`] mapping,
//! and the serde [`Deserializer`] that turns such a mapping into Rust data structures.
//!
//! ## Overview
//!
//! - **Single-pass scanning**: one code point at a time, no lookahead, no backtracking
//! - **Strict syntax**: stray `=`, bare keys and unknown escapes are rejected
//! - **Atomic**: any error rejects the whole input; no partial mapping is returned
//! - **Duplicate detection**: the second occurrence of a key is an error
//!
//! ## Usage
//!
//! ```rust
//! use serde_dsn::decode;
//!
//! let dsn = decode(r"user=admin password=p\=ss\sword").unwrap();
//! assert_eq!(dsn.get("password"), Some("p=ss word"));
//! ```
//!
//! With serde:
//!
//! ```rust
//! use serde_dsn::from_str;
//! use serde::Deserialize;
//!
//! #[derive(Deserialize, Debug, PartialEq)]
//! struct Conn { host: String, port: u16, tls: Option<bool> }
//!
//! let conn: Conn = from_str("host=db port=5432").unwrap();
//! assert_eq!(conn, Conn { host: "db".to_string(), port: 5432, tls: None });
//! ```

use crate::escape::unescape_char;
use crate::map::parse_bool;
use crate::{Dsn, Error, Result};
use serde::de::{self, IntoDeserializer};
use serde::forward_to_deserialize_any;
use tracing::{debug, trace};

/// Scanner position within a pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum State {
    /// Between pairs; whitespace is skipped.
    KeyStart,
    /// A `\` was read inside a key.
    KeyEscape,
    /// Accumulating key characters.
    KeyBody,
    /// Just read the `=`; the value is still empty.
    ValueStart,
    /// A `\` was read inside a value.
    ValueEscape,
    /// Accumulating value characters.
    ValueBody,
}

/// The DSN scanner.
///
/// Created via [`Decoder::from_str`] and consumed by [`Decoder::decode`].
pub struct Decoder<'a> {
    input: &'a str,
    state: State,
    key: String,
    value: String,
    column: usize,
    pair_start: usize,
    output: Dsn,
}

impl<'a> Decoder<'a> {
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(input: &'a str) -> Self {
        Decoder {
            input,
            state: State::KeyStart,
            key: String::new(),
            value: String::new(),
            column: 0,
            pair_start: 0,
            output: Dsn::new(),
        }
    }

    /// Runs the scanner over the whole input.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`] for malformed syntax and [`Error::KeyAlreadyExists`]
    /// for a repeated key.
    pub fn decode(self) -> Result<Dsn> {
        let len = self.input.len();
        self.run().map_err(|e| {
            debug!("Rejected DSN input of {} bytes: {}", len, e);
            e
        })
    }

    fn run(mut self) -> Result<Dsn> {
        let input = self.input;
        for ch in input.chars() {
            self.column += 1;
            self.step(ch)?;
        }
        self.finish()
    }

    fn step(&mut self, ch: char) -> Result<()> {
        self.state = match self.state {
            State::KeyStart if ch.is_whitespace() => State::KeyStart,
            State::KeyStart => {
                self.key.clear();
                self.pair_start = self.column;
                match ch {
                    '\\' => State::KeyEscape,
                    '=' => self.begin_value(),
                    c => {
                        self.key.push(c);
                        State::KeyBody
                    }
                }
            }
            State::KeyEscape => {
                let literal = self.unescape(ch)?;
                self.key.push(literal);
                State::KeyBody
            }
            State::KeyBody => match ch {
                '=' => self.begin_value(),
                '\\' => State::KeyEscape,
                c if c.is_whitespace() => {
                    return Err(Error::parse(self.column, "key is not followed by '='"));
                }
                c => {
                    self.key.push(c);
                    State::KeyBody
                }
            },
            State::ValueStart | State::ValueBody => match ch {
                c if c.is_whitespace() => {
                    self.commit()?;
                    State::KeyStart
                }
                '=' => {
                    return Err(Error::parse(
                        self.column,
                        "unescaped '=' in value (use \\=)",
                    ));
                }
                '\\' => State::ValueEscape,
                c => {
                    self.value.push(c);
                    State::ValueBody
                }
            },
            State::ValueEscape => {
                let literal = self.unescape(ch)?;
                self.value.push(literal);
                State::ValueBody
            }
        };
        Ok(())
    }

    fn finish(mut self) -> Result<Dsn> {
        let column = self.column + 1;
        match self.state {
            State::KeyStart => {}
            State::KeyEscape | State::ValueEscape => {
                return Err(Error::parse(column, "input ends inside an escape sequence"));
            }
            State::KeyBody => {
                return Err(Error::parse(column, "key is not followed by '='"));
            }
            State::ValueStart | State::ValueBody => self.commit()?,
        }
        Ok(self.output)
    }

    fn begin_value(&mut self) -> State {
        self.value.clear();
        State::ValueStart
    }

    fn unescape(&self, introducer: char) -> Result<char> {
        unescape_char(introducer).ok_or_else(|| {
            Error::parse(
                self.column,
                &format!("invalid escape sequence '\\{}'", introducer.escape_debug()),
            )
        })
    }

    fn commit(&mut self) -> Result<()> {
        let key = std::mem::take(&mut self.key);
        let value = std::mem::take(&mut self.value);
        trace!("Committing key {:?} ({} bytes of value)", key, value.len());
        self.output.try_insert(key, value, self.pair_start)
    }
}

/// Decodes DSN text into a mapping.
///
/// # Examples
///
/// ```rust
/// use serde_dsn::decode;
///
/// let dsn = decode("1=2 3=4 empty= addr=127.0.0.1").unwrap();
/// assert_eq!(dsn.get("empty"), Some(""));
/// assert_eq!(dsn.get("addr"), Some("127.0.0.1"));
///
/// assert!(decode("t").unwrap_err().is_parse());
/// assert!(decode("1= test=true 1=12").unwrap_err().is_key_already_exists());
/// ```
///
/// # Errors
///
/// Returns [`Error::Parse`] or [`Error::KeyAlreadyExists`].
pub fn decode(input: &str) -> Result<Dsn> {
    Decoder::from_str(input).decode()
}

/// The serde deserializer over a decoded mapping.
///
/// The top level is always a map. Every value is text; scalar fields are parsed from it
/// on demand.
pub struct Deserializer {
    map: Dsn,
}

impl Deserializer {
    /// Decodes `input` and wraps the resulting mapping.
    ///
    /// # Errors
    ///
    /// Fails with the decoder's errors.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(input: &str) -> Result<Self> {
        decode(input).map(Self::from_dsn)
    }

    pub fn from_dsn(map: Dsn) -> Self {
        Deserializer { map }
    }
}

impl<'de> de::Deserializer<'de> for Deserializer {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_map(MapDeserializer::new(self.map))
    }

    fn deserialize_unit<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        if self.map.is_empty() {
            visitor.visit_unit()
        } else {
            Err(Error::custom("expected an empty DSN string"))
        }
    }

    fn deserialize_newtype_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_seq<V>(self, _visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        Err(Error::unsupported_type(
            "a DSN string holds key=value pairs, not a sequence",
        ))
    }

    fn deserialize_tuple<V>(self, _len: usize, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_seq(visitor)
    }

    fn deserialize_tuple_struct<V>(
        self,
        _name: &'static str,
        _len: usize,
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_seq(visitor)
    }

    forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf option unit_struct map struct enum identifier ignored_any
    }
}

struct MapDeserializer {
    iter: indexmap::map::IntoIter<String, String>,
    key: Option<String>,
    value: Option<String>,
}

impl MapDeserializer {
    fn new(map: Dsn) -> Self {
        MapDeserializer {
            iter: map.into_iter(),
            key: None,
            value: None,
        }
    }
}

impl<'de> de::MapAccess<'de> for MapDeserializer {
    type Error = Error;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>>
    where
        K: de::DeserializeSeed<'de>,
    {
        match self.iter.next() {
            Some((key, value)) => {
                self.key = Some(key.clone());
                self.value = Some(value);
                let key: de::value::StringDeserializer<Error> = key.into_deserializer();
                seed.deserialize(key).map(Some)
            }
            None => Ok(None),
        }
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value>
    where
        V: de::DeserializeSeed<'de>,
    {
        match (self.key.take(), self.value.take()) {
            (Some(key), Some(value)) => seed.deserialize(ValueDeserializer { key, value }),
            _ => Err(Error::custom("value is missing")),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.iter.len())
    }
}

/// Deserializes one stored value, parsing it as the requested scalar.
struct ValueDeserializer {
    key: String,
    value: String,
}

impl ValueDeserializer {
    fn parse<T: std::str::FromStr>(&self, expected: &str) -> Result<T> {
        self.value
            .parse()
            .map_err(|_| Error::type_mismatch(&self.key, expected, &self.value))
    }
}

macro_rules! deserialize_parsed {
    ($($method:ident => $visit:ident : $ty:ty),* $(,)?) => {
        $(
            fn $method<V>(self, visitor: V) -> Result<V::Value>
            where
                V: de::Visitor<'de>,
            {
                visitor.$visit(self.parse::<$ty>(stringify!($ty))?)
            }
        )*
    };
}

impl<'de> de::Deserializer<'de> for ValueDeserializer {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_string(self.value)
    }

    fn deserialize_bool<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match parse_bool(&self.value) {
            Some(b) => visitor.visit_bool(b),
            None => Err(Error::type_mismatch(&self.key, "bool", &self.value)),
        }
    }

    deserialize_parsed! {
        deserialize_i8 => visit_i8: i8,
        deserialize_i16 => visit_i16: i16,
        deserialize_i32 => visit_i32: i32,
        deserialize_i64 => visit_i64: i64,
        deserialize_i128 => visit_i128: i128,
        deserialize_u8 => visit_u8: u8,
        deserialize_u16 => visit_u16: u16,
        deserialize_u32 => visit_u32: u32,
        deserialize_u64 => visit_u64: u64,
        deserialize_u128 => visit_u128: u128,
        deserialize_f32 => visit_f32: f32,
        deserialize_f64 => visit_f64: f64,
        deserialize_char => visit_char: char,
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        // A present key is always `Some`, even when its value is empty.
        visitor.visit_some(self)
    }

    fn deserialize_unit<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        if self.value.is_empty() {
            visitor.visit_unit()
        } else {
            Err(Error::type_mismatch(&self.key, "empty value", &self.value))
        }
    }

    fn deserialize_unit_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_unit(visitor)
    }

    fn deserialize_newtype_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_enum<V>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        // Only unit variants have a flat representation.
        let variant: de::value::StringDeserializer<Error> = self.value.into_deserializer();
        visitor.visit_enum(variant)
    }

    fn deserialize_seq<V>(self, _visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        Err(Error::unsupported_type(&format!(
            "key {:?}: sequences cannot be stored in a DSN value",
            self.key
        )))
    }

    fn deserialize_map<V>(self, _visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        Err(Error::unsupported_type(&format!(
            "key {:?}: nested maps cannot be stored in a DSN value",
            self.key
        )))
    }

    fn deserialize_struct<V>(
        self,
        _name: &'static str,
        _fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_map(visitor)
    }

    fn deserialize_tuple<V>(self, _len: usize, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_seq(visitor)
    }

    fn deserialize_tuple_struct<V>(
        self,
        _name: &'static str,
        _len: usize,
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_seq(visitor)
    }

    forward_to_deserialize_any! {
        str string bytes byte_buf identifier ignored_any
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(input: &str) -> Vec<(String, String)> {
        decode(input).unwrap().into_iter().collect()
    }

    fn parse_column(input: &str) -> usize {
        match decode(input) {
            Err(Error::Parse { column, .. }) => column,
            other => panic!("expected parse error for {input:?}, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_and_whitespace() {
        assert!(decode("").unwrap().is_empty());
        assert!(decode(" ").unwrap().is_empty());
        assert!(decode(" \t\r\n \u{3000}").unwrap().is_empty());
    }

    #[test]
    fn test_empty_key_and_value() {
        assert_eq!(pairs("="), vec![(String::new(), String::new())]);
        assert_eq!(pairs("1="), vec![("1".to_string(), String::new())]);
        assert_eq!(pairs(" =x "), vec![(String::new(), "x".to_string())]);
    }

    #[test]
    fn test_pairs_keep_input_order() {
        let keys: Vec<String> = pairs("b=1 a=2  c=3")
            .into_iter()
            .map(|(k, _)| k)
            .collect();
        assert_eq!(keys, ["b", "a", "c"]);
    }

    #[test]
    fn test_any_unicode_whitespace_separates_pairs() {
        let dsn = decode("a=1\u{00A0}b=2\u{2003}\u{2003}c=3").unwrap();
        assert_eq!(dsn.len(), 3);
        assert_eq!(dsn.get("b"), Some("2"));
    }

    #[test]
    fn test_escapes_in_keys_and_values() {
        let dsn = decode(r#"\=v\=al=1 example=\=1+2\=3 q=\"x\'y\\ ws=\t\r\n"#).unwrap();
        assert_eq!(dsn.get("=v=al"), Some("1"));
        assert_eq!(dsn.get("example"), Some("=1+2=3"));
        assert_eq!(dsn.get("q"), Some(r#""x'y\"#));
        assert_eq!(dsn.get("ws"), Some("\t\r\n"));
    }

    #[test]
    fn test_escaped_key_start() {
        assert_eq!(pairs(r"\s=1"), vec![(" ".to_string(), "1".to_string())]);
        assert_eq!(pairs(r"\\=\\"), vec![("\\".to_string(), "\\".to_string())]);
    }

    #[test]
    fn test_value_escape_right_after_equals() {
        assert_eq!(pairs(r"k=\s"), vec![("k".to_string(), " ".to_string())]);
        assert_eq!(pairs(r"k=\ "), vec![("k".to_string(), " ".to_string())]);
    }

    #[test]
    fn test_parse_error_columns() {
        assert_eq!(parse_column("test==true"), 6);
        assert_eq!(parse_column("test=t=rue"), 7);
        assert_eq!(parse_column("tes"), 4);
        assert_eq!(parse_column("a=1 bad key=2"), 8);
        assert_eq!(parse_column(r"ans\wer=Hi"), 5);
        assert_eq!(parse_column(r"answer=Hi\"), 11);
        assert_eq!(parse_column(r"\"), 2);
    }

    #[test]
    fn test_duplicate_key_column() {
        match decode("1= test=true 1=12") {
            Err(Error::KeyAlreadyExists { key, column }) => {
                assert_eq!(key, "1");
                assert_eq!(column, 14);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_first_error_wins() {
        // The duplicate is committed before the stray '=' is reached.
        assert!(decode("a=1 a=2 b==").unwrap_err().is_key_already_exists());
        assert!(decode("a==1 a=2").unwrap_err().is_parse());
    }

    #[test]
    fn test_deserializer_rejects_sequences() {
        let err = crate::from_str::<Vec<String>>("a=1").unwrap_err();
        assert!(matches!(err, Error::UnsupportedType(_)));
    }
}
