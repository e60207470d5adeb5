//! DSN encoding.
//!
//! This module turns a [`Dsn`] mapping back into text, and provides the serde
//! [`Serializer`] that flattens a Rust struct or map into a mapping.
//!
//! ## Overview
//!
//! - **Infallible encoding**: any key or value is representable through escapes
//! - **Minimal escaping**: only reserved characters are escaped; plain strings are
//!   copied through untouched
//! - **Flat values only**: the serde layer accepts scalars and `Option`s of scalars
//!   as field values
//!
//! ## Usage
//!
//! ```rust
//! use serde_dsn::{dsn, encode};
//!
//! let map = dsn! { "msg" => "1+2=3", "user" => "o'neil" };
//! assert_eq!(encode(&map), r"msg=1+2\=3 user=o\'neil");
//! ```
//!
//! With serde:
//!
//! ```rust
//! use serde_dsn::to_string;
//! use serde::Serialize;
//!
//! #[derive(Serialize)]
//! struct Conn { host: String, port: u16, password: Option<String> }
//!
//! let conn = Conn { host: "db".to_string(), port: 5432, password: None };
//! assert_eq!(to_string(&conn).unwrap(), "host=db port=5432");
//! ```

use crate::escape::escape;
use crate::{Dsn, DsnOptions, Error, Result};
use serde::ser::{self, Impossible, Serialize};
use tracing::debug;

/// Encodes a mapping with default options (space separator, insertion order).
///
/// # Examples
///
/// ```rust
/// use serde_dsn::{encode, Dsn};
///
/// assert_eq!(encode(&Dsn::new()), "");
///
/// let mut map = Dsn::new();
/// map.insert("message", "Hello, World!");
/// assert_eq!(encode(&map), r"message=Hello,\sWorld!");
/// ```
#[must_use]
pub fn encode(map: &Dsn) -> String {
    encode_with_options(map, &DsnOptions::default())
}

/// Encodes a mapping with custom options.
#[must_use]
pub fn encode_with_options(map: &Dsn, options: &DsnOptions) -> String {
    let mut pairs: Vec<(&String, &String)> = map.iter().collect();
    if options.sort_keys {
        pairs.sort_unstable_by(|a, b| a.0.cmp(b.0));
    }

    let size: usize = pairs.iter().map(|(k, v)| k.len() + v.len() + 2).sum();
    let mut output = String::with_capacity(size);
    for (i, (key, value)) in pairs.into_iter().enumerate() {
        if i > 0 {
            output.push_str(options.separator.as_str());
        }
        output.push_str(&escape(key));
        output.push('=');
        output.push_str(&escape(value));
    }

    debug!("Encoded {} pairs into {} bytes", map.len(), output.len());
    output
}

/// The serde serializer.
///
/// Collects the fields of a struct or the entries of a map into a [`Dsn`].
/// Created via [`Serializer::new`].
#[derive(Default)]
pub struct Serializer {
    output: Dsn,
}

impl Serializer {
    pub fn new() -> Self {
        Serializer { output: Dsn::new() }
    }

    pub fn into_inner(self) -> Dsn {
        self.output
    }
}

fn top_level(found: &str) -> Error {
    Error::unsupported_type(&format!(
        "a DSN string must be built from a struct or map, found {found}"
    ))
}

impl<'a> ser::Serializer for &'a mut Serializer {
    type Ok = ();
    type Error = Error;

    type SerializeSeq = Impossible<(), Error>;
    type SerializeTuple = Impossible<(), Error>;
    type SerializeTupleStruct = Impossible<(), Error>;
    type SerializeTupleVariant = Impossible<(), Error>;
    type SerializeMap = MapSerializer<'a>;
    type SerializeStruct = MapSerializer<'a>;
    type SerializeStructVariant = Impossible<(), Error>;

    fn serialize_bool(self, _v: bool) -> Result<()> {
        Err(top_level("bool"))
    }

    fn serialize_i8(self, v: i8) -> Result<()> {
        self.serialize_i64(i64::from(v))
    }

    fn serialize_i16(self, v: i16) -> Result<()> {
        self.serialize_i64(i64::from(v))
    }

    fn serialize_i32(self, v: i32) -> Result<()> {
        self.serialize_i64(i64::from(v))
    }

    fn serialize_i64(self, _v: i64) -> Result<()> {
        Err(top_level("integer"))
    }

    fn serialize_u8(self, v: u8) -> Result<()> {
        self.serialize_u64(u64::from(v))
    }

    fn serialize_u16(self, v: u16) -> Result<()> {
        self.serialize_u64(u64::from(v))
    }

    fn serialize_u32(self, v: u32) -> Result<()> {
        self.serialize_u64(u64::from(v))
    }

    fn serialize_u64(self, _v: u64) -> Result<()> {
        Err(top_level("integer"))
    }

    fn serialize_f32(self, v: f32) -> Result<()> {
        self.serialize_f64(f64::from(v))
    }

    fn serialize_f64(self, _v: f64) -> Result<()> {
        Err(top_level("float"))
    }

    fn serialize_char(self, _v: char) -> Result<()> {
        Err(top_level("char"))
    }

    fn serialize_str(self, _v: &str) -> Result<()> {
        Err(top_level("string"))
    }

    fn serialize_bytes(self, _v: &[u8]) -> Result<()> {
        Err(top_level("bytes"))
    }

    fn serialize_none(self) -> Result<()> {
        Ok(())
    }

    fn serialize_some<T>(self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<()> {
        Ok(())
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<()> {
        Ok(())
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
    ) -> Result<()> {
        Err(top_level("enum"))
    }

    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _value: &T,
    ) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        Err(top_level("enum"))
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq> {
        Err(top_level("sequence"))
    }

    fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple> {
        Err(top_level("tuple"))
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleStruct> {
        Err(top_level("tuple struct"))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant> {
        Err(top_level("enum"))
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap> {
        Ok(MapSerializer {
            ser: self,
            key: None,
        })
    }

    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<Self::SerializeStruct> {
        Ok(MapSerializer {
            ser: self,
            key: None,
        })
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant> {
        Err(top_level("enum"))
    }
}

pub struct MapSerializer<'a> {
    ser: &'a mut Serializer,
    key: Option<String>,
}

impl MapSerializer<'_> {
    fn store<T>(&mut self, key: String, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        if let Some(text) = value.serialize(ValueSerializer { key: &key })? {
            self.ser.output.insert(key, text);
        }
        Ok(())
    }
}

impl ser::SerializeMap for MapSerializer<'_> {
    type Ok = ();
    type Error = Error;

    fn serialize_key<T>(&mut self, key: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.key = Some(key.serialize(KeySerializer)?);
        Ok(())
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let key = self
            .key
            .take()
            .ok_or_else(|| Error::custom("serialize_value called before serialize_key"))?;
        self.store(key, value)
    }

    fn end(self) -> Result<()> {
        Ok(())
    }
}

impl ser::SerializeStruct for MapSerializer<'_> {
    type Ok = ();
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.store(key.to_string(), value)
    }

    fn end(self) -> Result<()> {
        Ok(())
    }
}

/// Serializes a map key to text.
struct KeySerializer;

fn key_error(found: &str) -> Error {
    Error::unsupported_type(&format!("DSN keys must be scalars, found {found}"))
}

impl ser::Serializer for KeySerializer {
    type Ok = String;
    type Error = Error;

    type SerializeSeq = Impossible<String, Error>;
    type SerializeTuple = Impossible<String, Error>;
    type SerializeTupleStruct = Impossible<String, Error>;
    type SerializeTupleVariant = Impossible<String, Error>;
    type SerializeMap = Impossible<String, Error>;
    type SerializeStruct = Impossible<String, Error>;
    type SerializeStructVariant = Impossible<String, Error>;

    fn serialize_bool(self, v: bool) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_i8(self, v: i8) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_i16(self, v: i16) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_i32(self, v: i32) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_i64(self, v: i64) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_u8(self, v: u8) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_u16(self, v: u16) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_u32(self, v: u32) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_u64(self, v: u64) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_f32(self, _v: f32) -> Result<String> {
        Err(key_error("float"))
    }

    fn serialize_f64(self, _v: f64) -> Result<String> {
        Err(key_error("float"))
    }

    fn serialize_char(self, v: char) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_str(self, v: &str) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_bytes(self, _v: &[u8]) -> Result<String> {
        Err(key_error("bytes"))
    }

    fn serialize_none(self) -> Result<String> {
        Err(key_error("none"))
    }

    fn serialize_some<T>(self, value: &T) -> Result<String>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<String> {
        Err(key_error("unit"))
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<String> {
        Err(key_error("unit struct"))
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<String> {
        Ok(variant.to_string())
    }

    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> Result<String>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _value: &T,
    ) -> Result<String>
    where
        T: ?Sized + Serialize,
    {
        Err(key_error("enum"))
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq> {
        Err(key_error("sequence"))
    }

    fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple> {
        Err(key_error("tuple"))
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleStruct> {
        Err(key_error("tuple struct"))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant> {
        Err(key_error("enum"))
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap> {
        Err(key_error("map"))
    }

    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<Self::SerializeStruct> {
        Err(key_error("struct"))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant> {
        Err(key_error("enum"))
    }
}

/// Serializes one field value to text. `None` means the field is omitted.
struct ValueSerializer<'k> {
    key: &'k str,
}

impl ValueSerializer<'_> {
    fn nested(&self, found: &str) -> Error {
        Error::unsupported_type(&format!(
            "key {:?}: a DSN value cannot hold a {found}",
            self.key
        ))
    }
}

impl ser::Serializer for ValueSerializer<'_> {
    type Ok = Option<String>;
    type Error = Error;

    type SerializeSeq = Impossible<Option<String>, Error>;
    type SerializeTuple = Impossible<Option<String>, Error>;
    type SerializeTupleStruct = Impossible<Option<String>, Error>;
    type SerializeTupleVariant = Impossible<Option<String>, Error>;
    type SerializeMap = Impossible<Option<String>, Error>;
    type SerializeStruct = Impossible<Option<String>, Error>;
    type SerializeStructVariant = Impossible<Option<String>, Error>;

    fn serialize_bool(self, v: bool) -> Result<Option<String>> {
        Ok(Some(v.to_string()))
    }

    fn serialize_i8(self, v: i8) -> Result<Option<String>> {
        Ok(Some(v.to_string()))
    }

    fn serialize_i16(self, v: i16) -> Result<Option<String>> {
        Ok(Some(v.to_string()))
    }

    fn serialize_i32(self, v: i32) -> Result<Option<String>> {
        Ok(Some(v.to_string()))
    }

    fn serialize_i64(self, v: i64) -> Result<Option<String>> {
        Ok(Some(v.to_string()))
    }

    fn serialize_i128(self, v: i128) -> Result<Option<String>> {
        Ok(Some(v.to_string()))
    }

    fn serialize_u8(self, v: u8) -> Result<Option<String>> {
        Ok(Some(v.to_string()))
    }

    fn serialize_u16(self, v: u16) -> Result<Option<String>> {
        Ok(Some(v.to_string()))
    }

    fn serialize_u32(self, v: u32) -> Result<Option<String>> {
        Ok(Some(v.to_string()))
    }

    fn serialize_u64(self, v: u64) -> Result<Option<String>> {
        Ok(Some(v.to_string()))
    }

    fn serialize_u128(self, v: u128) -> Result<Option<String>> {
        Ok(Some(v.to_string()))
    }

    // `Display` for floats is the shortest text that parses back to the same value.
    fn serialize_f32(self, v: f32) -> Result<Option<String>> {
        Ok(Some(v.to_string()))
    }

    fn serialize_f64(self, v: f64) -> Result<Option<String>> {
        Ok(Some(v.to_string()))
    }

    fn serialize_char(self, v: char) -> Result<Option<String>> {
        Ok(Some(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Result<Option<String>> {
        Ok(Some(v.to_string()))
    }

    fn serialize_bytes(self, _v: &[u8]) -> Result<Option<String>> {
        Err(self.nested("byte array"))
    }

    fn serialize_none(self) -> Result<Option<String>> {
        Ok(None)
    }

    fn serialize_some<T>(self, value: &T) -> Result<Option<String>>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Option<String>> {
        Ok(Some(String::new()))
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Option<String>> {
        Ok(Some(String::new()))
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Option<String>> {
        Ok(Some(variant.to_string()))
    }

    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> Result<Option<String>>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _value: &T,
    ) -> Result<Option<String>>
    where
        T: ?Sized + Serialize,
    {
        Err(self.nested("enum with data"))
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq> {
        Err(self.nested("sequence"))
    }

    fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple> {
        Err(self.nested("tuple"))
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleStruct> {
        Err(self.nested("tuple struct"))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant> {
        Err(self.nested("enum with data"))
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap> {
        Err(self.nested("map"))
    }

    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<Self::SerializeStruct> {
        Err(self.nested("struct"))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant> {
        Err(self.nested("enum with data"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{decode, Separator};
    use serde::Serialize;
    use std::collections::BTreeMap;

    #[test]
    fn test_encode_empty() {
        assert_eq!(encode(&Dsn::new()), "");
    }

    #[test]
    fn test_encode_keeps_insertion_order() {
        let map: Dsn = [("b", "1"), ("a", ""), ("", "x")].into_iter().collect();
        assert_eq!(encode(&map), "b=1 a= =x");
    }

    #[test]
    fn test_encode_escapes_keys_and_values() {
        let map: Dsn = [("=msg", "hello world"), ("path", r"C:\tmp")]
            .into_iter()
            .collect();
        assert_eq!(encode(&map), r"\=msg=hello\sworld path=C:\\tmp");
    }

    #[test]
    fn test_encode_sorted_with_tab() {
        let map: Dsn = [("z", "1"), ("a", "2"), ("m", "3")].into_iter().collect();
        let options = DsnOptions::canonical().with_separator(Separator::Tab);
        assert_eq!(encode_with_options(&map, &options), "a=2\tm=3\tz=1");
    }

    #[test]
    fn test_encoded_output_decodes_back() {
        let map: Dsn = [
            ("\\=1", "2"),
            ("=msg", "hello world"),
            ("quotes", r#"'single' "double""#),
            ("ctl", "a\tb\r\nc"),
        ]
        .into_iter()
        .collect();
        assert_eq!(decode(&encode(&map)).unwrap(), map);
    }

    #[derive(Serialize)]
    enum Mode {
        Disable,
        Require,
    }

    #[derive(Serialize)]
    struct Conn {
        host: String,
        port: u16,
        ssl: Mode,
        fallback: Mode,
        timeout: f64,
        password: Option<String>,
        user: Option<String>,
    }

    #[test]
    fn test_serialize_struct() {
        let conn = Conn {
            host: "10.0.0.1".to_string(),
            port: 5432,
            ssl: Mode::Require,
            fallback: Mode::Disable,
            timeout: 1.5,
            password: None,
            user: Some("app user".to_string()),
        };
        let mut ser = Serializer::new();
        conn.serialize(&mut ser).unwrap();
        assert_eq!(
            encode(&ser.into_inner()),
            r"host=10.0.0.1 port=5432 ssl=Require fallback=Disable timeout=1.5 user=app\suser"
        );
    }

    #[test]
    fn test_serialize_map_with_scalar_keys() {
        let mut map = BTreeMap::new();
        map.insert(2, true);
        map.insert(10, false);
        let mut ser = Serializer::new();
        map.serialize(&mut ser).unwrap();
        assert_eq!(encode(&ser.into_inner()), "2=true 10=false");
    }

    #[test]
    fn test_serialize_rejects_nested_values() {
        #[derive(Serialize)]
        struct Nested {
            tags: Vec<String>,
        }

        let mut ser = Serializer::new();
        let err = Nested { tags: vec![] }.serialize(&mut ser).unwrap_err();
        assert!(matches!(err, Error::UnsupportedType(ref msg) if msg.contains("tags")));
    }

    #[test]
    fn test_serialize_rejects_scalar_top_level() {
        let mut ser = Serializer::new();
        assert!(matches!(
            42.serialize(&mut ser),
            Err(Error::UnsupportedType(_))
        ));
    }
}
