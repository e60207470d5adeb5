//! The DSN mapping type and its typed accessors.
//!
//! [`Dsn`] is a thin wrapper around [`IndexMap`] from string keys to string values.
//! A DSN mapping has no meaningful order: two mappings with the same pairs compare
//! equal whatever order they were built in. Iteration follows insertion (or decode)
//! order, which keeps output predictable without making it part of the format.
//!
//! ## Typed accessors
//!
//! Values are always stored as text. The `get_*` accessors convert on read and fall
//! back to the supplied default when the key is missing or the text does not parse.
//! They never fail. The `set_*` accessors format the value as canonical decimal text.
//!
//! ```rust
//! use serde_dsn::Dsn;
//!
//! let mut dsn: Dsn = "server=127.0.0.1 port=80 sslmode=true timeout=1.5".parse().unwrap();
//!
//! assert_eq!(dsn.get_string("server", "localhost"), "127.0.0.1");
//! assert_eq!(dsn.get_int("port", 443), 80);
//! assert_eq!(dsn.get_int("timeout", 2), 2);
//! assert!(dsn.get_bool("sslmode", false));
//!
//! dsn.set_float("timeout", 5.0);
//! assert_eq!(dsn.get_string("timeout", ""), "5.000000");
//! ```

use crate::{de, ser, Error};
use indexmap::IndexMap;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// A mapping of DSN keys to values.
///
/// # Examples
///
/// ```rust
/// use serde_dsn::Dsn;
///
/// let mut dsn = Dsn::new();
/// dsn.insert("host", "db.internal");
/// dsn.insert("user", "admin");
///
/// assert_eq!(dsn.len(), 2);
/// assert_eq!(dsn.get("host"), Some("db.internal"));
/// assert_eq!(dsn.to_string(), "host=db.internal user=admin");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dsn(IndexMap<String, String>);

impl Dsn {
    /// Creates an empty `Dsn`.
    ///
    /// ```rust
    /// use serde_dsn::Dsn;
    ///
    /// let dsn = Dsn::new();
    /// assert!(dsn.is_empty());
    /// assert_eq!(dsn.to_string(), "");
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Dsn(IndexMap::new())
    }

    /// Creates an empty `Dsn` with the specified capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Dsn(IndexMap::with_capacity(capacity))
    }

    /// Inserts a key-value pair, returning the previous value if the key was present.
    ///
    /// Overwriting keeps the key's original position.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(key.into(), value.into())
    }

    /// Removes a key, returning its value if it was present.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.0.shift_remove(key)
    }

    /// Returns the value stored for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Returns `true` if the mapping holds `key`.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Returns the number of pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the mapping holds no pairs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns an iterator over the keys, in insertion order.
    pub fn keys(&self) -> indexmap::map::Keys<'_, String, String> {
        self.0.keys()
    }

    /// Returns an iterator over the values, in insertion order.
    pub fn values(&self) -> indexmap::map::Values<'_, String, String> {
        self.0.values()
    }

    /// Returns an iterator over the pairs, in insertion order.
    pub fn iter(&self) -> indexmap::map::Iter<'_, String, String> {
        self.0.iter()
    }

    /// Commits a decoded pair. Fails if the key is already present.
    pub(crate) fn try_insert(&mut self, key: String, value: String, column: usize) -> crate::Result<()> {
        match self.0.entry(key) {
            indexmap::map::Entry::Occupied(entry) => {
                Err(Error::key_already_exists(entry.key(), column))
            }
            indexmap::map::Entry::Vacant(entry) => {
                entry.insert(value);
                Ok(())
            }
        }
    }

    /// Returns the stored value, or `default` if the key is absent.
    #[must_use]
    pub fn get_string<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.get(key).unwrap_or(default)
    }

    /// Inserts or overwrites a string value.
    pub fn set_string(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.insert(key, value);
    }

    /// Returns the value parsed as a base-10 `i32`, or `default`.
    ///
    /// Values outside the `i32` range fall back to `default`; nothing is clamped.
    ///
    /// ```rust
    /// use serde_dsn::Dsn;
    ///
    /// let dsn: Dsn = "port=8080 big=3000000000 name=db".parse().unwrap();
    /// assert_eq!(dsn.get_int("port", 0), 8080);
    /// assert_eq!(dsn.get_int("big", -1), -1);
    /// assert_eq!(dsn.get_int("name", 7), 7);
    /// ```
    #[must_use]
    pub fn get_int(&self, key: &str, default: i32) -> i32 {
        self.parsed(key).unwrap_or(default)
    }

    /// Stores an `i32` as decimal text.
    pub fn set_int(&mut self, key: impl Into<String>, value: i32) {
        self.insert(key, value.to_string());
    }

    /// Returns the value parsed as a base-10 `i64`, or `default`.
    #[must_use]
    pub fn get_int64(&self, key: &str, default: i64) -> i64 {
        self.parsed(key).unwrap_or(default)
    }

    /// Stores an `i64` as decimal text.
    pub fn set_int64(&mut self, key: impl Into<String>, value: i64) {
        self.insert(key, value.to_string());
    }

    /// Returns the value parsed as a boolean, or `default`.
    ///
    /// Accepted spellings are `1 t T TRUE true True` and `0 f F FALSE false False`.
    #[must_use]
    pub fn get_bool(&self, key: &str, default: bool) -> bool {
        self.get(key).and_then(parse_bool).unwrap_or(default)
    }

    /// Stores a boolean as `true` or `false`.
    pub fn set_bool(&mut self, key: impl Into<String>, value: bool) {
        self.insert(key, value.to_string());
    }

    /// Returns the value parsed as an `f64`, or `default`.
    #[must_use]
    pub fn get_float(&self, key: &str, default: f64) -> f64 {
        self.parsed(key).unwrap_or(default)
    }

    /// Stores an `f64` with exactly six fractional digits.
    pub fn set_float(&mut self, key: impl Into<String>, value: f64) {
        self.insert(key, format!("{value:.6}"));
    }

    fn parsed<T: FromStr>(&self, key: &str) -> Option<T> {
        self.get(key).and_then(|v| v.parse().ok())
    }
}

/// Parses the boolean spellings accepted by [`Dsn::get_bool`].
pub(crate) fn parse_bool(s: &str) -> Option<bool> {
    match s {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

impl FromStr for Dsn {
    type Err = Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        de::decode(s)
    }
}

impl fmt::Display for Dsn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&ser::encode(self))
    }
}

impl From<HashMap<String, String>> for Dsn {
    fn from(map: HashMap<String, String>) -> Self {
        Dsn(map.into_iter().collect())
    }
}

impl From<Dsn> for HashMap<String, String> {
    fn from(map: Dsn) -> Self {
        map.0.into_iter().collect()
    }
}

impl IntoIterator for Dsn {
    type Item = (String, String);
    type IntoIter = indexmap::map::IntoIter<String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Dsn {
    type Item = (&'a String, &'a String);
    type IntoIter = indexmap::map::Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Dsn {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Dsn(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl Serialize for Dsn {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (k, v) in self {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Dsn {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct DsnVisitor;

        impl<'de> Visitor<'de> for DsnVisitor {
            type Value = Dsn;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of strings")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Dsn, A::Error> {
                let mut map = Dsn::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((k, v)) = access.next_entry::<String, String>()? {
                    map.insert(k, v);
                }
                Ok(map)
            }
        }

        deserializer.deserialize_map(DsnVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Dsn {
        "server=127.0.0.1 port=80 sslmode=true single=1 keepalive=false domain=test.ru timeout=1.5"
            .parse()
            .unwrap()
    }

    #[test]
    fn test_get_set_string() {
        let mut dsn = sample();
        assert_eq!(dsn.get_string("server", "!!!"), "127.0.0.1");
        assert_eq!(dsn.get_string("server1", "!!!"), "!!!");

        dsn.set_string("server", "192.168.1.1");
        assert_eq!(dsn.get_string("server", "!!!"), "192.168.1.1");
    }

    #[test]
    fn test_get_set_int() {
        let mut dsn = sample();
        assert_eq!(dsn.get_int("port", 443), 80);
        assert_eq!(dsn.get_int("timeout", 2), 2);

        dsn.set_int("port", 8080);
        assert_eq!(dsn.get_int("port", 443), 8080);
        assert_eq!(dsn.get_int64("port", 443), 8080);
        assert_eq!(dsn.get_int64("timeout", 2), 2);

        dsn.set_int64("port", 80);
        assert_eq!(dsn.get_int64("port", 443), 80);
    }

    #[test]
    fn test_int_overflow_falls_back_to_default() {
        let mut dsn = Dsn::new();
        dsn.set_int64("big", i64::from(i32::MAX) + 1);
        assert_eq!(dsn.get_int("big", 5), 5);
        assert_eq!(dsn.get_int64("big", 5), 2_147_483_648);

        dsn.set_string("huge", "99999999999999999999");
        assert_eq!(dsn.get_int64("huge", -1), -1);

        dsn.set_string("signed", "+42");
        assert_eq!(dsn.get_int("signed", 0), 42);
        dsn.set_string("spaced", " 42");
        assert_eq!(dsn.get_int("spaced", 0), 0);
    }

    #[test]
    fn test_get_set_bool() {
        let mut dsn = sample();
        assert!(dsn.get_bool("sslmode", false));
        assert!(!dsn.get_bool("server", false));
        assert!(!dsn.get_bool("keepalive", true));
        assert!(dsn.get_bool("single", false));

        dsn.set_bool("single", false);
        assert!(!dsn.get_bool("single", true));
        assert_eq!(dsn.get("single"), Some("false"));
    }

    #[test]
    fn test_bool_spellings() {
        for s in ["1", "t", "T", "TRUE", "true", "True"] {
            assert_eq!(parse_bool(s), Some(true), "{s}");
        }
        for s in ["0", "f", "F", "FALSE", "false", "False"] {
            assert_eq!(parse_bool(s), Some(false), "{s}");
        }
        for s in ["", "yes", "tRUE", "2", "on"] {
            assert_eq!(parse_bool(s), None, "{s}");
        }
    }

    #[test]
    fn test_get_set_float() {
        let mut dsn = sample();
        assert_eq!(dsn.get_float("timeout", 2.0), 1.5);
        assert_eq!(dsn.get_float("server", 12.0), 12.0);

        dsn.set_float("timeout", 5.0);
        assert_eq!(dsn.get_float("timeout", 2.0), 5.0);
        assert_eq!(dsn.get("timeout"), Some("5.000000"));

        dsn.set_float("ratio", -0.1234567);
        assert_eq!(dsn.get("ratio"), Some("-0.123457"));
    }

    #[test]
    fn test_equality_ignores_order() {
        let a: Dsn = "a=1 b=2".parse().unwrap();
        let b: Dsn = "b=2 a=1".parse().unwrap();
        assert_eq!(a, b);
        assert_ne!(a.keys().next(), b.keys().next());
    }

    #[test]
    fn test_insert_overwrite_keeps_position() {
        let mut dsn: Dsn = [("a", "1"), ("b", "2")].into_iter().collect();
        assert_eq!(dsn.insert("a", "3"), Some("1".to_string()));
        assert_eq!(dsn.keys().collect::<Vec<_>>(), ["a", "b"]);
        assert_eq!(dsn.remove("a"), Some("3".to_string()));
        assert!(!dsn.contains_key("a"));
    }

    #[test]
    fn test_set_values_are_escaped_on_encode() {
        let mut dsn = Dsn::new();
        dsn.set_string("greeting", "hi there");
        assert_eq!(dsn.to_string(), r"greeting=hi\sthere");
    }

    #[test]
    fn test_hashmap_conversions() {
        let mut hm = HashMap::new();
        hm.insert("k".to_string(), "v w".to_string());
        let dsn = Dsn::from(hm.clone());
        assert_eq!(HashMap::from(dsn), hm);
    }
}
