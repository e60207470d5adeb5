/// Builds a [`Dsn`](crate::Dsn) from `key => value` pairs.
///
/// Keys and values may be any expression implementing `ToString`. A repeated key
/// overwrites the earlier value, like [`Dsn::insert`](crate::Dsn::insert).
///
/// ```rust
/// use serde_dsn::dsn;
///
/// let map = dsn! { "host" => "localhost", "port" => 5432, "tls" => true };
/// assert_eq!(map.to_string(), "host=localhost port=5432 tls=true");
/// ```
#[macro_export]
macro_rules! dsn {
    () => {
        $crate::Dsn::new()
    };

    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut map = $crate::Dsn::new();
        $(
            map.insert($key.to_string(), $value.to_string());
        )+
        map
    }};
}

#[cfg(test)]
mod tests {
    use crate::Dsn;

    #[test]
    fn test_dsn_macro_empty() {
        assert_eq!(dsn!(), Dsn::new());
        assert_eq!(dsn! {}, Dsn::new());
    }

    #[test]
    fn test_dsn_macro_pairs() {
        let port = 8080;
        let map = dsn! {
            "host" => "example.com",
            "port" => port,
            "ratio" => 0.5,
            "flag" => false,
        };

        assert_eq!(map.len(), 4);
        assert_eq!(map.get("host"), Some("example.com"));
        assert_eq!(map.get_int("port", 0), 8080);
        assert_eq!(map.get_float("ratio", 0.0), 0.5);
        assert!(!map.get_bool("flag", true));
    }

    #[test]
    fn test_dsn_macro_overwrites() {
        let map = dsn! { "k" => 1, "k" => 2 };
        assert_eq!(map.len(), 1);
        assert_eq!(map.get("k"), Some("2"));
    }
}
