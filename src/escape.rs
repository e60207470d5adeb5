//! Escape tables shared by the decoder and the encoder.
//!
//! DSN reserves a small set of characters. Inside a key or a value they are written
//! as a backslash followed by an introducer character:
//!
//! | Literal | Escape |
//! |---------|--------|
//! | space   | `\s`   |
//! | tab     | `\t`   |
//! | LF      | `\n`   |
//! | CR      | `\r`   |
//! | `"`     | `\"`   |
//! | `'`     | `\'`   |
//! | `\`     | `\\`   |
//! | `=`     | `\=`   |
//!
//! Decoding additionally accepts `\ ` (backslash followed by a literal space) as a
//! second spelling of `\s`. Encoding only ever produces `\s`.
//!
//! ## Examples
//!
//! ```rust
//! use serde_dsn::escape::{escape, unescape_char};
//!
//! assert_eq!(escape("1+2=3"), "1+2\\=3");
//! assert_eq!(unescape_char('s'), Some(' '));
//! assert_eq!(unescape_char('w'), None);
//! ```

use std::borrow::Cow;

/// Maps an escape introducer (the character after `\`) to the literal it stands for.
///
/// Returns `None` for anything outside the table, which the decoder reports as a
/// parse error.
#[inline]
#[must_use]
pub const fn unescape_char(introducer: char) -> Option<char> {
    match introducer {
        '\\' => Some('\\'),
        '\'' => Some('\''),
        '"' => Some('"'),
        's' => Some(' '),
        't' => Some('\t'),
        'r' => Some('\r'),
        'n' => Some('\n'),
        ' ' => Some(' '),
        '=' => Some('='),
        _ => None,
    }
}

/// Maps a literal character to its two-character escape sequence, if it needs one.
#[inline]
#[must_use]
pub const fn escape_char(literal: char) -> Option<&'static str> {
    match literal {
        ' ' => Some(r"\s"),
        '\t' => Some(r"\t"),
        '\n' => Some(r"\n"),
        '\r' => Some(r"\r"),
        '"' => Some(r#"\""#),
        '\'' => Some(r"\'"),
        '\\' => Some(r"\\"),
        '=' => Some(r"\="),
        _ => None,
    }
}

/// Returns `true` if any character of `s` has to be escaped.
#[inline]
#[must_use]
pub fn needs_escape(s: &str) -> bool {
    s.chars().any(|ch| escape_char(ch).is_some())
}

/// Escapes every reserved character in `s`.
///
/// Strings with nothing to escape are returned borrowed.
///
/// # Examples
///
/// ```rust
/// use serde_dsn::escape::escape;
/// use std::borrow::Cow;
///
/// assert!(matches!(escape("plain"), Cow::Borrowed("plain")));
/// assert_eq!(escape("Hello, World!"), "Hello,\\sWorld!");
/// ```
#[must_use]
pub fn escape(s: &str) -> Cow<'_, str> {
    if !needs_escape(s) {
        return Cow::Borrowed(s);
    }

    // Every escaped character grows by one byte at most.
    let mut out = String::with_capacity(s.len() + s.len() / 2);
    for ch in s.chars() {
        match escape_char(ch) {
            Some(seq) => out.push_str(seq),
            None => out.push(ch),
        }
    }
    Cow::Owned(out)
}

/// Returns `true` if `s` survives an encode/decode round trip unchanged.
///
/// Whitespace other than space, tab, CR and LF has no escape sequence, so an encoded
/// string containing it would be split at that character when decoded.
///
/// ```rust
/// use serde_dsn::escape::is_representable;
///
/// assert!(is_representable("a b\tc"));
/// assert!(!is_representable("a\u{00A0}b"));
/// ```
#[must_use]
pub fn is_representable(s: &str) -> bool {
    s.chars()
        .all(|ch| !ch.is_whitespace() || escape_char(ch).is_some())
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESERVED: [char; 8] = [' ', '\t', '\n', '\r', '"', '\'', '\\', '='];

    #[test]
    fn test_every_escape_sequence_unescapes_to_its_literal() {
        for literal in RESERVED {
            let seq = escape_char(literal).unwrap();
            let mut chars = seq.chars();
            assert_eq!(chars.next(), Some('\\'));
            let introducer = chars.next().unwrap();
            assert_eq!(chars.next(), None);
            assert_eq!(unescape_char(introducer), Some(literal));
        }
    }

    #[test]
    fn test_escaped_space_is_accepted_but_never_produced() {
        assert_eq!(unescape_char(' '), Some(' '));
        assert_eq!(escape_char(' '), Some(r"\s"));
    }

    #[test]
    fn test_unknown_introducers() {
        for ch in ['w', 'a', '0', 'u', 'x', '\u{00A0}', 'S'] {
            assert_eq!(unescape_char(ch), None, "{ch:?} should not be an introducer");
        }
    }

    #[test]
    fn test_escape_borrows_plain_strings() {
        assert!(matches!(escape(""), Cow::Borrowed("")));
        assert!(matches!(escape("127.0.0.1"), Cow::Borrowed(_)));
        assert!(matches!(escape("привет"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_escape_mixed() {
        assert_eq!(escape(r#"a b=c\d"e'f"#), r#"a\sb\=c\\d\"e\'f"#);
        assert_eq!(escape("line\r\nnext\tcol"), r"line\r\nnext\tcol");
    }

    #[test]
    fn test_is_representable() {
        assert!(is_representable(""));
        assert!(is_representable("x = \"y\"\r\n"));
        assert!(!is_representable("tab\u{000B}vertical"));
        assert!(!is_representable("ideographic\u{3000}space"));
    }
}
