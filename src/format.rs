//! DSN Format Reference
//!
//! This module documents the DSN text format as implemented by this library.
//!
//! # Overview
//!
//! A DSN string is one line of whitespace-separated `key=value` pairs:
//!
//! ```text
//! server=127.0.0.1 port=80 sslmode=true timeout=1.5 empty=
//! ```
//!
//! # Grammar
//!
//! ```text
//! dsn    := ws* (pair (ws+ pair)*)? ws*
//! pair   := key "=" value
//! key    := char*
//! value  := char*
//! char   := <any code point except whitespace, "=" and "\"> | escape
//! escape := "\" ( "\" | "'" | '"' | "s" | "t" | "r" | "n" | " " | "=" )
//! ws     := <any Unicode whitespace>
//! ```
//!
//! **Rules**:
//! - Keys and values may be empty: `=` is the pair `("", "")`, `key=` has an empty value
//! - Every key needs an `=`: a bare word such as `debug` is rejected
//! - An unescaped `=` inside a value is rejected: `a=b=c` and `a==b` are errors
//! - Whitespace inside a key is rejected. Whitespace after a value ends the pair.
//! - Keys are unique: the second occurrence of a key is an error
//! - Leading, trailing and repeated whitespace between pairs is ignored
//!
//! # Escapes
//!
//! | Escape | Meaning | Produced by the encoder |
//! |--------|---------|-------------------------|
//! | `\s`   | space   | yes |
//! | `\ `   | space   | no (accepted when decoding only) |
//! | `\t`   | tab     | yes |
//! | `\r`   | CR      | yes |
//! | `\n`   | LF      | yes |
//! | `\"`   | `"`     | yes |
//! | `\'`   | `'`     | yes |
//! | `\\`   | `\`     | yes |
//! | `\=`   | `=`     | yes |
//!
//! A backslash followed by any other character, or a backslash at the very end of the
//! input, is an error.
//!
//! Quotes carry no special meaning to the decoder. They are escaped on output so that
//! encoded values remain safe to embed in quoted contexts.
//!
//! # Round Trips
//!
//! - `decode(encode(m)) == m` for every mapping `m` whose strings contain no whitespace
//!   other than space, tab, CR and LF. Other whitespace (for example U+00A0) has no
//!   escape and would split the pair when decoded.
//! - `encode(decode(s))` need not equal `s`. Escape spelling (`\ ` becomes `\s`) and
//!   separators (any whitespace run becomes one space) are normalized, but the decoded
//!   meaning is unchanged.
//! - Pair order carries no meaning. Use [`DsnOptions::canonical`](crate::DsnOptions::canonical)
//!   when byte-stable output is required.
//!
//! # Errors
//!
//! | Input | Error |
//! |-------|-------|
//! | `t` | parse error at column 2 (key without `=`) |
//! | `test==true` | parse error at column 6 (stray `=`) |
//! | `ans\wer=Hi` | parse error at column 5 (unknown escape) |
//! | `answer=Hi\` | parse error at column 11 (dangling escape) |
//! | `1= test=true 1=12` | key already exists at column 14 |
