//! Configuration options for DSN encoding.
//!
//! This module provides types to customize encoder output:
//!
//! - [`DsnOptions`]: Main configuration struct
//! - [`Separator`]: Whitespace written between pairs (space or tab)
//!
//! Decoding needs no options: any run of whitespace separates pairs, so output
//! produced with any of these settings decodes to the same mapping.
//!
//! ## Examples
//!
//! ```rust
//! use serde_dsn::{dsn, encode_with_options, DsnOptions, Separator};
//!
//! let map = dsn! { "port" => 80, "host" => "localhost" };
//!
//! let options = DsnOptions::canonical();
//! assert_eq!(encode_with_options(&map, &options), "host=localhost port=80");
//!
//! let options = DsnOptions::new().with_separator(Separator::Tab);
//! assert_eq!(encode_with_options(&map, &options), "port=80\thost=localhost");
//! ```

/// Whitespace placed between encoded pairs.
///
/// # Examples
///
/// ```rust
/// use serde_dsn::Separator;
///
/// assert_eq!(Separator::Space.as_str(), " ");
/// assert_eq!(Separator::Tab.as_str(), "\t");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Separator {
    #[default]
    Space,
    Tab,
}

impl Separator {
    /// Returns the string representation of this separator.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Separator::Space => " ",
            Separator::Tab => "\t",
        }
    }
}

/// Configuration options for DSN encoding.
///
/// # Examples
///
/// ```rust
/// use serde_dsn::{DsnOptions, Separator};
///
/// // Insertion order, single spaces
/// let options = DsnOptions::new();
///
/// // Keys sorted for byte-stable output
/// let options = DsnOptions::canonical();
///
/// // Custom configuration
/// let options = DsnOptions::new()
///     .with_separator(Separator::Tab)
///     .with_sort_keys(true);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DsnOptions {
    pub separator: Separator,
    pub sort_keys: bool,
}

impl DsnOptions {
    /// Creates default options (space separator, insertion order).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_dsn::{DsnOptions, Separator};
    ///
    /// let options = DsnOptions::new();
    /// assert_eq!(options.separator, Separator::Space);
    /// assert!(!options.sort_keys);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates options whose output depends only on the mapping's contents.
    ///
    /// Pairs are written in byte order of their unescaped keys.
    #[must_use]
    pub fn canonical() -> Self {
        DsnOptions {
            sort_keys: true,
            ..Default::default()
        }
    }

    /// Sets the separator written between pairs.
    #[must_use]
    pub fn with_separator(mut self, separator: Separator) -> Self {
        self.separator = separator;
        self
    }

    /// Enables or disables key sorting.
    #[must_use]
    pub fn with_sort_keys(mut self, sort_keys: bool) -> Self {
        self.sort_keys = sort_keys;
        self
    }
}
