//! Colors used to style cases and links.
//!
//! [`Color`] accepts any CSS color string understood by the `color` crate and
//! renders back to the same CSS form, so palette entries and configured
//! backgrounds can be written straight into SVG attributes.

use std::{
    fmt,
    hash::{Hash, Hasher},
    str::FromStr,
};

use color::DynamicColor;
use thiserror::Error;

/// Error returned when a string is not a CSS color.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid color `{input}`: {reason}")]
pub struct InvalidColor {
    input: String,
    reason: String,
}

impl InvalidColor {
    /// The rejected color string
    pub fn input(&self) -> &str {
        &self.input
    }
}

/// A parsed CSS color.
///
/// ```
/// use outbreak_core::color::Color;
///
/// let border = Color::new("#404040").unwrap();
/// assert_ne!(border, Color::new("white").unwrap());
/// assert!(Color::new("not-a-color").is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Color(DynamicColor);

impl Color {
    /// Parses a CSS color string such as `#a3a3a3`, `rgb(23, 23, 23)` or `white`.
    pub fn new(css: &str) -> Result<Self, InvalidColor> {
        DynamicColor::from_str(css)
            .map(Self)
            .map_err(|err| InvalidColor {
                input: css.to_string(),
                reason: err.to_string(),
            })
    }

    /// Returns a form of the color usable inside an SVG `id`.
    ///
    /// `#` becomes `hex`, other punctuation becomes `_`, and a leading digit
    /// gets a `c_` prefix.
    pub fn to_id_safe_string(self) -> String {
        let css = self.to_string();
        let mut id = String::with_capacity(css.len() + 2);
        for c in css.chars() {
            match c {
                '#' => id.push_str("hex"),
                c if c.is_ascii_alphanumeric() => id.push(c),
                _ => id.push('_'),
            }
        }

        if id.starts_with(|c: char| c.is_ascii_digit()) {
            id.insert_str(0, "c_");
        }
        id
    }
}

impl Eq for Color {}

// Colors that print the same are the same marker and palette key
impl Hash for Color {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.to_string().hash(state);
    }
}

impl FromStr for Color {
    type Err = InvalidColor;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl From<Color> for svg::node::Value {
    fn from(color: Color) -> Self {
        Self::from(color.to_string())
    }
}
