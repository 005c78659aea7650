//! [CSSOM § 2.1 Serializing an identifier](https://drafts.csswg.org/cssom/#serialize-an-identifier)
//!
//! Turns an arbitrary value into text that reads back as a single CSS
//! identifier. Used for ids, class names, tag names, and attribute values
//! placed in synthesized selectors.

use std::borrow::Cow;
use std::fmt;

use thiserror::Error;

/// Errors from [`escape_identifier`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EscapeError {
    /// "If the character is NULL (U+0000), then throw an
    /// `InvalidCharacterError` exception and terminate these steps."
    #[error("invalid character: U+0000 at position {position}")]
    InvalidCharacter {
        /// Character index of the NUL.
        position: usize,
    },
}

/// A value that can be escaped.
///
/// Non-string values are coerced to their string form first:
/// `true`/`false`, `null`, and `undefined`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CssValue<'a> {
    /// A string, escaped as-is.
    Str(Cow<'a, str>),
    /// A boolean.
    Bool(bool),
    /// An explicit null.
    Null,
    /// An absent value.
    Undefined,
}

impl CssValue<'_> {
    /// The string the value is coerced to before escaping.
    #[must_use]
    pub fn coerce(&self) -> Cow<'_, str> {
        match self {
            Self::Str(s) => Cow::Borrowed(s.as_ref()),
            Self::Bool(true) => Cow::Borrowed("true"),
            Self::Bool(false) => Cow::Borrowed("false"),
            Self::Null => Cow::Borrowed("null"),
            Self::Undefined => Cow::Borrowed("undefined"),
        }
    }
}

impl fmt::Display for CssValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.coerce())
    }
}

impl<'a> From<&'a str> for CssValue<'a> {
    fn from(value: &'a str) -> Self {
        Self::Str(Cow::Borrowed(value))
    }
}

impl<'a> From<&'a String> for CssValue<'a> {
    fn from(value: &'a String) -> Self {
        Self::Str(Cow::Borrowed(value.as_str()))
    }
}

impl From<String> for CssValue<'_> {
    fn from(value: String) -> Self {
        Self::Str(Cow::Owned(value))
    }
}

impl From<bool> for CssValue<'_> {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// An optional string: `None` reads as `undefined`, the way a missing
/// attribute does.
impl<'a> From<Option<&'a str>> for CssValue<'a> {
    fn from(value: Option<&'a str>) -> Self {
        value.map_or(Self::Undefined, Self::from)
    }
}

/// "escape a character as code point": `\` + lowercase hex + a space.
fn push_code_point_escape(out: &mut String, c: char) {
    out.push('\\');
    out.push_str(&format!("{:x}", u32::from(c)));
    out.push(' ');
}

/// Serialize `value` as a CSS identifier.
///
/// Per character, left to right:
/// 1. U+0001..=U+001F and U+007F..=U+009F are escaped as code points.
/// 2. A digit in first position is escaped as a code point.
/// 3. A digit in second position after a leading `-` is escaped as a code point.
/// 4. A second `-` after a leading `-` becomes `\-`.
/// 5. Non-ASCII, `-`, `_`, and ASCII alphanumerics pass through.
/// 6. Any other ASCII character is prefixed with `\`.
///
/// A value that is exactly `-` becomes `\-`: a lone hyphen is not an
/// identifier, so it could not be read back otherwise.
///
/// Works on `char`s. Astral characters are all above U+0080, so they pass
/// through unchanged exactly as their UTF-16 surrogate halves would.
///
/// # Errors
///
/// Returns [`EscapeError::InvalidCharacter`] if the coerced value contains
/// U+0000.
///
/// # Example
/// ```
/// use pinpoint_css::escape::escape_identifier;
///
/// assert_eq!(escape_identifier("0a").unwrap(), "\\30 a");
/// assert_eq!(escape_identifier("--a").unwrap(), "-\\-a");
/// ```
pub fn escape_identifier<'a>(value: impl Into<CssValue<'a>>) -> Result<String, EscapeError> {
    let value = value.into();
    let s = value.coerce();
    if s == "-" {
        return Ok("\\-".to_string());
    }

    let first = s.chars().next();
    let mut result = String::with_capacity(s.len());

    for (index, c) in s.chars().enumerate() {
        if c == '\0' {
            return Err(EscapeError::InvalidCharacter { position: index });
        }

        let is_control = matches!(c, '\u{1}'..='\u{1f}' | '\u{7f}'..='\u{9f}');
        let leading_digit = c.is_ascii_digit()
            && (index == 0 || (index == 1 && first == Some('-')));

        if is_control || leading_digit {
            push_code_point_escape(&mut result, c);
        } else if index == 1 && c == '-' && first == Some('-') {
            result.push_str("\\-");
        } else if !c.is_ascii() || c == '-' || c == '_' || c.is_ascii_alphanumeric() {
            result.push(c);
        } else {
            result.push('\\');
            result.push(c);
        }
    }

    Ok(result)
}
