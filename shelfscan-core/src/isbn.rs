//! ISBN extraction from free-form text

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

/// Optional "ISBN"/"ISBN-13" prefix, optional colon and whitespace, then 10-13 ASCII digits.
static ISBN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:ISBN(?:-13)?:?\s*)?([0-9]{10,13})").expect("ISBN regex must compile")
});

/// A normalized ISBN: 10 to 13 ASCII digits
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Isbn(String);

impl Isbn {
    /// Wrap a digit run, rejecting anything that is not 10-13 ASCII digits
    pub fn new(digits: impl Into<String>) -> Option<Self> {
        let digits = digits.into();
        let valid = (10..=13).contains(&digits.len()) && digits.bytes().all(|b| b.is_ascii_digit());
        valid.then_some(Self(digits))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Key used by the bibliographic lookup service (`ISBN:<digits>`)
    pub fn bibkey(&self) -> String {
        format!("ISBN:{}", self.0)
    }
}

impl fmt::Display for Isbn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Isbn {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Isbn::new(value.clone()).ok_or_else(|| format!("'{}' is not a 10-13 digit ISBN", value))
    }
}

impl From<Isbn> for String {
    fn from(isbn: Isbn) -> Self {
        isbn.0
    }
}

/// Find the first ISBN-like digit run in `text`
///
/// Returns `None` when nothing matches. That is an expected outcome, not an error.
pub fn parse_isbn(text: &str) -> Option<Isbn> {
    ISBN_RE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| Isbn(m.as_str().to_string()))
}
