//! Normalized page titles.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Characters that can never appear in a page title.
const ILLEGAL_CHARS: &[char] = &['#', '<', '>', '[', ']', '|', '{', '}'];

/// Maximum encoded length of a title, in bytes.
pub const MAX_TITLE_BYTES: usize = 255;

/// A page title in canonical form.
///
/// Underscores and spaces are interchangeable, surrounding whitespace is
/// dropped, internal runs of whitespace collapse to one space and the first
/// character is upper-cased. Two inputs that normalize to the same string
/// name the same page.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Title(String);

impl Title {
    /// Normalizes and validates a raw title.
    pub fn new(raw: &str) -> Result<Self> {
        let spaced = raw.replace('_', " ");
        let collapsed = spaced.split_whitespace().collect::<Vec<_>>().join(" ");

        if collapsed.is_empty() {
            return Err(Error::InvalidTitle("title is empty".into()));
        }
        if let Some(c) = collapsed.chars().find(|c| ILLEGAL_CHARS.contains(c)) {
            return Err(Error::InvalidTitle(format!(
                "title contains illegal character '{c}'"
            )));
        }
        if collapsed.chars().any(char::is_control) {
            return Err(Error::InvalidTitle("title contains control characters".into()));
        }

        let mut chars = collapsed.chars();
        let normalized: String = match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => collapsed,
        };
        // Upper-casing can grow the first character, so measure afterwards.
        if normalized.len() > MAX_TITLE_BYTES {
            return Err(Error::InvalidTitle(format!(
                "title exceeds {MAX_TITLE_BYTES} bytes"
            )));
        }
        Ok(Self(normalized))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The underscore form used in URLs.
    #[must_use]
    pub fn db_key(&self) -> String {
        self.0.replace(' ', "_")
    }
}

impl fmt::Display for Title {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Title {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl TryFrom<String> for Title {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::new(&value)
    }
}

impl From<Title> for String {
    fn from(title: Title) -> Self {
        title.0
    }
}
