//! Slots: named content partitions of a revision.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Name of a slot within a revision (e.g., "main", "ws-data").
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SlotRole(String);

impl SlotRole {
    /// The primary role every page has.
    pub const MAIN: &'static str = "main";

    pub fn new(name: &str) -> Result<Self> {
        let valid = !name.is_empty()
            && name
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_');
        if !valid {
            return Err(Error::InvalidSlotRole(name.to_string()));
        }
        Ok(Self(name.to_string()))
    }

    #[must_use]
    pub fn main() -> Self {
        Self(Self::MAIN.to_string())
    }

    #[must_use]
    pub fn is_main(&self) -> bool {
        self.0 == Self::MAIN
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SlotRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for SlotRole {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl TryFrom<String> for SlotRole {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::new(&value)
    }
}

impl From<SlotRole> for String {
    fn from(role: SlotRole) -> Self {
        role.0
    }
}

/// The format tag of a slot's content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentModel {
    #[default]
    Wikitext,
    Text,
    Json,
    Css,
    #[serde(rename = "javascript")]
    JavaScript,
}

impl ContentModel {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Wikitext => "wikitext",
            Self::Text => "text",
            Self::Json => "json",
            Self::Css => "css",
            Self::JavaScript => "javascript",
        }
    }

    /// Checks that `content` is well-formed for this model.
    pub fn validate(&self, content: &str) -> Result<()> {
        if content.contains('\0') {
            return Err(Error::InvalidContent {
                model: *self,
                reason: "content contains a NUL character".into(),
            });
        }
        match self {
            Self::Json => serde_json::from_str::<serde_json::Value>(content)
                .map(|_| ())
                .map_err(|e| Error::InvalidContent {
                    model: *self,
                    reason: e.to_string(),
                }),
            Self::Wikitext | Self::Text | Self::Css | Self::JavaScript => Ok(()),
        }
    }
}

impl fmt::Display for ContentModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentModel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "wikitext" => Ok(Self::Wikitext),
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            "css" => Ok(Self::Css),
            "javascript" => Ok(Self::JavaScript),
            other => Err(Error::UnknownContentModel(other.to_string())),
        }
    }
}

/// A slot attached to (or about to be attached to) a revision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    pub role: SlotRole,
    pub model: ContentModel,
    pub content: String,
}

impl Slot {
    pub fn new(role: SlotRole, model: ContentModel, content: impl Into<String>) -> Self {
        Self {
            role,
            model,
            content: content.into(),
        }
    }
}

/// Requested new content per slot role, consumed by one edit.
///
/// Keys are unique by construction; iteration order is by role name and
/// carries no meaning.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SlotUpdates(BTreeMap<SlotRole, String>);

impl SlotUpdates {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the requested content for `role`, replacing any earlier value.
    pub fn set(&mut self, role: SlotRole, content: impl Into<String>) -> &mut Self {
        self.0.insert(role, content.into());
        self
    }

    /// Builder-style variant of [`SlotUpdates::set`].
    #[must_use]
    pub fn with(mut self, role: SlotRole, content: impl Into<String>) -> Self {
        self.set(role, content);
        self
    }

    #[must_use]
    pub fn get(&self, role: &SlotRole) -> Option<&str> {
        self.0.get(role).map(String::as_str)
    }

    #[must_use]
    pub fn contains(&self, role: &SlotRole) -> bool {
        self.0.contains_key(role)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&SlotRole, &str)> {
        self.0.iter().map(|(role, content)| (role, content.as_str()))
    }
}

impl FromIterator<(SlotRole, String)> for SlotUpdates {
    fn from_iter<I: IntoIterator<Item = (SlotRole, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
