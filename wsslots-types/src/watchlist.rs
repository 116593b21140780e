//! Watchlist preference carried by an edit.

use crate::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// What an edit should do to the editor's watch-state for the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WatchlistPref {
    Watch,
    Unwatch,
    /// Follow the actor's stored [`WatchPreferences`].
    Preferences,
    #[default]
    NoChange,
}

impl WatchlistPref {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Watch => "watch",
            Self::Unwatch => "unwatch",
            Self::Preferences => "preferences",
            Self::NoChange => "nochange",
        }
    }
}

impl fmt::Display for WatchlistPref {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WatchlistPref {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "watch" => Ok(Self::Watch),
            "unwatch" => Ok(Self::Unwatch),
            "preferences" => Ok(Self::Preferences),
            "nochange" => Ok(Self::NoChange),
            other => Err(Error::InvalidWatchlist(other.to_string())),
        }
    }
}

/// Per-actor defaults consulted for [`WatchlistPref::Preferences`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchPreferences {
    /// Add every edited page to the watchlist.
    pub watch_edits: bool,
    /// Add pages the actor creates to the watchlist.
    pub watch_creations: bool,
}

impl Default for WatchPreferences {
    fn default() -> Self {
        Self {
            watch_edits: false,
            watch_creations: true,
        }
    }
}

impl WatchPreferences {
    /// Whether an edit should add the page to the watchlist.
    ///
    /// Preferences only ever add watches; they never remove one.
    #[must_use]
    pub fn wants_watch(&self, created: bool) -> bool {
        self.watch_edits || (created && self.watch_creations)
    }
}
