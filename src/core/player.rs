//! Player identification.
//!
//! ## PlayerId
//!
//! Opaque, unique string identifier. Players carry no other identity:
//! seating order lives in the roster, roles live in the game state.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;

/// Opaque player identifier.
///
/// Ordering is lexical and only used for stable map keys in reports;
/// turn and seat order always come from the roster.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(String);

impl PlayerId {
    /// Create a new player ID.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the raw identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Build a roster from a list of names.
    ///
    /// ```
    /// use werewolf_engine::core::PlayerId;
    ///
    /// let roster = PlayerId::roster(["Alice", "Bob"]);
    /// assert_eq!(roster.len(), 2);
    /// assert_eq!(roster[1].as_str(), "Bob");
    /// ```
    pub fn roster<I, S>(names: I) -> Vec<PlayerId>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        names.into_iter().map(PlayerId::new).collect()
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PlayerId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for PlayerId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl Borrow<str> for PlayerId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for PlayerId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
