//! Core types for vocabulary study sessions.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Identifier of a vocabulary item.
pub type WordId = i64;

/// Per-session outcome map, keyed by word id.
pub type Outcomes = HashMap<WordId, Outcome>;

/// Vocabulary item as fetched for a unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordItem {
    pub id: WordId,
    /// Primary text shown on the card.
    pub text: String,
    /// Phonetic reading shown above the primary text.
    pub reading: String,
    /// Translation, hidden until revealed.
    pub translation: String,
}

/// Study unit as listed by the word source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    pub id: i64,
    pub title: String,
}

/// Result of a single swipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Remembered,
    NotRemembered,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Remembered => "remembered",
            Self::NotRemembered => "not_remembered",
        }
    }

    /// Parse from string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "remembered" => Some(Self::Remembered),
            "not_remembered" => Some(Self::NotRemembered),
            _ => None,
        }
    }
}

/// Which words a deck is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayFilter {
    All,
    Remembered,
    NotRemembered,
}

impl Default for DisplayFilter {
    fn default() -> Self {
        Self::All
    }
}

impl DisplayFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Remembered => "remembered",
            Self::NotRemembered => "not_remembered",
        }
    }

    /// Parse from string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "all" => Some(Self::All),
            "remembered" => Some(Self::Remembered),
            "not_remembered" => Some(Self::NotRemembered),
            _ => None,
        }
    }

    /// Whether a word with the given prior outcome passes this filter.
    ///
    /// `NotRemembered` also admits words that were never marked.
    pub fn admits(&self, prior: Option<Outcome>) -> bool {
        match self {
            Self::All => true,
            Self::Remembered => prior == Some(Outcome::Remembered),
            Self::NotRemembered => prior != Some(Outcome::Remembered),
        }
    }
}

/// Card order within a deck.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Order {
    Sequential,
    Random,
}

impl Default for Order {
    fn default() -> Self {
        Self::Sequential
    }
}

impl Order {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sequential => "sequential",
            Self::Random => "random",
        }
    }

    /// Parse from string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "sequential" => Some(Self::Sequential),
            "random" => Some(Self::Random),
            _ => None,
        }
    }
}

/// Settings read once each time a deck is built.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudySettings {
    pub filter: DisplayFilter,
    pub order: Order,
}
