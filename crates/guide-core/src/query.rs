//! Per-utterance query constraints.

use serde::{Deserialize, Serialize};

use crate::record::{Category, DateWindow};

/// What the user is looking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    FindEvents,
    FindConcerts,
    FindDeals,
    Unknown,
}

impl Intent {
    /// The category an intent points at, if it narrows to exactly one.
    pub fn category(&self) -> Option<Category> {
        match self {
            Self::FindConcerts => Some(Category::Concert),
            Self::FindDeals => Some(Category::Deal),
            Self::FindEvents | Self::Unknown => None,
        }
    }
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FindEvents => write!(f, "find_events"),
            Self::FindConcerts => write!(f, "find_concerts"),
            Self::FindDeals => write!(f, "find_deals"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// The venue words from the utterance and the gazetteer venues they
/// resolved to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VenueHint {
    /// Venue words as the user typed them, normalized.
    pub text: String,
    #[serde(default)]
    pub venue_ids: Vec<String>,
    /// Known names and aliases of `venue_ids`, folded like `fold_name`.
    #[serde(default)]
    pub names: Vec<String>,
}

impl VenueHint {
    /// Whether a venue name mentions the typed words or any known name of
    /// the hinted venues, on word boundaries.
    pub fn matches_name(&self, venue_name: &str) -> bool {
        let padded = format!(" {} ", fold_name(venue_name));
        std::iter::once(&self.text)
            .chain(&self.names)
            .map(|n| fold_name(n))
            .filter(|n| !n.is_empty())
            .any(|n| padded.contains(&format!(" {n} ")))
    }
}

/// Lowercase, drop apostrophes, turn other punctuation into spaces and
/// collapse whitespace: "Hendershot's" and "hendershots" fold alike.
pub fn fold_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        match c {
            '\'' | '\u{2019}' => {}
            c if c.is_alphanumeric() => out.extend(c.to_lowercase()),
            _ => out.push(' '),
        }
    }
    out.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// A normalized content term.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keyword {
    /// Stemmed form used for matching.
    pub term: String,
    /// Token as it appeared after normalization.
    pub raw: String,
    /// Relevance weight from position and specificity.
    pub weight: f64,
}

/// Everything extracted from one utterance. Built fresh per call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryConstraints {
    pub intent: Intent,
    pub date_window: Option<DateWindow>,
    pub category_hint: Option<Category>,
    pub venue_hint: Option<VenueHint>,
    pub max_price: Option<f64>,
    pub keywords: Vec<Keyword>,
}

impl Default for QueryConstraints {
    fn default() -> Self {
        Self {
            intent: Intent::Unknown,
            date_window: None,
            category_hint: None,
            venue_hint: None,
            max_price: None,
            keywords: Vec::new(),
        }
    }
}

impl QueryConstraints {
    pub fn keyword_terms(&self) -> impl Iterator<Item = &str> {
        self.keywords.iter().map(|k| k.term.as_str())
    }
}
