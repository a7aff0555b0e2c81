//! Event, concert and deal records plus the date window they are filtered by.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Closed set of record kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Event,
    Concert,
    Deal,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Event, Category::Concert, Category::Deal];
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Event => write!(f, "event"),
            Self::Concert => write!(f, "concert"),
            Self::Deal => write!(f, "deal"),
        }
    }
}

/// Where a record takes place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Venue {
    /// Normalized display name.
    pub name: String,
    /// Canonical gazetteer id, when the acquisition side resolved one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub venue_id: Option<String>,
}

impl Venue {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            venue_id: None,
        }
    }

    pub fn with_id(name: impl Into<String>, venue_id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            venue_id: Some(venue_id.into()),
        }
    }
}

/// A single event, concert or deal.
///
/// Times are local wall-clock times of the area the guide covers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    pub id: String,
    pub category: Category,
    pub title: String,
    pub venue: Venue,
    pub start_time: NaiveDateTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<NaiveDateTime>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    /// Last refresh from the originating source. Staleness only.
    pub source_updated_at: NaiveDateTime,
}

impl EventRecord {
    /// End of the record's interval; a record without an end is an instant.
    pub fn effective_end(&self) -> NaiveDateTime {
        self.end_time.unwrap_or(self.start_time)
    }

    /// Whether `[start_time, effective_end]` intersects the window.
    pub fn overlaps(&self, window: &DateWindow) -> bool {
        window.intersects(self.start_time, self.effective_end())
    }

    pub fn is_free(&self) -> bool {
        self.price == Some(0.0)
    }

    /// Content hash of the canonical JSON form.
    pub fn fingerprint(&self) -> String {
        let canonical = serde_json::to_vec(self).unwrap_or_default();
        hex::encode(Sha256::digest(&canonical))
    }
}

/// Half-open interval `[from, to)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    pub from: NaiveDateTime,
    pub to: NaiveDateTime,
}

impl DateWindow {
    /// Returns `None` for an empty or inverted interval.
    pub fn new(from: NaiveDateTime, to: NaiveDateTime) -> Option<Self> {
        (from < to).then_some(Self { from, to })
    }

    /// The whole calendar days `[first, last]`.
    pub fn days(first: NaiveDate, last: NaiveDate) -> Option<Self> {
        let from = first.and_hms_opt(0, 0, 0)?;
        let to = last.succ_opt()?.and_hms_opt(0, 0, 0)?;
        Self::new(from, to)
    }

    pub fn contains(&self, at: NaiveDateTime) -> bool {
        self.from <= at && at < self.to
    }

    /// Whether the closed interval `[start, end]` touches this window.
    pub fn intersects(&self, start: NaiveDateTime, end: NaiveDateTime) -> bool {
        start < self.to && end >= self.from
    }

    /// Smallest window covering both.
    pub fn hull(&self, other: &DateWindow) -> DateWindow {
        DateWindow {
            from: self.from.min(other.from),
            to: self.to.max(other.to),
        }
    }
}
