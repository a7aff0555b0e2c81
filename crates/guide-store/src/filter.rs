//! Structured filter a query plan hands to the store.

use serde::Serialize;

use guide_core::{Category, DateWindow, EventRecord, VenueHint};

/// Category, time, venue and price predicates. A record is returned only
/// when it satisfies all of them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterSpec {
    /// Eligible categories, ascending, never empty.
    pub categories: Vec<Category>,
    /// `None` accepts any time.
    pub window: Option<DateWindow>,
    /// `None` accepts any venue.
    pub venue: Option<VenueHint>,
    /// `None` accepts any price, including unpriced records.
    pub max_price: Option<f64>,
}

impl Default for FilterSpec {
    fn default() -> Self {
        Self::any()
    }
}

impl FilterSpec {
    /// Accept everything.
    pub fn any() -> Self {
        Self {
            categories: Category::ALL.to_vec(),
            window: None,
            venue: None,
            max_price: None,
        }
    }

    pub fn accepts_category(&self, category: Category) -> bool {
        self.categories.contains(&category)
    }

    pub fn accepts_time(&self, record: &EventRecord) -> bool {
        match &self.window {
            Some(window) => record.overlaps(window),
            None => true,
        }
    }

    /// Canonical id match, else the venue name contains the typed words or
    /// a known name of a hinted venue.
    pub fn accepts_venue(&self, record: &EventRecord) -> bool {
        let Some(hint) = &self.venue else {
            return true;
        };
        if let Some(id) = &record.venue.venue_id {
            if hint.venue_ids.iter().any(|h| h == id) {
                return true;
            }
        }
        hint.matches_name(&record.venue.name)
    }

    /// Unpriced records never satisfy a price ceiling.
    pub fn accepts_price(&self, record: &EventRecord) -> bool {
        match (self.max_price, record.price) {
            (None, _) => true,
            (Some(max), Some(price)) => price <= max,
            (Some(_), None) => false,
        }
    }

    pub fn matches(&self, record: &EventRecord) -> bool {
        self.accepts_category(record.category)
            && self.accepts_time(record)
            && self.accepts_venue(record)
            && self.accepts_price(record)
    }
}
