//! Structured answer handed to the presentation layer.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::query::Intent;
use crate::record::{DateWindow, EventRecord};

/// Result of one `answer` call. Phrasing is left to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuredAnswer {
    pub intent: Intent,
    /// Most relevant first, at most `limit` long.
    pub results: Vec<EventRecord>,
    /// More records matched than were returned.
    pub truncated: bool,
    #[serde(rename = "totalMatches")]
    pub total_matches: usize,
    /// Window the answer was restricted to, if any.
    #[serde(rename = "dateWindow", skip_serializing_if = "Option::is_none")]
    pub date_window: Option<DateWindow>,
}

impl StructuredAnswer {
    pub fn empty(intent: Intent, date_window: Option<DateWindow>) -> Self {
        Self {
            intent,
            results: Vec::new(),
            truncated: false,
            total_matches: 0,
            date_window,
        }
    }

    pub fn is_no_match(&self) -> bool {
        self.results.is_empty()
    }

    /// Results grouped by start day, days ascending, relevance order kept
    /// inside each day.
    pub fn by_day(&self) -> BTreeMap<NaiveDate, Vec<&EventRecord>> {
        let mut days: BTreeMap<NaiveDate, Vec<&EventRecord>> = BTreeMap::new();
        for record in &self.results {
            days.entry(record.start_time.date()).or_default().push(record);
        }
        days
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{Category, Venue};

    fn record(id: &str, day: u32) -> EventRecord {
        let start = NaiveDate::from_ymd_opt(2026, 10, day)
            .unwrap()
            .and_hms_opt(20, 0, 0)
            .unwrap();
        EventRecord {
            id: id.into(),
            category: Category::Event,
            title: format!("Event {id}"),
            venue: Venue::named("The Foundry"),
            start_time: start,
            end_time: None,
            tags: Vec::new(),
            price: None,
            source_updated_at: start,
        }
    }

    #[test]
    fn test_empty_answer_is_no_match() {
        let answer = StructuredAnswer::empty(Intent::FindDeals, None);
        assert!(answer.is_no_match());
        assert!(!answer.truncated);
        assert_eq!(answer.total_matches, 0);
    }

    #[test]
    fn test_by_day_groups_in_order() {
        let answer = StructuredAnswer {
            intent: Intent::FindEvents,
            results: vec![record("b", 18), record("a", 17), record("c", 18)],
            truncated: false,
            total_matches: 3,
            date_window: None,
        };
        let days = answer.by_day();
        let keys: Vec<u32> = days.keys().map(|d| chrono::Datelike::day(d)).collect();
        assert_eq!(keys, vec![17, 18]);
        let sunday: Vec<&str> = days
            .values()
            .nth(1)
            .unwrap()
            .iter()
            .map(|r| r.id.as_str())
            .collect();
        assert_eq!(sunday, vec!["b", "c"]);
    }

    #[test]
    fn test_serialized_shape() {
        let answer = StructuredAnswer::empty(Intent::FindEvents, None);
        let json = serde_json::to_value(&answer).unwrap();
        assert_eq!(json["intent"], "find_events");
        assert!(json["results"].is_array());
        assert_eq!(json["truncated"], false);
        assert!(json.get("dateWindow").is_none());
    }
}
