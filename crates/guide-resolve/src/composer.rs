//! Response composer: ranked candidates → `StructuredAnswer`.

use guide_core::{DateWindow, Intent, StructuredAnswer};

use crate::types::ScoredRecord;

pub struct ResponseComposer;

impl ResponseComposer {
    /// Keep the top `limit` records. An empty ranking is a no-match answer,
    /// never an error.
    pub fn compose(
        intent: Intent,
        ranked: Vec<ScoredRecord>,
        limit: usize,
        date_window: Option<DateWindow>,
    ) -> StructuredAnswer {
        let total_matches = ranked.len();
        let results = ranked.into_iter().take(limit).map(|s| s.record).collect();
        StructuredAnswer {
            intent,
            results,
            truncated: total_matches > limit,
            total_matches,
            date_window,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use guide_core::{Category, EventRecord, Venue};

    fn scored(id: &str, score: f64) -> ScoredRecord {
        let start = NaiveDate::from_ymd_opt(2026, 10, 17)
            .unwrap()
            .and_hms_opt(20, 0, 0)
            .unwrap();
        ScoredRecord {
            record: EventRecord {
                id: id.into(),
                category: Category::Concert,
                title: format!("Show {id}"),
                venue: Venue::named("40 Watt Club"),
                start_time: start,
                end_time: None,
                tags: Vec::new(),
                price: None,
                source_updated_at: start,
            },
            score,
            keyword_score: score,
            venue_bonus: 0.0,
            time_penalty: 0.0,
        }
    }

    #[test]
    fn test_truncates_to_limit_in_order() {
        let ranked = (0..7).map(|i| scored(&format!("r{i}"), 10.0 - i as f64)).collect();
        let answer = ResponseComposer::compose(Intent::FindConcerts, ranked, 5, None);
        assert_eq!(answer.results.len(), 5);
        assert!(answer.truncated);
        assert_eq!(answer.total_matches, 7);
        assert_eq!(answer.results[0].id, "r0");
        assert_eq!(answer.results[4].id, "r4");
    }

    #[test]
    fn test_exact_fit_not_truncated() {
        let ranked = (0..3).map(|i| scored(&format!("r{i}"), 1.0)).collect();
        let answer = ResponseComposer::compose(Intent::FindEvents, ranked, 3, None);
        assert_eq!(answer.results.len(), 3);
        assert!(!answer.truncated);
    }

    #[test]
    fn test_empty_is_no_match() {
        let answer = ResponseComposer::compose(Intent::FindDeals, Vec::new(), 5, None);
        assert!(answer.is_no_match());
        assert!(!answer.truncated);
        assert_eq!(answer.intent, Intent::FindDeals);
        assert_eq!(answer, StructuredAnswer::empty(Intent::FindDeals, None));
    }
}
