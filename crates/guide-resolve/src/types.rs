//! Resolver types.

use serde::Serialize;

use guide_core::EventRecord;

/// A candidate record with its relevance score and the parts it came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredRecord {
    pub record: EventRecord,
    pub score: f64,
    pub keyword_score: f64,
    pub venue_bonus: f64,
    pub time_penalty: f64,
}
