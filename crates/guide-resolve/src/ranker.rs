//! Relevance ranking of filtered candidates.
//!
//! score = keyword score + venue bonus - time penalty. Keyword matches are
//! weighted by how rare the term is among the candidates, so "jazz" counts
//! for more than a word every candidate shares. Records closer to the
//! reference time (now, or the start of the asked-for window) rank higher,
//! and records that already ended are pushed down.

use std::cmp::Ordering;
use std::collections::HashSet;

use chrono::NaiveDateTime;
use tracing::debug;

use guide_core::{EventRecord, QueryConstraints, RankingWeights};
use guide_extract::normalize::{normalize, tokenize};
use guide_extract::stemmer::stem;

use crate::types::ScoredRecord;

const TITLE_MATCH: f64 = 1.0;
const TAG_MATCH: f64 = 0.8;

/// Stemmed title and tag tokens of one candidate.
struct RecordTerms {
    title: HashSet<String>,
    tags: HashSet<String>,
}

impl RecordTerms {
    fn of(record: &EventRecord) -> Self {
        Self {
            title: stems(&record.title),
            tags: record.tags.iter().flat_map(|t| stems(t)).collect(),
        }
    }

    fn match_strength(&self, term: &str) -> f64 {
        if self.title.contains(term) {
            TITLE_MATCH
        } else if self.tags.contains(term) {
            TAG_MATCH
        } else {
            0.0
        }
    }
}

fn stems(text: &str) -> HashSet<String> {
    tokenize(&normalize(text, usize::MAX))
        .iter()
        .map(|t| stem(t))
        .collect()
}

#[derive(Debug, Clone, Default)]
pub struct Ranker {
    weights: RankingWeights,
}

impl Ranker {
    pub fn new(weights: RankingWeights) -> Self {
        Self { weights }
    }

    /// Score and order candidates, most relevant first. Ties go to the
    /// earlier start, then the smaller id.
    pub fn rank(
        &self,
        candidates: Vec<EventRecord>,
        constraints: &QueryConstraints,
        now: NaiveDateTime,
    ) -> Vec<ScoredRecord> {
        let terms: Vec<RecordTerms> = candidates.iter().map(RecordTerms::of).collect();
        let idf = inverse_document_frequencies(constraints, &terms);
        let reference = match &constraints.date_window {
            Some(window) => now.max(window.from),
            None => now,
        };

        let mut scored: Vec<ScoredRecord> = candidates
            .into_iter()
            .zip(&terms)
            .map(|(record, record_terms)| {
                let keyword_score = self.weights.keyword
                    * constraints
                        .keywords
                        .iter()
                        .zip(&idf)
                        .map(|(kw, idf)| kw.weight * idf * record_terms.match_strength(&kw.term))
                        .sum::<f64>();
                let venue_bonus = self.venue_bonus(&record, constraints);
                let time_penalty = self.time_penalty(&record, reference, now);
                ScoredRecord {
                    score: keyword_score + venue_bonus - time_penalty,
                    keyword_score,
                    venue_bonus,
                    time_penalty,
                    record,
                }
            })
            .collect();

        scored.sort_by(compare);
        debug!(
            "Ranked {} candidates, top score {:?}",
            scored.len(),
            scored.first().map(|s| s.score)
        );
        scored
    }

    fn venue_bonus(&self, record: &EventRecord, constraints: &QueryConstraints) -> f64 {
        let Some(hint) = &constraints.venue_hint else {
            return 0.0;
        };
        let id_match = record
            .venue
            .venue_id
            .as_ref()
            .is_some_and(|id| hint.venue_ids.contains(id));
        if id_match {
            self.weights.venue_bonus
        } else if hint.matches_name(&record.venue.name) {
            self.weights.venue_bonus / 2.0
        } else {
            0.0
        }
    }

    /// Log-scaled distance in days from the reference point; zero while the
    /// record is running.
    fn time_penalty(
        &self,
        record: &EventRecord,
        reference: NaiveDateTime,
        now: NaiveDateTime,
    ) -> f64 {
        let end = record.effective_end();
        let distance = if record.start_time > reference {
            record.start_time - reference
        } else if end < reference {
            reference - end
        } else {
            chrono::Duration::zero()
        };
        let hours = distance.num_seconds() as f64 / 3600.0;
        let mut penalty = self.weights.time_weight * (1.0 + hours / 24.0).ln();
        if end < now {
            penalty += self.weights.past_penalty;
        }
        penalty
    }
}

/// `ln(1 + N / (1 + df))` per keyword, in keyword order.
fn inverse_document_frequencies(constraints: &QueryConstraints, terms: &[RecordTerms]) -> Vec<f64> {
    let n = terms.len() as f64;
    constraints
        .keywords
        .iter()
        .map(|kw| {
            let df = terms
                .iter()
                .filter(|t| t.match_strength(&kw.term) > 0.0)
                .count() as f64;
            (1.0 + n / (1.0 + df)).ln()
        })
        .collect()
}

fn compare(a: &ScoredRecord, b: &ScoredRecord) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| a.record.start_time.cmp(&b.record.start_time))
        .then_with(|| a.record.id.cmp(&b.record.id))
}
