//! Orchestrator: one question in, one `StructuredAnswer` out.

use std::sync::Arc;

use chrono::{Duration, NaiveDateTime};
use serde::Serialize;
use tracing::{debug, info, warn};

use guide_core::{Error, GuideConfig, QueryConstraints, Result, StructuredAnswer};
use guide_extract::{Extractor, IntentClassifier};
use guide_resolve::{QueryPlanner, Ranker, ResponseComposer, ScoredRecord};
use guide_store::{FilterSpec, RecordStore};

/// Every intermediate result of one question.
#[derive(Debug, Clone, Serialize)]
pub struct Explanation {
    pub constraints: QueryConstraints,
    pub plan: FilterSpec,
    /// All candidates with their score breakdown, best first.
    pub ranked: Vec<ScoredRecord>,
    pub answer: StructuredAnswer,
}

/// Query pipeline over a shared record store.
///
/// Every stage is deterministic for a given utterance, `now` and store
/// content, and a single call reads from one store snapshot.
pub struct Guide {
    store: Arc<RecordStore>,
    config: GuideConfig,
    extractor: Extractor,
    classifier: IntentClassifier,
    ranker: Ranker,
}

impl Guide {
    pub fn new(store: Arc<RecordStore>, config: GuideConfig) -> Self {
        let extractor = Extractor::new(&config);
        let classifier = IntentClassifier::new(&config.lexicon, config.max_utterance_chars);
        let ranker = Ranker::new(config.ranking.clone());
        info!(
            "Guide initialized: {} venues, default limit {}",
            config.venues.len(),
            config.default_limit
        );
        Self {
            store,
            config,
            extractor,
            classifier,
            ranker,
        }
    }

    pub fn config(&self) -> &GuideConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<RecordStore> {
        &self.store
    }

    /// Answer with the configured default limit.
    pub fn answer(&self, utterance: &str, now: NaiveDateTime) -> Result<StructuredAnswer> {
        self.answer_with_limit(utterance, now, self.config.default_limit)
    }

    pub fn answer_with_limit(
        &self,
        utterance: &str,
        now: NaiveDateTime,
        limit: usize,
    ) -> Result<StructuredAnswer> {
        if limit == 0 {
            return Err(Error::InvalidInput("limit must be at least 1".into()));
        }
        let constraints = self.understand(utterance, now)?;
        let (_, ranked) = self.retrieve(&constraints, now);
        Ok(self.finish(&constraints, ranked, limit))
    }

    /// Answer and keep the plan and the full score breakdown alongside it.
    pub fn explain(
        &self,
        utterance: &str,
        now: NaiveDateTime,
        limit: usize,
    ) -> Result<Explanation> {
        if limit == 0 {
            return Err(Error::InvalidInput("limit must be at least 1".into()));
        }
        let constraints = self.understand(utterance, now)?;
        let (plan, ranked) = self.retrieve(&constraints, now);
        let answer = self.finish(&constraints, ranked.clone(), limit);
        Ok(Explanation {
            constraints,
            plan,
            ranked,
            answer,
        })
    }

    /// Plan, query one snapshot and rank.
    fn retrieve(
        &self,
        constraints: &QueryConstraints,
        now: NaiveDateTime,
    ) -> (FilterSpec, Vec<ScoredRecord>) {
        let snapshot = self.store.snapshot();
        let spec = QueryPlanner::plan(constraints);
        debug!("Plan: {:?}", spec);

        let candidates = snapshot.query(&spec);
        debug!(
            "Retrieved {} of {} records (generation {})",
            candidates.len(),
            snapshot.len(),
            snapshot.generation()
        );

        let ranked = self.ranker.rank(candidates, constraints, now);
        (spec, ranked)
    }

    fn finish(
        &self,
        constraints: &QueryConstraints,
        ranked: Vec<ScoredRecord>,
        limit: usize,
    ) -> StructuredAnswer {
        let answer =
            ResponseComposer::compose(constraints.intent, ranked, limit, constraints.date_window);
        info!(
            "Answered intent={} results={} total={} truncated={}",
            answer.intent,
            answer.results.len(),
            answer.total_matches,
            answer.truncated
        );
        answer
    }

    /// Extraction and classification only.
    pub fn understand(&self, utterance: &str, now: NaiveDateTime) -> Result<QueryConstraints> {
        if utterance.trim().is_empty() {
            return Err(Error::InvalidInput("utterance is empty".into()));
        }
        let mut constraints = self.extractor.extract(utterance, now);
        constraints.intent = self.classifier.classify(utterance, &constraints);
        debug!("Intent: {}", constraints.intent);
        Ok(constraints)
    }

    /// Records due for a refresh from their source.
    pub fn stale_ids(&self, now: NaiveDateTime) -> Vec<String> {
        match Duration::try_hours(self.config.stale_after_hours) {
            Some(max_age) => self.store.stale_ids(now, max_age),
            None => {
                warn!(
                    "stale_after_hours {} is out of range, nothing marked stale",
                    self.config.stale_after_hours
                );
                Vec::new()
            }
        }
    }
}
