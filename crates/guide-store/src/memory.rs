//! In-memory record store.
//!
//! Readers take an `Arc` snapshot of the whole state under a momentary read
//! lock and then filter without holding any lock. Writers are serialized by
//! the write lock and mutate through `Arc::make_mut`, which copies the state
//! whenever a reader still holds the previous snapshot. A snapshot therefore
//! sees each record either fully before or fully after a mutation.

use std::collections::{BTreeSet, HashMap};
use std::ops::Bound;
use std::sync::Arc;

use chrono::{Duration, NaiveDateTime};
use parking_lot::RwLock;
use tracing::{debug, info};

use guide_core::{Category, Error, EventRecord, Result};

use crate::filter::FilterSpec;

/// What an upsert did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Inserted,
    Updated,
    /// Same id, identical content. Nothing changed.
    Unchanged,
}

type StartKey = (NaiveDateTime, String);

#[derive(Debug, Clone)]
struct StoreState {
    records: HashMap<String, Arc<EventRecord>>,
    /// Per-category `(start_time, id)` index.
    by_start: HashMap<Category, BTreeSet<StartKey>>,
    /// Upper bound on `effective_end - start_time` over every record ever
    /// stored. Never shrinks on removal, which only widens scans.
    max_span: Duration,
    generation: u64,
}

impl Default for StoreState {
    fn default() -> Self {
        Self {
            records: HashMap::new(),
            by_start: HashMap::new(),
            max_span: Duration::zero(),
            generation: 0,
        }
    }
}

impl StoreState {
    fn insert(&mut self, record: EventRecord) -> UpsertOutcome {
        let existing = self.records.get(&record.id).map(|r| r.fingerprint());
        let outcome = match existing {
            Some(fingerprint) if fingerprint == record.fingerprint() => {
                return UpsertOutcome::Unchanged;
            }
            Some(_) => {
                self.unindex(&record.id);
                UpsertOutcome::Updated
            }
            None => UpsertOutcome::Inserted,
        };

        let span = record.effective_end() - record.start_time;
        if span > self.max_span {
            self.max_span = span;
        }
        self.by_start
            .entry(record.category)
            .or_default()
            .insert((record.start_time, record.id.clone()));
        self.records.insert(record.id.clone(), Arc::new(record));
        self.generation += 1;
        outcome
    }

    fn unindex(&mut self, id: &str) -> Option<Arc<EventRecord>> {
        let existing = self.records.remove(id)?;
        if let Some(index) = self.by_start.get_mut(&existing.category) {
            index.remove(&(existing.start_time, existing.id.clone()));
        }
        Some(existing)
    }

    fn query(&self, spec: &FilterSpec) -> Vec<EventRecord> {
        let mut out = Vec::new();
        for category in &spec.categories {
            let Some(index) = self.by_start.get(category) else {
                continue;
            };
            let keys: Box<dyn Iterator<Item = &StartKey>> = match &spec.window {
                // Anything starting before `from - max_span` ends before `from`.
                Some(window) => {
                    let lower = window
                        .from
                        .checked_sub_signed(self.max_span)
                        .unwrap_or(NaiveDateTime::MIN);
                    Box::new(index.range((
                        Bound::Included((lower, String::new())),
                        Bound::Excluded((window.to, String::new())),
                    )))
                }
                None => Box::new(index.iter()),
            };
            for (_, id) in keys {
                if let Some(record) = self.records.get(id) {
                    if spec.matches(record) {
                        out.push(EventRecord::clone(record));
                    }
                }
            }
        }
        out
    }

    /// Check a record against the store invariants before it is applied.
    fn validate(&self, record: &EventRecord) -> Result<()> {
        if record.id.trim().is_empty() {
            return Err(Error::invariant(&record.id, "id is empty"));
        }
        if record.title.trim().is_empty() {
            return Err(Error::invariant(&record.id, "title is empty"));
        }
        if let Some(end) = record.end_time {
            if end < record.start_time {
                return Err(Error::invariant(&record.id, "end_time precedes start_time"));
            }
        }
        if let Some(price) = record.price {
            if !price.is_finite() || price < 0.0 {
                return Err(Error::invariant(
                    &record.id,
                    format!("price must be a non-negative number, got {price}"),
                ));
            }
        }
        if let Some(existing) = self.records.get(&record.id) {
            if existing.category != record.category {
                return Err(Error::invariant(
                    &record.id,
                    format!(
                        "category is immutable (stored {}, got {})",
                        existing.category, record.category
                    ),
                ));
            }
        }
        Ok(())
    }
}

/// Shared, read-mostly record store. Inject it with `Arc<RecordStore>`.
#[derive(Debug, Default)]
pub struct RecordStore {
    state: RwLock<Arc<StoreState>>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Point-in-time view. Later mutations are never visible through it.
    pub fn snapshot(&self) -> StoreSnapshot {
        StoreSnapshot {
            state: Arc::clone(&self.state.read()),
        }
    }

    /// All records satisfying the filter, in no particular order.
    pub fn query(&self, spec: &FilterSpec) -> Vec<EventRecord> {
        self.snapshot().query(spec)
    }

    pub fn get(&self, id: &str) -> Option<EventRecord> {
        self.snapshot().get(id)
    }

    pub fn len(&self) -> usize {
        self.state.read().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Insert or replace a record by id.
    pub fn upsert(&self, record: EventRecord) -> Result<UpsertOutcome> {
        let mut guard = self.state.write();
        guard.validate(&record)?;
        let id = record.id.clone();
        let outcome = Arc::make_mut(&mut guard).insert(record);
        debug!("Upsert {}: {:?}", id, outcome);
        Ok(outcome)
    }

    /// Apply several upserts as one atomic step: either every record is
    /// valid and all are applied, or the store is left untouched.
    pub fn upsert_batch(&self, records: Vec<EventRecord>) -> Result<Vec<UpsertOutcome>> {
        let mut guard = self.state.write();

        let mut batch_categories: HashMap<&str, Category> = HashMap::new();
        for record in &records {
            guard.validate(record)?;
            if let Some(previous) = batch_categories.insert(&record.id, record.category) {
                if previous != record.category {
                    return Err(Error::invariant(
                        &record.id,
                        "conflicting categories within one batch",
                    ));
                }
            }
        }

        let state = Arc::make_mut(&mut guard);
        let outcomes: Vec<UpsertOutcome> = records.into_iter().map(|r| state.insert(r)).collect();
        info!(
            "Batch upsert: {} records, store now holds {}",
            outcomes.len(),
            state.records.len()
        );
        Ok(outcomes)
    }

    /// Remove a record, returning it if it was present.
    pub fn remove(&self, id: &str) -> Result<Option<EventRecord>> {
        if id.trim().is_empty() {
            return Err(Error::invariant(id, "id is empty"));
        }
        let mut guard = self.state.write();
        if !guard.records.contains_key(id) {
            return Ok(None);
        }
        let state = Arc::make_mut(&mut guard);
        let removed = state.unindex(id);
        state.generation += 1;
        debug!("Removed {}", id);
        Ok(removed.map(|r| EventRecord::clone(&r)))
    }

    /// Ids whose source refresh is older than `now - max_age`, sorted. An
    /// age reaching before the earliest representable time marks nothing.
    pub fn stale_ids(&self, now: NaiveDateTime, max_age: Duration) -> Vec<String> {
        let Some(cutoff) = now.checked_sub_signed(max_age) else {
            return Vec::new();
        };
        let snapshot = self.snapshot();
        let mut ids: Vec<String> = snapshot
            .state
            .records
            .values()
            .filter(|r| r.source_updated_at < cutoff)
            .map(|r| r.id.clone())
            .collect();
        ids.sort();
        ids
    }
}

/// Immutable view of the store at one instant.
#[derive(Debug, Clone)]
pub struct StoreSnapshot {
    state: Arc<StoreState>,
}

impl StoreSnapshot {
    pub fn query(&self, spec: &FilterSpec) -> Vec<EventRecord> {
        self.state.query(spec)
    }

    pub fn get(&self, id: &str) -> Option<EventRecord> {
        self.state.records.get(id).map(|r| EventRecord::clone(r))
    }

    pub fn len(&self) -> usize {
        self.state.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.records.is_empty()
    }

    /// Increases with every applied mutation.
    pub fn generation(&self) -> u64 {
        self.state.generation
    }
}
