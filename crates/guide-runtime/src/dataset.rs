//! JSON dataset loading.
//!
//! A dataset is a JSON array of records. One bad entry never sinks the rest:
//! it is logged and skipped.

use std::path::Path;

use serde_json::Value;
use tracing::{info, warn};

use guide_core::{EventRecord, Result};
use guide_store::{RecordStore, UpsertOutcome};

/// Counts from seeding a store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub inserted: usize,
    pub updated: usize,
    pub unchanged: usize,
    pub rejected: usize,
}

/// Read a dataset file. Fails only when the file is unreadable or not a
/// JSON array; entries that do not parse as records are skipped.
pub fn load_records(path: &Path) -> Result<Vec<EventRecord>> {
    let contents = std::fs::read_to_string(path)?;
    let entries: Vec<Value> = serde_json::from_str(&contents)?;
    let total = entries.len();

    let records: Vec<EventRecord> = entries
        .into_iter()
        .enumerate()
        .filter_map(|(i, entry)| match serde_json::from_value(entry) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!("Skipping dataset entry {}: {}", i, e);
                None
            }
        })
        .collect();

    info!(
        "Loaded {} of {} records from {}",
        records.len(),
        total,
        path.display()
    );
    Ok(records)
}

/// Upsert records one by one so an invalid record only rejects itself.
pub fn seed_store(store: &RecordStore, records: Vec<EventRecord>) -> SeedReport {
    let mut report = SeedReport::default();
    for record in records {
        let id = record.id.clone();
        match store.upsert(record) {
            Ok(UpsertOutcome::Inserted) => report.inserted += 1,
            Ok(UpsertOutcome::Updated) => report.updated += 1,
            Ok(UpsertOutcome::Unchanged) => report.unchanged += 1,
            Err(e) => {
                warn!("Rejected record {}: {}", id, e);
                report.rejected += 1;
            }
        }
    }
    report
}
