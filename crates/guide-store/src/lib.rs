//! Guide Store: in-memory event/concert/deal records indexed by category
//! and start time, with copy-on-write snapshots for readers.

pub mod filter;
pub mod memory;

pub use filter::FilterSpec;
pub use memory::{RecordStore, StoreSnapshot, UpsertOutcome};
