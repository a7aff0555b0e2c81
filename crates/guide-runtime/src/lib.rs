//! Guide runtime: wires extraction, planning, retrieval, ranking and
//! composition into a single `answer` call over an injected record store.

pub mod dataset;
pub mod orchestrator;

pub use dataset::{load_records, seed_store, SeedReport};
pub use orchestrator::{Explanation, Guide};
