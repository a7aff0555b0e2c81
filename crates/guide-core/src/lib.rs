//! Guide Core: record model, query constraints, answers, configuration.

pub mod answer;
pub mod config;
pub mod error;
pub mod query;
pub mod record;

pub use answer::StructuredAnswer;
pub use config::{
    GuideConfig, IntentLexicon, LexiconEntry, RankingWeights, VenueEntry, WeightedTerm,
};
pub use error::{Error, Result};
pub use query::{fold_name, Intent, Keyword, QueryConstraints, VenueHint};
pub use record::{Category, DateWindow, EventRecord, Venue};
