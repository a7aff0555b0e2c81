//! Guide Extract: turns a raw question into `QueryConstraints` and an
//! `Intent` using keyword matching, stemming, regex patterns and a venue
//! gazetteer. No models, fully deterministic for a given `now`.

pub mod extractor;
pub mod gazetteer;
pub mod intent;
pub mod normalize;
pub mod price;
pub mod stemmer;
pub mod temporal;

pub use extractor::Extractor;
pub use gazetteer::Gazetteer;
pub use intent::IntentClassifier;
