//! Guide configuration: limits, ranking weights, venue gazetteer and the
//! intent lexicon.
//!
//! Every field has a default, so a partial JSON file (or none at all) is a
//! valid configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Error, Result};
use crate::query::Intent;

/// Upper bound on `stale_after_hours`: ten years.
const MAX_STALE_AFTER_HOURS: i64 = 24 * 366 * 10;

/// Top-level guide configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GuideConfig {
    /// Results returned when the caller gives no explicit limit.
    pub default_limit: usize,
    /// Keywords kept per utterance.
    pub max_keywords: usize,
    /// Longer utterances are cut at this many characters.
    pub max_utterance_chars: usize,
    /// Ceiling applied when the user asks for something "cheap".
    pub cheap_price: f64,
    /// Records older than this are reported by `stale_ids`.
    pub stale_after_hours: i64,
    pub ranking: RankingWeights,
    pub venues: Vec<VenueEntry>,
    pub lexicon: IntentLexicon,
}

impl Default for GuideConfig {
    fn default() -> Self {
        Self {
            default_limit: 5,
            max_keywords: 12,
            max_utterance_chars: 512,
            cheap_price: 15.0,
            stale_after_hours: 72,
            ranking: RankingWeights::default(),
            venues: default_venues(),
            lexicon: IntentLexicon::default(),
        }
    }
}

impl GuideConfig {
    /// Load config from a JSON file, falling back to defaults when the file
    /// does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        let config = match std::fs::read_to_string(path) {
            Ok(contents) => {
                let config: GuideConfig = serde_json::from_str(&contents)?;
                info!("Loaded guide config from {}", path.display());
                config
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("No config at {}, using defaults", path.display());
                GuideConfig::default()
            }
            Err(e) => return Err(e.into()),
        };
        config.validate()?;
        Ok(config)
    }

    /// Apply `GUIDE_RESULT_LIMIT` / `GUIDE_MAX_KEYWORDS` overrides.
    pub fn apply_env(mut self) -> Result<Self> {
        if let Some(limit) = env_usize("GUIDE_RESULT_LIMIT")? {
            self.default_limit = limit;
        }
        if let Some(max) = env_usize("GUIDE_MAX_KEYWORDS")? {
            self.max_keywords = max;
        }
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        if self.default_limit == 0 {
            return Err(Error::Config("default_limit must be at least 1".into()));
        }
        if self.max_keywords == 0 {
            return Err(Error::Config("max_keywords must be at least 1".into()));
        }
        if self.max_utterance_chars == 0 {
            return Err(Error::Config("max_utterance_chars must be at least 1".into()));
        }
        if !(self.cheap_price.is_finite() && self.cheap_price >= 0.0) {
            return Err(Error::Config("cheap_price must be a non-negative number".into()));
        }
        if !(1..=MAX_STALE_AFTER_HOURS).contains(&self.stale_after_hours) {
            return Err(Error::Config(format!(
                "stale_after_hours must be between 1 and {MAX_STALE_AFTER_HOURS}"
            )));
        }
        for venue in &self.venues {
            if venue.id.trim().is_empty() || venue.name.trim().is_empty() {
                return Err(Error::Config("venue entries need an id and a name".into()));
            }
        }
        Ok(())
    }
}

fn env_usize(key: &str) -> Result<Option<usize>> {
    match std::env::var(key) {
        Ok(v) => v
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| Error::Config(format!("{key} must be a positive integer, got '{v}'"))),
        Err(_) => Ok(None),
    }
}

/// Ranker weights. Tunable; nothing depends on the exact values.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RankingWeights {
    /// Multiplier on the keyword overlap score.
    pub keyword: f64,
    /// Added when the record sits at a venue the hint resolved to.
    pub venue_bonus: f64,
    /// Multiplier on the log time-distance penalty.
    pub time_weight: f64,
    /// Extra penalty for records that already ended.
    pub past_penalty: f64,
}

impl Default for RankingWeights {
    fn default() -> Self {
        Self {
            keyword: 1.0,
            venue_bonus: 1.0,
            time_weight: 0.5,
            past_penalty: 3.0,
        }
    }
}

/// One gazetteer venue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VenueEntry {
    pub id: String,
    pub name: String,
    /// Lowercase alternative spellings matched against utterances.
    #[serde(default)]
    pub aliases: Vec<String>,
    /// Neighborhoods the venue belongs to ("downtown", "campus").
    #[serde(default)]
    pub areas: Vec<String>,
}

impl VenueEntry {
    fn new(id: &str, name: &str, aliases: &[&str], areas: &[&str]) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            aliases: aliases.iter().map(|s| s.to_string()).collect(),
            areas: areas.iter().map(|s| s.to_string()).collect(),
        }
    }
}

fn default_venues() -> Vec<VenueEntry> {
    vec![
        VenueEntry::new("40-watt", "40 Watt Club", &["40 watt", "forty watt"], &["downtown"]),
        VenueEntry::new("georgia-theatre", "Georgia Theatre", &["georgia theater"], &["downtown"]),
        VenueEntry::new("foundry", "The Foundry", &["foundry"], &["downtown"]),
        VenueEntry::new("flicker", "Flicker Theatre & Bar", &["flicker"], &["downtown"]),
        VenueEntry::new("morton", "Morton Theatre", &["morton"], &["downtown"]),
        VenueEntry::new("classic-center", "The Classic Center", &["classic center"], &["downtown"]),
        VenueEntry::new(
            "creature-comforts",
            "Creature Comforts Brewing",
            &["creature comforts", "creatures"],
            &["downtown"],
        ),
        VenueEntry::new("hendershots", "Hendershot's", &["hendershots"], &["normaltown"]),
        VenueEntry::new("tate", "Tate Student Center", &["tate center", "tate"], &["campus"]),
        VenueEntry::new("sanford", "Sanford Stadium", &["sanford"], &["campus"]),
        VenueEntry::new(
            "georgia-museum",
            "Georgia Museum of Art",
            &["museum of art", "art museum"],
            &["campus"],
        ),
        VenueEntry::new("akademia", "Akademia Brewing", &["akademia"], &["eastside"]),
    ]
}

/// A lexicon term and its weight. Multi-word terms match as phrases.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeightedTerm {
    pub term: String,
    pub weight: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LexiconEntry {
    pub intent: Intent,
    pub terms: Vec<WeightedTerm>,
}

/// Intent → weighted term set used by the classifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IntentLexicon {
    pub entries: Vec<LexiconEntry>,
    /// Score added to the intent matching an extracted category hint.
    pub category_hint_weight: f64,
    /// Score added to `find_events` when the utterance carries a date.
    pub date_weight: f64,
}

impl IntentLexicon {
    pub fn terms_for(&self, intent: Intent) -> impl Iterator<Item = &WeightedTerm> {
        self.entries
            .iter()
            .filter(move |e| e.intent == intent)
            .flat_map(|e| e.terms.iter())
    }
}

fn entry(intent: Intent, terms: &[(&str, f64)]) -> LexiconEntry {
    LexiconEntry {
        intent,
        terms: terms
            .iter()
            .map(|&(term, weight)| WeightedTerm {
                term: term.into(),
                weight,
            })
            .collect(),
    }
}

impl Default for IntentLexicon {
    fn default() -> Self {
        Self {
            entries: vec![
                entry(
                    Intent::FindConcerts,
                    &[
                        ("concert", 2.0),
                        ("gig", 2.0),
                        ("live music", 2.0),
                        ("band", 1.5),
                        ("show", 1.0),
                        ("music", 1.0),
                        ("tickets", 1.0),
                        ("tour", 1.0),
                        ("lineup", 1.0),
                        ("dj", 1.0),
                        ("singer", 1.0),
                        ("rapper", 1.0),
                    ],
                ),
                entry(
                    Intent::FindDeals,
                    &[
                        ("deal", 2.0),
                        ("happy hour", 2.5),
                        ("discount", 2.0),
                        ("coupon", 2.0),
                        ("bogo", 2.0),
                        ("half off", 2.0),
                        ("special", 1.5),
                        ("sale", 1.5),
                        ("promo", 1.5),
                        ("cheap eats", 1.5),
                        ("drink specials", 2.0),
                    ],
                ),
                entry(
                    Intent::FindEvents,
                    &[
                        ("event", 1.5),
                        ("happening", 1.5),
                        ("going on", 1.5),
                        ("fun", 1.0),
                        ("party", 1.0),
                        ("festival", 1.0),
                        ("comedy", 1.0),
                        ("karaoke", 1.0),
                        ("open mic", 1.0),
                        ("trivia", 1.0),
                        ("activities", 1.0),
                        ("date night", 1.0),
                        ("things to do", 1.0),
                        ("do", 0.5),
                        ("plans", 0.5),
                        ("tonight", 0.5),
                        ("weekend", 0.5),
                    ],
                ),
            ],
            category_hint_weight: 1.0,
            date_weight: 0.5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_validate() {
        let config = GuideConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.default_limit, 5);
        assert!(!config.venues.is_empty());
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = GuideConfig::load(&dir.path().join("guide.json")).unwrap();
        assert_eq!(config.max_keywords, 12);
    }

    #[test]
    fn test_load_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("guide.json");
        let mut file = std::fs::File::create(&path).unwrap();
        write!(file, r#"{{"default_limit": 3, "ranking": {{"venue_bonus": 2.5}}}}"#).unwrap();

        let config = GuideConfig::load(&path).unwrap();
        assert_eq!(config.default_limit, 3);
        assert_eq!(config.ranking.venue_bonus, 2.5);
        // Untouched fields keep their defaults.
        assert_eq!(config.ranking.past_penalty, 3.0);
        assert!(!config.lexicon.entries.is_empty());
    }

    #[test]
    fn test_zero_limit_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("guide.json");
        std::fs::write(&path, r#"{"default_limit": 0}"#).unwrap();
        assert!(matches!(GuideConfig::load(&path), Err(Error::Config(_))));
    }

    #[test]
    fn test_stale_after_hours_bounded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("guide.json");
        for hours in ["0", "-5", "9223372036854775807"] {
            std::fs::write(&path, format!(r#"{{"stale_after_hours": {hours}}}"#)).unwrap();
            assert!(
                matches!(GuideConfig::load(&path), Err(Error::Config(_))),
                "{hours} accepted"
            );
        }
        std::fs::write(&path, r#"{"stale_after_hours": 168}"#).unwrap();
        assert_eq!(GuideConfig::load(&path).unwrap().stale_after_hours, 168);
    }

    #[test]
    fn test_malformed_file_is_json_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("guide.json");
        std::fs::write(&path, "{not json").unwrap();
        assert!(matches!(GuideConfig::load(&path), Err(Error::Json(_))));
    }

    #[test]
    fn test_lexicon_terms_for() {
        let lexicon = IntentLexicon::default();
        assert!(lexicon
            .terms_for(Intent::FindDeals)
            .any(|t| t.term == "happy hour"));
        assert_eq!(lexicon.terms_for(Intent::Unknown).count(), 0);
    }
}
