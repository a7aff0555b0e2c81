//! Entity extractor: utterance → `QueryConstraints` (intent left `Unknown`).
//!
//! Runs the recognizers in a fixed order over one token stream. Each
//! recognizer marks the tokens it used so the leftovers can become ranking
//! keywords.

use chrono::NaiveDateTime;
use tracing::debug;

use guide_core::{Category, GuideConfig, Keyword, QueryConstraints};

use crate::gazetteer::Gazetteer;
use crate::normalize::{is_stop_word, normalize, tokenize};
use crate::{price, stemmer, temporal};

/// Position weight falls off by this much per earlier keyword.
const POSITION_DECAY: f64 = 0.1;

/// Stems of nouns that name a record category outright.
fn category_noun(stem: &str) -> Option<Category> {
    match stem {
        "concert" | "gig" => Some(Category::Concert),
        "deal" | "special" | "discount" => Some(Category::Deal),
        _ => None,
    }
}

#[derive(Debug, Clone)]
pub struct Extractor {
    gazetteer: Gazetteer,
    max_chars: usize,
    max_keywords: usize,
    cheap_price: f64,
}

impl Extractor {
    pub fn new(config: &GuideConfig) -> Self {
        Self {
            gazetteer: Gazetteer::new(&config.venues),
            max_chars: config.max_utterance_chars,
            max_keywords: config.max_keywords,
            cheap_price: config.cheap_price,
        }
    }

    /// Extract constraints. Never fails: anything unrecognized is simply
    /// absent from the result.
    pub fn extract(&self, utterance: &str, now: NaiveDateTime) -> QueryConstraints {
        let tokens = tokenize(&normalize(utterance, self.max_chars));
        let mut consumed = vec![false; tokens.len()];

        let dates = temporal::recognize(&tokens, now);
        mark(&mut consumed, &dates.consumed);

        let venue_hint = self.gazetteer.lookup(&tokens).map(|m| {
            consumed[m.start..m.start + m.len]
                .iter_mut()
                .for_each(|c| *c = true);
            m.hint
        });

        let mut categories: Vec<Category> = Vec::new();
        for (i, token) in tokens.iter().enumerate() {
            if consumed[i] {
                continue;
            }
            if let Some(category) = category_noun(&stemmer::stem(token)) {
                consumed[i] = true;
                if !categories.contains(&category) {
                    categories.push(category);
                }
            }
        }
        // "concert deals" names two categories; neither narrows.
        let category_hint = match categories.as_slice() {
            [only] => Some(*only),
            _ => None,
        };

        let prices = price::recognize(&tokens, self.cheap_price);
        mark(&mut consumed, &prices.consumed);

        let keywords = self.keywords(&tokens, &consumed);

        let constraints = QueryConstraints {
            date_window: dates.window,
            category_hint,
            venue_hint,
            max_price: prices.max_price,
            keywords,
            ..QueryConstraints::default()
        };
        debug!(
            "Extracted window={:?} category={:?} venue={:?} max_price={:?} keywords={:?}",
            constraints.date_window,
            constraints.category_hint,
            constraints.venue_hint.as_ref().map(|v| v.text.as_str()),
            constraints.max_price,
            constraints.keyword_terms().collect::<Vec<_>>()
        );
        constraints
    }

    fn keywords(&self, tokens: &[String], consumed: &[bool]) -> Vec<Keyword> {
        let mut keywords: Vec<Keyword> = Vec::new();
        for (token, &used) in tokens.iter().zip(consumed) {
            if keywords.len() >= self.max_keywords {
                break;
            }
            if used || is_stop_word(token) || token.chars().count() < 2 {
                continue;
            }
            let term = stemmer::stem(token);
            if is_stop_word(&term) || keywords.iter().any(|k| k.term == term) {
                continue;
            }
            let weight = keyword_weight(keywords.len(), token.chars().count());
            keywords.push(Keyword {
                term,
                raw: token.clone(),
                weight,
            });
        }
        keywords
    }
}

/// Earlier and longer words weigh more.
fn keyword_weight(position: usize, len: usize) -> f64 {
    let position = 1.0 / (1.0 + POSITION_DECAY * position as f64);
    let specificity = 0.75 + 0.05 * len.min(10) as f64;
    position * specificity
}

fn mark(consumed: &mut [bool], used: &[bool]) {
    for (c, &u) in consumed.iter_mut().zip(used) {
        *c |= u;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn now() -> NaiveDateTime {
        // Friday
        NaiveDate::from_ymd_opt(2026, 10, 16)
            .unwrap()
            .and_hms_opt(14, 30, 0)
            .unwrap()
    }

    fn extractor() -> Extractor {
        Extractor::new(&GuideConfig::default())
    }

    #[test]
    fn test_concerts_this_weekend_downtown() {
        let q = extractor().extract("any concerts this weekend downtown", now());
        let window = q.date_window.unwrap();
        assert_eq!(window.from.date(), NaiveDate::from_ymd_opt(2026, 10, 17).unwrap());
        assert_eq!(window.to.date(), NaiveDate::from_ymd_opt(2026, 10, 19).unwrap());
        assert_eq!(q.category_hint, Some(Category::Concert));
        let venue = q.venue_hint.unwrap();
        assert_eq!(venue.text, "downtown");
        assert!(venue.venue_ids.contains(&"40-watt".to_string()));
        assert!(q.keywords.is_empty());
        assert_eq!(q.intent, guide_core::Intent::Unknown);
    }

    #[test]
    fn test_happy_hour_deals() {
        let q = extractor().extract("Happy hour deals", now());
        assert_eq!(q.category_hint, Some(Category::Deal));
        assert!(q.date_window.is_none());
        let terms: Vec<&str> = q.keyword_terms().collect();
        assert_eq!(terms, vec!["happy", "hour"]);
    }

    #[test]
    fn test_generic_question_has_no_constraints() {
        let q = extractor().extract("what's fun to do", now());
        assert!(q.date_window.is_none());
        assert!(q.category_hint.is_none());
        assert!(q.venue_hint.is_none());
        assert!(q.keywords.is_empty());
    }

    #[test]
    fn test_price_and_keywords() {
        let q = extractor().extract("Free comedy shows tonight at Flicker", now());
        assert_eq!(q.max_price, Some(0.0));
        assert_eq!(q.venue_hint.as_ref().unwrap().venue_ids, vec!["flicker"]);
        let terms: Vec<&str> = q.keyword_terms().collect();
        assert_eq!(terms, vec!["comedy"]);
        assert!(q.date_window.is_some());
    }

    #[test]
    fn test_mixed_categories_give_no_hint() {
        let q = extractor().extract("concert ticket deals", now());
        assert!(q.category_hint.is_none());
    }

    #[test]
    fn test_keywords_deduplicated_and_capped() {
        let config = GuideConfig {
            max_keywords: 3,
            ..GuideConfig::default()
        };
        let q = Extractor::new(&config).extract("jazz jazz trivia karaoke bingo salsa", now());
        let terms: Vec<&str> = q.keyword_terms().collect();
        assert_eq!(terms, vec!["jazz", "trivia", "karaok"]);
        assert_eq!(q.keywords[0].raw, "jazz");
    }

    #[test]
    fn test_keyword_weight_prefers_early_and_long() {
        assert!(keyword_weight(0, 6) > keyword_weight(3, 6));
        assert!(keyword_weight(0, 9) > keyword_weight(0, 4));
    }

    #[test]
    fn test_long_utterance_is_bounded() {
        let long = "jazz ".repeat(10_000);
        let q = extractor().extract(&long, now());
        assert_eq!(q.keywords.len(), 1);
    }
}
