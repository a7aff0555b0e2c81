//! Rule-based intent classifier.
//!
//! Each intent owns a weighted term list from the `IntentLexicon`. Single
//! words match a token or its stem; multi-word terms match as phrases on the
//! normalized text. Extracted entities add evidence on top.

use std::collections::HashSet;

use tracing::debug;

use guide_core::{Category, Intent, IntentLexicon, QueryConstraints};

use crate::normalize::{normalize, tokenize};
use crate::stemmer::stem;

const EPSILON: f64 = 1e-9;

/// Tie-break precedence, most general first.
const PRECEDENCE: [Intent; 3] = [Intent::FindEvents, Intent::FindConcerts, Intent::FindDeals];

#[derive(Debug, Clone)]
enum Matcher {
    /// Padded with spaces so it only matches whole words.
    Phrase(String),
    Word { word: String, stem: String },
}

#[derive(Debug, Clone)]
struct CompiledTerm {
    matcher: Matcher,
    weight: f64,
}

#[derive(Debug, Clone, Copy, Default)]
struct Tally {
    score: f64,
    matches: usize,
}

impl Tally {
    fn add(&mut self, weight: f64) {
        self.score += weight;
        self.matches += 1;
    }

    fn beats(&self, other: &Tally) -> bool {
        if (self.score - other.score).abs() > EPSILON {
            return self.score > other.score;
        }
        self.matches > other.matches
    }
}

#[derive(Debug, Clone)]
pub struct IntentClassifier {
    terms: Vec<(Intent, Vec<CompiledTerm>)>,
    category_hint_weight: f64,
    date_weight: f64,
    max_chars: usize,
}

impl IntentClassifier {
    pub fn new(lexicon: &IntentLexicon, max_chars: usize) -> Self {
        let terms = PRECEDENCE
            .iter()
            .map(|&intent| {
                let compiled = lexicon
                    .terms_for(intent)
                    .filter_map(|t| compile(&t.term, t.weight))
                    .collect();
                (intent, compiled)
            })
            .collect();
        Self {
            terms,
            category_hint_weight: lexicon.category_hint_weight,
            date_weight: lexicon.date_weight,
            max_chars,
        }
    }

    /// Pick the best-scoring intent, or `Unknown` when nothing scores.
    pub fn classify(&self, utterance: &str, constraints: &QueryConstraints) -> Intent {
        let normalized = normalize(utterance, self.max_chars);
        let padded = format!(" {normalized} ");
        let tokens: HashSet<String> = tokenize(&normalized).into_iter().collect();
        let stems: HashSet<String> = tokens.iter().map(|t| stem(t)).collect();

        let mut best: Option<(Intent, Tally)> = None;
        for (intent, terms) in &self.terms {
            let mut tally = Tally::default();
            for term in terms {
                let hit = match &term.matcher {
                    Matcher::Phrase(phrase) => padded.contains(phrase.as_str()),
                    Matcher::Word { word, stem } => tokens.contains(word) || stems.contains(stem),
                };
                if hit {
                    tally.add(term.weight);
                }
            }

            if let Some(hint) = constraints.category_hint {
                if hinted_intent(hint) == *intent {
                    tally.add(self.category_hint_weight);
                }
            }
            if constraints.date_window.is_some() && *intent == Intent::FindEvents {
                tally.add(self.date_weight);
            }

            debug!("Intent {} scored {:.2} ({} matches)", intent, tally.score, tally.matches);
            if tally.score <= EPSILON {
                continue;
            }
            // Strict comparison keeps the earlier intent on a full tie.
            if best.as_ref().map_or(true, |(_, b)| tally.beats(b)) {
                best = Some((*intent, tally));
            }
        }

        best.map(|(intent, _)| intent).unwrap_or(Intent::Unknown)
    }
}

fn hinted_intent(category: Category) -> Intent {
    match category {
        Category::Concert => Intent::FindConcerts,
        Category::Deal => Intent::FindDeals,
        Category::Event => Intent::FindEvents,
    }
}

fn compile(term: &str, weight: f64) -> Option<CompiledTerm> {
    let normalized = normalize(term, usize::MAX);
    let words = tokenize(&normalized);
    let matcher = match words.as_slice() {
        [] => return None,
        [word] => Matcher::Word {
            stem: stem(word),
            word: word.clone(),
        },
        _ => Matcher::Phrase(format!(" {normalized} ")),
    };
    Some(CompiledTerm { matcher, weight })
}
