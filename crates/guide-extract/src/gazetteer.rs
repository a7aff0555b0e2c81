//! Venue gazetteer: maps venue names, aliases and neighborhoods mentioned in
//! a question to canonical venue ids.

use std::collections::{BTreeMap, HashMap};

use guide_core::{fold_name, VenueEntry, VenueHint};

use crate::normalize::normalize;

/// Fuzzy matching only applies to single-token aliases at least this long.
const FUZZY_MIN_LEN: usize = 6;

#[derive(Debug, Clone)]
struct Alias {
    tokens: Vec<String>,
    venue_ids: Vec<String>,
    /// Every known spelling of `venue_ids`, folded.
    names: Vec<String>,
}

/// Result of a gazetteer lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct VenueMatch {
    pub hint: VenueHint,
    /// Index of the first token used.
    pub start: usize,
    /// Number of tokens used.
    pub len: usize,
}

/// Lookup table built once from configuration.
#[derive(Debug, Clone, Default)]
pub struct Gazetteer {
    aliases: Vec<Alias>,
}

impl Gazetteer {
    pub fn new(venues: &[VenueEntry]) -> Self {
        let mut aliases = Vec::new();
        let mut areas: BTreeMap<String, Vec<String>> = BTreeMap::new();
        let mut names: HashMap<&str, Vec<String>> = HashMap::new();

        for venue in venues {
            let mut spellings = vec![venue.name.clone()];
            spellings.extend(venue.aliases.iter().cloned());
            let mut venue_aliases = Vec::new();
            for spelling in spellings {
                let mut tokens = tokenize(&spelling);
                // "The Foundry" is also just "foundry".
                if tokens.len() > 1 && tokens[0] == "the" {
                    tokens.remove(0);
                }
                if tokens.is_empty() {
                    continue;
                }
                venue_aliases.push(tokens);
            }
            let known = names.entry(venue.id.as_str()).or_default();
            for tokens in &venue_aliases {
                let folded = fold_name(&tokens.join(" "));
                if !known.contains(&folded) {
                    known.push(folded);
                }
            }
            for tokens in venue_aliases {
                aliases.push(Alias {
                    tokens,
                    venue_ids: vec![venue.id.clone()],
                    names: Vec::new(),
                });
            }
            for area in &venue.areas {
                areas
                    .entry(normalize(area, usize::MAX))
                    .or_default()
                    .push(venue.id.clone());
            }
        }

        for (area, venue_ids) in areas {
            let tokens = tokenize(&area);
            if tokens.is_empty() {
                continue;
            }
            aliases.push(Alias {
                tokens,
                venue_ids,
                names: Vec::new(),
            });
        }

        for alias in &mut aliases {
            alias.names = alias
                .venue_ids
                .iter()
                .filter_map(|id| names.get(id.as_str()))
                .flatten()
                .cloned()
                .collect();
        }

        Self { aliases }
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }

    /// Longest exact alias match (earliest on ties); failing that, a
    /// single-token alias within edit distance one.
    pub fn lookup(&self, tokens: &[String]) -> Option<VenueMatch> {
        let mut best: Option<VenueMatch> = None;
        for start in 0..tokens.len() {
            for alias in &self.aliases {
                let len = alias.tokens.len();
                if start + len > tokens.len() || tokens[start..start + len] != alias.tokens[..] {
                    continue;
                }
                if best.as_ref().map_or(true, |b| len > b.len) {
                    best = Some(VenueMatch {
                        hint: alias.hint(&tokens[start..start + len]),
                        start,
                        len,
                    });
                }
            }
        }
        best.or_else(|| self.fuzzy_lookup(tokens))
    }

    fn fuzzy_lookup(&self, tokens: &[String]) -> Option<VenueMatch> {
        for (start, token) in tokens.iter().enumerate() {
            if token.len() < FUZZY_MIN_LEN - 1 {
                continue;
            }
            let hit = self.aliases.iter().find(|alias| {
                alias.tokens.len() == 1
                    && alias.tokens[0].len() >= FUZZY_MIN_LEN
                    && within_one_edit(&alias.tokens[0], token)
            });
            if let Some(alias) = hit {
                return Some(VenueMatch {
                    hint: alias.hint(&tokens[start..=start]),
                    start,
                    len: 1,
                });
            }
        }
        None
    }
}

impl Alias {
    /// The hint carries the words the user typed, not a display name.
    fn hint(&self, typed: &[String]) -> VenueHint {
        VenueHint {
            text: typed.join(" "),
            venue_ids: self.venue_ids.clone(),
            names: self.names.clone(),
        }
    }
}

fn tokenize(text: &str) -> Vec<String> {
    normalize(text, usize::MAX)
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// Levenshtein distance ≤ 1 without building a matrix.
fn within_one_edit(a: &str, b: &str) -> bool {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.len().abs_diff(b.len()) > 1 {
        return false;
    }
    let (short, long) = if a.len() <= b.len() { (&a, &b) } else { (&b, &a) };
    let mut i = 0;
    let mut j = 0;
    let mut edits = 0;
    while i < short.len() && j < long.len() {
        if short[i] == long[j] {
            i += 1;
            j += 1;
            continue;
        }
        edits += 1;
        if edits > 1 {
            return false;
        }
        if short.len() == long.len() {
            i += 1;
        }
        j += 1;
    }
    edits + (long.len() - j) + (short.len() - i) <= 1
}
