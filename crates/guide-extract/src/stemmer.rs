//! Suffix-stripping stemmer for matching question words against record
//! titles and tags ("concerts" ~ "concert", "parties" ~ "party").
//!
//! Both sides of every comparison go through `stem`, so stems only need to
//! be consistent, not linguistically correct.

/// Suffix rules as (suffix, replacement), longest first within each family.
const SUFFIXES: &[(&str, &str)] = &[
    // plurals
    ("ies", "y"),
    ("ches", "ch"),
    ("shes", "sh"),
    ("sses", "ss"),
    ("xes", "x"),
    ("ss", "ss"),
    ("us", "us"),
    ("is", "is"),
    ("s", ""),
];

const VERB_SUFFIXES: &[(&str, &str)] = &[
    ("nning", "n"),
    ("pping", "p"),
    ("tting", "t"),
    ("mming", "m"),
    ("ying", "y"),
    ("ing", ""),
    ("ied", "y"),
    ("ed", ""),
];

/// Stem a lowercase word. Words of three characters or fewer are returned
/// unchanged.
pub fn stem(word: &str) -> String {
    if word.chars().count() <= 3 || !word.is_ascii() {
        return word.to_string();
    }

    let mut current = strip(word, SUFFIXES, 3);
    current = strip(&current, VERB_SUFFIXES, 2);
    // "dancing" -> "danc" and "dance" -> "danc"
    if current.len() > 4 && current.ends_with('e') {
        current.pop();
    }
    current
}

fn strip(word: &str, rules: &[(&str, &str)], min_base: usize) -> String {
    for &(suffix, replacement) in rules {
        if word.len() >= suffix.len() + min_base && word.ends_with(suffix) {
            let base = &word[..word.len() - suffix.len()];
            return format!("{base}{replacement}");
        }
    }
    word.to_string()
}
