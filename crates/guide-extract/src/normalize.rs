//! Utterance normalization, tokenization and stop-words.

use once_cell::sync::Lazy;
use std::collections::HashSet;

/// Lowercase, drop apostrophes, turn punctuation into spaces and collapse
/// whitespace. `/ - . :` survive between digits (dates, times, prices) and
/// `$` survives in front of a digit. Input is cut at `max_chars`, backing up
/// to the previous whitespace rather than splitting a word.
pub fn normalize(text: &str, max_chars: usize) -> String {
    let mut chars: Vec<char> = text.chars().take(max_chars.saturating_add(1)).collect();
    if chars.len() > max_chars {
        let splits_word = !chars[max_chars].is_whitespace();
        chars.truncate(max_chars);
        if splits_word {
            if let Some(cut) = chars.iter().rposition(|c| c.is_whitespace()) {
                chars.truncate(cut);
            }
        }
    }
    let mut out = String::with_capacity(chars.len());

    for (i, &c) in chars.iter().enumerate() {
        let prev_digit = i > 0 && chars[i - 1].is_ascii_digit();
        let next_digit = chars.get(i + 1).is_some_and(|n| n.is_ascii_digit());
        match c {
            '\'' | '\u{2019}' => {}
            '/' | '-' | '.' | ':' if prev_digit && next_digit => out.push(c),
            '$' if next_digit => out.push(c),
            c if c.is_alphanumeric() => out.extend(c.to_lowercase()),
            _ => out.push(' '),
        }
    }

    out.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Split normalized text into tokens.
pub fn tokenize(normalized: &str) -> Vec<String> {
    normalized.split_whitespace().map(str::to_string).collect()
}

/// Function words plus generic question words that say nothing about
/// which record is wanted.
static STOP_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "a", "an", "the", "any", "some", "all", "is", "are", "was", "be", "been", "am",
        "what", "whats", "where", "wheres", "when", "who", "how", "which", "there", "theres",
        "here", "i", "im", "me", "my", "we", "us", "our", "you", "your", "it", "its", "they",
        "them", "in", "on", "at", "for", "of", "and", "or", "to", "with", "from", "by",
        "about", "near", "around", "into", "up", "out", "this", "that", "these", "those",
        "do", "does", "did", "doing", "can", "could", "would", "should", "will", "want",
        "wanna", "like", "looking", "look", "find", "get", "got", "have", "has", "go",
        "going", "happening", "anything", "something", "stuff", "thing", "things",
        "event", "events", "fun", "good", "cool", "please", "tell", "know", "recommend",
        "recommendations", "ideas", "options", "plans", "plan", "need", "else",
        "hey", "hi", "yo", "so", "just", "really", "very", "much", "many", "more", "most",
        "let", "lets", "see", "give", "list", "show", "available",
    ]
    .into_iter()
    .collect()
});

pub fn is_stop_word(token: &str) -> bool {
    STOP_WORDS.contains(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_punctuation() {
        assert_eq!(normalize("What's fun to do?!", 512), "whats fun to do");
        assert_eq!(
            normalize("Concerts @ the 40-Watt, tonight.", 512),
            "concerts the 40 watt tonight"
        );
    }

    #[test]
    fn test_normalize_keeps_numeric_shapes() {
        assert_eq!(normalize("on 10/31/2026 at 7:30", 512), "on 10/31/2026 at 7:30");
        assert_eq!(normalize("under $12.50!", 512), "under $12.50");
        assert_eq!(normalize("2026-10-31", 512), "2026-10-31");
    }

    #[test]
    fn test_normalize_truncates() {
        let long = "jazz ".repeat(1000);
        assert!(normalize(&long, 20).len() <= 20);
        // Multi-byte input is cut on char boundaries.
        assert_eq!(normalize("ééé", 2), "éé");
    }

    #[test]
    fn test_normalize_never_splits_a_word() {
        assert_eq!(normalize("jazz brunch tonight", 14), "jazz brunch");
        assert_eq!(normalize("jazz brunch tonight", 12), "jazz brunch");
        assert_eq!(normalize("jazz brunch tonight", 11), "jazz brunch");
        let long = "jazz ".repeat(200);
        let cut = normalize(&long, 512);
        assert!(cut.split_whitespace().all(|t| t == "jazz"));
    }

    #[test]
    fn test_stop_words() {
        assert!(is_stop_word("the"));
        assert!(is_stop_word("whats"));
        assert!(!is_stop_word("jazz"));
    }
}
