//! Price ceilings: "free", "cheap", "under $20", "$15 or less".

use once_cell::sync::Lazy;
use regex::Regex;

static MONEY: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\$?(\d+(?:\.\d{1,2})?)$").unwrap());

const CEILING_WORDS: &[&[&str]] = &[
    &["under"],
    &["below"],
    &["less", "than"],
    &["cheaper", "than"],
    &["up", "to"],
    &["max"],
    &["at", "most"],
];

const CURRENCY_WORDS: &[&str] = &["dollars", "dollar", "bucks", "usd"];

/// Price ceiling found in a token stream plus the tokens it used.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceMatch {
    pub max_price: Option<f64>,
    pub consumed: Vec<bool>,
}

/// Recognize price ceilings. Several ceilings resolve to the tightest one.
pub fn recognize(tokens: &[String], cheap_price: f64) -> PriceMatch {
    let mut consumed = vec![false; tokens.len()];
    let mut ceilings = Vec::new();

    let mut i = 0;
    while i < tokens.len() {
        let token = tokens[i].as_str();

        if token == "free" {
            ceilings.push(0.0);
            consumed[i] = true;
            i += 1;
            continue;
        }
        if token == "cheap" || token == "inexpensive" || token == "affordable" {
            ceilings.push(cheap_price);
            consumed[i] = true;
            i += 1;
            continue;
        }

        // "under $20", "less than 15 bucks"
        if let Some(words) = CEILING_WORDS.iter().find(|w| starts_with(tokens, i, w)) {
            let at = i + words.len();
            if let Some(amount) = tokens.get(at).and_then(|t| money(t)) {
                let mut end = at + 1;
                if tokens.get(end).is_some_and(|t| CURRENCY_WORDS.contains(&t.as_str())) {
                    end += 1;
                }
                ceilings.push(amount);
                consumed[i..end].iter_mut().for_each(|c| *c = true);
                i = end;
                continue;
            }
        }

        // "$15 or less", "20 dollars or under"
        if let Some(amount) = money(token) {
            let mut at = i + 1;
            if tokens.get(at).is_some_and(|t| CURRENCY_WORDS.contains(&t.as_str())) {
                at += 1;
            }
            let trailing = starts_with(tokens, at, &["or", "less"])
                || starts_with(tokens, at, &["or", "under"])
                || starts_with(tokens, at, &["or", "cheaper"]);
            if trailing {
                ceilings.push(amount);
                consumed[i..at + 2].iter_mut().for_each(|c| *c = true);
                i = at + 2;
                continue;
            }
        }

        i += 1;
    }

    let max_price = ceilings.into_iter().reduce(f64::min);
    PriceMatch {
        max_price,
        consumed,
    }
}

fn starts_with(tokens: &[String], at: usize, words: &[&str]) -> bool {
    tokens.len() >= at + words.len()
        && tokens[at..at + words.len()]
            .iter()
            .zip(words)
            .all(|(t, w)| t == w)
}

fn money(token: &str) -> Option<f64> {
    MONEY
        .captures(token)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(text: &str) -> Vec<String> {
        text.split_whitespace().map(str::to_string).collect()
    }

    #[test]
    fn test_under_amount() {
        let m = recognize(&tokens("shows under $20 tonight"), 15.0);
        assert_eq!(m.max_price, Some(20.0));
        assert_eq!(m.consumed, vec![false, true, true, false]);

        let m = recognize(&tokens("less than 12.50 bucks"), 15.0);
        assert_eq!(m.max_price, Some(12.5));
        assert!(m.consumed.iter().all(|&c| c));
    }

    #[test]
    fn test_trailing_or_less() {
        let m = recognize(&tokens("comedy $10 or less"), 15.0);
        assert_eq!(m.max_price, Some(10.0));
        assert_eq!(m.consumed, vec![false, true, true, true]);
    }

    #[test]
    fn test_free_and_cheap() {
        assert_eq!(recognize(&tokens("free stuff"), 15.0).max_price, Some(0.0));
        assert_eq!(recognize(&tokens("cheap drinks"), 15.0).max_price, Some(15.0));
        // The tighter ceiling wins.
        assert_eq!(recognize(&tokens("cheap shows under $8"), 15.0).max_price, Some(8.0));
    }

    #[test]
    fn test_bare_numbers_are_not_prices() {
        let m = recognize(&tokens("40 watt club"), 15.0);
        assert_eq!(m.max_price, None);
        assert!(m.consumed.iter().all(|&c| !c));
        assert_eq!(recognize(&tokens("under the bridge"), 15.0).max_price, None);
    }
}
