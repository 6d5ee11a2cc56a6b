//! Turning field keys into display labels.

use regex::Regex;
use std::sync::LazyLock;

static SEPARATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[_\-.\s]+").expect("separator pattern"));

/// Split a key into words on `_`, `-`, `.`, whitespace and camelCase humps.
///
/// Runs of capitals stay together as an acronym: `totalUSDValue` gives
/// `total`, `USD`, `Value`.
pub fn split_words(key: &str) -> Vec<String> {
    let mut words = Vec::new();
    for chunk in SEPARATORS.split(key).filter(|c| !c.is_empty()) {
        let chars: Vec<char> = chunk.chars().collect();
        let mut cur = String::new();
        for (i, &ch) in chars.iter().enumerate() {
            if i > 0 && ch.is_uppercase() {
                let prev = chars[i - 1];
                let next_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
                let hump = prev.is_lowercase() || prev.is_ascii_digit();
                let acronym_end = prev.is_uppercase() && next_lower;
                if (hump || acronym_end) && !cur.is_empty() {
                    words.push(std::mem::take(&mut cur));
                }
            }
            cur.push(ch);
        }
        if !cur.is_empty() {
            words.push(cur);
        }
    }
    words
}

/// Title-case a key for display: `monthlySpend` -> `Monthly Spend`,
/// `savings_rate` -> `Savings Rate`.
pub fn humanize_key(key: &str) -> String {
    split_words(key)
        .iter()
        .map(|w| capitalize(w))
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
