use itertools::Itertools;
use unicode_normalization::UnicodeNormalization;

/// Fold an answer into a comparable form: accents stripped, remaining
/// non-ASCII dropped, whitespace runs collapsed to one space, lowercased.
pub fn normalize(input: &str) -> String {
    input
        .nfd()
        .map(|c| if c.is_whitespace() { ' ' } else { c })
        .filter(char::is_ascii)
        .collect::<String>()
        .split_ascii_whitespace()
        .join(" ")
        .to_ascii_lowercase()
}

pub fn answers_match(submitted: &str, expected: &str) -> bool {
    normalize(submitted) == normalize(expected)
}
