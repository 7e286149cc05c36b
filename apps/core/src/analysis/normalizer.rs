//! Text Normalization.
//!
//! Turns raw feedback text into a lower-cased token sequence:
//! punctuation and symbols are stripped, letters and digits of any script survive.

use regex::Regex;
use std::sync::LazyLock;

// NOTE: expect() is acceptable here: the pattern is a compile-time constant
static NON_WORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[^\p{Alphabetic}\p{N}\s]").expect("Invalid regex: non-word character class")
});

/// Remove every character that is neither alphanumeric nor whitespace, then lower-case.
pub fn clean(text: &str) -> String {
    NON_WORD.replace_all(text, "").to_lowercase()
}

/// Normalize text into tokens. Absent text yields no tokens.
pub fn normalize(text: Option<&str>) -> Vec<String> {
    match text {
        Some(text) => clean(text).split_whitespace().map(str::to_string).collect(),
        None => Vec::new(),
    }
}
