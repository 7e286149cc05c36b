//! Stopword filtering applied after normalization.

use std::collections::BTreeSet;

/// Drops stopwords and tokens no longer than `min_length` characters.
///
/// Order is preserved and duplicates are kept.
pub fn filter_tokens(tokens: Vec<String>, stopwords: &BTreeSet<String>, min_length: usize) -> Vec<String> {
    tokens
        .into_iter()
        .filter(|token| token.chars().count() > min_length && !stopwords.contains(token))
        .collect()
}
