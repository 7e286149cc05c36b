//! Keyword Frequency Extraction.
//!
//! Counts normalized, stopword-filtered tokens across a whole corpus and
//! returns the most frequent ones. Ties keep first-seen order, so the
//! output is fully determined by the corpus order.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

use super::normalizer::normalize;
use super::stopwords::filter_tokens;
use crate::config::AnalysisConfig;

/// One row of the keyword frequency table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordCount {
    pub keyword: String,
    pub count: usize,
}

/// Corpus-level token counter remembering first-seen order.
///
/// Counters built over disjoint shards can be merged; merging in shard
/// order reproduces the single-pass tie order.
#[derive(Debug, Clone, Default)]
pub struct KeywordCounter {
    /// Tokens in first-seen order with their counts
    entries: Vec<(String, usize)>,
    positions: HashMap<String, usize>,
}

impl KeywordCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one already-filtered token
    pub fn add_token(&mut self, token: String, occurrences: usize) {
        match self.positions.get(&token) {
            Some(&pos) => self.entries[pos].1 += occurrences,
            None => {
                self.positions.insert(token.clone(), self.entries.len());
                self.entries.push((token, occurrences));
            }
        }
    }

    /// Normalize, filter and count one text
    pub fn add_text(&mut self, text: Option<&str>, stopwords: &BTreeSet<String>, min_length: usize) {
        for token in filter_tokens(normalize(text), stopwords, min_length) {
            self.add_token(token, 1);
        }
    }

    /// Fold another shard's counts into this one
    pub fn merge(&mut self, other: KeywordCounter) {
        for (token, count) in other.entries {
            self.add_token(token, count);
        }
    }

    /// Number of distinct tokens seen
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn count_of(&self, token: &str) -> usize {
        self.positions
            .get(token)
            .map(|&pos| self.entries[pos].1)
            .unwrap_or(0)
    }

    /// Top `n` tokens by descending count, ties in first-seen order
    pub fn top(&self, n: usize) -> Vec<KeywordCount> {
        if n == 0 {
            return vec![];
        }

        let mut ranked: Vec<&(String, usize)> = self.entries.iter().collect();
        // sort_by is stable: equal counts stay in insertion order
        ranked.sort_by(|a, b| b.1.cmp(&a.1));

        ranked
            .into_iter()
            .take(n)
            .map(|(keyword, count)| KeywordCount {
                keyword: keyword.clone(),
                count: *count,
            })
            .collect()
    }
}

/// Keyword extractor bound to one stopword configuration
#[derive(Debug, Clone)]
pub struct KeywordExtractor {
    stopwords: BTreeSet<String>,
    min_token_length: usize,
}

impl Default for KeywordExtractor {
    fn default() -> Self {
        Self::from_config(&AnalysisConfig::default())
    }
}

impl KeywordExtractor {
    pub fn new(stopwords: BTreeSet<String>, min_token_length: usize) -> Self {
        Self {
            stopwords,
            min_token_length,
        }
    }

    pub fn from_config(config: &AnalysisConfig) -> Self {
        Self::new(config.stopwords.clone(), config.min_token_length)
    }

    /// Build a counter over a corpus. Absent or empty texts contribute nothing.
    pub fn count<'a, I>(&self, corpus: I) -> KeywordCounter
    where
        I: IntoIterator<Item = Option<&'a str>>,
    {
        let mut counter = KeywordCounter::new();
        for text in corpus {
            counter.add_text(text, &self.stopwords, self.min_token_length);
        }
        counter
    }

    /// Top `top_n` keywords of the corpus
    pub fn extract<'a, I>(&self, corpus: I, top_n: usize) -> Vec<KeywordCount>
    where
        I: IntoIterator<Item = Option<&'a str>>,
    {
        self.count(corpus).top(top_n)
    }
}
