//! Sentiment Classification using marker lexicons.
//!
//! Counts how many positive and negative marker substrings occur in the
//! lower-cased text and votes. No ML model, no negation handling, no
//! intensity weighting: a negative marker embedded inside an unrelated word
//! still counts. Treat that as a known limitation of the heuristic.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

use crate::config::AnalysisConfig;
use crate::models::{FeedbackRecord, Sentiment, SentimentLabels};

/// Anything able to turn a text into a sentiment label.
///
/// Implementations must be deterministic: the same text always yields the same label.
pub trait SentimentClassifier: Send + Sync {
    fn classify(&self, text: &str) -> Sentiment;
}

/// Detailed outcome of a lexicon vote
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentimentScore {
    pub sentiment: Sentiment,
    pub positive_hits: usize,
    pub negative_hits: usize,
    /// Markers that matched, positive ones first, in lexicon order
    pub matched_markers: Vec<String>,
}

/// Substring-vote classifier over two ordered marker lists
#[derive(Debug, Clone)]
pub struct LexiconClassifier {
    positive: Vec<String>,
    negative: Vec<String>,
}

impl LexiconClassifier {
    pub fn new<P, N>(positive: P, negative: N) -> Self
    where
        P: IntoIterator,
        P::Item: AsRef<str>,
        N: IntoIterator,
        N::Item: AsRef<str>,
    {
        Self {
            positive: positive.into_iter().map(|m| m.as_ref().to_lowercase()).collect(),
            negative: negative.into_iter().map(|m| m.as_ref().to_lowercase()).collect(),
        }
    }

    pub fn from_config(config: &AnalysisConfig) -> Self {
        Self::new(&config.positive_lexicon, &config.negative_lexicon)
    }

    /// Vote with full detail on which markers fired
    pub fn score(&self, text: &str) -> SentimentScore {
        if text.trim().is_empty() {
            return SentimentScore {
                sentiment: Sentiment::Neutral,
                positive_hits: 0,
                negative_hits: 0,
                matched_markers: vec![],
            };
        }

        let lowered = text.to_lowercase();
        let positive: Vec<&String> = self.positive.iter().filter(|m| lowered.contains(m.as_str())).collect();
        let negative: Vec<&String> = self.negative.iter().filter(|m| lowered.contains(m.as_str())).collect();

        let sentiment = match positive.len().cmp(&negative.len()) {
            std::cmp::Ordering::Greater => Sentiment::Positive,
            std::cmp::Ordering::Less => Sentiment::Negative,
            std::cmp::Ordering::Equal => Sentiment::Neutral,
        };

        SentimentScore {
            sentiment,
            positive_hits: positive.len(),
            negative_hits: negative.len(),
            matched_markers: positive.into_iter().chain(negative).cloned().collect(),
        }
    }
}

impl Default for LexiconClassifier {
    fn default() -> Self {
        Self::from_config(&AnalysisConfig::default())
    }
}

impl SentimentClassifier for LexiconClassifier {
    fn classify(&self, text: &str) -> Sentiment {
        self.score(text).sentiment
    }
}

/// Label every record once. Absent text classifies as neutral.
pub fn label_records<C>(classifier: &C, records: &[FeedbackRecord]) -> SentimentLabels
where
    C: SentimentClassifier + ?Sized,
{
    let labels: SentimentLabels = records
        .iter()
        .map(|record| (record.id, classifier.classify(record.text_or_empty())))
        .collect();

    debug!("Labeled {} records", labels.len());
    labels
}

/// Count of each label, reported in `Sentiment::ALL` order.
pub fn distribution(labels: &SentimentLabels) -> Vec<(Sentiment, usize)> {
    let mut counts: HashMap<Sentiment, usize> = HashMap::new();
    for sentiment in labels.values() {
        *counts.entry(*sentiment).or_insert(0) += 1;
    }
    Sentiment::ALL
        .iter()
        .map(|s| (*s, counts.get(s).copied().unwrap_or(0)))
        .collect()
}
