//! Feedback Analyzer - Main orchestrator for the analysis pipeline.
//!
//! raw records → sentiment labels → keyword table, overview and group tables.
//! Filtering runs on demand over the labeled set.
//!
//! The analyzer holds only immutable configuration; every call is a pure
//! function of its inputs.

use chrono::Utc;
use std::collections::BTreeMap;
use std::time::Instant;
use tracing::{info, warn};

use super::aggregation::Aggregator;
use super::filter::{filter_records, Predicate};
use super::keywords::{KeywordCount, KeywordExtractor};
use super::report::{AnalysisReport, GroupTable};
use super::sentiment::{label_records, LexiconClassifier, SentimentClassifier};
use crate::config::{AnalysisConfig, GroupKey};
use crate::error::Result;
use crate::models::{FeedbackRecord, Sentiment, SentimentLabels};

/// Pipeline entry point
pub struct FeedbackAnalyzer {
    config: AnalysisConfig,
    classifier: Box<dyn SentimentClassifier>,
    keyword_extractor: KeywordExtractor,
    aggregator: Aggregator,
}

impl FeedbackAnalyzer {
    /// Build an analyzer using the lexicon classifier from `config`.
    ///
    /// Fails with a configuration error before anything is processed.
    pub fn new(config: AnalysisConfig) -> Result<Self> {
        let classifier = LexiconClassifier::from_config(&config);
        Self::with_classifier(config, Box::new(classifier))
    }

    /// Build an analyzer around another sentiment strategy
    pub fn with_classifier(config: AnalysisConfig, classifier: Box<dyn SentimentClassifier>) -> Result<Self> {
        config.validate_config()?;
        Ok(Self {
            keyword_extractor: KeywordExtractor::from_config(&config),
            aggregator: Aggregator::from_config(&config),
            classifier,
            config,
        })
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn classify(&self, text: &str) -> Sentiment {
        self.classifier.classify(text)
    }

    /// One classification pass over the whole record set
    pub fn label(&self, records: &[FeedbackRecord]) -> SentimentLabels {
        label_records(self.classifier.as_ref(), records)
    }

    /// Keyword table over the records' texts, `top_n_keywords` long at most
    pub fn keywords(&self, records: &[FeedbackRecord]) -> Vec<KeywordCount> {
        self.keyword_extractor.extract(
            records.iter().map(|r| r.text.as_deref()),
            self.config.top_n_keywords,
        )
    }

    pub fn aggregate(&self, records: &[FeedbackRecord], labels: &SentimentLabels, key: GroupKey) -> GroupTable {
        self.aggregator.aggregate(records, labels, key)
    }

    pub fn filter(
        &self,
        records: &[FeedbackRecord],
        labels: &SentimentLabels,
        predicates: &[Predicate],
    ) -> Result<Vec<FeedbackRecord>> {
        filter_records(records, labels, predicates)
    }

    /// Sentiment drill-down: records carrying one label
    pub fn records_with_sentiment(
        &self,
        records: &[FeedbackRecord],
        labels: &SentimentLabels,
        sentiment: Sentiment,
    ) -> Vec<FeedbackRecord> {
        records
            .iter()
            .filter(|r| labels.get(&r.id) == Some(&sentiment))
            .cloned()
            .collect()
    }

    /// Run the full pipeline over a record set
    pub fn analyze(&self, records: &[FeedbackRecord]) -> AnalysisReport {
        let start = Instant::now();

        // 1. Label every record
        let labels = self.label(records);

        // 2. Corpus keywords
        let keywords = self.keywords(records);

        // 3. Whole-set statistics
        let overview = self.aggregator.overview(records, &labels);

        // 4. One table per configured key
        let groups: BTreeMap<GroupKey, GroupTable> = self
            .config
            .group_keys
            .iter()
            .map(|key| (*key, self.aggregate(records, &labels, *key)))
            .collect();

        let report = AnalysisReport {
            labels,
            keywords,
            overview,
            groups,
            processing_time_ms: start.elapsed().as_millis() as u64,
            generated_at: Utc::now(),
        };

        let warnings = report.warnings().len();
        if warnings > 0 {
            warn!("{} input warnings raised while building derived views", warnings);
        }
        info!("Feedback analysis complete: {}", report.summary());

        report
    }
}

impl std::fmt::Debug for FeedbackAnalyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeedbackAnalyzer")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
