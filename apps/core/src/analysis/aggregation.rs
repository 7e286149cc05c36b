//! Aggregation Engine.
//!
//! Groups labeled records by product, category or year-month and computes
//! count, mean rating and positive ratio per group. Records lacking the key
//! are left out unless an explicit "unknown" bucket label is configured.
//! Unparsable dates never abort a month grouping; they become warnings, as do
//! records bucketed under an unknown label that is also a real key value.

use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, warn};

use super::report::{GroupSummary, GroupTable, InputWarning, OverviewStats, SentimentCount};
use super::sentiment::distribution;
use crate::config::{AnalysisConfig, GroupKey};
use crate::models::{month_key, FeedbackRecord, Sentiment, SentimentLabels};

/// Round to 2 decimal places
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Running sums for one group
#[derive(Debug, Default)]
struct GroupAccumulator {
    count: usize,
    rating_sum: f64,
    rated: usize,
    labeled: usize,
    positive: usize,
}

impl GroupAccumulator {
    fn add(&mut self, record: &FeedbackRecord, labels: &SentimentLabels) {
        self.count += 1;
        if let Some(rating) = record.rating.filter(|r| r.is_finite()) {
            self.rating_sum += rating;
            self.rated += 1;
        }
        if let Some(sentiment) = labels.get(&record.id) {
            self.labeled += 1;
            if *sentiment == Sentiment::Positive {
                self.positive += 1;
            }
        }
    }

    fn mean_rating(&self) -> Option<f64> {
        (self.rated > 0).then(|| round2(self.rating_sum / self.rated as f64))
    }

    fn positive_ratio(&self) -> Option<f64> {
        (self.labeled > 0).then(|| round2(self.positive as f64 / self.labeled as f64 * 100.0))
    }

    fn into_summary(self, key: String) -> GroupSummary {
        GroupSummary {
            mean_rating: self.mean_rating(),
            positive_ratio: self.positive_ratio(),
            count: self.count,
            key,
        }
    }
}

/// Outcome of resolving one record's group key
enum KeyLookup {
    Found(String),
    Missing,
    Invalid(InputWarning),
}

/// Stateless grouping engine
#[derive(Debug, Clone, Default)]
pub struct Aggregator {
    unknown_group_label: Option<String>,
}

impl Aggregator {
    pub fn new(unknown_group_label: Option<String>) -> Self {
        Self { unknown_group_label }
    }

    pub fn from_config(config: &AnalysisConfig) -> Self {
        Self::new(config.unknown_group_label.clone())
    }

    fn lookup(record: &FeedbackRecord, key: GroupKey) -> KeyLookup {
        let categorical = |value: Option<&str>| match value {
            Some(v) => KeyLookup::Found(v.to_string()),
            None => KeyLookup::Missing,
        };

        match key {
            GroupKey::Product => categorical(record.product_key()),
            GroupKey::Category => categorical(record.category_key()),
            GroupKey::Month => match record.parsed_date() {
                None => KeyLookup::Missing,
                Some(Ok(date)) => KeyLookup::Found(month_key(date)),
                Some(Err(err)) => KeyLookup::Invalid(InputWarning {
                    record_id: record.id,
                    field: "date".to_string(),
                    value: record.date.clone().unwrap_or_default(),
                    message: err.to_string(),
                }),
            },
        }
    }

    /// One summary per distinct key value, sorted by key
    pub fn aggregate(
        &self,
        records: &[FeedbackRecord],
        labels: &SentimentLabels,
        key: GroupKey,
    ) -> GroupTable {
        let mut groups: BTreeMap<String, GroupAccumulator> = BTreeMap::new();
        let mut warnings = Vec::new();
        let mut skipped = 0usize;
        let mut bucketed = Vec::new();
        let mut label_clashes = false;

        for record in records {
            let group = match Self::lookup(record, key) {
                KeyLookup::Found(value) => {
                    label_clashes |= self.unknown_group_label.as_deref() == Some(value.as_str());
                    value
                }
                KeyLookup::Missing => match &self.unknown_group_label {
                    Some(label) => {
                        bucketed.push(record.id);
                        label.clone()
                    }
                    None => {
                        skipped += 1;
                        continue;
                    }
                },
                KeyLookup::Invalid(warning) => {
                    warn!(
                        "Excluding record {} from {} grouping: {}",
                        warning.record_id, key, warning.message
                    );
                    warnings.push(warning);
                    continue;
                }
            };
            groups.entry(group).or_default().add(record, labels);
        }

        // Unknown bucket shares its label with a real group: the two are merged
        if label_clashes && !bucketed.is_empty() {
            let label = self.unknown_group_label.clone().unwrap_or_default();
            warn!(
                "Unknown {} bucket '{}' collides with a real group; {} records merged into it",
                key,
                label,
                bucketed.len()
            );
            warnings.extend(bucketed.into_iter().map(|record_id| InputWarning {
                record_id,
                field: key.name().to_string(),
                value: String::new(),
                message: format!("Missing {} bucketed under '{}', which is also a real {}", key, label, key),
            }));
        }

        debug!(
            "Grouped {} records by {} into {} groups ({} without key, {} invalid)",
            records.len(),
            key,
            groups.len(),
            skipped,
            warnings.len()
        );

        GroupTable {
            group_key: key,
            summaries: groups
                .into_iter()
                .map(|(value, acc)| acc.into_summary(value))
                .collect(),
            warnings,
        }
    }

    /// Whole-set statistics: totals, mean rating, distinct dimensions, label distribution
    pub fn overview(&self, records: &[FeedbackRecord], labels: &SentimentLabels) -> OverviewStats {
        let mut all = GroupAccumulator::default();
        let mut products = BTreeSet::new();
        let mut categories = BTreeSet::new();

        for record in records {
            all.add(record, labels);
            if let KeyLookup::Found(product) = Self::lookup(record, GroupKey::Product) {
                products.insert(product);
            }
            if let KeyLookup::Found(category) = Self::lookup(record, GroupKey::Category) {
                categories.insert(category);
            }
        }

        // Only count labels belonging to this record set
        let scoped: SentimentLabels = records
            .iter()
            .filter_map(|r| labels.get(&r.id).map(|s| (r.id, *s)))
            .collect();

        OverviewStats {
            total_records: all.count,
            rated_records: all.rated,
            mean_rating: all.mean_rating(),
            distinct_products: products.len(),
            distinct_categories: categories.len(),
            sentiment_distribution: distribution(&scoped)
                .into_iter()
                .map(|(sentiment, count)| SentimentCount { sentiment, count })
                .collect(),
            positive_ratio: all.positive_ratio(),
        }
    }
}
