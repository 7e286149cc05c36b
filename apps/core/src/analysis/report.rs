//! Analysis Report - Output structures handed to rendering and export collaborators.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::keywords::KeywordCount;
use crate::config::GroupKey;
use crate::error::Result;
use crate::models::{RecordId, Sentiment, SentimentLabels};

/// Summary row for one group key value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupSummary {
    pub key: String,
    /// Records in the group
    pub count: usize,
    /// Mean over rated records only, rounded to 2 decimals. Omitted when nothing is rated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mean_rating: Option<f64>,
    /// Percentage of labeled records that are positive, rounded to 2 decimals.
    /// Omitted when no record of the group was labeled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub positive_ratio: Option<f64>,
}

/// Recoverable input problem: the record was left out of the affected view only
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputWarning {
    pub record_id: RecordId,
    pub field: String,
    pub value: String,
    pub message: String,
}

/// Group summaries for one key, plus the warnings raised while building them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupTable {
    pub group_key: GroupKey,
    /// Sorted by key ascending
    pub summaries: Vec<GroupSummary>,
    pub warnings: Vec<InputWarning>,
}

impl GroupTable {
    pub fn get(&self, key: &str) -> Option<&GroupSummary> {
        self.summaries.iter().find(|s| s.key == key)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentimentCount {
    pub sentiment: Sentiment,
    pub count: usize,
}

/// Headline numbers over the whole record set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverviewStats {
    pub total_records: usize,
    pub rated_records: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mean_rating: Option<f64>,
    pub distinct_products: usize,
    pub distinct_categories: usize,
    /// Positive, neutral, negative, in that order
    pub sentiment_distribution: Vec<SentimentCount>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub positive_ratio: Option<f64>,
}

/// Complete output of one pipeline run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Sentiment per record, keyed by record identity
    pub labels: SentimentLabels,
    /// Ranked keyword frequency table
    pub keywords: Vec<KeywordCount>,
    pub overview: OverviewStats,
    /// One table per configured group key
    pub groups: BTreeMap<GroupKey, GroupTable>,
    /// Processing time in milliseconds
    pub processing_time_ms: u64,
    pub generated_at: DateTime<Utc>,
}

impl AnalysisReport {
    pub fn group(&self, key: GroupKey) -> Option<&GroupTable> {
        self.groups.get(&key)
    }

    /// Every warning raised during the run, across all group tables
    pub fn warnings(&self) -> Vec<&InputWarning> {
        self.groups.values().flat_map(|table| table.warnings.iter()).collect()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Get a summary for logging
    pub fn summary(&self) -> String {
        let tables: Vec<String> = self
            .groups
            .values()
            .map(|t| format!("{}={}", t.group_key, t.summaries.len()))
            .collect();
        format!(
            "Records: {}, Keywords: {}, Groups: [{}], Warnings: {}",
            self.overview.total_records,
            self.keywords.len(),
            tables.join(", "),
            self.warnings().len()
        )
    }
}
