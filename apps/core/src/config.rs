//! Analysis Configuration.
//!
//! Immutable settings threaded through every analysis call: stopwords, token
//! length threshold, sentiment lexicons, keyword table size and group keys.
//! Defaults reproduce the Korean customer-feedback dashboard setup.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::env;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info};
use validator::Validate;

use crate::error::{AppError, Result};

/// Default stopwords: common short Korean function words
const DEFAULT_STOPWORDS: &[&str] = &[
    "이", "그", "저", "것", "수", "등", "때", "곳", "말", "일", "년", "월", "시", "분", "초",
];

/// Positive marker substrings (stems, so conjugated forms still match)
const DEFAULT_POSITIVE_LEXICON: &[&str] =
    &["좋", "편", "빠르", "유용", "친절", "깔끔", "직관", "간단"];

/// Negative marker substrings
const DEFAULT_NEGATIVE_LEXICON: &[&str] =
    &["느리", "어렵", "오류", "충돌", "문제", "불편", "아프", "작"];

pub const DEFAULT_TOP_N_KEYWORDS: usize = 10;
pub const DEFAULT_MIN_TOKEN_LENGTH: usize = 1;

// Environment overrides
const ENV_TOP_N: &str = "FEEDBACK_TOP_N";
const ENV_MIN_TOKEN_LENGTH: &str = "FEEDBACK_MIN_TOKEN_LENGTH";
const ENV_GROUP_KEYS: &str = "FEEDBACK_GROUP_KEYS";
const ENV_UNKNOWN_GROUP: &str = "FEEDBACK_UNKNOWN_GROUP";

/// Dimension used to partition records for aggregation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupKey {
    Product,
    Category,
    /// Year-month period derived from the record date
    Month,
}

impl GroupKey {
    pub const ALL: [GroupKey; 3] = [GroupKey::Product, GroupKey::Category, GroupKey::Month];

    pub fn name(&self) -> &'static str {
        match self {
            GroupKey::Product => "product",
            GroupKey::Category => "category",
            GroupKey::Month => "month",
        }
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for GroupKey {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "product" => Ok(GroupKey::Product),
            "category" => Ok(GroupKey::Category),
            "month" => Ok(GroupKey::Month),
            other => Err(AppError::Config(format!("Unknown group key: '{}'", other))),
        }
    }
}

/// Settings for one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Tokens excluded from keyword counting
    pub stopwords: BTreeSet<String>,
    /// Tokens whose length (in characters) is at or below this are dropped
    pub min_token_length: usize,
    /// Ordered positive marker substrings
    pub positive_lexicon: Vec<String>,
    /// Ordered negative marker substrings; either lexicon may be empty
    pub negative_lexicon: Vec<String>,
    /// Size of the keyword frequency table
    #[validate(range(max = 10000))]
    pub top_n_keywords: usize,
    /// Group summary tables to build
    #[validate(length(min = 1))]
    pub group_keys: Vec<GroupKey>,
    /// When set, records missing a group key are bucketed under this label instead of dropped
    pub unknown_group_label: Option<String>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            stopwords: DEFAULT_STOPWORDS.iter().map(|s| s.to_string()).collect(),
            min_token_length: DEFAULT_MIN_TOKEN_LENGTH,
            positive_lexicon: DEFAULT_POSITIVE_LEXICON.iter().map(|s| s.to_string()).collect(),
            negative_lexicon: DEFAULT_NEGATIVE_LEXICON.iter().map(|s| s.to_string()).collect(),
            top_n_keywords: DEFAULT_TOP_N_KEYWORDS,
            group_keys: GroupKey::ALL.to_vec(),
            unknown_group_label: None,
        }
    }
}

impl AnalysisConfig {
    /// Parse and validate a JSON configuration. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: AnalysisConfig = serde_json::from_str(json)?;
        config.validate_config()?;
        Ok(config)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let raw = std::fs::read_to_string(&path)?;
        debug!("Loaded analysis config from {:?}", path.as_ref());
        Self::from_json_str(&raw)
    }

    /// Defaults overridden by `FEEDBACK_*` environment variables (a `.env` file is honoured).
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::default().with_env_overrides()
    }

    /// Like [`AnalysisConfig::from_env`], reading variables from an explicit dotenv file.
    /// Variables already set in the process take precedence over the file.
    pub fn from_env_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        dotenv::from_path(path.as_ref()).map_err(|e| {
            AppError::Config(format!("Failed to load env file {:?}: {}", path.as_ref(), e))
        })?;
        Self::default().with_env_overrides()
    }

    /// Apply `FEEDBACK_*` environment overrides on top of this configuration.
    pub fn with_env_overrides(mut self) -> Result<Self> {
        if let Ok(value) = env::var(ENV_TOP_N) {
            self.top_n_keywords = parse_env_usize(ENV_TOP_N, &value)?;
        }
        if let Ok(value) = env::var(ENV_MIN_TOKEN_LENGTH) {
            self.min_token_length = parse_env_usize(ENV_MIN_TOKEN_LENGTH, &value)?;
        }
        if let Ok(value) = env::var(ENV_GROUP_KEYS) {
            self.group_keys = value
                .split(',')
                .filter(|part| !part.trim().is_empty())
                .map(GroupKey::from_str)
                .collect::<Result<Vec<_>>>()?;
        }
        if let Ok(value) = env::var(ENV_UNKNOWN_GROUP) {
            let value = value.trim();
            self.unknown_group_label = (!value.is_empty()).then(|| value.to_string());
        }

        self.validate_config()?;
        info!(
            "Analysis config: top_n={}, min_token_length={}, group_keys={:?}",
            self.top_n_keywords, self.min_token_length, self.group_keys
        );
        Ok(self)
    }

    /// Reject unusable settings before any record is processed.
    pub fn validate_config(&self) -> Result<()> {
        self.validate()?;

        // An empty marker is a substring of every text and would swamp the vote
        for (polarity, lexicon) in [
            ("positive", &self.positive_lexicon),
            ("negative", &self.negative_lexicon),
        ] {
            if lexicon.iter().any(|marker| marker.trim().is_empty()) {
                return Err(AppError::Config(format!(
                    "{} lexicon contains an empty marker",
                    polarity
                )));
            }
        }

        let distinct: BTreeSet<_> = self.group_keys.iter().collect();
        if distinct.len() != self.group_keys.len() {
            return Err(AppError::Config("group_keys contains duplicates".to_string()));
        }

        if let Some(label) = &self.unknown_group_label {
            if label.trim().is_empty() {
                return Err(AppError::Config(
                    "unknown_group_label must not be blank".to_string(),
                ));
            }
        }

        Ok(())
    }
}

fn parse_env_usize(name: &str, value: &str) -> Result<usize> {
    value
        .trim()
        .parse::<usize>()
        .map_err(|_| AppError::Config(format!("{} must be a non-negative integer, got '{}'", name, value)))
}
