use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::{AppError, Result};

/// Stable identity of a feedback record, used to key derived data such as sentiment labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub Uuid);

impl RecordId {
    /// Generates a fresh random identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RecordId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Derived sentiment label of a feedback text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

impl Sentiment {
    /// All labels, in the order distributions are reported.
    pub const ALL: [Sentiment; 3] = [Sentiment::Positive, Sentiment::Neutral, Sentiment::Negative];

    pub fn label(&self) -> &'static str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Neutral => "neutral",
            Sentiment::Negative => "negative",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for Sentiment {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "positive" => Ok(Sentiment::Positive),
            "neutral" => Ok(Sentiment::Neutral),
            "negative" => Ok(Sentiment::Negative),
            other => Err(AppError::Config(format!("Unknown sentiment label: {}", other))),
        }
    }
}

/// Sentiment labels produced by one classification pass, keyed by record identity.
///
/// Records are never mutated; aggregation and filtering look labels up here.
pub type SentimentLabels = HashMap<RecordId, Sentiment>;

/// One customer feedback entry as supplied by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackRecord {
    pub id: RecordId,
    /// Free-form feedback text
    pub text: Option<String>,
    /// Rating on an ordered numeric scale (e.g. 1-5)
    pub rating: Option<f64>,
    pub product: Option<String>,
    pub category: Option<String>,
    /// Raw calendar value; parsed lazily so malformed values can be reported per view.
    pub date: Option<String>,
}

impl FeedbackRecord {
    /// Create a record holding only text
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: RecordId::new(),
            text: Some(text.into()),
            rating: None,
            product: None,
            category: None,
            date: None,
        }
    }

    /// Create a record without any text
    pub fn empty() -> Self {
        Self {
            id: RecordId::new(),
            text: None,
            rating: None,
            product: None,
            category: None,
            date: None,
        }
    }

    pub fn with_rating(mut self, rating: f64) -> Self {
        self.rating = Some(rating);
        self
    }

    pub fn with_product(mut self, product: impl Into<String>) -> Self {
        self.product = Some(product.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    /// Text as a string slice, absent text reads as empty.
    pub fn text_or_empty(&self) -> &str {
        self.text.as_deref().unwrap_or("")
    }

    /// Product as used for grouping and filtering: trimmed, `None` when blank.
    pub fn product_key(&self) -> Option<&str> {
        categorical_key(&self.product)
    }

    /// Category as used for grouping and filtering: trimmed, `None` when blank.
    pub fn category_key(&self) -> Option<&str> {
        categorical_key(&self.category)
    }

    /// Parsed calendar date. `None` when no date was supplied.
    pub fn parsed_date(&self) -> Option<Result<NaiveDate>> {
        self.date
            .as_deref()
            .map(str::trim)
            .filter(|raw| !raw.is_empty())
            .map(parse_feedback_date)
    }
}

fn categorical_key(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M:%S"];
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%Y.%m.%d"];

/// Parse the date formats commonly found in exported feedback sheets.
pub fn parse_feedback_date(raw: &str) -> Result<NaiveDate> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.date_naive());
    }
    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(dt.date());
        }
    }
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(raw, format) {
            return Ok(date);
        }
    }
    // Year-month only: pin to the first day
    NaiveDate::parse_from_str(&format!("{}-01", raw), "%Y-%m-%d")
        .map_err(|e| AppError::Input(format!("Unparsable date '{}': {}", raw, e)))
}

/// Year-month period key (`YYYY-MM`), sorts chronologically as a string.
pub fn month_key(date: NaiveDate) -> String {
    date.format("%Y-%m").to_string()
}
