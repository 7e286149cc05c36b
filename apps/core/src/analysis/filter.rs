//! Filter Engine.
//!
//! Keeps the records satisfying every supplied predicate. An empty allowed
//! set is an explicit "nothing selected" and matches no record; leaving a
//! predicate out places no constraint on its field. A record missing the
//! constrained field never matches.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::debug;

use crate::error::{AppError, Result};
use crate::models::{FeedbackRecord, Sentiment, SentimentLabels};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoricalField {
    Product,
    Category,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NumericField {
    Rating,
}

/// A single constraint on a record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Predicate {
    /// Field value is one of `allowed`
    OneOf {
        field: CategoricalField,
        allowed: BTreeSet<String>,
    },
    /// Field value lies in `[low, high]`
    InRange {
        field: NumericField,
        low: f64,
        high: f64,
    },
    /// Derived sentiment is one of `allowed`
    SentimentIn { allowed: BTreeSet<Sentiment> },
}

impl Predicate {
    pub fn products<I, S>(allowed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Predicate::OneOf {
            field: CategoricalField::Product,
            allowed: allowed.into_iter().map(Into::into).collect(),
        }
    }

    pub fn categories<I, S>(allowed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Predicate::OneOf {
            field: CategoricalField::Category,
            allowed: allowed.into_iter().map(Into::into).collect(),
        }
    }

    pub fn rating_between(low: f64, high: f64) -> Self {
        Predicate::InRange {
            field: NumericField::Rating,
            low,
            high,
        }
    }

    pub fn sentiments<I>(allowed: I) -> Self
    where
        I: IntoIterator<Item = Sentiment>,
    {
        Predicate::SentimentIn {
            allowed: allowed.into_iter().collect(),
        }
    }

    /// Reject ranges that cannot match anything meaningful
    pub fn validate(&self) -> Result<()> {
        if let Predicate::InRange { low, high, .. } = self {
            if !low.is_finite() || !high.is_finite() {
                return Err(AppError::Config(format!(
                    "Range bounds must be finite, got [{}, {}]",
                    low, high
                )));
            }
            if low > high {
                return Err(AppError::Config(format!(
                    "Range lower bound {} exceeds upper bound {}",
                    low, high
                )));
            }
        }
        Ok(())
    }

    pub fn matches(&self, record: &FeedbackRecord, labels: &SentimentLabels) -> bool {
        match self {
            Predicate::OneOf { field, allowed } => {
                let value = match field {
                    CategoricalField::Product => record.product_key(),
                    CategoricalField::Category => record.category_key(),
                };
                value.is_some_and(|v| allowed.contains(v))
            }
            Predicate::InRange { field, low, high } => {
                let value = match field {
                    NumericField::Rating => record.rating,
                };
                value.is_some_and(|v| *low <= v && v <= *high)
            }
            Predicate::SentimentIn { allowed } => labels
                .get(&record.id)
                .is_some_and(|sentiment| allowed.contains(sentiment)),
        }
    }
}

/// Records satisfying the conjunction of `predicates`, in input order.
///
/// The source slice is untouched; the result is an independent copy.
pub fn filter_records(
    records: &[FeedbackRecord],
    labels: &SentimentLabels,
    predicates: &[Predicate],
) -> Result<Vec<FeedbackRecord>> {
    for predicate in predicates {
        predicate.validate()?;
    }

    let kept: Vec<FeedbackRecord> = records
        .iter()
        .filter(|record| predicates.iter().all(|p| p.matches(record, labels)))
        .cloned()
        .collect();

    debug!(
        "Filter kept {} of {} records ({} predicates)",
        kept.len(),
        records.len(),
        predicates.len()
    );
    Ok(kept)
}
