// Feedback Insights Core
// Sentiment, keyword and grouped statistics over customer feedback records.

pub mod analysis;
pub mod config;
pub mod dataset;
pub mod error;
pub mod models;
pub mod telemetry;

pub use analysis::{AnalysisReport, FeedbackAnalyzer, Predicate};
pub use config::{AnalysisConfig, GroupKey};
pub use error::{AppError, Result};
pub use models::{FeedbackRecord, RecordId, Sentiment, SentimentLabels};

#[cfg(test)]
mod tests;
