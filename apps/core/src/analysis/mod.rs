//! # Analysis Module
//!
//! Text analytics and aggregation over customer feedback records.
//! Pure, synchronous, in-memory: every stage is a function of its inputs
//! and the immutable [`AnalysisConfig`](crate::config::AnalysisConfig).
//!
//! ## Components
//! - `normalizer`: punctuation stripping, lower-casing, whitespace tokenization
//! - `stopwords`: stopword and short-token removal
//! - `sentiment`: pluggable classifier trait and the lexicon vote implementation
//! - `keywords`: corpus keyword frequency table with stable tie order
//! - `aggregation`: per-product / category / month summaries and overview stats
//! - `filter`: predicate conjunction over labeled records
//! - `report`: output data structures
//! - `pipeline`: main orchestrator

pub mod aggregation;
pub mod filter;
pub mod keywords;
pub mod normalizer;
pub mod pipeline;
pub mod report;
pub mod sentiment;
pub mod stopwords;

pub use aggregation::Aggregator;
pub use filter::{filter_records, CategoricalField, NumericField, Predicate};
pub use keywords::{KeywordCount, KeywordCounter, KeywordExtractor};
pub use normalizer::normalize;
pub use pipeline::FeedbackAnalyzer;
pub use report::{AnalysisReport, GroupSummary, GroupTable, InputWarning, OverviewStats, SentimentCount};
pub use sentiment::{label_records, LexiconClassifier, SentimentClassifier, SentimentScore};
pub use stopwords::filter_tokens;
