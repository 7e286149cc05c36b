//! Test Module
//!
//! Cross-module test suite for the feedback analytics core.
//!
//! ## Test Categories
//! - `analysis_tests`: classifier, keyword, aggregation and filter properties
//! - `pipeline_tests`: full runs from CSV input to report and export
//! - `config_tests`: JSON and environment configuration loading

pub mod config_tests;
pub mod pipeline_tests;
