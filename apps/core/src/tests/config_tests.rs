//! Configuration Tests
//!
//! JSON files, environment overrides and eager rejection of bad settings.

use crate::analysis::FeedbackAnalyzer;
use crate::config::{AnalysisConfig, GroupKey};
use crate::error::AppError;
use std::io::Write;
use tempfile::{tempdir, NamedTempFile};

const ENV_VARS: [&str; 4] = [
    "FEEDBACK_TOP_N",
    "FEEDBACK_MIN_TOKEN_LENGTH",
    "FEEDBACK_GROUP_KEYS",
    "FEEDBACK_UNKNOWN_GROUP",
];

#[test]
fn test_partial_json_uses_defaults() {
    let config = AnalysisConfig::from_json_str(r#"{"top_n_keywords": 3, "group_keys": ["month"]}"#).unwrap();

    assert_eq!(config.top_n_keywords, 3);
    assert_eq!(config.group_keys, vec![GroupKey::Month]);
    assert_eq!(config.positive_lexicon, AnalysisConfig::default().positive_lexicon);
}

#[test]
fn test_negative_top_n_rejected() {
    let err = AnalysisConfig::from_json_str(r#"{"top_n_keywords": -1}"#).unwrap_err();
    assert!(err.is_config(), "Expected configuration error, got {:?}", err);
}

#[test]
fn test_unknown_group_key_rejected() {
    let err = AnalysisConfig::from_json_str(r#"{"group_keys": ["region"]}"#).unwrap_err();
    assert!(err.is_config());
}

#[test]
fn test_oversized_top_n_rejected() {
    let err = AnalysisConfig::from_json_str(r#"{"top_n_keywords": 1000000}"#).unwrap_err();
    assert!(err.is_config());
}

#[test]
fn test_json_file_round_trip() {
    let config = AnalysisConfig {
        positive_lexicon: vec!["great".to_string()],
        negative_lexicon: vec!["bad".to_string()],
        stopwords: ["the".to_string()].into_iter().collect(),
        ..Default::default()
    };

    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    write!(file, "{}", serde_json::to_string(&config).unwrap()).unwrap();

    let loaded = AnalysisConfig::from_json_file(file.path()).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn test_env_overrides() {
    temp_env::with_vars(
        [
            ("FEEDBACK_TOP_N", Some("5")),
            ("FEEDBACK_MIN_TOKEN_LENGTH", Some("2")),
            ("FEEDBACK_GROUP_KEYS", Some("product, month")),
            ("FEEDBACK_UNKNOWN_GROUP", Some("기타")),
        ],
        || {
            let config = AnalysisConfig::default().with_env_overrides().unwrap();
            assert_eq!(config.top_n_keywords, 5);
            assert_eq!(config.min_token_length, 2);
            assert_eq!(config.group_keys, vec![GroupKey::Product, GroupKey::Month]);
            assert_eq!(config.unknown_group_label.as_deref(), Some("기타"));
        },
    );
}

#[test]
fn test_env_override_invalid_values() {
    temp_env::with_var("FEEDBACK_TOP_N", Some("-3"), || {
        let err = AnalysisConfig::default().with_env_overrides().unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    });

    temp_env::with_var("FEEDBACK_GROUP_KEYS", Some("product,weekday"), || {
        assert!(AnalysisConfig::default().with_env_overrides().unwrap_err().is_config());
    });
}

#[test]
fn test_no_env_means_defaults() {
    let unset: Vec<(&str, Option<&str>)> = ENV_VARS.iter().map(|v| (*v, None)).collect();
    temp_env::with_vars(unset, || {
        let config = AnalysisConfig::default().with_env_overrides().unwrap();
        assert_eq!(config, AnalysisConfig::default());
    });
}

#[test]
fn test_dotenv_file_supplies_overrides() {
    let dir = tempdir().unwrap();
    let path = dir.path().join(".env");
    std::fs::write(&path, "FEEDBACK_TOP_N=3\nFEEDBACK_GROUP_KEYS=category\n").unwrap();

    let unset: Vec<(&str, Option<&str>)> = ENV_VARS.iter().map(|v| (*v, None)).collect();
    temp_env::with_vars(unset, || {
        let config = AnalysisConfig::from_env_file(&path).unwrap();
        assert_eq!(config.top_n_keywords, 3);
        assert_eq!(config.group_keys, vec![GroupKey::Category]);
        assert_eq!(config.min_token_length, AnalysisConfig::default().min_token_length);
    });
}

#[test]
fn test_process_env_wins_over_dotenv_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join(".env");
    std::fs::write(&path, "FEEDBACK_TOP_N=3\n").unwrap();

    let vars: Vec<(&str, Option<&str>)> = ENV_VARS
        .iter()
        .map(|v| (*v, (*v == "FEEDBACK_TOP_N").then_some("7")))
        .collect();
    temp_env::with_vars(vars, || {
        assert_eq!(AnalysisConfig::from_env_file(&path).unwrap().top_n_keywords, 7);
    });
}

#[test]
fn test_missing_dotenv_file_rejected() {
    let dir = tempdir().unwrap();
    let err = AnalysisConfig::from_env_file(dir.path().join("absent.env")).unwrap_err();
    assert!(err.is_config());
}

#[test]
fn test_analyzer_rejects_before_processing() {
    let config = AnalysisConfig {
        group_keys: vec![GroupKey::Product, GroupKey::Product],
        ..Default::default()
    };
    assert!(FeedbackAnalyzer::new(config).unwrap_err().is_config());
}
