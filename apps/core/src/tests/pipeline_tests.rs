//! Pipeline Tests
//!
//! End-to-end runs: CSV sheet in, labeled report and filtered export out.

use crate::analysis::{FeedbackAnalyzer, Predicate};
use crate::config::{AnalysisConfig, GroupKey};
use crate::dataset::{load_csv, load_csv_file, write_csv_file};
use crate::models::{FeedbackRecord, Sentiment};
use tempfile::tempdir;

const SHEET: &str = "\
feedback_text,rating,product,category,date
배송이 빠르고 좋아요,5,쇼핑앱,배송,2024-01-05
앱이 자주 충돌해요. 오류 문제!,1,쇼핑앱,안정성,2024-01-18
상담원이 친절하고 설명이 간단명료했어요,4,고객센터,상담,2024-02-02
화면이 깔끔하고 직관적이에요,5,쇼핑앱,UI,2024-02-20
그냥 그랬어요,3,고객센터,상담,someday
결제 과정이 어렵고 불편해요,,결제,결제,2024-03-09
";

#[test]
fn test_full_run_from_csv() {
    let dataset = load_csv(SHEET.as_bytes()).unwrap();
    assert_eq!(dataset.records.len(), 6);

    let analyzer = FeedbackAnalyzer::new(AnalysisConfig::default()).unwrap();
    let report = analyzer.analyze(&dataset.records);
    let records = &dataset.records;

    // Labels
    assert_eq!(report.labels.len(), 6);
    assert_eq!(report.labels[&records[0].id], Sentiment::Positive);
    assert_eq!(report.labels[&records[1].id], Sentiment::Negative);
    assert_eq!(report.labels[&records[4].id], Sentiment::Neutral);
    assert_eq!(report.labels[&records[5].id], Sentiment::Negative);

    // Overview
    assert_eq!(report.overview.total_records, 6);
    assert_eq!(report.overview.rated_records, 5);
    assert_eq!(report.overview.mean_rating, Some(3.6));
    assert_eq!(report.overview.distinct_products, 3);
    assert_eq!(report.overview.distinct_categories, 5);
    assert_eq!(report.overview.positive_ratio, Some(50.0));

    // Product table, sorted by key
    let products = report.group(GroupKey::Product).unwrap();
    let keys: Vec<&str> = products.summaries.iter().map(|s| s.key.as_str()).collect();
    assert_eq!(keys, vec!["결제", "고객센터", "쇼핑앱"]);
    assert_eq!(products.get("결제").unwrap().mean_rating, None);
    let shop = products.get("쇼핑앱").unwrap();
    assert_eq!(shop.count, 3);
    assert_eq!(shop.mean_rating, Some(3.67));
    assert_eq!(shop.positive_ratio, Some(66.67));

    // Month table drops the unparsable date with a warning
    let months = report.group(GroupKey::Month).unwrap();
    assert_eq!(months.summaries.len(), 3);
    assert_eq!(months.warnings.len(), 1);
    assert_eq!(months.warnings[0].record_id, records[4].id);
    assert_eq!(report.warnings().len(), 1);

    // Keywords are bounded and non-empty
    assert!(!report.keywords.is_empty());
    assert!(report.keywords.len() <= 10);
}

#[test]
fn test_report_is_reproducible() {
    let dataset = load_csv(SHEET.as_bytes()).unwrap();
    let analyzer = FeedbackAnalyzer::new(AnalysisConfig::default()).unwrap();

    let first = analyzer.analyze(&dataset.records);
    let second = analyzer.analyze(&dataset.records);

    assert_eq!(first.labels, second.labels);
    assert_eq!(first.keywords, second.keywords);
    assert_eq!(first.overview, second.overview);
    assert_eq!(first.groups, second.groups);
}

#[test]
fn test_report_serializes_to_json() {
    let dataset = load_csv(SHEET.as_bytes()).unwrap();
    let analyzer = FeedbackAnalyzer::new(AnalysisConfig::default()).unwrap();
    let report = analyzer.analyze(&dataset.records);

    let json = report.to_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert!(value["groups"]["product"]["summaries"].is_array());
    // Unrated group omits mean_rating entirely
    let payment = value["groups"]["product"]["summaries"]
        .as_array()
        .unwrap()
        .iter()
        .find(|s| s["key"] == "결제")
        .unwrap();
    assert!(payment.get("mean_rating").is_none());
    assert_eq!(value["overview"]["sentiment_distribution"][0]["sentiment"], "positive");
}

#[test]
fn test_filter_then_export_round_trip() {
    let dataset = load_csv(SHEET.as_bytes()).unwrap();
    let analyzer = FeedbackAnalyzer::new(AnalysisConfig::default()).unwrap();
    let labels = analyzer.label(&dataset.records);

    let view = analyzer
        .filter(
            &dataset.records,
            &labels,
            &[
                Predicate::products(["쇼핑앱", "고객센터"]),
                Predicate::rating_between(4.0, 5.0),
            ],
        )
        .unwrap();
    assert_eq!(view.len(), 3);

    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("filtered_feedback_data.csv");
    write_csv_file(&path, &view, &labels).unwrap();

    let reloaded = load_csv_file(&path).unwrap();
    assert_eq!(reloaded.records.len(), 3);
    assert_eq!(
        reloaded.records.iter().map(|r| r.text.clone()).collect::<Vec<_>>(),
        view.iter().map(|r| r.text.clone()).collect::<Vec<_>>()
    );
    assert_eq!(reloaded.records[0].rating, Some(5.0));
}

#[test]
fn test_empty_view_exports_and_reloads() {
    let dataset = load_csv(SHEET.as_bytes()).unwrap();
    let analyzer = FeedbackAnalyzer::new(AnalysisConfig::default()).unwrap();
    let labels = analyzer.label(&dataset.records);

    let view = analyzer
        .filter(&dataset.records, &labels, &[Predicate::sentiments([])])
        .unwrap();
    assert!(view.is_empty());

    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("empty_view.csv");
    write_csv_file(&path, &view, &labels).unwrap();

    let reloaded = load_csv_file(&path).unwrap();
    assert!(reloaded.records.is_empty());
    assert!(reloaded.warnings.is_empty());
}

#[test]
fn test_group_keys_select_their_own_records() {
    let records = vec![
        FeedbackRecord::new("배송이 빨라요").with_product(" 앱 ").with_category("배송"),
        FeedbackRecord::new("오류가 나요").with_product("앱").with_category(" 안정성"),
        FeedbackRecord::new("친절해요").with_product("웹 ").with_category("상담"),
        FeedbackRecord::new("그냥요").with_product("   ").with_category("상담"),
    ];
    let analyzer = FeedbackAnalyzer::new(AnalysisConfig::default()).unwrap();
    let labels = analyzer.label(&records);

    for key in [GroupKey::Product, GroupKey::Category] {
        let table = analyzer.aggregate(&records, &labels, key);
        for summary in &table.summaries {
            let predicate = match key {
                GroupKey::Product => Predicate::products([summary.key.as_str()]),
                _ => Predicate::categories([summary.key.as_str()]),
            };
            let view = analyzer.filter(&records, &labels, &[predicate]).unwrap();
            assert_eq!(view.len(), summary.count, "{} group '{}'", key, summary.key);
        }
    }

    let blank = analyzer
        .filter(&records, &labels, &[Predicate::products(["   "])])
        .unwrap();
    assert!(blank.is_empty());
}

#[test]
fn test_unknown_bucket_configuration() {
    let dataset = load_csv(SHEET.as_bytes()).unwrap();
    let config = AnalysisConfig {
        group_keys: vec![GroupKey::Month],
        unknown_group_label: Some("미상".to_string()),
        ..Default::default()
    };
    let report = FeedbackAnalyzer::new(config).unwrap().analyze(&dataset.records);

    let months = report.group(GroupKey::Month).unwrap();
    // Unparsable dates are still excluded, not bucketed
    assert!(months.get("미상").is_none());
    assert_eq!(months.warnings.len(), 1);
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempdir().expect("Failed to create temp dir");
    let err = load_csv_file(dir.path().join("missing.csv")).unwrap_err();
    assert!(matches!(err, crate::error::AppError::Io(_)));
}
