//! Dataset loading and export.
//!
//! Reads feedback sheets exported as CSV into [`FeedbackRecord`]s and writes
//! (filtered) record views back out with their sentiment label.
//!
//! Recognised columns (case-insensitive): `feedback_text` or `text` (required),
//! `rating`, `product`, `category`, `date`. Other columns are ignored.

use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use serde::Serialize;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use tracing::{info, warn};

use crate::analysis::InputWarning;
use crate::error::{AppError, Result};
use crate::models::{FeedbackRecord, RecordId, SentimentLabels};

const TEXT_COLUMNS: &[&str] = &["feedback_text", "text"];
const EXPORT_COLUMNS: [&str; 6] = ["feedback_text", "rating", "product", "category", "date", "sentiment"];

/// Records read from a sheet, plus the cells that could not be interpreted
#[derive(Debug, Clone)]
pub struct LoadedDataset {
    pub records: Vec<FeedbackRecord>,
    pub warnings: Vec<InputWarning>,
}

/// Column positions resolved from the header row
#[derive(Debug)]
struct ColumnMap {
    text: usize,
    rating: Option<usize>,
    product: Option<usize>,
    category: Option<usize>,
    date: Option<usize>,
}

impl ColumnMap {
    fn from_headers(headers: &StringRecord) -> Result<Self> {
        let names: Vec<String> = headers
            .iter()
            .map(|h| h.trim().trim_start_matches('\u{feff}').to_lowercase())
            .collect();
        let position = |name: &str| names.iter().position(|n| n == name);

        let text = TEXT_COLUMNS
            .iter()
            .find_map(|name| position(*name))
            .ok_or_else(|| {
                AppError::Input(format!(
                    "Missing text column (expected one of {:?}), found {:?}",
                    TEXT_COLUMNS, names
                ))
            })?;

        Ok(Self {
            text,
            rating: position("rating"),
            product: position("product"),
            category: position("category"),
            date: position("date"),
        })
    }
}

fn cell(row: &StringRecord, index: Option<usize>) -> Option<String> {
    index
        .and_then(|i| row.get(i))
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Read a CSV sheet. Rows with unparsable ratings are kept, with the rating absent.
pub fn load_csv<R: Read>(reader: R) -> Result<LoadedDataset> {
    let mut reader = ReaderBuilder::new().flexible(true).from_reader(reader);
    let columns = ColumnMap::from_headers(reader.headers()?)?;

    let mut records = Vec::new();
    let mut warnings = Vec::new();

    for row in reader.records() {
        let row = row?;
        let id = RecordId::new();

        let rating = match cell(&row, columns.rating) {
            None => None,
            Some(raw) => match raw.parse::<f64>() {
                Ok(value) if value.is_finite() => Some(value),
                _ => {
                    warn!("Ignoring unparsable rating '{}' for record {}", raw, id);
                    warnings.push(InputWarning {
                        record_id: id,
                        field: "rating".to_string(),
                        message: format!("Unparsable rating: '{}'", raw),
                        value: raw,
                    });
                    None
                }
            },
        };

        records.push(FeedbackRecord {
            id,
            text: cell(&row, Some(columns.text)),
            rating,
            product: cell(&row, columns.product),
            category: cell(&row, columns.category),
            date: cell(&row, columns.date),
        });
    }

    info!(
        "Loaded {} feedback records ({} warnings)",
        records.len(),
        warnings.len()
    );
    Ok(LoadedDataset { records, warnings })
}

pub fn load_csv_file<P: AsRef<Path>>(path: P) -> Result<LoadedDataset> {
    let file = File::open(&path).map_err(|e| {
        AppError::Io(std::io::Error::new(
            e.kind(),
            format!("Failed to open {:?}: {}", path.as_ref(), e),
        ))
    })?;
    load_csv(file)
}

#[derive(Serialize)]
struct ExportRow<'a> {
    feedback_text: &'a str,
    rating: Option<f64>,
    product: Option<&'a str>,
    category: Option<&'a str>,
    date: Option<&'a str>,
    sentiment: Option<&'static str>,
}

/// Write records with a trailing `sentiment` column (empty when unlabeled).
/// The header row is always written, so an empty view still reloads.
pub fn write_csv<W: Write>(writer: W, records: &[FeedbackRecord], labels: &SentimentLabels) -> Result<()> {
    let mut writer = WriterBuilder::new().has_headers(false).from_writer(writer);
    writer.write_record(EXPORT_COLUMNS)?;

    for record in records {
        writer.serialize(ExportRow {
            feedback_text: record.text_or_empty(),
            rating: record.rating,
            product: record.product.as_deref(),
            category: record.category.as_deref(),
            date: record.date.as_deref(),
            sentiment: labels.get(&record.id).map(|s| s.label()),
        })?;
    }

    writer.flush()?;
    Ok(())
}

pub fn write_csv_file<P: AsRef<Path>>(path: P, records: &[FeedbackRecord], labels: &SentimentLabels) -> Result<()> {
    let file = File::create(&path)?;
    write_csv(file, records, labels)?;
    info!("Exported {} records to {:?}", records.len(), path.as_ref());
    Ok(())
}
