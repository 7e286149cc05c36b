use std::io;
use thiserror::Error;

/// Crate-wide error type, consolidating every failure the analytics core can report.
#[derive(Debug, Error)]
pub enum AppError {
    /// Rejected configuration (negative `top_n`, unknown group key, empty lexicon marker...).
    /// Raised before any processing starts, so no partial result exists.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Malformed or unparsable input field (e.g. a date that fails to parse).
    #[error("Input error: {0}")]
    Input(String),

    /// Represents standard input/output errors.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Errors raised by the CSV reader or writer.
    #[error("CSV error: {0}")]
    Csv(String),
}

impl Clone for AppError {
    fn clone(&self) -> Self {
        match self {
            AppError::Config(s) => AppError::Config(s.clone()),
            AppError::Input(s) => AppError::Input(s.clone()),
            AppError::Io(e) => AppError::Io(io::Error::new(e.kind(), e.to_string())),
            AppError::Csv(s) => AppError::Csv(s.clone()),
        }
    }
}

impl AppError {
    /// True for errors that must be fixed by the caller before a run can start.
    pub fn is_config(&self) -> bool {
        matches!(self, AppError::Config(_))
    }
}

impl From<csv::Error> for AppError {
    fn from(err: csv::Error) -> Self {
        if err.is_io_error() {
            if let csv::ErrorKind::Io(io_err) = err.into_kind() {
                return AppError::Io(io_err);
            }
            return AppError::Csv("I/O failure".to_string());
        }
        AppError::Csv(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Config(format!("JSON error: {}", err))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Config(format!("Validation errors: {}", err))
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, AppError>;
