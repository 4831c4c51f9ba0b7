//! Error types for Riodoraku analytics

use thiserror::Error;

/// Errors that can occur during loading, analysis or export
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("{file}: missing required columns: {columns:?}")]
    MissingColumns { file: String, columns: Vec<String> },

    #[error("{file}: unreadable date value: {value}")]
    DateParse { file: String, value: String },

    #[error("Unknown point code: {0}")]
    UnknownPointCode(String),

    #[error("Unknown metric: {0}")]
    UnknownMetric(String),

    #[error("Unknown recommendation mode: {0}")]
    UnknownRecommendationMode(String),

    #[error("Dataset contains no observations")]
    EmptyDataset,

    #[error("No observation for date {0}")]
    NoSuchDate(chrono::NaiveDate),

    #[error("Invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Spreadsheet error: {0}")]
    XlsxError(#[from] rust_xlsxwriter::XlsxError),

    #[error("PDF error: {0}")]
    PdfError(String),

    #[error("Chart error: {0}")]
    ChartError(String),

    #[error("Export error: {0}")]
    ExportError(String),
}
