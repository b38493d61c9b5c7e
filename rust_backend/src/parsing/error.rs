//! Error types for reading booking sources.

use polars::prelude::PolarsError;
use std::path::PathBuf;

use crate::core::domain::SourceColumn;

/// Result type for parsing operations
pub type ParseResult<T> = Result<T, ParseError>;

/// Error type for parsing operations
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Source file not found: {}", .0.display())]
    SourceNotFound(PathBuf),

    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("Failed to read workbook {}: {source}", path.display())]
    Workbook {
        path: PathBuf,
        #[source]
        source: calamine::Error,
    },

    #[error("Sheet '{sheet}' not found. Available sheets: {}", available.join(", "))]
    MissingSheet {
        sheet: String,
        available: Vec<String>,
    },

    #[error("Required column '{0}' is missing")]
    MissingColumn(SourceColumn),

    #[error("Failed to read CSV: {0}")]
    Csv(#[from] PolarsError),
}
