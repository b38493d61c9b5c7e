use anyhow::{Context, Result};
use log::info;
use std::path::{Path, PathBuf};

use crate::config::DashboardConfig;
use crate::core::domain::{BookingTable, BookingType};
use crate::parsing::error::ParseError;
use crate::parsing::{csv_parser, records, xlsx_parser};

/// Represents the source type of booking data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingSourceType {
    Workbook,
    Csv,
}

impl BookingSourceType {
    /// Detect the source type from a file extension
    pub fn from_path(path: &Path) -> Result<Self, ParseError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_lowercase())
            .ok_or_else(|| ParseError::UnsupportedFormat(format!("{} (no extension)", path.display())))?;

        if extension == "csv" {
            Ok(BookingSourceType::Csv)
        } else if xlsx_parser::WORKBOOK_EXTENSIONS.contains(&extension.as_str()) {
            Ok(BookingSourceType::Workbook)
        } else {
            Err(ParseError::UnsupportedFormat(extension))
        }
    }
}

/// Result of loading booking data
#[derive(Debug)]
pub struct BookingLoadResult {
    pub table: BookingTable,
    pub source_type: BookingSourceType,
    pub path: PathBuf,
    pub num_records: usize,
    pub dropped_rows: usize,
}

impl BookingLoadResult {
    pub fn new(
        conversion: records::RecordConversion,
        source_type: BookingSourceType,
        path: &Path,
    ) -> Self {
        let num_records = conversion.table.len();
        Self {
            table: conversion.table,
            source_type,
            path: path.to_path_buf(),
            num_records,
            dropped_rows: conversion.dropped_rows,
        }
    }
}

/// Unified interface for loading booking data from workbooks or CSV
pub struct BookingLoader;

impl BookingLoader {
    /// Load booking data from a file (auto-detects workbook or CSV).
    /// `sheet` is ignored for CSV files.
    pub fn load_from_file(path: &Path, sheet: &str) -> Result<BookingLoadResult> {
        match BookingSourceType::from_path(path)? {
            BookingSourceType::Workbook => Self::load_workbook(path, sheet),
            BookingSourceType::Csv => Self::load_csv(path),
        }
    }

    /// Load booking data from one sheet of a workbook
    pub fn load_workbook(path: &Path, sheet: &str) -> Result<BookingLoadResult> {
        let raw = xlsx_parser::read_workbook_sheet(path, sheet)
            .with_context(|| format!("Failed to read sheet '{}' of {}", sheet, path.display()))?;

        let conversion = records::table_from_raw(&raw)
            .with_context(|| format!("Failed to convert rows of {}", path.display()))?;

        let result = BookingLoadResult::new(conversion, BookingSourceType::Workbook, path);
        Self::log_loaded(&result);
        Ok(result)
    }

    /// Load booking data from a CSV export
    pub fn load_csv(path: &Path) -> Result<BookingLoadResult> {
        let raw = csv_parser::read_csv_table(path)
            .with_context(|| format!("Failed to parse CSV file {}", path.display()))?;

        let conversion = records::table_from_raw(&raw)
            .with_context(|| format!("Failed to convert rows of {}", path.display()))?;

        let result = BookingLoadResult::new(conversion, BookingSourceType::Csv, path);
        Self::log_loaded(&result);
        Ok(result)
    }

    /// Load the source configured for a booking type
    pub fn load_source(config: &DashboardConfig, booking_type: BookingType) -> Result<BookingLoadResult> {
        let path = config.sources.path_for(booking_type);
        info!(
            "Loading {} from {} (sheet '{}')",
            booking_type,
            path.display(),
            config.sources.sheet
        );
        Self::load_from_file(path, &config.sources.sheet)
    }

    fn log_loaded(result: &BookingLoadResult) {
        info!(
            "Loaded {} bookings from {} ({} rows dropped)",
            result.num_records,
            result.path.display(),
            result.dropped_rows
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_type_detection() {
        assert_eq!(
            BookingSourceType::from_path(Path::new("Saray Dashboard.xlsx")).unwrap(),
            BookingSourceType::Workbook
        );
        assert_eq!(
            BookingSourceType::from_path(Path::new("legacy.XLS")).unwrap(),
            BookingSourceType::Workbook
        );
        assert_eq!(
            BookingSourceType::from_path(Path::new("export.csv")).unwrap(),
            BookingSourceType::Csv
        );
        assert!(BookingSourceType::from_path(Path::new("notes.txt")).is_err());
        assert!(BookingSourceType::from_path(Path::new("README")).is_err());
    }
}
