//! Loosely typed cell values shared by the workbook and CSV readers.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::core::domain::SourceColumn;

/// Text date formats tried in order; the first match wins.
const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];
const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%d %b %Y", "%m/%d/%Y", "%d/%m/%Y"];

/// Largest serial Excel can represent (9999-12-31).
const MAX_EXCEL_SERIAL: f64 = 2_958_465.0;

/// First serial after Excel's phantom 1900-02-29 (serial 60). Earlier serials
/// do not map onto the 1899-12-30 epoch and are not read as dates.
const MIN_EXCEL_SERIAL: f64 = 61.0;

/// A single spreadsheet cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Cell {
    Empty,
    Number(f64),
    Text(String),
    Bool(bool),
    DateTime(NaiveDateTime),
}

impl Cell {
    /// Build a text cell, treating blank strings as empty.
    pub fn text(value: &str) -> Self {
        if value.trim().is_empty() {
            Cell::Empty
        } else {
            Cell::Text(value.to_string())
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    /// Numeric value, coercing numeric text. Anything else is `None`.
    pub fn as_number(&self) -> Option<f64> {
        let value = match self {
            Cell::Number(n) => *n,
            Cell::Text(s) => s.trim().parse::<f64>().ok()?,
            _ => return None,
        };
        value.is_finite().then_some(value)
    }

    /// Display text used for categorical fields and filter values.
    pub fn as_label(&self) -> Option<String> {
        match self {
            Cell::Empty => None,
            Cell::Number(n) => Some(format_number(*n)),
            Cell::Text(s) => {
                let trimmed = s.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            }
            Cell::Bool(b) => Some(if *b { "True" } else { "False" }.to_string()),
            Cell::DateTime(dt) => Some(if dt.time() == chrono::NaiveTime::MIN {
                dt.date().format("%Y-%m-%d").to_string()
            } else {
                dt.format("%Y-%m-%d %H:%M:%S").to_string()
            }),
        }
    }

    /// Timestamp value: native dates, Excel serial numbers, or date text.
    pub fn as_datetime(&self) -> Option<NaiveDateTime> {
        match self {
            Cell::DateTime(dt) => Some(*dt),
            Cell::Number(n) => excel_serial_to_datetime(*n),
            Cell::Text(s) => parse_datetime(s),
            _ => None,
        }
    }
}

/// Format a number without a trailing `.0` when it is integral.
///
/// # Examples
///
/// ```
/// use hotel_dashboard::parsing::cells::format_number;
///
/// assert_eq!(format_number(2024.0), "2024");
/// assert_eq!(format_number(12.5), "12.5");
/// ```
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

/// Convert an Excel serial day number (1900 date system) to a timestamp.
///
/// Only serials from 61 (1900-03-01) onwards are accepted.
pub fn excel_serial_to_datetime(serial: f64) -> Option<NaiveDateTime> {
    if !serial.is_finite() || serial < MIN_EXCEL_SERIAL || serial > MAX_EXCEL_SERIAL {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
    let whole_days = serial.trunc() as i64;
    let seconds = ((serial - serial.trunc()) * 86_400.0).round() as i64;
    epoch.checked_add_signed(Duration::days(whole_days) + Duration::seconds(seconds))
}

/// Parse a date or timestamp written as text.
///
/// # Examples
///
/// ```
/// use hotel_dashboard::parsing::cells::parse_datetime;
///
/// assert!(parse_datetime("2024-03-01").is_some());
/// assert!(parse_datetime("01 Mar 2024").is_some());
/// assert!(parse_datetime("not a date").is_none());
/// ```
pub fn parse_datetime(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, format) {
            return Some(dt);
        }
    }
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(text, format) {
            return date.and_hms_opt(0, 0, 0);
        }
    }
    None
}

/// A sheet read into memory: a header row and data rows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl RawTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        Self { headers, rows }
    }

    /// Index of the first header matching `column`.
    pub fn column_index(&self, column: SourceColumn) -> Option<usize> {
        self.headers
            .iter()
            .position(|header| SourceColumn::from_header(header) == Some(column))
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }
}
