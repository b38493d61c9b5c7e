//! Workbook reader backed by calamine.
//!
//! Handles `.xlsx`, `.xlsm`, `.xlsb`, `.xls` and `.ods` files. The first row of
//! the requested sheet is treated as the header row.

use calamine::{open_workbook_auto, Data, Range, Reader};
use log::debug;
use std::path::Path;

use crate::parsing::cells::{parse_datetime, Cell, RawTable};
use crate::parsing::error::{ParseError, ParseResult};

/// Workbook extensions calamine can open.
pub const WORKBOOK_EXTENSIONS: [&str; 5] = ["xlsx", "xlsm", "xlsb", "xls", "ods"];

/// Read one sheet of a workbook into a [`RawTable`].
pub fn read_workbook_sheet(path: &Path, sheet: &str) -> ParseResult<RawTable> {
    if !path.exists() {
        return Err(ParseError::SourceNotFound(path.to_path_buf()));
    }

    let mut workbook = open_workbook_auto(path).map_err(|source| ParseError::Workbook {
        path: path.to_path_buf(),
        source,
    })?;

    let available = workbook.sheet_names();
    if !available.iter().any(|name| name == sheet) {
        return Err(ParseError::MissingSheet {
            sheet: sheet.to_string(),
            available,
        });
    }

    let range = workbook
        .worksheet_range(sheet)
        .map_err(|source| ParseError::Workbook {
            path: path.to_path_buf(),
            source,
        })?;

    let (height, width) = range.get_size();
    debug!(
        "Read sheet '{}' from {}: {} rows x {} columns",
        sheet,
        path.display(),
        height,
        width
    );

    Ok(range_to_raw_table(&range))
}

/// Convert a calamine range into a [`RawTable`], first row as headers.
pub fn range_to_raw_table(range: &Range<Data>) -> RawTable {
    let mut rows = range.rows();
    let Some(header_row) = rows.next() else {
        return RawTable::default();
    };

    let headers = header_row
        .iter()
        .map(|cell| match data_to_cell(cell) {
            Cell::Empty => String::new(),
            other => other.as_label().unwrap_or_default(),
        })
        .collect();

    let rows = rows
        .map(|row| row.iter().map(data_to_cell).collect())
        .filter(|row: &Vec<Cell>| row.iter().any(|cell| !cell.is_empty()))
        .collect();

    RawTable::new(headers, rows)
}

fn data_to_cell(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::String(s) => Cell::text(s),
        Data::Float(f) => Cell::Number(*f),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Bool(b) => Cell::Bool(*b),
        Data::DateTime(dt) => dt.as_datetime().map(Cell::DateTime).unwrap_or(Cell::Empty),
        Data::DateTimeIso(s) => parse_datetime(s)
            .map(Cell::DateTime)
            .unwrap_or_else(|| Cell::text(s)),
        Data::DurationIso(s) => Cell::text(s),
        Data::Error(_) => Cell::Empty,
    }
}
