use polars::prelude::*;
use std::path::Path;

use crate::parsing::cells::{Cell, RawTable};
use crate::parsing::error::{ParseError, ParseResult};

/// Parse a CSV booking export into a Polars DataFrame of string columns
pub fn parse_bookings_csv(csv_path: &Path) -> ParseResult<DataFrame> {
    if !csv_path.exists() {
        return Err(ParseError::SourceNotFound(csv_path.to_path_buf()));
    }

    let df = CsvReadOptions::default()
        .with_has_header(true)
        // Every column is read as text; cells are typed per value afterwards
        .with_infer_schema_length(Some(0))
        .try_into_reader_with_file_path(Some(csv_path.into()))?
        .finish()?;

    Ok(df)
}

/// Parse a CSV booking export straight into a [`RawTable`]
pub fn read_csv_table(csv_path: &Path) -> ParseResult<RawTable> {
    let df = parse_bookings_csv(csv_path)?;
    dataframe_to_raw_table(&df)
}

/// Convert a Polars DataFrame into loosely typed cells
pub fn dataframe_to_raw_table(df: &DataFrame) -> ParseResult<RawTable> {
    let headers: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect();

    let columns = df.get_columns();
    let mut rows = Vec::with_capacity(df.height());

    for i in 0..df.height() {
        let mut row = Vec::with_capacity(columns.len());
        for column in columns {
            row.push(any_value_to_cell(column.get(i)?));
        }
        rows.push(row);
    }

    Ok(RawTable::new(headers, rows))
}

fn any_value_to_cell(value: AnyValue<'_>) -> Cell {
    if value.is_null() {
        return Cell::Empty;
    }
    if let Some(text) = value.get_str() {
        return Cell::text(text);
    }
    match value {
        AnyValue::Boolean(b) => Cell::Bool(b),
        other => match other.extract::<f64>() {
            Some(n) => Cell::Number(n),
            None => Cell::text(&other.to_string()),
        },
    }
}
