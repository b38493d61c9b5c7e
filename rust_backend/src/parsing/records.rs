//! Conversion from raw sheet rows to typed booking records.

use log::{debug, warn};

use crate::core::domain::{BookingRecord, BookingTable, ColumnSet, SourceColumn};
use crate::parsing::cells::{Cell, RawTable};
use crate::parsing::error::{ParseError, ParseResult};

/// Outcome of converting a raw sheet into booking records.
#[derive(Debug, Clone)]
pub struct RecordConversion {
    pub table: BookingTable,
    /// Rows skipped because their arrival date was empty or unreadable.
    pub dropped_rows: usize,
}

/// Resolved column positions for one sheet.
struct ColumnMap {
    indices: Vec<(SourceColumn, usize)>,
}

impl ColumnMap {
    fn from_raw(raw: &RawTable) -> Self {
        let indices = SourceColumn::ALL
            .iter()
            .filter_map(|&column| raw.column_index(column).map(|idx| (column, idx)))
            .collect();
        Self { indices }
    }

    fn columns(&self) -> ColumnSet {
        self.indices.iter().map(|(column, _)| *column).collect()
    }

    fn cell<'a>(&self, row: &'a [Cell], column: SourceColumn) -> &'a Cell {
        static EMPTY: Cell = Cell::Empty;
        self.indices
            .iter()
            .find(|(c, _)| *c == column)
            .and_then(|(_, idx)| row.get(*idx))
            .unwrap_or(&EMPTY)
    }
}

/// Convert a raw sheet into a [`BookingTable`].
///
/// Fails only when the arrival-date column is missing altogether. Rows whose
/// arrival date is empty or cannot be read as a date are dropped.
pub fn table_from_raw(raw: &RawTable) -> ParseResult<RecordConversion> {
    let map = ColumnMap::from_raw(raw);
    let columns = map.columns();
    if !columns.contains(SourceColumn::ArrivalDate) {
        return Err(ParseError::MissingColumn(SourceColumn::ArrivalDate));
    }

    let mut records = Vec::with_capacity(raw.height());
    let mut dropped_rows = 0;

    for (row_idx, row) in raw.rows.iter().enumerate() {
        let arrival_cell = map.cell(row, SourceColumn::ArrivalDate);
        let Some(arrival) = arrival_cell.as_datetime() else {
            if !arrival_cell.is_empty() {
                debug!("Row {}: unreadable arrival date {:?}", row_idx + 2, arrival_cell);
            }
            dropped_rows += 1;
            continue;
        };

        let number = |column| map.cell(row, column).as_number();
        let label = |column| map.cell(row, column).as_label();

        records.push(BookingRecord {
            arrival,
            nights: number(SourceColumn::Nights),
            net_base_rate: number(SourceColumn::NetBaseRate),
            ttv: number(SourceColumn::Ttv),
            room_type: label(SourceColumn::RoomType),
            meal_plan: label(SourceColumn::MealPlan),
            channel: label(SourceColumn::Channel),
            nationality: label(SourceColumn::Nationality),
            region: label(SourceColumn::Region),
            release_days: number(SourceColumn::ReleaseDays),
            online_offline: label(SourceColumn::OnlineOffline),
            arrival_year: label(SourceColumn::ArrivalYear),
            arrival_month: label(SourceColumn::ArrivalMonth),
            created_on: map
                .cell(row, SourceColumn::CreatedOn)
                .as_datetime()
                .map(|dt| dt.date()),
            created_year: label(SourceColumn::CreatedYear),
            created_month: label(SourceColumn::CreatedMonth),
        });
    }

    if dropped_rows > 0 {
        warn!(
            "Dropped {} of {} rows without a usable arrival date",
            dropped_rows,
            raw.height()
        );
    }

    Ok(RecordConversion {
        table: BookingTable::new(records, columns),
        dropped_rows,
    })
}
