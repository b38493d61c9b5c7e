use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::domain::{
    BookingRecord, BookingTable, ColumnSet, Currency, ReleaseDaysBucket, YearMonth,
};

/// Average daily rate: net base rate per night.
///
/// Returns `None` when either operand is missing, when nights is zero, or when
/// the quotient is not a finite non-negative number.
///
/// # Examples
///
/// ```
/// use hotel_dashboard::preprocessing::enricher::compute_adr;
///
/// assert_eq!(compute_adr(Some(200.0), Some(2.0)), Some(100.0));
/// assert_eq!(compute_adr(Some(50.0), Some(0.0)), None);
/// assert_eq!(compute_adr(None, Some(3.0)), None);
/// ```
pub fn compute_adr(net_base_rate: Option<f64>, nights: Option<f64>) -> Option<f64> {
    let adr = net_base_rate? / nights?;
    (adr.is_finite() && adr >= 0.0).then_some(adr)
}

/// Apply an exchange rate to an optional amount.
pub fn adjust(value: Option<f64>, rate: f64) -> Option<f64> {
    value.map(|v| v * rate)
}

/// A booking record with its computed fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedBooking {
    pub record: BookingRecord,
    pub arrival_date: NaiveDate,
    pub arrival_month: YearMonth,
    /// Currency-adjusted average daily rate.
    pub adr: Option<f64>,
    /// Currency-adjusted total transaction value.
    pub ttv: Option<f64>,
    pub release_bucket: Option<ReleaseDaysBucket>,
}

impl DerivedBooking {
    pub fn nights(&self) -> Option<f64> {
        self.record.nights
    }
}

/// Derived rows plus the source columns they came from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DerivedTable {
    pub rows: Vec<DerivedBooking>,
    pub columns: ColumnSet,
}

impl DerivedTable {
    pub fn new(rows: Vec<DerivedBooking>, columns: ColumnSet) -> Self {
        Self { rows, columns }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Computes the derived booking fields for one exchange rate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BookingEnricher {
    rate: f64,
}

impl BookingEnricher {
    /// Create an enricher with an explicit exchange rate
    pub fn new(rate: f64) -> Self {
        Self { rate }
    }

    /// Create an enricher for a display currency
    pub fn for_currency(currency: Currency, usd_rate: f64) -> Self {
        Self::new(currency.rate(usd_rate))
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// Derive the computed fields of one record.
    ///
    /// ADR is computed from the raw amounts first and converted afterwards,
    /// so the source record is never modified.
    pub fn derive(&self, record: &BookingRecord) -> DerivedBooking {
        let arrival_date = record.arrival_date();
        let raw_adr = compute_adr(record.net_base_rate, record.nights);

        DerivedBooking {
            arrival_date,
            arrival_month: YearMonth::from_date(arrival_date),
            adr: adjust(raw_adr, self.rate),
            ttv: adjust(record.ttv, self.rate),
            release_bucket: record.release_days.and_then(ReleaseDaysBucket::from_days),
            record: record.clone(),
        }
    }

    /// Derive every record of a loaded table
    pub fn derive_table(&self, table: &BookingTable) -> DerivedTable {
        DerivedTable::new(
            table.records.iter().map(|r| self.derive(r)).collect(),
            table.columns.clone(),
        )
    }

    /// Derive an already-derived table again from its source records.
    ///
    /// Yields the same values as the first derivation for the same rate.
    pub fn rederive(&self, table: &DerivedTable) -> DerivedTable {
        DerivedTable::new(
            table.rows.iter().map(|row| self.derive(&row.record)).collect(),
            table.columns.clone(),
        )
    }
}
