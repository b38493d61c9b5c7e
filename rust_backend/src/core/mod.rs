//! Core domain models for hotel booking analytics.
//!
//! This module defines the booking record, the loaded table, and the small
//! enums that describe the dashboard's view options (currency, booking type,
//! chart granularity) and the fixed release-days buckets.

pub mod domain;

pub use domain::{
    BookingRecord, BookingTable, BookingType, ColumnSet, Currency, Granularity,
    ReleaseDaysBucket, SourceColumn, YearMonth,
};
