//! Parsers for booking spreadsheet sources.
//!
//! Every source format is first read into a [`RawTable`] of loosely typed
//! cells, then converted into typed [`BookingRecord`](crate::core::domain::BookingRecord)s
//! by [`records::table_from_raw`], so header matching and date handling are
//! shared by all formats.
//!
//! # Parsers
//!
//! - [`xlsx_parser`]: Excel / OpenDocument workbooks via calamine
//! - [`csv_parser`]: CSV exports via polars
//! - [`cells`]: Cell values, date parsing and number display
//! - [`records`]: Header mapping and row conversion
//!
//! # Example
//!
//! ```no_run
//! use hotel_dashboard::parsing::{records, xlsx_parser};
//! use std::path::Path;
//!
//! let raw = xlsx_parser::read_workbook_sheet(Path::new("Saray Dashboard.xlsx"), "Raw Data")
//!     .expect("Failed to read workbook");
//! let converted = records::table_from_raw(&raw).expect("Missing arrival column");
//! println!("{} bookings", converted.table.len());
//! ```

pub mod cells;
pub mod csv_parser;
pub mod error;
pub mod records;
pub mod xlsx_parser;


pub use cells::{Cell, RawTable};
pub use error::ParseError;
pub use records::{table_from_raw, RecordConversion};
