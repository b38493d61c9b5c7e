//! Filtering of derived booking tables.
//!
//! # Example
//!
//! ```
//! use hotel_dashboard::preprocessing::DerivedTable;
//! use hotel_dashboard::transformations::{apply_filters, FilterField, FilterSelection};
//!
//! let table = DerivedTable::default();
//! let selection = FilterSelection::new().with(FilterField::Channel, ["Direct"]);
//! assert!(apply_filters(&table, &selection).is_empty());
//! ```

pub mod filtering;

pub use filtering::{
    apply_filters, cascade_filters, filter_by_field, filter_options, FilterField, FilterSelection,
};
