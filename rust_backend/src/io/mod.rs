//! High-level data loading and export utilities.
//!
//! Loaders combine the format parsers with record conversion and produce a
//! ready-to-use [`BookingTable`](crate::core::domain::BookingTable). The
//! exporter writes the chart tables of a rendered dashboard as CSV files.
//!
//! # Example
//!
//! ```no_run
//! use hotel_dashboard::io::loaders::BookingLoader;
//! use std::path::Path;
//!
//! let result = BookingLoader::load_from_file(Path::new("Saray Dashboard.xlsx"), "Raw Data")
//!     .expect("Failed to load");
//! println!("Loaded {} bookings", result.num_records);
//! ```

pub mod export;
pub mod loaders;


pub use export::ChartExporter;
pub use loaders::{BookingLoadResult, BookingLoader, BookingSourceType};
