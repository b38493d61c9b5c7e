//! Python bindings for the dashboard pipeline.
//!
//! Built only with the `python` feature. The Streamlit page passes its widget
//! state as JSON and receives the rendered report back as JSON.
//!
//! # Python API
//!
//! All functions are available in the `hotel_dashboard` Python module after
//! installation.

pub mod dashboard;

pub use dashboard::*;
