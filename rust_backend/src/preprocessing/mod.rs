//! Derivation of computed booking fields and the render pipeline.

pub mod enricher;
pub mod pipeline;

pub use enricher::{BookingEnricher, DerivedBooking, DerivedTable};
pub use pipeline::{DashboardOptions, DashboardPipeline, DashboardReport, MetricTile};
