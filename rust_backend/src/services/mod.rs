//! Aggregation and presentation layer.
//!
//! Takes filtered, derived bookings and turns them into grouped aggregates,
//! headline metrics and chart specifications with human-readable labels.

pub mod aggregation;
pub mod charts;
pub mod formatting;

pub use aggregation::{
    aggregate_by_period, continuous_period_labels, group_by, period_labels, rank_by,
    summary_metrics, Aggregation, Dimension, GroupAggregate, Metric, PeriodKey, SummaryMetrics,
};
pub use charts::{
    chart_group, time_series_charts, Bar, BarChart, CategoryOrder, ChartPanel, ChartSection,
    SectionSpec,
};
pub use formatting::{format_amount, format_metric, format_thousands, round_half_even};
