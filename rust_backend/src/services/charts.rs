//! Chart specifications built from aggregates.
//!
//! Nothing here draws anything. A [`BarChart`] carries the ordered bars with
//! their labels plus enough presentation detail (title, colour, axis titles)
//! for a front end to render it as-is.

use serde::{Deserialize, Serialize};

use crate::core::domain::Granularity;
use crate::preprocessing::enricher::DerivedBooking;
use crate::services::aggregation::{
    aggregate_by_period, group_by, rank_by, Aggregation, Dimension, GroupAggregate, Metric,
};
use crate::services::formatting::label_for;

pub const NIGHTS_COLOR: &str = "#1f77b4";
pub const ADR_COLOR: &str = "#4C78A8";
pub const REVENUE_COLOR: &str = "#F58518";

/// Panel colours of a section, in [`Metric::ALL`] order.
pub const SECTION_COLORS: [&str; 3] = [NIGHTS_COLOR, ADR_COLOR, REVENUE_COLOR];

/// How categories are ordered along the x axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryOrder {
    /// Largest value first.
    Descending,
    /// Caller-supplied order.
    Fixed(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub category: String,
    pub value: Option<f64>,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarChart {
    pub title: String,
    pub color: String,
    pub x_field: String,
    pub x_title: String,
    pub y_field: String,
    pub y_title: String,
    pub order: CategoryOrder,
    /// Bars in display order.
    pub bars: Vec<Bar>,
}

/// A rendered chart slot: a chart, or a notice that there is nothing to plot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChartPanel {
    Chart(BarChart),
    NoData { title: String, message: String },
}

impl ChartPanel {
    pub fn no_data(title: impl Into<String>) -> Self {
        let title = title.into();
        let message = format!("No data for {}", title);
        ChartPanel::NoData { title, message }
    }

    pub fn title(&self) -> &str {
        match self {
            ChartPanel::Chart(chart) => &chart.title,
            ChartPanel::NoData { title, .. } => title,
        }
    }

    pub fn chart(&self) -> Option<&BarChart> {
        match self {
            ChartPanel::Chart(chart) => Some(chart),
            ChartPanel::NoData { .. } => None,
        }
    }
}

/// One titled row of three panels split by a dimension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSection {
    pub heading: String,
    pub dimension: Dimension,
    pub panels: Vec<ChartPanel>,
}

/// What to draw for one section.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionSpec {
    pub dimension: Dimension,
    pub top_n: Option<usize>,
}

impl SectionSpec {
    pub fn new(dimension: Dimension) -> Self {
        Self {
            dimension,
            top_n: None,
        }
    }

    pub fn top(dimension: Dimension, n: usize) -> Self {
        Self {
            dimension,
            top_n: Some(n),
        }
    }

    pub fn heading(&self) -> String {
        format!("{} Detailed Split", section_name(self.dimension))
    }
}

fn section_name(dimension: Dimension) -> &'static str {
    match dimension {
        Dimension::Channel => "Channels",
        Dimension::RoomType => "Room Types",
        other => other.display_name(),
    }
}

/// Chart title of a metric within a section, e.g. `"ADR by Channel"`.
pub fn panel_title(metric: Metric, dimension: Dimension) -> String {
    let measure = match metric {
        Metric::Nights => "Nights Sold",
        Metric::Adr => "ADR",
        Metric::Revenue => "Revenue",
    };
    format!("{} by {}", measure, dimension.display_name())
}

/// Value-axis title: first word of the chart title, plus the currency
/// symbol for money metrics.
pub fn y_axis_title(title: &str, metric: Metric, symbol: &str) -> String {
    let first = title.split(' ').next().unwrap_or_default();
    if metric.is_money() {
        format!("{} ({})", first, symbol)
    } else {
        first.to_string()
    }
}

fn bars(groups: &[GroupAggregate], metric: Metric) -> Vec<Bar> {
    groups
        .iter()
        .map(|group| {
            let value = group.value(metric);
            Bar {
                category: group.key.clone(),
                value,
                label: label_for(metric, value),
            }
        })
        .collect()
}

/// Build the three panels of a section.
///
/// Without a fixed order, each panel is ranked by its own metric and
/// truncated to `top_n` independently.
pub fn chart_group(rows: &[DerivedBooking], spec: &SectionSpec, symbol: &str) -> ChartSection {
    let dimension = spec.dimension;
    let aggregation = group_by(rows, dimension);

    let panels = Metric::ALL
        .iter()
        .zip(SECTION_COLORS)
        .map(|(&metric, color)| {
            let title = panel_title(metric, dimension);
            let groups = match &aggregation {
                Aggregation::Empty => return ChartPanel::no_data(title),
                Aggregation::Groups(groups) => groups,
            };

            let (order, ordered) = match dimension.fixed_order() {
                Some(fixed) => (CategoryOrder::Fixed(fixed), groups.clone()),
                None => (
                    CategoryOrder::Descending,
                    rank_by(groups, metric, spec.top_n),
                ),
            };
            if ordered.is_empty() {
                return ChartPanel::no_data(title);
            }

            ChartPanel::Chart(BarChart {
                y_title: y_axis_title(&title, metric, symbol),
                title,
                color: color.to_string(),
                x_field: dimension.field().to_string(),
                x_title: dimension.field().to_string(),
                y_field: metric.field().to_string(),
                order,
                bars: bars(&ordered, metric),
            })
        })
        .collect();

    ChartSection {
        heading: spec.heading(),
        dimension,
        panels,
    }
}

/// Revenue and nights over time, on the given period axis.
pub fn time_series_charts(
    rows: &[DerivedBooking],
    granularity: Granularity,
    labels: &[String],
    symbol: &str,
) -> Vec<ChartPanel> {
    let aggregation = aggregate_by_period(rows, granularity, labels);
    let series = [
        (Metric::Revenue, "Total Revenue", REVENUE_COLOR, format!("Revenue ({})", symbol)),
        (Metric::Nights, "Total Nights", NIGHTS_COLOR, "Nights Sold".to_string()),
    ];

    series
        .into_iter()
        .map(|(metric, title, color, y_title)| match &aggregation {
            Aggregation::Empty => ChartPanel::no_data(title),
            Aggregation::Groups(groups) => ChartPanel::Chart(BarChart {
                title: title.to_string(),
                color: color.to_string(),
                x_field: "Period".to_string(),
                x_title: granularity.axis_title().to_string(),
                y_field: metric.field().to_string(),
                y_title,
                order: CategoryOrder::Fixed(labels.to_vec()),
                bars: bars(groups, metric),
            }),
        })
        .collect()
}
