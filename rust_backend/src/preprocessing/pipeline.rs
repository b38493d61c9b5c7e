use anyhow::{Context, Result};
use log::info;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::config::DashboardConfig;
use crate::core::domain::{BookingTable, BookingType, ColumnSet, Currency, Granularity, SourceColumn};
use crate::io::loaders::BookingLoader;
use crate::preprocessing::enricher::BookingEnricher;
use crate::services::aggregation::{
    continuous_period_labels, period_labels, summary_metrics, Dimension, SummaryMetrics,
};
use crate::services::charts::{chart_group, time_series_charts, ChartPanel, ChartSection, SectionSpec};
use crate::services::formatting::format_metric;
use crate::transformations::filtering::{cascade_filters, FilterField, FilterSelection};

/// View options chosen for one render cycle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardOptions {
    pub currency: Currency,
    pub booking_type: BookingType,
    pub granularity: Granularity,
    /// List every period between the first and last arrival, not only the
    /// periods that have bookings.
    pub fill_gaps: bool,
    pub filters: FilterSelection,
}

/// A headline number as shown on the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricTile {
    pub label: String,
    pub value: String,
}

/// Everything the page needs for one render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardReport {
    pub title: String,
    pub subtitle: String,
    pub booking_type: BookingType,
    pub currency: Currency,
    pub symbol: String,
    pub granularity: Granularity,
    pub metrics: SummaryMetrics,
    pub metric_tiles: Vec<MetricTile>,
    /// Period axis of the time series.
    pub periods: Vec<String>,
    pub time_series: Vec<ChartPanel>,
    pub sections: Vec<ChartSection>,
    /// Selectable values per filter, narrowed by the filters above it.
    pub filter_options: BTreeMap<FilterField, Vec<String>>,
    /// Rows loaded from the source.
    pub record_count: usize,
    /// Rows left after filtering.
    pub filtered_count: usize,
}

impl DashboardReport {
    /// Every panel in page order: time series first, then sections.
    pub fn panels(&self) -> impl Iterator<Item = &ChartPanel> {
        self.time_series
            .iter()
            .chain(self.sections.iter().flat_map(|s| s.panels.iter()))
    }
}

/// Runs load, derive, filter, aggregate and format for one render.
pub struct DashboardPipeline {
    config: DashboardConfig,
}

impl DashboardPipeline {
    pub fn new(config: DashboardConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    /// Chart sections for the columns present in a table.
    pub fn section_specs(&self, columns: &ColumnSet) -> Vec<SectionSpec> {
        let charts = &self.config.charts;
        let mut specs = vec![
            SectionSpec::top(Dimension::Channel, charts.channel_top_n),
            SectionSpec::new(Dimension::RoomType),
            SectionSpec::new(Dimension::MealPlan),
        ];
        if columns.contains(SourceColumn::Region) {
            specs.push(SectionSpec::top(Dimension::Region, charts.region_top_n));
        }
        if columns.contains(SourceColumn::ReleaseDays) {
            specs.push(SectionSpec::new(Dimension::ReleaseDays));
        }
        specs
    }

    /// Render a report from an already loaded table.
    pub fn render(&self, table: &BookingTable, options: &DashboardOptions) -> DashboardReport {
        let enricher =
            BookingEnricher::for_currency(options.currency, self.config.currency.usd_rate);
        let derived = enricher.derive_table(table);
        let (filtered, filter_options) = cascade_filters(&derived, &options.filters);
        let rows = &filtered.rows;
        let symbol = options.currency.symbol();

        let metrics = summary_metrics(rows);
        let metric_tiles = vec![
            MetricTile {
                label: "Total Revenue".to_string(),
                value: format_metric(Some(metrics.total_revenue), Some(symbol)),
            },
            MetricTile {
                label: "Average ADR".to_string(),
                value: format_metric(metrics.average_adr, Some(symbol)),
            },
            MetricTile {
                label: "Total Nights".to_string(),
                value: format_metric(Some(metrics.total_nights), None),
            },
        ];

        let periods = if options.fill_gaps {
            continuous_period_labels(rows, options.granularity)
        } else {
            period_labels(rows, options.granularity)
        };
        let time_series = time_series_charts(rows, options.granularity, &periods, symbol);

        let sections = self
            .section_specs(&filtered.columns)
            .iter()
            .map(|spec| chart_group(rows, spec, symbol))
            .collect();

        info!(
            "Rendered {} in {}: {} of {} bookings after filters",
            options.booking_type,
            symbol,
            filtered.len(),
            derived.len()
        );

        DashboardReport {
            title: self.config.display.title.clone(),
            subtitle: self.config.display.subtitle.clone(),
            booking_type: options.booking_type,
            currency: options.currency,
            symbol: symbol.to_string(),
            granularity: options.granularity,
            metrics,
            metric_tiles,
            periods,
            time_series,
            sections,
            filter_options,
            record_count: derived.len(),
            filtered_count: filtered.len(),
        }
    }

    /// Load the configured source for the booking type and render it.
    pub fn run(&self, options: &DashboardOptions) -> Result<DashboardReport> {
        let loaded = BookingLoader::load_source(&self.config, options.booking_type)
            .with_context(|| format!("Failed to load {}", options.booking_type))?;
        Ok(self.render(&loaded.table, options))
    }

    /// Render from an explicit file instead of the configured source.
    pub fn run_with_source(&self, path: &Path, options: &DashboardOptions) -> Result<DashboardReport> {
        let loaded = BookingLoader::load_from_file(path, &self.config.sources.sheet)?;
        Ok(self.render(&loaded.table, options))
    }
}

impl Default for DashboardPipeline {
    fn default() -> Self {
        Self::new(DashboardConfig::default())
    }
}
