use anyhow::{Context, Result};
use log::{debug, info};
use polars::prelude::*;
use std::fs::{self, File};
use std::path::{Path, PathBuf};

use crate::preprocessing::pipeline::DashboardReport;
use crate::services::charts::BarChart;

/// Column holding the bar labels in exported tables.
pub const LABEL_COLUMN: &str = "Label";

/// Build the chart table: category, value and label per bar, in display order.
pub fn chart_to_dataframe(chart: &BarChart) -> PolarsResult<DataFrame> {
    let categories: Vec<String> = chart.bars.iter().map(|b| b.category.clone()).collect();
    let values: Vec<Option<f64>> = chart.bars.iter().map(|b| b.value).collect();
    let labels: Vec<String> = chart.bars.iter().map(|b| b.label.clone()).collect();

    DataFrame::new(vec![
        Column::new(chart.x_field.as_str().into(), categories),
        Column::new(chart.y_field.as_str().into(), values),
        Column::new(LABEL_COLUMN.into(), labels),
    ])
}

/// File stem for a chart title, e.g. `"ADR by Room Type"` -> `"adr_by_room_type"`.
pub fn file_stem(title: &str) -> String {
    let mut stem = String::with_capacity(title.len());
    for ch in title.chars() {
        if ch.is_ascii_alphanumeric() {
            stem.push(ch.to_ascii_lowercase());
        } else if !stem.is_empty() && !stem.ends_with('_') {
            stem.push('_');
        }
    }
    let trimmed = stem.trim_end_matches('_');
    if trimmed.is_empty() {
        "chart".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Writes chart tables as CSV files into one directory.
pub struct ChartExporter {
    dir: PathBuf,
}

impl ChartExporter {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write one chart and return the file path.
    pub fn write_chart(&self, chart: &BarChart) -> Result<PathBuf> {
        let path = self.dir.join(format!("{}.csv", file_stem(&chart.title)));
        let mut df = chart_to_dataframe(chart)
            .with_context(|| format!("Failed to build table for '{}'", chart.title))?;

        let mut file = File::create(&path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        CsvWriter::new(&mut file)
            .include_header(true)
            .finish(&mut df)
            .with_context(|| format!("Failed to write {}", path.display()))?;

        debug!("Wrote {} rows to {}", df.height(), path.display());
        Ok(path)
    }

    /// Write every chart of a report. Panels without data are skipped.
    pub fn write_report(&self, report: &DashboardReport) -> Result<Vec<PathBuf>> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create directory {}", self.dir.display()))?;

        let written = report
            .panels()
            .filter_map(|panel| panel.chart())
            .map(|chart| self.write_chart(chart))
            .collect::<Result<Vec<_>>>()?;

        info!("Exported {} chart tables to {}", written.len(), self.dir.display());
        Ok(written)
    }
}
