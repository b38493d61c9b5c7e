//! Integration tests for the dashboard render pipeline.
//!
//! These tests ensure that:
//! 1. A CSV source goes through load, derive, filter and aggregate intact
//! 2. Ranked sections truncate per metric with first-seen tie-breaks
//! 3. Release-days sections always show all eight buckets
//! 4. Chart tables export as CSV files

use std::fs;
use std::path::Path;

use hotel_dashboard::config::DashboardConfig;
use hotel_dashboard::core::domain::{BookingType, Currency, Granularity, ReleaseDaysBucket};
use hotel_dashboard::io::export::ChartExporter;
use hotel_dashboard::io::loaders::BookingLoader;
use hotel_dashboard::preprocessing::pipeline::{DashboardOptions, DashboardPipeline};
use hotel_dashboard::preprocessing::BookingEnricher;
use hotel_dashboard::services::aggregation::{group_by, rank_by, Dimension, Metric};
use hotel_dashboard::services::charts::{CategoryOrder, ChartPanel};
use hotel_dashboard::transformations::{FilterField, FilterSelection};
use tempfile::TempDir;

// ==================== Helper Functions ====================

const HEADER: &str =
    "Arrival2,Nights,Net base rate,TTV,Type,Meal Plan,Channel,Nationality,Release Days,Online/Offline";

fn write_source(dir: &Path, name: &str, rows: &[&str]) -> std::path::PathBuf {
    let path = dir.join(name);
    let mut content = String::from(HEADER);
    content.push('\n');
    for row in rows {
        content.push_str(row);
        content.push('\n');
    }
    fs::write(&path, content).unwrap();
    path
}

fn channel_rows() -> Vec<&'static str> {
    vec![
        "2024-01-05,2,200,100,Double,BB,A,Egypt,0,Online",
        "2024-01-20,4,800,200,Single,HB,B,Germany,12,Online",
        "2024-03-02,0,50,300,Double,BB,A,Egypt,45,Offline",
        "2024-03-15,1,100,400,Suite,AI,C,Italy,100,Online",
        "2024-04-01,3,300,500,Double,BB,B,Egypt,3,Offline",
    ]
}

fn pipeline_for(dir: &TempDir) -> DashboardPipeline {
    write_source(dir.path(), "past.csv", &channel_rows());
    write_source(
        dir.path(),
        "future.csv",
        &["2025-02-01,7,7000,7000,Suite,HB,Direct,Egypt,200,Offline"],
    );
    let config_path = dir.path().join("dashboard.toml");
    fs::write(
        &config_path,
        "[sources]\npast = \"past.csv\"\nfuture = \"future.csv\"\n\n[charts]\nchannel_top_n = 2\n",
    )
    .unwrap();
    DashboardPipeline::new(DashboardConfig::from_file(&config_path).unwrap())
}

fn categories(panel: &ChartPanel) -> Vec<String> {
    panel
        .chart()
        .map(|c| c.bars.iter().map(|b| b.category.clone()).collect())
        .unwrap_or_default()
}

// ==================== Pipeline Tests ====================

#[test]
fn test_adr_scenario_from_loaded_rows() {
    let dir = TempDir::new().unwrap();
    let path = write_source(
        dir.path(),
        "adr.csv",
        &[
            "2024-01-01,2,200,0,Double,BB,A,Egypt,1,Online",
            "2024-01-02,4,800,0,Double,BB,A,Egypt,1,Online",
            "2024-01-03,0,50,0,Double,BB,A,Egypt,1,Online",
        ],
    );

    let loaded = BookingLoader::load_from_file(&path, "Raw Data").unwrap();
    let derived = BookingEnricher::new(1.0).derive_table(&loaded.table);
    let adrs: Vec<Option<f64>> = derived.rows.iter().map(|r| r.adr).collect();
    assert_eq!(adrs, vec![Some(100.0), Some(200.0), None]);

    let report = DashboardPipeline::default().render(&loaded.table, &DashboardOptions::default());
    assert_eq!(report.metrics.average_adr, Some(150.0));
}

#[test]
fn test_channel_revenue_top_two() {
    let dir = TempDir::new().unwrap();
    let report = pipeline_for(&dir).run(&DashboardOptions::default()).unwrap();

    let channels = &report.sections[0];
    assert_eq!(channels.heading, "Channels Detailed Split");
    assert_eq!(channels.dimension, Dimension::Channel);

    // A=400, B=700, C=400; A was seen before C
    let revenue = channels.panels[2].chart().unwrap();
    assert_eq!(categories(&channels.panels[2]), vec!["B", "A"]);
    let values: Vec<Option<f64>> = revenue.bars.iter().map(|b| b.value).collect();
    assert_eq!(values, vec![Some(700.0), Some(400.0)]);
    assert_eq!(revenue.order, CategoryOrder::Descending);
}

#[test]
fn test_release_days_section_has_eight_buckets() {
    let dir = TempDir::new().unwrap();
    let report = pipeline_for(&dir).run(&DashboardOptions::default()).unwrap();

    let release = report
        .sections
        .iter()
        .find(|s| s.dimension == Dimension::ReleaseDays)
        .unwrap();
    for panel in &release.panels {
        assert_eq!(categories(panel), ReleaseDaysBucket::labels());
    }
    let nights = release.panels[0].chart().unwrap();
    let values: Vec<Option<f64>> = nights.bars.iter().map(|b| b.value).collect();
    // 0 -> 0-1, 12 -> 8-14, 45 -> 31-60, 100 -> 91+, 3 -> 2-3
    assert_eq!(
        values,
        vec![Some(2.0), Some(3.0), Some(0.0), Some(4.0), Some(0.0), Some(0.0), Some(0.0), Some(1.0)]
    );
}

#[test]
fn test_region_section_absent_without_column() {
    let dir = TempDir::new().unwrap();
    let report = pipeline_for(&dir).run(&DashboardOptions::default()).unwrap();
    assert!(report.sections.iter().all(|s| s.dimension != Dimension::Region));
    assert_eq!(report.sections.len(), 4);
}

#[test]
fn test_future_bookings_in_usd() {
    let dir = TempDir::new().unwrap();
    let options = DashboardOptions {
        booking_type: BookingType::Future,
        currency: Currency::Usd,
        ..DashboardOptions::default()
    };
    let report = pipeline_for(&dir).run(&options).unwrap();

    assert_eq!(report.record_count, 1);
    assert_eq!(report.metrics.total_revenue, 7000.0 * 0.02);
    assert_eq!(report.metric_tiles[0].value, "140 USD");
    assert_eq!(report.metric_tiles[1].value, "20 USD");
    assert_eq!(report.periods, vec!["2025-02"]);
}

#[test]
fn test_filters_and_cascading_options() {
    let dir = TempDir::new().unwrap();
    let options = DashboardOptions {
        filters: FilterSelection::new()
            .with(FilterField::RoomType, ["Double"])
            .with(FilterField::OnlineOffline, ["Offline"]),
        ..DashboardOptions::default()
    };
    let report = pipeline_for(&dir).run(&options).unwrap();

    assert_eq!(report.filtered_count, 2);
    assert_eq!(report.metrics.total_revenue, 800.0);
    assert_eq!(
        report.filter_options[&FilterField::RoomType],
        vec!["Double", "Single", "Suite"]
    );
    // Channel comes after both filters in sidebar order
    assert_eq!(report.filter_options[&FilterField::Channel], vec!["A", "B"]);
    assert!(!report.filter_options.contains_key(&FilterField::CreatedYear));
}

#[test]
fn test_filter_on_absent_column_is_ignored() {
    let dir = TempDir::new().unwrap();
    let options = DashboardOptions {
        filters: FilterSelection::new().with(FilterField::CreatedYear, ["2023"]),
        ..DashboardOptions::default()
    };
    let report = pipeline_for(&dir).run(&options).unwrap();
    assert_eq!(report.filtered_count, 5);
}

#[test]
fn test_daily_time_series_is_chronological() {
    let dir = TempDir::new().unwrap();
    let options = DashboardOptions {
        granularity: Granularity::Daily,
        ..DashboardOptions::default()
    };
    let report = pipeline_for(&dir).run(&options).unwrap();
    assert_eq!(
        report.periods,
        vec!["05 Jan 2024", "20 Jan 2024", "02 Mar 2024", "15 Mar 2024", "01 Apr 2024"]
    );
    assert_eq!(report.time_series[0].chart().unwrap().x_title, "Date");
}

#[test]
fn test_missing_source_is_an_error() {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("dashboard.toml");
    fs::write(&config_path, "[sources]\npast = \"missing.xlsx\"\n").unwrap();
    let pipeline = DashboardPipeline::new(DashboardConfig::from_file(&config_path).unwrap());

    let err = pipeline.run(&DashboardOptions::default()).unwrap_err();
    assert!(format!("{:#}", err).contains("Past Bookings"));
}

#[test]
fn test_export_writes_one_file_per_chart() {
    let dir = TempDir::new().unwrap();
    let report = pipeline_for(&dir).run(&DashboardOptions::default()).unwrap();

    let out = dir.path().join("charts");
    let written = ChartExporter::new(&out).write_report(&report).unwrap();
    assert_eq!(written.len(), report.panels().filter(|p| p.chart().is_some()).count());
    assert!(out.join("total_revenue.csv").exists());
    assert!(out.join("adr_by_release_days.csv").exists());
}

#[test]
fn test_group_and_rank_directly() {
    let dir = TempDir::new().unwrap();
    let path = write_source(dir.path(), "past.csv", &channel_rows());
    let loaded = BookingLoader::load_from_file(&path, "Raw Data").unwrap();
    let derived = BookingEnricher::new(1.0).derive_table(&loaded.table);

    let groups = group_by(&derived.rows, Dimension::MealPlan);
    let by_nights = rank_by(groups.groups(), Metric::Nights, Some(1));
    assert_eq!(by_nights.len(), 1);
    assert_eq!(by_nights[0].key, "BB");
    assert_eq!(by_nights[0].nights, 5.0);
}
