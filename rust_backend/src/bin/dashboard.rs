//! Hotel dashboard command line.
//!
//! Runs one render cycle over a booking source and prints the result.
//!
//! # Usage
//!
//! ```bash
//! # Text summary of past bookings in USD
//! hotel-dashboard render --currency usd
//!
//! # Full JSON report for direct bookings, chart tables written as CSV
//! hotel-dashboard render --format json --filter "Channel=Direct" --export-dir charts/
//!
//! # Selectable filter values of the future bookings
//! hotel-dashboard options --booking-type future
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Log filter (default: info)

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use hotel_dashboard::config::DashboardConfig;
use hotel_dashboard::core::domain::{BookingType, Currency, Granularity};
use hotel_dashboard::io::export::ChartExporter;
use hotel_dashboard::preprocessing::pipeline::{DashboardOptions, DashboardPipeline, DashboardReport};
use hotel_dashboard::services::charts::ChartPanel;
use hotel_dashboard::transformations::filtering::{FilterField, FilterSelection};

/// Hotel booking dashboard - metrics and chart tables from the booking sheet.
#[derive(Parser, Debug)]
#[command(name = "hotel-dashboard")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Render the dashboard
    Render(RenderArgs),
    /// List selectable values of every filter
    Options(ViewArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    Text,
    Json,
}

/// View options shared by every subcommand.
#[derive(Args, Debug)]
struct ViewArgs {
    /// Path to configuration file (default: search for dashboard.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Display currency (egp, usd)
    #[arg(long, default_value = "egp")]
    currency: Currency,

    /// Booking source (past, future)
    #[arg(long, default_value = "past")]
    booking_type: BookingType,

    /// Time-series granularity (monthly, daily)
    #[arg(long, default_value = "monthly")]
    granularity: Granularity,

    /// List every period between first and last arrival
    #[arg(long)]
    fill_gaps: bool,

    /// Filter as LABEL=VALUE, e.g. "Meal Plan=BB" (repeatable)
    #[arg(short, long = "filter", value_parser = FilterSelection::parse_assignment)]
    filters: Vec<(FilterField, String)>,

    /// Read bookings from this file instead of the configured source
    #[arg(long)]
    source: Option<PathBuf>,

    /// Override the workbook sheet name
    #[arg(long)]
    sheet: Option<String>,
}

#[derive(Args, Debug)]
struct RenderArgs {
    #[command(flatten)]
    view: ViewArgs,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Write every chart table as CSV into this directory
    #[arg(long)]
    export_dir: Option<PathBuf>,
}

impl ViewArgs {
    fn load_config(&self) -> Result<DashboardConfig> {
        let mut config = match &self.config {
            Some(path) => DashboardConfig::from_file(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => DashboardConfig::load_or_default()?,
        };
        if let Some(sheet) = &self.sheet {
            config.sources.sheet = sheet.clone();
        }
        Ok(config)
    }

    fn options(&self) -> DashboardOptions {
        let mut filters = FilterSelection::new();
        for (field, value) in &self.filters {
            filters.select(*field, [value.clone()]);
        }
        DashboardOptions {
            currency: self.currency,
            booking_type: self.booking_type,
            granularity: self.granularity,
            fill_gaps: self.fill_gaps,
            filters,
        }
    }

    fn render(&self) -> Result<DashboardReport> {
        let pipeline = DashboardPipeline::new(self.load_config()?);
        let options = self.options();
        match &self.source {
            Some(path) => pipeline.run_with_source(path, &options),
            None => pipeline.run(&options),
        }
    }
}

fn print_text(report: &DashboardReport) {
    println!("{}", report.title);
    println!("{}", report.subtitle);
    println!(
        "{} | {} of {} bookings",
        report.booking_type, report.filtered_count, report.record_count
    );
    println!();

    for tile in &report.metric_tiles {
        println!("{:<14} {}", tile.label, tile.value);
    }

    println!();
    println!("Revenue & Nights Over Time");
    print_panels(&report.time_series);

    for section in &report.sections {
        println!();
        println!("{}", section.heading);
        print_panels(&section.panels);
    }
}

fn print_panels(panels: &[ChartPanel]) {
    for panel in panels {
        match panel {
            ChartPanel::NoData { message, .. } => println!("  ! {}", message),
            ChartPanel::Chart(chart) => {
                println!("  {} [{}]", chart.title, chart.y_title);
                for bar in &chart.bars {
                    println!("    {:<24} {:>10}", bar.category, bar.label);
                }
            }
        }
    }
}

fn print_options(report: &DashboardReport) {
    for (field, values) in &report.filter_options {
        println!("{} ({})", field, values.len());
        for value in values {
            println!("  {}", value);
        }
    }
}

fn main() -> Result<()> {
    FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Render(args) => {
            let report = args.view.render()?;
            match args.format {
                OutputFormat::Text => print_text(&report),
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
            }
            if let Some(dir) = &args.export_dir {
                let written = ChartExporter::new(dir).write_report(&report)?;
                eprintln!("Wrote {} chart tables to {}", written.len(), dir.display());
            }
        }
        Commands::Options(view) => print_options(&view.render()?),
    }

    Ok(())
}
