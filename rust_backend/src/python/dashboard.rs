use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;

use crate::config::DashboardConfig;
use crate::core::domain::ReleaseDaysBucket;
use crate::preprocessing::pipeline::{DashboardOptions, DashboardPipeline};
use crate::services::formatting;

fn load_config(config_path: Option<&str>) -> PyResult<DashboardConfig> {
    let config = match config_path {
        Some(path) => DashboardConfig::from_file(path),
        None => DashboardConfig::load_or_default(),
    };
    config.map_err(|e| PyValueError::new_err(format!("Failed to load config: {}", e)))
}

/// Render the dashboard for the given view options
///
/// Args:
///     options_json: JSON object with any of `currency` ("EGP"/"USD"),
///         `booking_type` ("past"/"future"), `granularity`
///         ("monthly"/"daily"), `fill_gaps` and `filters`
///         (filter label -> list of values)
///     config_path: Optional path to dashboard.toml
///
/// Returns:
///     str: The rendered report as JSON
///
/// Example:
///     >>> import hotel_dashboard, json
///     >>> report = json.loads(hotel_dashboard.render_dashboard('{"currency": "USD"}'))
///     >>> report["metric_tiles"][0]["value"]
#[pyfunction]
#[pyo3(signature = (options_json, config_path=None))]
pub fn render_dashboard(options_json: &str, config_path: Option<&str>) -> PyResult<String> {
    let options: DashboardOptions = serde_json::from_str(options_json)
        .map_err(|e| PyValueError::new_err(format!("Invalid options: {}", e)))?;
    let config = load_config(config_path)?;

    let report = DashboardPipeline::new(config)
        .run(&options)
        .map_err(|e| PyRuntimeError::new_err(format!("Failed to render dashboard: {:#}", e)))?;

    serde_json::to_string(&report)
        .map_err(|e| PyRuntimeError::new_err(format!("Failed to serialize report: {}", e)))
}

/// Magnitude-scaled label for an amount, e.g. 1250000 -> "1.2M"
#[pyfunction]
pub fn format_amount(value: f64) -> String {
    formatting::format_amount(value)
}

/// Release-days bucket labels in display order
#[pyfunction]
pub fn release_days_order() -> Vec<String> {
    ReleaseDaysBucket::labels()
}
