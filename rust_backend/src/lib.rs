pub mod config;
pub mod core;
pub mod io;
pub mod parsing;
pub mod preprocessing;
pub mod services;
pub mod transformations;

#[cfg(feature = "python")]
pub mod python;

#[cfg(feature = "python")]
use pyo3::prelude::*;

/// Hotel booking dashboard - data pipeline behind the Saray performance dashboard
#[cfg(feature = "python")]
#[pymodule]
fn hotel_dashboard(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(python::render_dashboard, m)?)?;
    m.add_function(wrap_pyfunction!(python::format_amount, m)?)?;
    m.add_function(wrap_pyfunction!(python::release_days_order, m)?)?;

    Ok(())
}
