//! Dashboard configuration file support.
//!
//! This module reads the dashboard settings (source files, exchange rate,
//! chart limits, page titles) from a TOML file. Every key is optional; missing
//! keys fall back to the Saray hotel defaults.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::domain::BookingType;

/// Error type for configuration loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file at '{path}': {message}")]
    Parse { path: String, message: String },

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("No dashboard.toml found in standard locations")]
    NotFound,
}

/// Dashboard configuration from file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardConfig {
    #[serde(default)]
    pub display: DisplaySettings,
    #[serde(default)]
    pub sources: SourceSettings,
    #[serde(default)]
    pub currency: CurrencySettings,
    #[serde(default)]
    pub charts: ChartSettings,
}

/// Page header text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplaySettings {
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_subtitle")]
    pub subtitle: String,
}

/// Booking source files, one per booking type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceSettings {
    #[serde(default = "default_past_source")]
    pub past: PathBuf,
    #[serde(default = "default_future_source")]
    pub future: PathBuf,
    #[serde(default = "default_sheet")]
    pub sheet: String,
}

/// Exchange rate settings. Source amounts are in EGP.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrencySettings {
    /// USD per EGP.
    #[serde(default = "default_usd_rate")]
    pub usd_rate: f64,
}

/// Limits for the ranked chart sections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSettings {
    #[serde(default = "default_top_n")]
    pub channel_top_n: usize,
    #[serde(default = "default_top_n")]
    pub region_top_n: usize,
}

fn default_title() -> String {
    "Saray Pyramids Hotel".to_string()
}

fn default_subtitle() -> String {
    "Performance Dashboard".to_string()
}

fn default_past_source() -> PathBuf {
    PathBuf::from("Saray Dashboard.xlsx")
}

fn default_future_source() -> PathBuf {
    PathBuf::from("Saray_Future.xlsx")
}

fn default_sheet() -> String {
    "Raw Data".to_string()
}

fn default_usd_rate() -> f64 {
    1.0 / 50.0
}

fn default_top_n() -> usize {
    10
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            title: default_title(),
            subtitle: default_subtitle(),
        }
    }
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self {
            past: default_past_source(),
            future: default_future_source(),
            sheet: default_sheet(),
        }
    }
}

impl Default for CurrencySettings {
    fn default() -> Self {
        Self {
            usd_rate: default_usd_rate(),
        }
    }
}

impl Default for ChartSettings {
    fn default() -> Self {
        Self {
            channel_top_n: default_top_n(),
            region_top_n: default_top_n(),
        }
    }
}

impl SourceSettings {
    /// Source file for a booking type.
    pub fn path_for(&self, booking_type: BookingType) -> &Path {
        match booking_type {
            BookingType::Past => &self.past,
            BookingType::Future => &self.future,
        }
    }

    fn resolve_against(&mut self, base: &Path) {
        for path in [&mut self.past, &mut self.future] {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        }
    }
}

impl DashboardConfig {
    /// Parse configuration from TOML text and validate it.
    ///
    /// # Examples
    ///
    /// ```
    /// use hotel_dashboard::config::DashboardConfig;
    ///
    /// let config = DashboardConfig::from_toml_str("[currency]\nusd_rate = 0.025\n").unwrap();
    /// assert_eq!(config.currency.usd_rate, 0.025);
    /// assert_eq!(config.sources.sheet, "Raw Data");
    /// ```
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let deserializer = toml::Deserializer::new(content);
        let config: DashboardConfig =
            serde_path_to_error::deserialize(deserializer).map_err(|e| ConfigError::Parse {
                path: e.path().to_string(),
                message: e.inner().to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// Relative source paths are resolved against the file's directory.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let mut config = Self::from_toml_str(&content)?;
        if let Some(base) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            config.sources.resolve_against(base);
        }
        Ok(config)
    }

    /// Load configuration from the default location.
    ///
    /// Searches for `dashboard.toml` in:
    /// 1. Current directory
    /// 2. `rust_backend/` directory
    /// 3. Parent directory
    pub fn from_default_location() -> Result<Self, ConfigError> {
        let search_paths = [
            PathBuf::from("dashboard.toml"),
            PathBuf::from("rust_backend/dashboard.toml"),
            PathBuf::from("../dashboard.toml"),
        ];

        for path in search_paths {
            if path.exists() {
                return Self::from_file(&path);
            }
        }

        Err(ConfigError::NotFound)
    }

    /// Load from the default location, or use defaults when no file exists.
    pub fn load_or_default() -> Result<Self, ConfigError> {
        match Self::from_default_location() {
            Err(ConfigError::NotFound) => {
                log::debug!("No dashboard.toml found, using default configuration");
                Ok(Self::default())
            }
            other => other,
        }
    }

    /// Check values that parse but make no sense.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let rate = self.currency.usd_rate;
        if !rate.is_finite() || rate <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "currency.usd_rate must be a positive number, got {}",
                rate
            )));
        }
        if self.charts.channel_top_n == 0 {
            return Err(ConfigError::Invalid(
                "charts.channel_top_n must be at least 1".to_string(),
            ));
        }
        if self.charts.region_top_n == 0 {
            return Err(ConfigError::Invalid(
                "charts.region_top_n must be at least 1".to_string(),
            ));
        }
        if self.sources.sheet.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "sources.sheet must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
