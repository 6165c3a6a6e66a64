use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use chrono::NaiveTime;
use serde::Deserialize;

use crate::data::derive::DailyWindow;
use crate::data::loader::DataSources;

/// Config file looked up in the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "energy-dashboard.json";

/// Which dashboard is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DashboardView {
    /// One building at a time, raw hourly energy.
    #[default]
    Hourly,
    /// Zone / building filters, EUI and summary metrics.
    Climate,
}

/// Startup configuration, read from JSON. Every field is optional.
///
/// ```json
/// {
///   "data_file": "combined_hourly_energy.csv",
///   "climate_file": "climate_zones.csv",
///   "shading_start": "06:00",
///   "shading_end": "09:30",
///   "preview_rows": 5,
///   "initial_view": "climate"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DashboardConfig {
    pub data_file: PathBuf,
    pub climate_file: Option<PathBuf>,
    pub shading_start: String,
    pub shading_end: String,
    pub preview_rows: usize,
    pub initial_view: DashboardView,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from("combined_hourly_energy.csv"),
            climate_file: None,
            shading_start: "06:00".to_string(),
            shading_end: "09:30".to_string(),
            preview_rows: 5,
            initial_view: DashboardView::Hourly,
        }
    }
}

impl DashboardConfig {
    /// Read and validate a config file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: DashboardConfig = serde_json::from_str(&text)
            .with_context(|| format!("parsing config {}", path.display()))?;
        config.daily_window()?;
        Ok(config)
    }

    /// Config for this process: the path in the first CLI argument, else
    /// [`DEFAULT_CONFIG_FILE`] if present, else defaults. Errors are logged
    /// and fall back to defaults.
    pub fn from_args() -> Self {
        let path = match std::env::args_os().nth(1) {
            Some(arg) => PathBuf::from(arg),
            None => {
                let fallback = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !fallback.exists() {
                    log::info!("No config file, using defaults");
                    return Self::default();
                }
                fallback
            }
        };

        match Self::load(&path) {
            Ok(config) => {
                log::info!("Using config {}", path.display());
                config
            }
            Err(e) => {
                log::error!("Ignoring config: {e:#}");
                Self::default()
            }
        }
    }

    /// Morning shading band, from `shading_start` / `shading_end`.
    pub fn daily_window(&self) -> Result<DailyWindow> {
        let start = parse_time_of_day(&self.shading_start).context("shading_start")?;
        let end = parse_time_of_day(&self.shading_end).context("shading_end")?;
        if start > end {
            bail!("shading_start {start} is after shading_end {end}");
        }
        Ok(DailyWindow { start, end })
    }

    pub fn sources(&self) -> DataSources {
        DataSources::new(self.data_file.clone(), self.climate_file.clone())
    }
}

fn parse_time_of_day(text: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(text, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(text, "%H:%M:%S"))
        .with_context(|| format!("'{text}' is not a HH:MM time"))
}
