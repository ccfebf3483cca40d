//! Prediction configuration
//!
//! Config is loaded with a two-layer resolution:
//! 1. An explicit path, or the override in the data dir
//!    (~/.local/share/spendcast/config/prediction.toml)
//! 2. Fall back to embedded defaults (compiled into binary)
//!
//! Keys missing from an override keep their default values.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Error, Result};

/// Embedded default config (compiled into binary)
const DEFAULT_CONFIG: &str = include_str!("../../../config/prediction.toml");

/// Tunables for the prediction engine and caller-facing defaults
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionConfig {
    /// Reciprocal condition number of X'X below which a fit counts as singular
    pub singular_tolerance: f64,
    /// Default window for the rolling monthly average
    pub rolling_months: i64,
    /// Default width of the rolling monthly series
    pub series_window: i64,
    /// Default trailing window for the daily spending view
    pub analysis_days: i64,
}

impl Default for PredictionConfig {
    fn default() -> Self {
        Self {
            singular_tolerance: 1e-12,
            rolling_months: 3,
            series_window: 3,
            analysis_days: 30,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    regression: Option<RawRegression>,
    defaults: Option<RawDefaults>,
}

#[derive(Debug, Deserialize)]
struct RawRegression {
    singular_tolerance: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawDefaults {
    rolling_months: Option<i64>,
    series_window: Option<i64>,
    analysis_days: Option<i64>,
}

impl PredictionConfig {
    /// Load from the default override location, or the embedded defaults
    pub fn load() -> Result<Self> {
        load_config(None)
    }

    /// Load from an explicit path (embedded defaults if it does not exist)
    pub fn from_path(path: &Path) -> Result<Self> {
        load_config(Some(path))
    }

    /// Parse a TOML document on top of the defaults
    pub fn from_toml(content: &str) -> Result<Self> {
        parse_config(content)
    }
}

/// Location of the user override file
pub fn default_config_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("spendcast").join("config").join("prediction.toml"))
}

fn load_config(override_path: Option<&Path>) -> Result<PredictionConfig> {
    let path = match override_path {
        Some(path) => Some(path.to_path_buf()),
        None => default_config_path(),
    };

    let content = match path {
        Some(path) if path.exists() => {
            tracing::debug!(path = %path.display(), "Loading prediction config");
            fs::read_to_string(&path)
                .map_err(|e| Error::Config(format!("Failed to read config: {}", e)))?
        }
        _ => DEFAULT_CONFIG.to_string(),
    };

    parse_config(&content)
}

fn parse_config(content: &str) -> Result<PredictionConfig> {
    let raw: RawConfig = toml::from_str(content)
        .map_err(|e| Error::Config(format!("Invalid config TOML: {}", e)))?;

    let mut config = PredictionConfig::default();

    if let Some(regression) = raw.regression {
        if let Some(tolerance) = regression.singular_tolerance {
            if !(tolerance.is_finite() && tolerance >= 0.0) {
                return Err(Error::Config(format!(
                    "singular_tolerance must be a non-negative number, got {}",
                    tolerance
                )));
            }
            config.singular_tolerance = tolerance;
        }
    }

    if let Some(defaults) = raw.defaults {
        if let Some(months) = defaults.rolling_months {
            config.rolling_months = months;
        }
        if let Some(window) = defaults.series_window {
            config.series_window = window;
        }
        if let Some(days) = defaults.analysis_days {
            config.analysis_days = days;
        }
    }

    Ok(config)
}
