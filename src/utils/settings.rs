//! Settings loading and threshold validation.
//!
//! Settings arrive as TOML (or JSON, picked by file extension) with every
//! field optional. They are converted into a typed [`Settings`] whose
//! thresholds are all present, so a missing value fails here instead of
//! leaking into the health arithmetic.

use super::error::ConfigError;
use chrono::FixedOffset;
use log::debug;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Settings document as it appears on disk
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawSettings {
    #[serde(default)]
    pub thresholds: RawThresholds,

    #[serde(default)]
    pub report: ReportSettings,
}

/// Threshold table with every entry optional
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawThresholds {
    #[serde(rename = "RPS", alias = "rps")]
    pub rps: Option<f64>,

    #[serde(rename = "Uptime", alias = "uptime")]
    pub uptime: Option<f64>,

    #[serde(rename = "Success", alias = "success")]
    pub success: Option<f64>,

    #[serde(rename = "Latency", alias = "latency")]
    pub latency: Option<f64>,

    #[serde(rename = "Builders", alias = "builders")]
    pub builders: Option<f64>,

    #[serde(rename = "Inventory", alias = "inventory")]
    pub inventory: Option<f64>,
}

/// Report presentation settings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ReportSettings {
    /// Reporting timezone as minutes east of UTC
    #[serde(default)]
    pub utc_offset_minutes: i32,
}

/// Validated thresholds used to normalize health metrics
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Thresholds {
    /// Scaled requests-per-second target
    pub rps: f64,
    /// Uptime target, percent
    pub uptime: f64,
    /// Accepted for compatibility, not used by any metric
    pub success: f64,
    /// Latency target, milliseconds
    pub latency: f64,
    /// Display cap of the Builders metric
    pub builders: f64,
    /// Display cap of the Inventory metric
    pub inventory: f64,
}

impl TryFrom<RawThresholds> for Thresholds {
    type Error = ConfigError;

    fn try_from(raw: RawThresholds) -> Result<Self, Self::Error> {
        Ok(Self {
            rps: require_positive("RPS", raw.rps)?,
            uptime: require_positive("Uptime", raw.uptime)?,
            success: require_non_negative("Success", raw.success)?,
            latency: require_non_negative("Latency", raw.latency)?,
            builders: require_non_negative("Builders", raw.builders)?,
            inventory: require_non_negative("Inventory", raw.inventory)?,
        })
    }
}

/// Fully validated settings
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub thresholds: Thresholds,

    /// Reporting timezone for bucket alignment and labels
    pub utc_offset: FixedOffset,
}

impl TryFrom<RawSettings> for Settings {
    type Error = ConfigError;

    fn try_from(raw: RawSettings) -> Result<Self, Self::Error> {
        let minutes = raw.report.utc_offset_minutes;
        let utc_offset = minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .ok_or(ConfigError::InvalidUtcOffset(minutes))?;

        Ok(Self {
            thresholds: Thresholds::try_from(raw.thresholds)?,
            utc_offset,
        })
    }
}

/// On-disk settings encodings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsFormat {
    Toml,
    Json,
}

impl SettingsFormat {
    /// Pick the format from a file extension, defaulting to TOML
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => SettingsFormat::Json,
            _ => SettingsFormat::Toml,
        }
    }
}

/// Parse and validate settings from a string
pub fn parse_settings(contents: &str, format: SettingsFormat) -> Result<Settings, ConfigError> {
    let raw: RawSettings = match format {
        SettingsFormat::Toml => toml::from_str(contents)?,
        SettingsFormat::Json => serde_json::from_str(contents)?,
    };
    Settings::try_from(raw)
}

/// Load settings from a TOML or JSON file
///
/// # Errors
/// * `ConfigError::IoError` - If file cannot be read
/// * `ConfigError::TomlError` / `ConfigError::JsonError` - If the document is invalid
/// * `ConfigError::MissingThreshold` - If a threshold is absent
///
/// # Example
/// ```ignore
/// let settings = load_settings("settings.toml")?;
/// ```
pub fn load_settings(path: impl AsRef<Path>) -> Result<Settings, ConfigError> {
    let path = path.as_ref();
    debug!("Loading settings from: {}", path.display());

    let contents = fs::read_to_string(path)?;
    parse_settings(&contents, SettingsFormat::from_path(path))
}

fn require_positive(name: &'static str, value: Option<f64>) -> Result<f64, ConfigError> {
    let value = value.ok_or(ConfigError::MissingThreshold(name))?;
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(ConfigError::InvalidThreshold { name, value })
    }
}

fn require_non_negative(name: &'static str, value: Option<f64>) -> Result<f64, ConfigError> {
    let value = value.ok_or(ConfigError::MissingThreshold(name))?;
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(ConfigError::InvalidThreshold { name, value })
    }
}
