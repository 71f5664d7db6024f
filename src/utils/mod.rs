//! Utility modules for configuration, settings, and error handling.

pub mod config;
pub mod error;
pub mod settings;

// Re-export commonly used types for convenience
pub use error::{AnalyticsError, ConfigError, OutputError, ParseError};
pub use settings::{load_settings, parse_settings, Settings, SettingsFormat, Thresholds};
