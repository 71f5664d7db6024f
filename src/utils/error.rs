//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.

use thiserror::Error;

/// Errors raised by the analytics computations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalyticsError {
    #[error("Division by zero: {0}")]
    DivisionByZero(&'static str),

    #[error("Instant out of representable range: {0}")]
    TimeOutOfRange(String),
}

/// Errors that can occur while loading settings or resolving a time window
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read settings: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid TOML settings: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Invalid JSON settings: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Missing threshold: {0}")]
    MissingThreshold(&'static str),

    #[error("Threshold {name} must be a positive number, got {value}")]
    InvalidThreshold { name: &'static str, value: f64 },

    #[error("UTC offset of {0} minutes is out of range")]
    InvalidUtcOffset(i32),

    #[error("Custom window requires an explicit {0} timestamp")]
    MissingWindowBound(&'static str),

    #[error("Window end ({end}) must be after window start ({start})")]
    InvalidWindow { start: i64, end: i64 },

    #[error("Window cannot be resolved: {0}")]
    WindowOutOfRange(String),
}

/// Errors that can occur during record parsing
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("JSON deserialization failed: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid record on line {line}: {source}")]
    InvalidLine {
        line: usize,
        source: serde_json::Error,
    },

    #[error("Failed to read records: {0}")]
    IoError(#[from] std::io::Error),
}

/// Errors that can occur during file output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write file: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("Failed to serialize JSON: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("Invalid output path: {0}")]
    InvalidPath(String),

    #[error("Failed to read report: {0}")]
    ReadFailed(std::io::Error),

    #[error("Timeline has {found} buckets, expected {expected}")]
    IncompleteTimeline { found: usize, expected: usize },
}
