//! Configuration and constants for the analytics engine.

/// Current report schema version
pub const SCHEMA_VERSION: &str = "1.0.0";

/// Number of buckets in every timeline
pub const BUCKET_COUNT: usize = 5;

/// Second node of every flow chain (client -> protocol -> host -> path -> method)
pub const PROTOCOL_LABEL: &str = "HTTP";

// Status classification
pub const ERROR_STATUS_THRESHOLD: u16 = 400;
pub const SUCCESS_STATUS: u16 = 200;

/// Display scale shared by the percentage-style health metrics
pub const METRIC_SCALE: f64 = 100.0;

// File extensions that select newline-delimited record parsing
pub const NDJSON_EXTENSIONS: &[&str] = &["jsonl", "ndjson"];
