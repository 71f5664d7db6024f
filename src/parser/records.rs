//! Record loading and window filtering.
//!
//! Accepts either a JSON array of records or newline-delimited JSON (one
//! record per line). Filtering mirrors the log store query: an inclusive
//! timestamp range plus an optional exact hostname match.

use super::schema::LogRecord;
use crate::utils::config::NDJSON_EXTENSIONS;
use crate::utils::error::ParseError;
use log::{debug, info};
use std::fs;
use std::path::Path;

/// Detected encoding of a record file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordFormat {
    /// A single JSON array
    JsonArray,
    /// One JSON object per line
    JsonLines,
}

impl RecordFormat {
    /// Pick the format from a file extension, defaulting to a JSON array
    pub fn from_path(path: &Path) -> Self {
        let is_ndjson = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|ext| {
                NDJSON_EXTENSIONS
                    .iter()
                    .any(|known| ext.eq_ignore_ascii_case(known))
            })
            .unwrap_or(false);

        if is_ndjson {
            RecordFormat::JsonLines
        } else {
            RecordFormat::JsonArray
        }
    }
}

/// Parse records from a string
///
/// **Public** - main entry point for parsing
///
/// # Errors
/// * `ParseError::JsonError` - Invalid JSON array
/// * `ParseError::InvalidLine` - Invalid record in a JSON-lines document (1-based line)
pub fn parse_records(contents: &str, format: RecordFormat) -> Result<Vec<LogRecord>, ParseError> {
    let records = match format {
        RecordFormat::JsonArray => serde_json::from_str(contents)?,
        RecordFormat::JsonLines => parse_lines(contents)?,
    };

    debug!("Parsed {} records ({:?})", records.len(), format);

    Ok(records)
}

fn parse_lines(contents: &str) -> Result<Vec<LogRecord>, ParseError> {
    contents
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| {
            serde_json::from_str(line).map_err(|source| ParseError::InvalidLine {
                line: idx + 1,
                source,
            })
        })
        .collect()
}

/// Load records from a file, picking the format by extension
pub fn load_records(path: impl AsRef<Path>) -> Result<Vec<LogRecord>, ParseError> {
    let path = path.as_ref();

    info!("Loading records from: {}", path.display());

    let contents = fs::read_to_string(path)?;
    parse_records(&contents, RecordFormat::from_path(path))
}

/// Keep records inside `[start, end]` and, if given, on `hostname`
///
/// **Public** - stands in for the log store's range query
pub fn filter_records(
    records: Vec<LogRecord>,
    start: i64,
    end: i64,
    hostname: Option<&str>,
) -> Vec<LogRecord> {
    let before = records.len();

    let kept: Vec<LogRecord> = records
        .into_iter()
        .filter(|r| r.timestamp >= start && r.timestamp <= end)
        .filter(|r| hostname.map_or(true, |h| r.hostname == h))
        .collect();

    debug!(
        "Filtered {} -> {} records (window {}..={}, hostname {:?})",
        before,
        kept.len(),
        start,
        end,
        hostname
    );

    kept
}
