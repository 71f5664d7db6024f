//! JSON report files.
//!
//! A report is only written or accepted back when its timeline carries the
//! full set of buckets. Reports always land in `.json` files.

use crate::parser::schema::AnalyticsReport;
use crate::utils::config::BUCKET_COUNT;
use crate::utils::error::OutputError;
use log::{debug, info};
use std::fs::{self, File};
use std::io::BufReader;
use std::path::Path;

const REPORT_EXTENSION: &str = "json";

/// Structural checks shared by the writer and the reader
fn check_report(report: &AnalyticsReport) -> Result<(), OutputError> {
    if report.timeline.len() != BUCKET_COUNT {
        return Err(OutputError::IncompleteTimeline {
            found: report.timeline.len(),
            expected: BUCKET_COUNT,
        });
    }
    Ok(())
}

fn check_destination(path: &Path) -> Result<(), OutputError> {
    if path.as_os_str().is_empty() {
        return Err(OutputError::InvalidPath("Path is empty".to_string()));
    }

    if path.is_dir() {
        return Err(OutputError::InvalidPath(format!("{} is a directory", path.display())));
    }

    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(REPORT_EXTENSION));

    if !is_json {
        return Err(OutputError::InvalidPath(format!(
            "{} must have a .{} extension",
            path.display(),
            REPORT_EXTENSION
        )));
    }

    Ok(())
}

/// Write a report as pretty JSON, creating missing parent directories
///
/// The report is serialized in full before the file is touched, so a
/// failed serialization leaves no partial file behind.
///
/// # Errors
/// * `OutputError::IncompleteTimeline` - timeline does not have five buckets
/// * `OutputError::InvalidPath` - empty path, a directory, or not `.json`
/// * `OutputError::WriteFailed` - directory creation or write failed
pub fn write_report(
    report: &AnalyticsReport,
    output_path: impl AsRef<Path>,
) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();

    check_report(report)?;
    check_destination(output_path)?;

    let body = report_to_string(report)?;

    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        debug!("Ensuring report directory {}", parent.display());
        fs::create_dir_all(parent)?;
    }

    fs::write(output_path, &body)?;

    info!("Report written to {} ({} bytes)", output_path.display(), body.len());

    Ok(())
}

/// Pretty JSON for a report, as written by `write_report` and `analyze --stdout`
pub fn report_to_string(report: &AnalyticsReport) -> Result<String, OutputError> {
    serde_json::to_string_pretty(report).map_err(OutputError::SerializationFailed)
}

/// Load a report and apply the same structural checks as the writer
pub fn read_report(input_path: impl AsRef<Path>) -> Result<AnalyticsReport, OutputError> {
    let input_path = input_path.as_ref();

    let file = File::open(input_path).map_err(OutputError::ReadFailed)?;
    let report: AnalyticsReport = serde_json::from_reader(BufReader::new(file))?;

    check_report(&report)?;

    debug!(
        "Loaded report v{} with {} records from {}",
        report.version,
        report.window.record_count,
        input_path.display()
    );

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::{aggregate_timeline, Period};
    use crate::parser::schema::{FlowGraph, ReportWindow};
    use chrono::DateTime;
    use tempfile::tempdir;

    fn sample_report() -> AnalyticsReport {
        let now = DateTime::parse_from_rfc3339("2024-03-07T12:00:00+00:00").unwrap();
        AnalyticsReport {
            version: "1.0.0".to_string(),
            window: ReportWindow {
                period: "daily".to_string(),
                start: 100,
                end: 200,
                hostname: None,
                record_count: 0,
            },
            timeline: aggregate_timeline(&[], Period::Daily, now).unwrap(),
            flow: FlowGraph::default(),
            health: vec![],
            generated_at: "2024-01-01T00:00:00Z".to_string(),
        }
    }

    #[test]
    fn test_write_then_read_report() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("report.json");
        let report = sample_report();

        write_report(&report, &path).unwrap();
        let loaded = read_report(&path).unwrap();

        assert_eq!(loaded.window, report.window);
        assert_eq!(loaded.timeline, report.timeline);
    }

    #[test]
    fn test_report_to_string_omits_missing_hostname() {
        let json = report_to_string(&sample_report()).unwrap();
        assert!(json.contains("\"record_count\": 0"));
        assert!(!json.contains("hostname"));
    }

    #[test]
    fn test_write_rejects_non_json_extension() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("report.txt");

        let err = write_report(&sample_report(), &path).unwrap_err();

        assert!(matches!(err, OutputError::InvalidPath(_)));
        assert!(!path.exists());
    }

    #[test]
    fn test_write_accepts_uppercase_extension() {
        let dir = tempdir().unwrap();
        assert!(write_report(&sample_report(), dir.path().join("REPORT.JSON")).is_ok());
    }

    #[test]
    fn test_write_rejects_incomplete_timeline() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("report.json");
        let mut report = sample_report();
        report.timeline.pop();

        let err = write_report(&report, &path).unwrap_err();

        assert!(matches!(err, OutputError::IncompleteTimeline { found: 4, expected: 5 }));
        assert!(!path.exists());
    }

    #[test]
    fn test_write_rejects_empty_path_and_directory() {
        let dir = tempdir().unwrap();

        assert!(write_report(&sample_report(), "").is_err());
        assert!(write_report(&sample_report(), dir.path()).is_err());
    }

    #[test]
    fn test_write_creates_parent_dirs() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("nested/dirs/report.json");

        write_report(&sample_report(), &nested).unwrap();

        assert!(nested.exists());
    }

    #[test]
    fn test_read_rejects_truncated_timeline() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("report.json");
        let mut report = sample_report();
        report.timeline.truncate(2);
        fs::write(&path, report_to_string(&report).unwrap()).unwrap();

        let err = read_report(&path).unwrap_err();

        assert!(matches!(err, OutputError::IncompleteTimeline { found: 2, .. }));
    }

    #[test]
    fn test_read_missing_file() {
        let dir = tempdir().unwrap();
        let err = read_report(dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, OutputError::ReadFailed(_)));
    }
}
