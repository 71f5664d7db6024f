use pretty_assertions::assert_eq;
use request_insights::aggregator::TimeWindow;
use request_insights::commands::{
    build_report, execute_analyze, validate_args, validate_report_file, AnalyzeArgs,
};
use request_insights::output::read_report;
use request_insights::parser::schema::LogRecord;
use request_insights::utils::error::AnalyticsError;
use request_insights::utils::settings::{parse_settings, SettingsFormat};
use std::fs;
use std::path::Path;
use tempfile::tempdir;

const SETTINGS_TOML: &str = r#"
[thresholds]
RPS = 1
Uptime = 99
Success = 95
Latency = 100
Builders = 70
Inventory = 80
"#;

// 2024-03-07T12:00:00Z
const NOON: i64 = 1_709_812_800;

fn records_json() -> String {
    let rows: Vec<String> = [
        (NOON - 3 * 3600 + 60, "10.0.0.1", "api.example.com", "/v1/items", "GET", 200, 40.0),
        (NOON - 3600 + 60, "10.0.0.2", "api.example.com", "/v1/items", "GET", 500, 80.0),
        (NOON - 1800, "10.0.0.1", "www.example.com", "/", "GET", 200, 20.0),
        (NOON - 60, "10.0.0.1", "api.example.com", "/v1/orders", "POST", 201, 60.0),
    ]
    .iter()
    .map(|(ts, ip, host, path, method, status, ms)| {
        format!(
            r#"{{"timestamp": {ts}, "hostname": "{host}", "path": "{path}", "method": "{method}", "responseStatus": {status}, "responseTimeMs": {ms}, "session": {{"clientIP": "{ip}"}}}}"#
        )
    })
    .collect();

    format!("[{}]", rows.join(",\n"))
}

fn write_inputs(dir: &Path) -> (std::path::PathBuf, std::path::PathBuf) {
    let records = dir.join("records.json");
    let settings = dir.join("settings.toml");
    fs::write(&records, records_json()).unwrap();
    fs::write(&settings, SETTINGS_TOML).unwrap();
    (records, settings)
}

#[test]
fn test_analyze_end_to_end() {
    let dir = tempdir().unwrap();
    let (records_path, settings_path) = write_inputs(dir.path());
    let output = dir.path().join("out/report.json");

    let args = AnalyzeArgs {
        records_path,
        settings_path,
        period: "hourly".to_string(),
        now: Some(NOON),
        output_json: output.clone(),
        ..Default::default()
    };

    validate_args(&args).unwrap();
    execute_analyze(args).unwrap();

    let report = read_report(&output).unwrap();

    assert_eq!(report.window.period, "hourly");
    assert_eq!(report.window.start, NOON - 5 * 3600 + 3600);
    assert_eq!(report.window.end, NOON);
    assert_eq!(report.window.record_count, 4);

    let labels: Vec<&str> = report.timeline.iter().map(|b| b.label.as_str()).collect();
    assert_eq!(labels, vec!["08:00", "09:00", "10:00", "11:00", "12:00"]);

    let counts: Vec<(u64, u64)> = report
        .timeline
        .iter()
        .map(|b| (b.request_count, b.error_count))
        .collect();
    // The newest bucket starts and ends at noon
    assert_eq!(counts, vec![(0, 0), (1, 0), (0, 0), (3, 1), (0, 0)]);

    assert_eq!(report.flow.nodes[1].label, "HTTP");
    assert_eq!(report.health.len(), 6);
    assert_eq!(report.health[3].cap, 80.0);
    assert_eq!(report.health[4].cap, 70.0);

    validate_report_file(output).unwrap();
}

#[test]
fn test_analyze_hostname_filter() {
    let dir = tempdir().unwrap();
    let (records_path, settings_path) = write_inputs(dir.path());
    let output = dir.path().join("report.json");

    let args = AnalyzeArgs {
        records_path,
        settings_path,
        period: "daily".to_string(),
        now: Some(NOON),
        hostname: Some("www.example.com".to_string()),
        output_json: output.clone(),
        ..Default::default()
    };

    execute_analyze(args).unwrap();

    let report = read_report(&output).unwrap();
    assert_eq!(report.window.record_count, 1);
    assert_eq!(report.window.hostname.as_deref(), Some("www.example.com"));
    assert_eq!(report.flow.nodes.len(), 5);
}

#[test]
fn test_analyze_empty_window_fails_without_output() {
    let dir = tempdir().unwrap();
    let (records_path, settings_path) = write_inputs(dir.path());
    let output = dir.path().join("report.json");

    let args = AnalyzeArgs {
        records_path,
        settings_path,
        period: "custom".to_string(),
        start: Some(1),
        end: Some(2),
        now: Some(NOON),
        output_json: output.clone(),
        ..Default::default()
    };

    let err = execute_analyze(args).unwrap_err();

    assert!(matches!(
        err.downcast_ref::<AnalyticsError>(),
        Some(AnalyticsError::DivisionByZero(_))
    ));
    assert!(!output.exists());
}

#[test]
fn test_analyze_missing_threshold_fails() {
    let dir = tempdir().unwrap();
    let (records_path, settings_path) = write_inputs(dir.path());
    fs::write(&settings_path, SETTINGS_TOML.replace("Latency = 100\n", "")).unwrap();

    let args = AnalyzeArgs {
        records_path,
        settings_path,
        now: Some(NOON),
        output_json: dir.path().join("report.json"),
        ..Default::default()
    };

    let err = execute_analyze(args).unwrap_err();
    assert!(format!("{:#}", err).contains("Missing threshold: Latency"));
}

#[test]
fn test_build_report_custom_window_buckets_monthly() {
    let settings = parse_settings(SETTINGS_TOML, SettingsFormat::Toml).unwrap();
    let now = chrono::DateTime::parse_from_rfc3339("2024-03-07T12:00:00+00:00").unwrap();
    let window = TimeWindow::resolve("custom", Some(NOON - 86_400), Some(NOON), now).unwrap();
    let records = vec![LogRecord::new(NOON - 10, "ip", "h", "/", "GET", 200, 5.0)];

    let report = build_report(&records, &window, &settings, None).unwrap();

    let labels: Vec<&str> = report.timeline.iter().map(|b| b.label.as_str()).collect();
    assert_eq!(labels, vec!["Nov", "Dec", "Jan", "Feb", "Mar"]);
    assert_eq!(report.timeline[4].request_count, 1);
    assert_eq!(report.window.period, "custom");
}

#[test]
fn test_analyze_stdout_skips_file() {
    let dir = tempdir().unwrap();
    let (records_path, settings_path) = write_inputs(dir.path());
    let output = dir.path().join("report.json");

    let args = AnalyzeArgs {
        records_path,
        settings_path,
        period: "hourly".to_string(),
        now: Some(NOON),
        output_json: output.clone(),
        stdout: true,
        ..Default::default()
    };

    execute_analyze(args).unwrap();

    assert!(!output.exists());
}

#[test]
fn test_analyze_explicit_end_keeps_first_bucket_records() {
    let dir = tempdir().unwrap();
    let (records_path, settings_path) = write_inputs(dir.path());
    let output = dir.path().join("report.json");

    // Ending at 11:00 puts the 07:00..08:00 bucket first
    let args = AnalyzeArgs {
        records_path,
        settings_path,
        period: "hourly".to_string(),
        end: Some(NOON - 3600),
        now: Some(NOON),
        output_json: output.clone(),
        ..Default::default()
    };

    execute_analyze(args).unwrap();

    let report = read_report(&output).unwrap();
    assert_eq!(report.window.start, NOON - 5 * 3600);
    assert_eq!(report.window.end, NOON - 3600);

    let labels: Vec<&str> = report.timeline.iter().map(|b| b.label.as_str()).collect();
    assert_eq!(labels, vec!["07:00", "08:00", "09:00", "10:00", "11:00"]);
    assert_eq!(report.window.record_count, 1);
    assert_eq!(report.timeline[2].request_count, 1);
}
