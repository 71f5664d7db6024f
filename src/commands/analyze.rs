//! Analyze command implementation.
//!
//! The analyze command:
//! 1. Loads settings and resolves the time window
//! 2. Loads and filters records
//! 3. Builds the timeline, flow graph and health metrics
//! 4. Writes the JSON report, to a file or stdout
//! 5. Optionally prints a text summary

use crate::aggregator::{
    aggregate_timeline, build_flow_graph, compute_health, Period, TimeWindow,
};
use crate::output::{render_summary, report_to_string, write_report};
use crate::parser::schema::{AnalyticsReport, LogRecord, ReportWindow};
use crate::parser::{filter_records, load_records};
use crate::utils::config::SCHEMA_VERSION;
use crate::utils::settings::{load_settings, Settings};
use anyhow::{Context, Result};
use chrono::{DateTime, FixedOffset, TimeZone, Utc};
use log::{debug, info, warn};
use std::path::PathBuf;
use std::time::Instant;

/// Arguments for the analyze command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct AnalyzeArgs {
    /// Record export (JSON array, or JSON lines for .jsonl/.ndjson)
    pub records_path: PathBuf,

    /// Settings file (TOML, or JSON for .json)
    pub settings_path: PathBuf,

    /// hourly, daily, weekly, monthly or custom
    pub period: String,

    /// Explicit window start, epoch seconds
    pub start: Option<i64>,

    /// Explicit window end, epoch seconds
    pub end: Option<i64>,

    /// Override for the current time, epoch seconds
    pub now: Option<i64>,

    /// Only keep records for this hostname
    pub hostname: Option<String>,

    /// Output path for the JSON report
    pub output_json: PathBuf,

    /// Print the JSON report to stdout instead of writing `output_json`
    pub stdout: bool,

    /// Print text summary to stdout
    pub print_summary: bool,

    /// Number of heaviest flow edges in the text summary
    pub top_flows: usize,
}

impl Default for AnalyzeArgs {
    fn default() -> Self {
        Self {
            records_path: PathBuf::from("records.json"),
            settings_path: PathBuf::from("settings.toml"),
            period: "daily".to_string(),
            start: None,
            end: None,
            now: None,
            hostname: None,
            output_json: PathBuf::from("report.json"),
            stdout: false,
            print_summary: false,
            top_flows: 10,
        }
    }
}

/// Build a report from already-filtered records
///
/// **Public** - the coordinating step; each view is computed independently
///
/// # Errors
/// * `AnalyticsError::DivisionByZero` - no records in the window
pub fn build_report(
    records: &[LogRecord],
    window: &TimeWindow,
    settings: &Settings,
    hostname: Option<&str>,
) -> Result<AnalyticsReport> {
    let anchor = window
        .end_at(settings.utc_offset)
        .context("Failed to anchor timeline")?;

    let timeline = aggregate_timeline(records, window.period, anchor)
        .context("Failed to aggregate timeline")?;

    let flow = build_flow_graph(records);

    let health = compute_health(records, window.start, window.end, &settings.thresholds)
        .context("Failed to compute health metrics")?;

    Ok(AnalyticsReport {
        version: SCHEMA_VERSION.to_string(),
        window: ReportWindow {
            period: window.requested.clone(),
            start: window.start,
            end: window.end,
            hostname: hostname.map(str::to_string),
            record_count: records.len(),
        },
        timeline,
        flow,
        health,
        generated_at: Utc::now().to_rfc3339(),
    })
}

/// Execute the analyze command
///
/// **Public** - main entry point called from main.rs
///
/// # Errors
/// * Settings or record files missing or malformed
/// * Custom window without both bounds
/// * No records inside the window
/// * File write errors
pub fn execute_analyze(args: AnalyzeArgs) -> Result<()> {
    let start_time = Instant::now();

    // Step 1: Settings and window
    info!("Step 1/5: Loading settings from {}...", args.settings_path.display());
    let settings = load_settings(&args.settings_path).context("Failed to load settings")?;

    let now = resolve_now(args.now, settings.utc_offset)?;
    let window = TimeWindow::resolve(&args.period, args.start, args.end, now)
        .context("Failed to resolve time window")?;

    info!(
        "Window: {} ({}..={}, {} buckets)",
        window.requested, window.start, window.end, window.period
    );

    // Step 2: Records
    info!("Step 2/5: Loading records from {}...", args.records_path.display());
    let records = load_records(&args.records_path).context("Failed to load records")?;
    let records = filter_records(records, window.start, window.end, args.hostname.as_deref());

    info!("{} records in window", records.len());

    // Step 3: Views
    info!("Step 3/5: Computing timeline, flow graph and health...");
    let report = build_report(&records, &window, &settings, args.hostname.as_deref())?;

    debug!(
        "Flow graph: {} nodes, {} edges",
        report.flow.nodes.len(),
        report.flow.edges.len()
    );

    // Step 4: Output
    if args.stdout {
        info!("Step 4/5: Printing report to stdout...");
        println!("{}", report_to_string(&report).context("Failed to serialize report")?);
    } else {
        info!("Step 4/5: Writing report...");
        write_report(&report, &args.output_json).context("Failed to write report JSON")?;
        info!("✓ Report written to: {}", args.output_json.display());
    }

    // Step 5: Summary (if requested)
    if args.print_summary {
        println!("\n{}", "=".repeat(80));
        println!("TRAFFIC SUMMARY");
        println!("{}", "=".repeat(80));
        println!("Window:  {} ({} .. {})", window.requested, window.start, window.end);
        if let Some(host) = &args.hostname {
            println!("Host:    {}", host);
        }
        println!("Records: {}", records.len());
        println!("\n{}", render_summary(&report, args.top_flows));
        println!("{}", "=".repeat(80));
    } else {
        info!("Step 5/5: Skipping summary (not requested)");
    }

    let elapsed = start_time.elapsed();
    info!("Analysis completed in {:.2}s", elapsed.as_secs_f64());

    Ok(())
}

/// Current instant in the reporting timezone
fn resolve_now(now: Option<i64>, offset: FixedOffset) -> Result<DateTime<FixedOffset>> {
    match now {
        Some(ts) => offset
            .timestamp_opt(ts, 0)
            .single()
            .with_context(|| format!("Invalid --now timestamp: {}", ts)),
        None => Ok(Utc::now().with_timezone(&offset)),
    }
}

/// Validate analyze arguments
///
/// **Public** - can be called before execute_analyze for early validation
pub fn validate_args(args: &AnalyzeArgs) -> Result<()> {
    if args.records_path.as_os_str().is_empty() {
        anyhow::bail!("Records path cannot be empty");
    }

    if args.settings_path.as_os_str().is_empty() {
        anyhow::bail!("Settings path cannot be empty");
    }

    let is_custom = Period::is_custom(&args.period);

    if is_custom && (args.start.is_none() || args.end.is_none()) {
        anyhow::bail!("Custom period requires both --start and --end");
    }

    if !is_custom && args.period.parse::<Period>().is_err() {
        warn!("Unknown period '{}', monthly buckets will be used", args.period);
    }

    if let (Some(start), Some(end)) = (args.start, args.end) {
        if end <= start {
            anyhow::bail!("--end must be after --start");
        }
    }

    if let Some(host) = &args.hostname {
        if host.trim().is_empty() {
            anyhow::bail!("Hostname filter cannot be blank");
        }
    }

    if args.top_flows == 0 {
        anyhow::bail!("top_flows must be greater than 0");
    }

    if args.top_flows > 1000 {
        anyhow::bail!("top_flows is too large (max 1000)");
    }

    Ok(())
}
