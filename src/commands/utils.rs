use crate::output::read_report;
use crate::utils::config::SCHEMA_VERSION;
use anyhow::Result;
use std::path::PathBuf;

/// Validate a report JSON file
pub fn validate_report_file(file_path: PathBuf) -> Result<()> {
    println!("Validating report: {}", file_path.display());

    // read_report rejects a timeline without the full bucket set
    let report = read_report(&file_path)?;

    println!("✓ Valid report JSON");
    println!("  Version: {}", report.version);
    println!(
        "  Window: {} ({} .. {})",
        report.window.period, report.window.start, report.window.end
    );
    println!("  Records: {}", report.window.record_count);
    println!(
        "  Flow: {} nodes, {} edges",
        report.flow.nodes.len(),
        report.flow.edges.len()
    );
    println!("  Health Metrics: {}", report.health.len());

    Ok(())
}

/// Display schema information
pub fn display_schema(show_details: bool) {
    println!("Request Insights Report Schema");
    println!("Current Version: {}", SCHEMA_VERSION);
    println!();

    if show_details {
        println!("Schema Structure:");
        println!("  version: string          - Schema version (e.g., '1.0.0')");
        println!("  window: object           - Selected window");
        println!("    period: string         - hourly | daily | weekly | monthly | custom");
        println!("    start, end: number     - Epoch seconds, inclusive");
        println!("    hostname: string?      - Hostname filter (if any)");
        println!("    record_count: number   - Records in the window");
        println!("  timeline: array          - Five buckets, oldest first");
        println!("    label: string          - HH:00, ISO-8601 or month name");
        println!("    start, end: string     - RFC 3339 bucket bounds (exclusive)");
        println!("    requestCount: number   - Requests in the bucket");
        println!("    errorCount: number     - Responses with status >= 400");
        println!("  flow: object             - client -> protocol -> host -> path -> method");
        println!("    nodes: array           - {{ label, index }} in first-seen order");
        println!("    edges: array           - {{ sourceIndex, targetIndex, weight }}");
        println!("  health: array            - RPS, Uptime, Success, Inventory,");
        println!("                             Builders, Latency");
        println!("    subject: string        - Metric name");
        println!("    description: string    - What the metric measures");
        println!("    actualDisplay: string  - Observed value for display");
        println!("    value: number          - Normalized score");
        println!("    cap: number            - Display scale maximum");
        println!("  generated_at: string     - ISO 8601 timestamp");
    } else {
        println!("Use --show for detailed schema information");
    }
}

/// Display version information
pub fn display_version() {
    println!("Request Insights v{}", env!("CARGO_PKG_VERSION"));
    println!("Report Schema: v{}", SCHEMA_VERSION);
    println!();
    println!("Traffic timelines, flow graphs and health scores from HTTP request logs.");
}
