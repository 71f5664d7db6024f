//! Health score: six metrics normalized against configured thresholds.
//!
//! Metric order is fixed: RPS, Uptime, Success, Inventory, Builders, Latency.
//! Only Latency is clamped to 100; the other values may exceed their cap and
//! are left for the renderer to clip.

use crate::parser::schema::{HealthMetric, LogRecord};
use crate::utils::config::METRIC_SCALE;
use crate::utils::error::AnalyticsError;
use crate::utils::settings::Thresholds;
use log::debug;

/// Aggregate statistics over one window
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrafficStats {
    pub total_requests: u64,
    pub success_count: u64,
    pub error_count: u64,
    pub uptime_percent: f64,
    pub average_latency_ms: f64,
    /// Requests per second multiplied by 100, compared against the RPS threshold
    pub requests_per_second_scaled: f64,
    pub success_rate: f64,
}

impl TrafficStats {
    /// Derive statistics for records in `[window_start, window_end]`
    ///
    /// # Errors
    /// * `AnalyticsError::DivisionByZero` - no records, or a window of zero or negative length
    pub fn from_records(
        records: &[LogRecord],
        window_start: i64,
        window_end: i64,
    ) -> Result<Self, AnalyticsError> {
        if records.is_empty() {
            return Err(AnalyticsError::DivisionByZero("record set is empty"));
        }
        if window_end <= window_start {
            return Err(AnalyticsError::DivisionByZero("window has no duration"));
        }

        let total = records.len() as f64;
        let duration = (window_end - window_start) as f64;

        let success_count = records.iter().filter(|r| r.is_success()).count() as u64;
        let error_count = records.iter().filter(|r| r.is_error()).count() as u64;
        let latency_sum: f64 = records.iter().map(|r| r.response_time_ms).sum();

        Ok(Self {
            total_requests: records.len() as u64,
            success_count,
            error_count,
            uptime_percent: (total - error_count as f64) / total * METRIC_SCALE,
            average_latency_ms: latency_sum / total,
            requests_per_second_scaled: total / duration * METRIC_SCALE,
            success_rate: success_count as f64 / total * METRIC_SCALE,
        })
    }

    /// Unscaled requests per second
    pub fn requests_per_second(&self) -> f64 {
        self.requests_per_second_scaled / METRIC_SCALE
    }
}

fn metric(
    subject: &str,
    description: &str,
    actual_display: String,
    value: f64,
    cap: f64,
) -> HealthMetric {
    HealthMetric {
        subject: subject.to_string(),
        description: description.to_string(),
        actual_display,
        value,
        cap,
    }
}

/// Latency score, clamped to 100; a zero average counts as perfect
fn latency_score(threshold_ms: f64, average_ms: f64) -> f64 {
    if average_ms <= 0.0 {
        return METRIC_SCALE;
    }
    (threshold_ms / average_ms * METRIC_SCALE).min(METRIC_SCALE)
}

/// Compute the six health metrics
///
/// **Public** - main entry point for health scoring
///
/// # Arguments
/// * `records` - Records inside the window (must be non-empty)
/// * `window_start` / `window_end` - Window bounds, epoch seconds
/// * `thresholds` - Validated thresholds
///
/// # Errors
/// * `AnalyticsError::DivisionByZero` - empty records or empty window
pub fn compute(
    records: &[LogRecord],
    window_start: i64,
    window_end: i64,
    thresholds: &Thresholds,
) -> Result<Vec<HealthMetric>, AnalyticsError> {
    let stats = TrafficStats::from_records(records, window_start, window_end)?;

    debug!(
        "Health stats: {} requests, {} errors, {:.2} ms avg, {:.4} req/s",
        stats.total_requests,
        stats.error_count,
        stats.average_latency_ms,
        stats.requests_per_second()
    );

    Ok(vec![
        metric(
            "RPS",
            "Requests per second against the configured target",
            format!("{:.2} req/s", stats.requests_per_second()),
            stats.requests_per_second_scaled / thresholds.rps * METRIC_SCALE,
            METRIC_SCALE,
        ),
        metric(
            "Uptime",
            "Share of requests answered without a 4xx or 5xx status",
            format!("{:.2}%", stats.uptime_percent),
            stats.uptime_percent / thresholds.uptime * METRIC_SCALE,
            METRIC_SCALE,
        ),
        metric(
            "Success",
            "Share of requests answered with status 200",
            format!("{:.2}%", stats.success_rate),
            stats.success_rate,
            METRIC_SCALE,
        ),
        // Inventory and Builders are fed by external signals
        metric(
            "Inventory",
            "Documentation completeness of the API inventory",
            "100%".to_string(),
            METRIC_SCALE,
            thresholds.inventory,
        ),
        metric(
            "Builders",
            "Builder coverage of the API surface",
            "100%".to_string(),
            METRIC_SCALE,
            thresholds.builders,
        ),
        metric(
            "Latency",
            "Average response time against the latency target",
            format!("{:.0} ms", stats.average_latency_ms),
            latency_score(thresholds.latency, stats.average_latency_ms),
            METRIC_SCALE,
        ),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn thresholds() -> Thresholds {
        Thresholds {
            rps: 50.0,
            uptime: 99.0,
            success: 95.0,
            latency: 100.0,
            builders: 80.0,
            inventory: 90.0,
        }
    }

    fn hit(status: u16, latency: f64) -> LogRecord {
        LogRecord::new(0, "ip", "h", "/", "GET", status, latency)
    }

    #[test]
    fn test_stats_formulas() {
        let records = vec![hit(200, 10.0), hit(201, 20.0), hit(404, 30.0), hit(500, 40.0)];

        let stats = TrafficStats::from_records(&records, 0, 8).unwrap();

        assert_eq!(stats.total_requests, 4);
        assert_eq!(stats.success_count, 1);
        assert_eq!(stats.error_count, 2);
        assert_eq!(stats.uptime_percent, 50.0);
        assert_eq!(stats.average_latency_ms, 25.0);
        assert_eq!(stats.requests_per_second_scaled, 50.0);
        assert_eq!(stats.success_rate, 25.0);
    }

    #[test]
    fn test_metric_order_and_caps() {
        let metrics = compute(&[hit(200, 50.0)], 0, 10, &thresholds()).unwrap();

        let subjects: Vec<&str> = metrics.iter().map(|m| m.subject.as_str()).collect();
        assert_eq!(subjects, vec!["RPS", "Uptime", "Success", "Inventory", "Builders", "Latency"]);

        assert_eq!(metrics[3].value, 100.0);
        assert_eq!(metrics[3].cap, 90.0);
        assert_eq!(metrics[4].cap, 80.0);
        assert_eq!(metrics[5].cap, 100.0);
    }

    #[test]
    fn test_display_strings() {
        let metrics = compute(&[hit(200, 49.6), hit(500, 50.4)], 0, 4, &thresholds()).unwrap();

        assert_eq!(metrics[0].actual_display, "0.50 req/s");
        assert_eq!(metrics[1].actual_display, "50.00%");
        assert_eq!(metrics[2].actual_display, "50.00%");
        assert_eq!(metrics[5].actual_display, "50 ms");
    }

    #[test]
    fn test_uptime_not_clamped() {
        let metrics = compute(&[hit(200, 1.0)], 0, 1, &thresholds()).unwrap();
        // 100% observed against a 99% target
        assert!(metrics[1].value > 100.0);
    }

    #[test]
    fn test_zero_latency_scores_full() {
        assert_eq!(latency_score(100.0, 0.0), 100.0);
        assert_eq!(latency_score(100.0, 400.0), 25.0);
    }

    #[test]
    fn test_inverted_window() {
        let err = compute(&[hit(200, 1.0)], 10, 10, &thresholds()).unwrap_err();
        assert_eq!(err, AnalyticsError::DivisionByZero("window has no duration"));
    }
}
