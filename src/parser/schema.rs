//! Input record and output report schema definitions.
//!
//! Records are read from the log store export; the report is the JSON
//! document we write to disk for the charting layer. The report schema is
//! versioned to allow future evolution.

use crate::utils::config::{ERROR_STATUS_THRESHOLD, SUCCESS_STATUS};
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// A single HTTP request-log record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogRecord {
    /// Request time, epoch seconds
    pub timestamp: i64,

    pub hostname: String,

    pub path: String,

    pub method: String,

    /// HTTP status code returned to the client
    pub response_status: u16,

    /// Upstream response time in milliseconds
    pub response_time_ms: f64,

    /// Session info carrying the client address
    #[serde(default)]
    pub session: SessionInfo,
}

/// Session information attached to a record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionInfo {
    #[serde(rename = "clientIP", alias = "clientIp", default)]
    pub client_ip: String,
}

impl LogRecord {
    /// Create a record
    ///
    /// **Public** - constructor used by tests and embedding callers
    pub fn new(
        timestamp: i64,
        client_ip: impl Into<String>,
        hostname: impl Into<String>,
        path: impl Into<String>,
        method: impl Into<String>,
        response_status: u16,
        response_time_ms: f64,
    ) -> Self {
        Self {
            timestamp,
            hostname: hostname.into(),
            path: path.into(),
            method: method.into(),
            response_status,
            response_time_ms,
            session: SessionInfo {
                client_ip: client_ip.into(),
            },
        }
    }

    pub fn client_ip(&self) -> &str {
        &self.session.client_ip
    }

    /// Any 4xx or 5xx response
    pub fn is_error(&self) -> bool {
        self.response_status >= ERROR_STATUS_THRESHOLD
    }

    /// Exactly 200; other 2xx codes do not count
    pub fn is_success(&self) -> bool {
        self.response_status == SUCCESS_STATUS
    }
}

/// Top-level report structure written to JSON
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsReport {
    /// Schema version for compatibility checking
    pub version: String,

    /// Window the records were selected from
    pub window: ReportWindow,

    /// Five period-aligned request/error buckets, oldest first
    pub timeline: Vec<TimeBucket>,

    /// Client -> protocol -> host -> path -> method flow graph
    pub flow: FlowGraph,

    /// Six normalized health metrics
    pub health: Vec<HealthMetric>,

    /// Timestamp when the report was generated
    pub generated_at: String,
}

/// Window metadata recorded in the report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportWindow {
    /// Period name as requested (may be "custom")
    pub period: String,

    pub start: i64,

    pub end: i64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,

    /// Records that survived filtering
    pub record_count: usize,
}

/// Request and error counts for one time bucket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeBucket {
    pub label: String,
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
    pub request_count: u64,
    pub error_count: u64,
}

/// Node of the flow graph, unique by label
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphNode {
    pub label: String,
    pub index: usize,
}

/// Weighted directed edge between two node indices
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphEdge {
    pub source_index: usize,
    pub target_index: usize,
    pub weight: u64,
}

/// Nodes and edges in first-seen order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

/// One axis of the health radar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthMetric {
    pub subject: String,
    pub description: String,
    pub actual_display: String,

    /// Normalized score; only Latency is clamped to 100
    pub value: f64,

    /// Maximum of the display scale
    pub cap: f64,
}
