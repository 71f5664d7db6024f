//! Record parsing and schema definitions.
//!
//! This module handles:
//! - Parsing request-log exports (JSON array or JSON lines)
//! - Filtering records to a window and hostname
//! - Defining the output report schema

pub mod records;
pub mod schema;

// Re-export main types
pub use records::{filter_records, load_records, parse_records, RecordFormat};
pub use schema::{
    AnalyticsReport, FlowGraph, GraphEdge, GraphNode, HealthMetric, LogRecord, ReportWindow,
    SessionInfo, TimeBucket,
};
