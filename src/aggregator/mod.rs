//! Aggregation of request-log records into the three analytic views.
//!
//! This module transforms a filtered record set into:
//! - A five-bucket request/error timeline
//! - A client -> protocol -> host -> path -> method flow graph
//! - Six health metrics scored against thresholds
//!
//! Each view is a pure function of its inputs; none depends on another.

pub mod flow_graph;
pub mod health;
pub mod period;
pub mod time_buckets;
pub mod window;

// Re-export main types and functions
pub use flow_graph::build as build_flow_graph;
pub use health::{compute as compute_health, TrafficStats};
pub use period::{Period, PeriodRule};
pub use time_buckets::{aggregate as aggregate_timeline, bucket_starts};
pub use window::TimeWindow;
