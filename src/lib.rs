//! Request Insights
//!
//! Traffic timelines, flow graphs and health scores from HTTP
//! request logs.
//!
//! The three analytic views are pure functions over an already
//! filtered record set:
//!
//! - [`aggregator::time_buckets::aggregate`] - five period-aligned
//!   request/error buckets
//! - [`aggregator::flow_graph::build`] - client -> protocol -> host ->
//!   path -> method flow graph
//! - [`aggregator::health::compute`] - six metrics scored against
//!   configured thresholds
//!
//! The `request-insights` CLI wires them to record and settings files.

pub mod aggregator;
pub mod commands;
pub mod output;
pub mod parser;
pub mod utils;
