//! CLI command implementations.
//!
//! Each command is implemented in its own module.
//! Commands orchestrate the various library components to perform user tasks.

pub mod analyze;
pub mod utils;

// Re-export main command functions
pub use analyze::{build_report, execute_analyze, validate_args, AnalyzeArgs};
pub use utils::{display_schema, display_version, validate_report_file};
