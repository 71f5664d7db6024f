//! Request Insights CLI
//!
//! Builds a timeline, flow graph and health score from an HTTP
//! request-log export and writes them as one JSON report.

use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;

use request_insights::commands::{
    display_schema, display_version, execute_analyze, validate_args, validate_report_file,
    AnalyzeArgs,
};

/// Request Insights - analytics for HTTP request logs
#[derive(Parser, Debug)]
#[command(name = "request-insights")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Analyze a record export and write a report
    Analyze {
        /// Record export (JSON array, or JSON lines for .jsonl/.ndjson)
        #[arg(short, long)]
        records: PathBuf,

        /// Settings file with thresholds (TOML, or JSON for .json)
        #[arg(
            short,
            long,
            env = "REQUEST_INSIGHTS_SETTINGS",
            default_value = "settings.toml"
        )]
        settings: PathBuf,

        /// hourly, daily, weekly, monthly or custom
        #[arg(short, long, default_value = "daily")]
        period: String,

        /// Window start, epoch seconds (required for custom)
        #[arg(long)]
        start: Option<i64>,

        /// Window end, epoch seconds (required for custom)
        #[arg(long)]
        end: Option<i64>,

        /// Treat this epoch second as the current time
        #[arg(long)]
        now: Option<i64>,

        /// Only include records for this hostname
        #[arg(long)]
        hostname: Option<String>,

        /// Output path for JSON report
        #[arg(short, long, default_value = "report.json")]
        output: PathBuf,

        /// Print the JSON report to stdout instead of writing --output
        #[arg(long)]
        stdout: bool,

        /// Print text summary to stdout
        #[arg(long)]
        summary: bool,

        /// Number of heaviest flow edges in the summary
        #[arg(long, default_value = "10")]
        top_flows: usize,
    },

    /// Validate a report JSON file
    Validate {
        /// Path to report JSON file
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Display schema information
    Schema {
        /// Show full schema details
        #[arg(long)]
        show: bool,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    // Execute command
    match cli.command {
        Commands::Analyze {
            records,
            settings,
            period,
            start,
            end,
            now,
            hostname,
            output,
            stdout,
            summary,
            top_flows,
        } => {
            let args = AnalyzeArgs {
                records_path: records,
                settings_path: settings,
                period,
                start,
                end,
                now,
                hostname,
                output_json: output,
                stdout,
                print_summary: summary,
                top_flows,
            };

            // Validate args first
            validate_args(&args)?;

            execute_analyze(args)?;
        }

        Commands::Validate { file } => {
            validate_report_file(file)?;
        }

        Commands::Schema { show } => {
            display_schema(show);
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}
