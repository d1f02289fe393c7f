//! Trace Event Stats CLI
//!
//! Summarizes enter/leave activity of a performance trace dump.

use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;

use trace_event_stats::commands::{
    display_schema, display_version, execute_summarize, validate_args, validate_trace_file,
    SummarizeArgs,
};
use trace_event_stats::utils::config::DEFAULT_EVENT_LOG_CAPACITY;

/// Trace Event Stats - enter/leave aggregation for performance traces
#[derive(Parser, Debug)]
#[command(name = "trace-stats")]
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
    /// Resolve and count every enter/leave event of a trace
    Summarize {
        /// Trace dump to read
        #[arg(short, long, env = "TRACE_STATS_TRACE")]
        trace: PathBuf,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,

        /// List every location and region name
        #[arg(long)]
        names: bool,

        /// Count events without keeping them in memory
        #[arg(long)]
        no_retain: bool,

        /// Print the first N resolved events
        #[arg(long, default_value = "0")]
        show_events: usize,

        /// Initial event log capacity
        #[arg(long, default_value_t = DEFAULT_EVENT_LOG_CAPACITY)]
        log_capacity: usize,
    },

    /// Validate a trace dump file
    Validate {
        /// Path to trace dump
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
        Commands::Summarize {
            trace,
            json,
            names,
            no_retain,
            show_events,
            log_capacity,
        } => {
            let args = SummarizeArgs {
                trace,
                json,
                list_names: names,
                retain_events: !no_retain,
                show_events,
                log_capacity,
            };

            // Validate args first
            validate_args(&args)?;

            execute_summarize(args)?;
        }

        Commands::Validate { file } => {
            validate_trace_file(file)?;
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
