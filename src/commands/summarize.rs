//! Summarize command implementation.
//!
//! The summarize command:
//! 1. Opens the trace dump
//! 2. Runs one aggregation session (definitions, location selection, events)
//! 3. Prints the summary as text or JSON

use super::models::SummarizeArgs;
use crate::output::{build_summary, render_events, render_text, summary_to_json};
use crate::reader::open_trace;
use crate::session::TraceSession;
use crate::utils::config::MAX_SHOW_EVENTS;
use anyhow::{Context, Result};
use log::{debug, info};
use std::time::Instant;

/// Execute the summarize command
///
/// **Public** - main entry point called from main.rs
///
/// # Errors
/// * Trace file cannot be opened or is malformed
/// * The event log cannot grow (fatal, no partial summary is printed)
///
/// # Example
/// ```ignore
/// let args = SummarizeArgs {
///     trace: PathBuf::from("trace.json"),
///     list_names: true,
///     ..Default::default()
/// };
///
/// execute_summarize(args)?;
/// ```
pub fn execute_summarize(args: SummarizeArgs) -> Result<()> {
    let start_time = Instant::now();

    info!("Summarizing trace: {}", args.trace.display());

    let mut source = open_trace(&args.trace)
        .with_context(|| format!("Failed to open trace {}", args.trace.display()))?;
    info!(
        "Time taken to open trace: {:.2} seconds",
        start_time.elapsed().as_secs_f64()
    );

    let session = TraceSession::new(args.session_config());
    let report = session
        .run(&mut source)
        .context("Failed to aggregate trace")?;

    if let Some(log) = &report.outcome.log {
        debug!(
            "Event log holds {} records after {} reallocations",
            log.len(),
            log.reallocations()
        );
    }

    let trace_name = args.trace.display().to_string();
    let summary = build_summary(&report, &trace_name, args.list_names);

    if args.json {
        println!(
            "{}",
            summary_to_json(&summary).context("Failed to render summary")?
        );
    } else {
        println!("\n{}", render_text(&summary));
    }

    if args.show_events > 0 {
        if let Some(log) = &report.outcome.log {
            println!("\nResolved events:");
            println!("{}", render_events(log, args.show_events));
        }
    }

    info!(
        "Summary completed in {:.2}s",
        start_time.elapsed().as_secs_f64()
    );

    Ok(())
}

/// Validate summarize arguments
///
/// **Public** - can be called before execute_summarize for early validation
pub fn validate_args(args: &SummarizeArgs) -> Result<()> {
    if args.trace.as_os_str().is_empty() {
        anyhow::bail!("Trace path cannot be empty");
    }

    if !args.trace.exists() {
        anyhow::bail!("Trace file does not exist: {}", args.trace.display());
    }

    if !args.trace.is_file() {
        anyhow::bail!("Trace path is not a file: {}", args.trace.display());
    }

    if args.show_events > MAX_SHOW_EVENTS {
        anyhow::bail!("show_events is too large (max {})", MAX_SHOW_EVENTS);
    }

    if args.show_events > 0 && !args.retain_events {
        anyhow::bail!("show_events requires event retention");
    }

    Ok(())
}
