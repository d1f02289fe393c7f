use crate::reader::open_trace;
use crate::utils::config::{DUMP_FORMAT_VERSION, SUMMARY_SCHEMA_VERSION};
use anyhow::{Context, Result};
use std::path::PathBuf;

/// Validate a trace dump file
pub fn validate_trace_file(file_path: PathBuf) -> Result<()> {
    println!("Validating trace dump: {}", file_path.display());

    let trace = open_trace(&file_path)
        .with_context(|| format!("Invalid trace dump {}", file_path.display()))?;
    let dump = trace.dump();

    println!("✓ Valid trace dump");
    println!("  Version: {}", dump.version);
    println!("  Strings: {}", dump.strings.len());
    println!("  Locations: {}", dump.locations.len());
    println!("  Regions: {}", dump.regions.len());
    println!("  Events: {}", dump.event_count());

    let orphans = dump.orphan_event_locations();
    if !orphans.is_empty() {
        println!("  Undefined locations with events: {:?}", orphans);
    }

    Ok(())
}

/// Display trace dump and summary schema information
pub fn display_schema(show_details: bool) {
    println!("Trace Event Stats Schemas");
    println!("Trace Dump Version: {}", DUMP_FORMAT_VERSION);
    println!("Summary Version: {}", SUMMARY_SCHEMA_VERSION);
    println!();

    if show_details {
        println!("Trace Dump Structure:");
        println!("  version: string          - Dump format version (e.g., '1.0')");
        println!("  clock: object?           - timer_resolution, global_offset, trace_length");
        println!("  strings: array           - {{ id, text? }}");
        println!("  locations: array         - {{ id, name (string id), type?, number_of_events?, group? }}");
        println!("  regions: array           - {{ id, name (string id), role?, paradigm?, flags?, ... }}");
        println!("  events: object           - location id -> [{{ kind, time, region?, member?, value?, attributes? }}]");
        println!("  event kinds              - enter, leave, metric, program_begin (others skipped)");
        println!();
        println!("Summary Structure:");
        println!("  total_events: number     - Events read (all kinds)");
        println!("  event_counts: object     - enter_count, leave_count");
        println!("  metrics: object          - events, unique, names");
        println!("  program_begins: array?   - {{ location, time }}");
        println!("  unique_locations: number - Location definitions");
        println!("  unique_regions: number   - Region definitions");
        println!("  unresolved: object       - Sentinel substitutions");
        println!("  timings: object          - Phase durations in seconds");
    } else {
        println!("Use --show for detailed schema information");
    }
}

/// Display version information
pub fn display_version() {
    println!("Trace Event Stats v{}", env!("CARGO_PKG_VERSION"));
    println!("Trace Dump Format: v{}", DUMP_FORMAT_VERSION);
    println!("Summary Schema: v{}", SUMMARY_SCHEMA_VERSION);
    println!();
    println!("Reference-keyed enter/leave aggregation for performance traces.");
}
