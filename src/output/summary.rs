//! Session summary: plain counters rendered as text or JSON.
//!
//! Nothing is written to disk; callers print the rendered string.

use crate::aggregator::{AggregateCounters, EventLog, ProgramBegin};
use crate::reader::ClockProperties;
use crate::session::SessionReport;
use crate::utils::config::SUMMARY_SCHEMA_VERSION;
use crate::utils::error::OutputError;
use serde::Serialize;

/// Top-level summary structure
#[derive(Debug, Clone, Serialize)]
pub struct TraceSummary {
    /// Schema version for compatibility checking
    pub version: String,

    /// Trace that was summarized
    pub trace: String,

    /// RFC 3339 timestamp when the summary was generated
    pub generated_at: String,

    pub number_of_locations: u64,
    pub definitions_read: u64,

    /// Events read, including kinds that were not aggregated
    pub total_events: u64,

    pub event_counts: AggregateCounters,

    pub metrics: MetricSummary,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub program_begins: Vec<ProgramBegin>,

    /// Size of the location index
    pub unique_locations: usize,

    /// Size of the region index
    pub unique_regions: usize,

    /// Distinct location names in the event log (retention only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locations_seen: Option<usize>,

    /// Distinct region names in the event log (retention only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub regions_seen: Option<usize>,

    pub unresolved: UnresolvedCounts,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_names: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub region_names: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub clock: Option<ClockProperties>,

    pub timings: TimingSummary,
}

/// Metric events and the distinct members they sampled
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MetricSummary {
    pub events: u64,
    pub unique: usize,

    /// Member names in sorted order
    pub names: Vec<String>,
}

/// Sentinel substitutions made during the session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct UnresolvedCounts {
    /// Definitions whose name string was missing
    pub names: u64,
    pub locations: u64,
    pub regions: u64,
}

/// Phase durations in seconds
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct TimingSummary {
    pub definitions_secs: f64,
    pub selection_secs: f64,
    pub events_secs: f64,
    pub total_secs: f64,
}

/// Build a summary from a finished session
///
/// **Public** - main entry point for reporting
///
/// # Arguments
/// * `report` - Session result
/// * `trace` - Display name of the trace (usually its path)
/// * `include_names` - Also list every location and region name
pub fn build_summary(report: &SessionReport, trace: &str, include_names: bool) -> TraceSummary {
    let outcome = &report.outcome;

    let names = |index_names: Vec<&String>| -> Vec<String> {
        index_names.into_iter().cloned().collect()
    };

    TraceSummary {
        version: SUMMARY_SCHEMA_VERSION.to_string(),
        trace: trace.to_string(),
        generated_at: chrono::Utc::now().to_rfc3339(),
        number_of_locations: report.number_of_locations,
        definitions_read: report.definitions_read,
        total_events: report.events_read,
        event_counts: outcome.counters,
        metrics: MetricSummary {
            events: outcome.metrics.event_count,
            unique: outcome.metrics.unique_members(),
            names: outcome.metrics.members.iter().cloned().collect(),
        },
        program_begins: outcome.program_begins.clone(),
        unique_locations: outcome.locations.len(),
        unique_regions: outcome.regions.len(),
        locations_seen: outcome.log.as_ref().map(|log| log.distinct_locations().len()),
        regions_seen: outcome.log.as_ref().map(|log| log.distinct_regions().len()),
        unresolved: UnresolvedCounts {
            names: report.unresolved_names,
            locations: outcome.unresolved_locations,
            regions: outcome.unresolved_regions,
        },
        location_names: include_names.then(|| names(outcome.locations.names())),
        region_names: include_names.then(|| names(outcome.regions.names())),
        clock: report.clock,
        timings: TimingSummary {
            definitions_secs: report.timings.definitions.as_secs_f64(),
            selection_secs: report.timings.selection.as_secs_f64(),
            events_secs: report.timings.events.as_secs_f64(),
            total_secs: report.timings.total.as_secs_f64(),
        },
    }
}

/// Render a summary as plain text
pub fn render_text(summary: &TraceSummary) -> String {
    let mut lines = Vec::new();

    if let Some(clock) = &summary.clock {
        lines.push("Trace Clock Properties:".to_string());
        lines.push(format!("  Timer Resolution    : {}", clock.timer_resolution));
        lines.push(format!("  Global Offset       : {}", clock.global_offset));
        lines.push(format!("  Trace Length        : {}", clock.trace_length));
        if let Some(realtime) = clock.realtime_timestamp {
            lines.push(format!("  Realtime Timestamp  : {}", realtime));
        }
        lines.push(String::new());
    }

    lines.push(format!("Number of locations: {}", summary.number_of_locations));
    lines.push(format!("Read {} global definitions", summary.definitions_read));
    lines.push(format!(
        "Time taken to read global definitions: {:.2} seconds",
        summary.timings.definitions_secs
    ));
    lines.push(format!(
        "Time taken to mark all locations for reading: {:.2} seconds",
        summary.timings.selection_secs
    ));
    lines.push(format!(
        "Time taken to read events: {:.2} seconds",
        summary.timings.events_secs
    ));
    lines.push(format!("Total time: {:.2} seconds", summary.timings.total_secs));

    for begin in &summary.program_begins {
        lines.push(format!(
            "Program Begin Event at location {} with time {}",
            begin.location, begin.time
        ));
        if let Some(clock) = &summary.clock {
            lines.push(format!("Time from clock properties: {}", clock.global_offset));
        }
    }

    lines.push(String::new());
    lines.push("Event Summary:".to_string());
    lines.push(format!("Total number of events: {}", summary.total_events));
    lines.push("Event types and their counts:".to_string());
    lines.push(format!("  Enter: {} events", summary.event_counts.enter_count));
    lines.push(format!("  Leave: {} events", summary.event_counts.leave_count));
    if summary.metrics.events > 0 {
        lines.push(format!("  Metric: {} events", summary.metrics.events));
    }
    let program_begins = summary.program_begins.len() as u64;
    if program_begins > 0 {
        lines.push(format!("  ProgramBegin: {} events", program_begins));
    }
    let other = summary
        .total_events
        .saturating_sub(summary.event_counts.total())
        .saturating_sub(summary.metrics.events)
        .saturating_sub(program_begins);
    if other > 0 {
        lines.push(format!("  Other: {} events", other));
    }

    lines.push(format!("Total unique locations: {}", summary.unique_locations));
    if let Some(names) = &summary.location_names {
        lines.push("Unique locations:".to_string());
        lines.extend(names.iter().map(|name| format!("  {}", name)));
    }

    lines.push(format!("Total unique regions: {}", summary.unique_regions));
    if let Some(names) = &summary.region_names {
        lines.push("Unique regions:".to_string());
        lines.extend(names.iter().map(|name| format!("  {}", name)));
    }

    lines.push(format!("Total metric events: {}", summary.metrics.events));
    lines.push(format!("Total unique metrics: {}", summary.metrics.unique));
    if !summary.metrics.names.is_empty() {
        lines.push("Unique metrics:".to_string());
        lines.extend(summary.metrics.names.iter().map(|name| format!("  {}", name)));
    }

    if let (Some(locations), Some(regions)) = (summary.locations_seen, summary.regions_seen) {
        lines.push(format!(
            "Names seen in events: {} locations, {} regions",
            locations, regions
        ));
    }

    let unresolved = summary.unresolved;
    if unresolved != UnresolvedCounts::default() {
        lines.push(format!(
            "Unresolved references: {} names, {} locations, {} regions",
            unresolved.names, unresolved.locations, unresolved.regions
        ));
    }

    lines.join("\n")
}

/// Render a summary as pretty JSON
///
/// # Errors
/// * `OutputError::SerializationFailed` - JSON serialization error
pub fn summary_to_json(summary: &TraceSummary) -> Result<String, OutputError> {
    serde_json::to_string_pretty(summary).map_err(OutputError::SerializationFailed)
}

/// Render the first `limit` records of an event log, one per line
pub fn render_events(log: &EventLog, limit: usize) -> String {
    let mut lines: Vec<String> = log
        .iter()
        .take(limit)
        .enumerate()
        .map(|(i, record)| {
            format!(
                "  {:>6}  {:<5}  {:<24}  {}",
                i, record.kind, record.location, record.region
            )
        })
        .collect();

    if log.len() > limit {
        lines.push(format!("  (Showing first {} of {} events)", limit, log.len()));
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::{EventKind, EventRecord};

    fn create_test_summary() -> TraceSummary {
        TraceSummary {
            version: SUMMARY_SCHEMA_VERSION.to_string(),
            trace: "trace.json".to_string(),
            generated_at: "2024-01-01T00:00:00Z".to_string(),
            number_of_locations: 2,
            definitions_read: 7,
            total_events: 4,
            event_counts: AggregateCounters {
                enter_count: 2,
                leave_count: 1,
            },
            metrics: MetricSummary::default(),
            program_begins: Vec::new(),
            unique_locations: 2,
            unique_regions: 3,
            locations_seen: None,
            regions_seen: None,
            unresolved: UnresolvedCounts::default(),
            location_names: Some(vec!["thread 0".to_string(), "thread 1".to_string()]),
            region_names: None,
            clock: None,
            timings: TimingSummary::default(),
        }
    }

    #[test]
    fn test_render_text_counts() {
        let text = render_text(&create_test_summary());

        assert!(text.contains("Total number of events: 4"));
        assert!(text.contains("  Enter: 2 events"));
        assert!(text.contains("  Leave: 1 events"));
        assert!(text.contains("Unique locations:\n  thread 0\n  thread 1"));
        assert!(!text.contains("Unique regions:"));
        assert!(!text.contains("Unresolved references"));
        assert!(text.contains("  Other: 1 events"));
        assert!(text.contains("Total metric events: 0"));
        assert!(!text.contains("Unique metrics:"));
    }

    #[test]
    fn test_render_text_metrics_and_program_begin() {
        let mut summary = create_test_summary();
        summary.total_events = 7;
        summary.metrics = MetricSummary {
            events: 3,
            unique: 2,
            names: vec!["PAPI_TOT_INS".to_string(), "power".to_string()],
        };
        summary.program_begins = vec![ProgramBegin {
            location: "thread 0".to_string(),
            time: 12,
        }];
        summary.timings.selection_secs = 0.25;

        let text = render_text(&summary);
        assert!(text.contains("  Metric: 3 events"));
        assert!(text.contains("  ProgramBegin: 1 events"));
        assert!(!text.contains("  Other:"));
        assert!(text.contains("Total metric events: 3"));
        assert!(text.contains("Total unique metrics: 2"));
        assert!(text.contains("Unique metrics:\n  PAPI_TOT_INS\n  power"));
        assert!(text.contains("Program Begin Event at location thread 0 with time 12"));
        assert!(!text.contains("Time from clock properties"));
        assert!(text.contains("Time taken to mark all locations for reading: 0.25 seconds"));

        let json: serde_json::Value =
            serde_json::from_str(&summary_to_json(&summary).unwrap()).unwrap();
        assert_eq!(json["metrics"]["events"], 3);
        assert_eq!(json["metrics"]["names"][1], "power");
        assert_eq!(json["program_begins"][0]["time"], 12);
        assert_eq!(json["timings"]["selection_secs"], 0.25);
    }

    #[test]
    fn test_summary_to_json_skips_empty_fields() {
        let json = summary_to_json(&create_test_summary()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["event_counts"]["enter_count"], 2);
        assert!(value.get("region_names").is_none());
        assert!(value.get("clock").is_none());
        assert!(value.get("program_begins").is_none());
        assert_eq!(value["metrics"]["events"], 0);
    }

    #[test]
    fn test_render_events_limit() {
        let mut log = EventLog::with_capacity(2).unwrap();
        log.append(EventRecord::new("t0", EventKind::Enter, "main")).unwrap();
        log.append(EventRecord::new("t0", EventKind::Leave, "main")).unwrap();

        let text = render_events(&log, 1);
        assert!(text.contains("Enter"));
        assert!(!text.contains("Leave"));
        assert!(text.contains("(Showing first 1 of 2 events)"));
    }
}
