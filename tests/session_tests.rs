use pretty_assertions::assert_eq;
use std::io::Write;
use tempfile::NamedTempFile;
use trace_event_stats::aggregator::{EventKind, EventRecord};
use trace_event_stats::output::{build_summary, render_text, summary_to_json};
use trace_event_stats::reader::{open_trace, parse_trace};
use trace_event_stats::session::TraceSession;
use trace_event_stats::utils::config::{SessionConfig, UNKNOWN_REGION};

const TWO_THREAD_DUMP: &str = r#"{
    "version": "1.0",
    "clock": {"timer_resolution": 1000000000, "global_offset": 100, "trace_length": 50},
    "strings": [
        {"id": 0, "text": "main"},
        {"id": 1, "text": "compute"},
        {"id": 2, "text": "Master thread"},
        {"id": 3, "text": "Worker thread"}
    ],
    "locations": [
        {"id": 0, "name": 2, "type": "cpu_thread", "number_of_events": 4},
        {"id": 1, "name": 3, "type": "cpu_thread", "number_of_events": 3}
    ],
    "regions": [
        {"id": 10, "name": 0, "role": "function", "paradigm": "user"},
        {"id": 11, "name": 1, "role": "function", "paradigm": "user"}
    ],
    "events": {
        "0": [
            {"kind": "enter", "time": 100, "region": 10},
            {"kind": "enter", "time": 110, "region": 11},
            {"kind": "leave", "time": 120, "region": 11},
            {"kind": "leave", "time": 150, "region": 10}
        ],
        "1": [
            {"kind": "enter", "time": 105, "region": 11, "attributes": [{"id": 1, "value": 7}]},
            {"kind": "metric", "time": 115},
            {"kind": "leave", "time": 130, "region": 12}
        ]
    }
}"#;

fn write_dump(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn test_end_to_end_from_file() {
    let file = write_dump(TWO_THREAD_DUMP);
    let mut trace = open_trace(file.path()).unwrap();

    let report = TraceSession::default().run(&mut trace).unwrap();

    assert_eq!(report.number_of_locations, 2);
    assert_eq!(report.definitions_read, 9);
    assert_eq!(report.events_read, 7);
    assert_eq!(report.outcome.counters.enter_count, 3);
    assert_eq!(report.outcome.counters.leave_count, 3);
    assert_eq!(report.outcome.unresolved_regions, 1);

    let log = report.outcome.log.as_ref().unwrap();
    let kinds: Vec<(EventKind, &str, &str)> = log
        .iter()
        .map(|r| (r.kind, r.location.as_str(), r.region.as_str()))
        .collect();

    assert_eq!(
        kinds,
        vec![
            (EventKind::Enter, "Master thread", "main"),
            (EventKind::Enter, "Worker thread", "compute"),
            (EventKind::Enter, "Master thread", "compute"),
            (EventKind::Leave, "Master thread", "compute"),
            (EventKind::Leave, "Worker thread", UNKNOWN_REGION),
            (EventKind::Leave, "Master thread", "main"),
        ]
    );
}

#[test]
fn test_summary_from_session() {
    let mut trace = parse_trace(TWO_THREAD_DUMP).unwrap();
    let report = TraceSession::default().run(&mut trace).unwrap();

    let summary = build_summary(&report, "two-threads", true);
    assert_eq!(summary.total_events, 7);
    assert_eq!(summary.unique_locations, 2);
    assert_eq!(summary.unique_regions, 2);
    assert_eq!(summary.locations_seen, Some(2));
    assert_eq!(summary.regions_seen, Some(3));
    assert_eq!(summary.clock.map(|c| c.global_offset), Some(100));

    let mut location_names = summary.location_names.clone().unwrap();
    location_names.sort();
    assert_eq!(location_names, vec!["Master thread", "Worker thread"]);

    let text = render_text(&summary);
    assert!(text.contains("Total number of events: 7"));
    assert!(text.contains("  Enter: 3 events"));
    assert!(text.contains("  Leave: 3 events"));
    assert!(text.contains("Global Offset       : 100"));

    let json: serde_json::Value = serde_json::from_str(&summary_to_json(&summary).unwrap()).unwrap();
    assert_eq!(json["event_counts"]["leave_count"], 3);
    assert_eq!(json["unresolved"]["regions"], 1);
}

#[test]
fn test_missing_name_strings_degrade_to_sentinels() {
    let dump = r#"{
        "strings": [{"id": 0, "text": null}],
        "locations": [{"id": 3, "name": 0}],
        "regions": [{"id": 1, "name": 42}],
        "events": {"3": [{"kind": "enter", "time": 1, "region": 1}]}
    }"#;

    let mut trace = parse_trace(dump).unwrap();
    let report = TraceSession::default().run(&mut trace).unwrap();

    assert_eq!(report.unresolved_names, 1);
    assert_eq!(
        report.outcome.log.unwrap().into_records(),
        vec![EventRecord::new("UnknownString", EventKind::Enter, "UnknownRegion")]
    );
}

#[test]
fn test_small_log_capacity_grows() {
    let mut trace = parse_trace(TWO_THREAD_DUMP).unwrap();
    let session = TraceSession::new(SessionConfig {
        event_log_capacity: 1,
        ..Default::default()
    });

    let report = session.run(&mut trace).unwrap();
    let log = report.outcome.log.unwrap();
    assert_eq!(log.len(), 6);
    assert_eq!(log.reallocations(), 2);
}

#[test]
fn test_invalid_dump_rejected() {
    let dump = r#"{"events": {"0": [{"kind": "leave", "time": 1}]}}"#;
    assert!(parse_trace(dump).is_err());
}

#[test]
fn test_metric_events_reported_in_summary() {
    let dump = r#"{
        "clock": {"timer_resolution": 1000, "global_offset": 40, "trace_length": 10},
        "strings": [{"id": 0, "text": "main"}, {"id": 1, "text": "rank 0"}],
        "locations": [{"id": 0, "name": 1}],
        "regions": [{"id": 2, "name": 0}],
        "events": {"0": [
            {"kind": "program_begin", "time": 40},
            {"kind": "enter", "time": 41, "region": 2},
            {"kind": "metric", "time": 42, "member": "power", "value": 210.0},
            {"kind": "metric", "time": 43, "member": "energy", "value": 3.5},
            {"kind": "leave", "time": 44, "region": 2}
        ]}
    }"#;

    let mut trace = parse_trace(dump).unwrap();
    let report = TraceSession::default().run(&mut trace).unwrap();
    let summary = build_summary(&report, "metrics", false);

    assert_eq!(summary.total_events, 5);
    assert_eq!(summary.metrics.events, 2);
    assert_eq!(summary.metrics.names, vec!["energy", "power"]);

    let text = render_text(&summary);
    assert!(text.contains("  Metric: 2 events"));
    assert!(text.contains("  ProgramBegin: 1 events"));
    assert!(!text.contains("  Other:"));
    assert!(text.contains("Total metric events: 2"));
    assert!(text.contains("Total unique metrics: 2"));
    assert!(text.contains("Unique metrics:\n  energy\n  power"));
    assert!(text.contains("Program Begin Event at location rank 0 with time 40"));
    assert!(text.contains("Time from clock properties: 40"));

    let json: serde_json::Value = serde_json::from_str(&summary_to_json(&summary).unwrap()).unwrap();
    assert_eq!(json["metrics"]["events"], 2);
    assert_eq!(json["metrics"]["unique"], 2);
    assert_eq!(json["program_begins"][0]["location"], "rank 0");
}
