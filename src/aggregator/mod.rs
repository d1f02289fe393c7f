//! Aggregation of the event stream into counters and a resolved event log.
//!
//! This module turns enter/leave callbacks into:
//! - enter/leave totals
//! - an append-only log of events with resolved names
//! - metric and program-begin tallies kept beside the log

pub mod event_aggregator;
pub mod event_log;

// Re-export main types
pub use event_aggregator::{
    AggregateCounters, AggregationOutcome, EventAggregator, MetricStats, ProgramBegin,
};
pub use event_log::{EventKind, EventLog, EventRecord};
