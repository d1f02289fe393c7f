//! Streaming enter/leave aggregation.
//!
//! Every event costs two index lookups, one counter bump and, when retention
//! is on, one log append. A lookup miss substitutes a sentinel name; the
//! event is still counted and recorded.
//!
//! Metric and program-begin events are tallied separately and never enter
//! the event log.

use super::event_log::{EventKind, EventLog, EventRecord};
use crate::index::ReferenceIndex;
use crate::reader::{Attribute, CallbackResult, EventCallbacks, LocationRef, RegionRef, Timestamp};
use crate::resolver::ResolvedDefinitions;
use crate::utils::config::{SessionConfig, UNKNOWN_LOCATION, UNKNOWN_METRIC, UNKNOWN_REGION};
use crate::utils::error::AggregateError;
use log::{debug, info};
use serde::Serialize;
use std::collections::BTreeSet;

/// Running enter/leave totals
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AggregateCounters {
    pub enter_count: u64,
    pub leave_count: u64,
}

impl AggregateCounters {
    pub fn total(&self) -> u64 {
        self.enter_count + self.leave_count
    }

    fn bump(&mut self, kind: EventKind) {
        match kind {
            EventKind::Enter => self.enter_count += 1,
            EventKind::Leave => self.leave_count += 1,
        }
    }
}

/// Metric events and the distinct members they sampled
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MetricStats {
    pub event_count: u64,
    pub members: BTreeSet<String>,
}

impl MetricStats {
    pub fn unique_members(&self) -> usize {
        self.members.len()
    }

    fn record(&mut self, member: Option<&str>) {
        self.event_count += 1;
        let member = member.unwrap_or(UNKNOWN_METRIC);
        if !self.members.contains(member) {
            self.members.insert(member.to_string());
        }
    }
}

/// A program-begin event with its location resolved
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgramBegin {
    pub location: String,
    pub time: Timestamp,
}

/// Everything the event phase produced
#[derive(Debug)]
pub struct AggregationOutcome {
    pub locations: ReferenceIndex<LocationRef>,
    pub regions: ReferenceIndex<RegionRef>,
    pub counters: AggregateCounters,

    /// `None` when retention was disabled
    pub log: Option<EventLog>,

    pub metrics: MetricStats,
    pub program_begins: Vec<ProgramBegin>,

    pub unresolved_locations: u64,
    pub unresolved_regions: u64,
}

/// Event stream handler
#[derive(Debug)]
pub struct EventAggregator {
    locations: ReferenceIndex<LocationRef>,
    regions: ReferenceIndex<RegionRef>,
    counters: AggregateCounters,
    log: Option<EventLog>,
    metrics: MetricStats,
    program_begins: Vec<ProgramBegin>,
    unresolved_locations: u64,
    unresolved_regions: u64,
}

impl EventAggregator {
    /// Take over the location and region indices from the definition phase
    ///
    /// # Errors
    /// * `AggregateError::AllocationFailed` - initial log buffer unavailable
    pub fn new(
        definitions: ResolvedDefinitions,
        config: &SessionConfig,
    ) -> Result<Self, AggregateError> {
        let log = if config.retain_events {
            Some(EventLog::with_capacity(config.event_log_capacity)?)
        } else {
            None
        };

        Ok(Self::from_indices(definitions.locations, definitions.regions, log))
    }

    /// Build directly from indices; `log: None` disables retention
    pub fn from_indices(
        locations: ReferenceIndex<LocationRef>,
        regions: ReferenceIndex<RegionRef>,
        log: Option<EventLog>,
    ) -> Self {
        Self {
            locations,
            regions,
            counters: AggregateCounters::default(),
            log,
            metrics: MetricStats::default(),
            program_begins: Vec::new(),
            unresolved_locations: 0,
            unresolved_regions: 0,
        }
    }

    pub fn counters(&self) -> AggregateCounters {
        self.counters
    }

    pub fn log(&self) -> Option<&EventLog> {
        self.log.as_ref()
    }

    pub fn metrics(&self) -> &MetricStats {
        &self.metrics
    }

    pub fn finish(self) -> AggregationOutcome {
        debug!(
            "Aggregated {} events ({} unresolved locations, {} unresolved regions)",
            self.counters.total(),
            self.unresolved_locations,
            self.unresolved_regions
        );

        AggregationOutcome {
            locations: self.locations,
            regions: self.regions,
            counters: self.counters,
            log: self.log,
            metrics: self.metrics,
            program_begins: self.program_begins,
            unresolved_locations: self.unresolved_locations,
            unresolved_regions: self.unresolved_regions,
        }
    }

    fn record(
        &mut self,
        kind: EventKind,
        location: LocationRef,
        region: RegionRef,
    ) -> Result<(), AggregateError> {
        let location_name = match self.locations.lookup(location) {
            Some(name) => name.as_str(),
            None => {
                self.unresolved_locations += 1;
                UNKNOWN_LOCATION
            }
        };

        let region_name = match self.regions.lookup(region) {
            Some(name) => name.as_str(),
            None => {
                self.unresolved_regions += 1;
                UNKNOWN_REGION
            }
        };

        self.counters.bump(kind);

        if let Some(log) = self.log.as_mut() {
            log.append(EventRecord::new(location_name, kind, region_name))?;
        }

        Ok(())
    }
}

impl EventCallbacks for EventAggregator {
    fn on_enter(
        &mut self,
        location: LocationRef,
        _time: Timestamp,
        _attributes: &[Attribute],
        region: RegionRef,
    ) -> CallbackResult {
        self.record(EventKind::Enter, location, region)
    }

    fn on_leave(
        &mut self,
        location: LocationRef,
        _time: Timestamp,
        _attributes: &[Attribute],
        region: RegionRef,
    ) -> CallbackResult {
        self.record(EventKind::Leave, location, region)
    }

    fn on_metric(
        &mut self,
        _location: LocationRef,
        _time: Timestamp,
        member: Option<&str>,
        _value: Option<f64>,
    ) -> CallbackResult {
        self.metrics.record(member);
        Ok(())
    }

    fn on_program_begin(&mut self, location: LocationRef, time: Timestamp) -> CallbackResult {
        let location = match self.locations.lookup(location) {
            Some(name) => name.clone(),
            None => {
                self.unresolved_locations += 1;
                UNKNOWN_LOCATION.to_string()
            }
        };

        info!("Program begin at location {} with time {}", location, time);
        self.program_begins.push(ProgramBegin { location, time });
        Ok(())
    }
}
