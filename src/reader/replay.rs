//! In-memory trace source that replays a `TraceDump` through the callbacks.
//!
//! Definitions are delivered as clock properties, strings, locations, then
//! regions. Events of the selected locations are merged into one sequence
//! ordered by timestamp; ties keep location order, then local order.
//! Enter, leave, metric and program-begin events reach their callbacks;
//! other kinds are counted and skipped.

use super::dump::{RawEvent, RawEventKind, TraceDump};
use super::schema::{
    Attribute, ClockProperties, DefinitionCallbacks, EventCallbacks, LocationDefinition,
    LocationRef, RegionDefinition, RegionRef, StringDefinition, StringRef, Timestamp,
};
use super::TraceSource;
use crate::utils::error::ReaderError;
use log::{debug, warn};
use std::collections::BTreeSet;

/// Trace source backed by a dump held in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryTrace {
    dump: TraceDump,
    selected: BTreeSet<LocationRef>,
}

impl MemoryTrace {
    /// Empty trace, to be filled with the builder methods
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap a dump after validating it
    ///
    /// # Errors
    /// * `ReaderError::InvalidFormat` - see [`TraceDump::validate`]
    pub fn from_dump(dump: TraceDump) -> Result<Self, ReaderError> {
        dump.validate()?;

        for location in dump.orphan_event_locations() {
            warn!(
                "Events recorded for undefined location {} will never be selected",
                location
            );
        }

        Ok(Self {
            dump,
            selected: BTreeSet::new(),
        })
    }

    pub fn dump(&self) -> &TraceDump {
        &self.dump
    }

    /// Locations chosen for event reading, in id order
    pub fn selected_locations(&self) -> Vec<LocationRef> {
        self.selected.iter().copied().collect()
    }

    pub fn clock(mut self, clock: ClockProperties) -> Self {
        self.dump.clock = Some(clock);
        self
    }

    pub fn string(mut self, id: StringRef, text: &str) -> Self {
        self.dump.strings.push(StringDefinition {
            id,
            text: Some(text.to_string()),
        });
        self
    }

    /// String definition whose text was not recorded
    pub fn null_string(mut self, id: StringRef) -> Self {
        self.dump.strings.push(StringDefinition { id, text: None });
        self
    }

    pub fn location(mut self, id: LocationRef, name: StringRef) -> Self {
        self.dump.locations.push(LocationDefinition::new(id, name));
        self
    }

    pub fn region(mut self, id: RegionRef, name: StringRef) -> Self {
        self.dump.regions.push(RegionDefinition::new(id, name));
        self
    }

    pub fn enter(self, location: LocationRef, time: Timestamp, region: RegionRef) -> Self {
        self.event(location, RawEventKind::Enter, time, Some(region))
    }

    pub fn leave(self, location: LocationRef, time: Timestamp, region: RegionRef) -> Self {
        self.event(location, RawEventKind::Leave, time, Some(region))
    }

    pub fn metric(self, location: LocationRef, time: Timestamp, member: &str, value: f64) -> Self {
        self.push(
            location,
            RawEvent {
                member: Some(member.to_string()),
                value: Some(value),
                ..RawEvent::new(RawEventKind::Metric, time)
            },
        )
    }

    pub fn program_begin(self, location: LocationRef, time: Timestamp) -> Self {
        self.event(location, RawEventKind::ProgramBegin, time, None)
    }

    /// Event of a kind no callback is registered for
    pub fn other(self, location: LocationRef, time: Timestamp) -> Self {
        self.event(location, RawEventKind::Other, time, None)
    }

    fn event(
        self,
        location: LocationRef,
        kind: RawEventKind,
        time: Timestamp,
        region: Option<RegionRef>,
    ) -> Self {
        self.push(
            location,
            RawEvent {
                region,
                ..RawEvent::new(kind, time)
            },
        )
    }

    fn push(mut self, location: LocationRef, event: RawEvent) -> Self {
        self.dump.events.entry(location).or_default().push(event);
        self
    }

    /// Events of the selected locations in global time order
    fn merged_events(&self) -> Vec<(LocationRef, &RawEvent)> {
        let mut merged: Vec<(LocationRef, &RawEvent)> = self
            .dump
            .events
            .iter()
            .filter(|(location, _)| self.selected.contains(*location))
            .flat_map(|(location, events)| events.iter().map(move |event| (*location, event)))
            .collect();

        // Stable, so equal timestamps keep location then local order
        merged.sort_by_key(|(_, event)| event.time);
        merged
    }
}

impl TraceSource for MemoryTrace {
    fn number_of_locations(&self) -> u64 {
        self.dump.locations.len() as u64
    }

    fn read_definitions(
        &mut self,
        callbacks: &mut dyn DefinitionCallbacks,
    ) -> Result<u64, ReaderError> {
        let mut read = 0u64;

        if let Some(clock) = &self.dump.clock {
            callbacks.on_clock_properties(clock)?;
            read += 1;
        }

        for string in &self.dump.strings {
            callbacks.on_string(string.id, string.text.as_deref())?;
            read += 1;
        }

        for location in &self.dump.locations {
            callbacks.on_location(location)?;
            read += 1;
        }

        for region in &self.dump.regions {
            callbacks.on_region(region)?;
            read += 1;
        }

        debug!("Replayed {} global definitions", read);
        Ok(read)
    }

    fn select_location(&mut self, location: LocationRef) {
        self.selected.insert(location);
    }

    fn read_events(&mut self, callbacks: &mut dyn EventCallbacks) -> Result<u64, ReaderError> {
        let mut read = 0u64;
        let mut skipped = 0u64;

        for (location, event) in self.merged_events() {
            read += 1;
            let attributes: &[Attribute] = &event.attributes;

            match (event.kind, event.region) {
                (RawEventKind::Enter, Some(region)) => {
                    callbacks.on_enter(location, event.time, attributes, region)?
                }
                (RawEventKind::Leave, Some(region)) => {
                    callbacks.on_leave(location, event.time, attributes, region)?
                }
                (RawEventKind::Metric, _) => callbacks.on_metric(
                    location,
                    event.time,
                    event.member.as_deref(),
                    event.value,
                )?,
                (RawEventKind::ProgramBegin, _) => {
                    callbacks.on_program_begin(location, event.time)?
                }
                (RawEventKind::Other, _) => skipped += 1,
                (kind, None) => {
                    return Err(ReaderError::InvalidFormat(format!(
                        "{:?} event at time {} on location {} has no region",
                        kind, event.time, location
                    )))
                }
            }
        }

        if skipped > 0 {
            debug!("Skipped {} events without a registered callback", skipped);
        }

        Ok(read)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::schema::CallbackResult;
    use crate::utils::error::AggregateError;

    #[derive(Default)]
    struct Recorder {
        seen: Vec<(char, LocationRef, Timestamp, RegionRef)>,
        metrics: Vec<(LocationRef, Option<String>, Option<f64>)>,
        fail_on_leave: bool,
    }

    impl EventCallbacks for Recorder {
        fn on_enter(
            &mut self,
            location: LocationRef,
            time: Timestamp,
            _attributes: &[Attribute],
            region: RegionRef,
        ) -> CallbackResult {
            self.seen.push(('E', location, time, region));
            Ok(())
        }

        fn on_leave(
            &mut self,
            location: LocationRef,
            time: Timestamp,
            _attributes: &[Attribute],
            region: RegionRef,
        ) -> CallbackResult {
            if self.fail_on_leave {
                return Err(AggregateError::AllocationFailed {
                    what: "event log",
                    requested: 3,
                });
            }
            self.seen.push(('L', location, time, region));
            Ok(())
        }

        fn on_metric(
            &mut self,
            location: LocationRef,
            _time: Timestamp,
            member: Option<&str>,
            value: Option<f64>,
        ) -> CallbackResult {
            self.metrics.push((location, member.map(str::to_string), value));
            Ok(())
        }
    }

    #[test]
    fn test_events_merged_by_timestamp() {
        let mut trace = MemoryTrace::new()
            .enter(1, 10, 5)
            .leave(1, 30, 5)
            .enter(2, 20, 6)
            .leave(2, 30, 6);
        trace.select_location(1);
        trace.select_location(2);

        let mut recorder = Recorder::default();
        let read = trace.read_events(&mut recorder).unwrap();

        assert_eq!(read, 4);
        assert_eq!(
            recorder.seen,
            vec![
                ('E', 1, 10, 5),
                ('E', 2, 20, 6),
                ('L', 1, 30, 5),
                ('L', 2, 30, 6),
            ]
        );
    }

    #[test]
    fn test_unselected_locations_are_not_read() {
        let mut trace = MemoryTrace::new().enter(1, 1, 5).enter(2, 2, 5);
        trace.select_location(2);

        let mut recorder = Recorder::default();
        assert_eq!(trace.read_events(&mut recorder).unwrap(), 1);
        assert_eq!(recorder.seen, vec![('E', 2, 2, 5)]);
        assert_eq!(trace.selected_locations(), vec![2]);
    }

    #[test]
    fn test_other_events_counted_not_dispatched() {
        let mut trace = MemoryTrace::new().other(1, 1).enter(1, 2, 3);
        trace.select_location(1);

        let mut recorder = Recorder::default();
        assert_eq!(trace.read_events(&mut recorder).unwrap(), 2);
        assert_eq!(recorder.seen.len(), 1);
    }

    #[test]
    fn test_metric_events_dispatched() {
        let mut trace = MemoryTrace::new()
            .enter(1, 1, 3)
            .metric(1, 2, "PAPI_TOT_CYC", 42.0)
            .program_begin(1, 0)
            .leave(1, 3, 3);
        trace.select_location(1);

        let mut recorder = Recorder::default();
        assert_eq!(trace.read_events(&mut recorder).unwrap(), 4);
        assert_eq!(recorder.seen.len(), 2);
        assert_eq!(
            recorder.metrics,
            vec![(1, Some("PAPI_TOT_CYC".to_string()), Some(42.0))]
        );
    }

    #[test]
    fn test_callback_error_stops_replay() {
        let mut trace = MemoryTrace::new()
            .enter(1, 1, 3)
            .leave(1, 2, 3)
            .enter(1, 3, 3);
        trace.select_location(1);

        let mut recorder = Recorder {
            fail_on_leave: true,
            ..Default::default()
        };
        let result = trace.read_events(&mut recorder);

        assert!(matches!(
            result,
            Err(ReaderError::Callback(AggregateError::AllocationFailed { .. }))
        ));
        assert_eq!(recorder.seen, vec![('E', 1, 1, 3)]);
    }

    #[test]
    fn test_number_of_locations_counts_definitions() {
        let trace = MemoryTrace::new().string(1, "t").location(0, 1).location(1, 1);
        assert_eq!(trace.number_of_locations(), 2);
    }
}
