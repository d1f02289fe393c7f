//! One aggregation session over one trace source.
//!
//! A session owns its indices, counters and log for the duration of
//! [`TraceSession::run`]; nothing is shared between sessions.

use crate::aggregator::{AggregationOutcome, EventAggregator};
use crate::reader::{ClockProperties, TraceSource};
use crate::resolver::DefinitionResolver;
use crate::utils::config::SessionConfig;
use crate::utils::error::SessionError;
use log::{debug, info};
use std::time::{Duration, Instant};

/// Wall time spent in each phase
#[derive(Debug, Clone, Copy, Default)]
pub struct PhaseTimings {
    pub definitions: Duration,
    pub selection: Duration,
    pub events: Duration,
    pub total: Duration,
}

/// Result of a completed session
#[derive(Debug)]
pub struct SessionReport {
    /// Location count announced by the reader
    pub number_of_locations: u64,

    pub definitions_read: u64,

    /// Events delivered by the reader, including kinds without a callback
    pub events_read: u64,

    pub clock: Option<ClockProperties>,
    pub string_count: usize,
    pub unresolved_names: u64,
    pub outcome: AggregationOutcome,
    pub timings: PhaseTimings,
}

/// Orchestrates definitions, location selection and events
#[derive(Debug, Clone, Default)]
pub struct TraceSession {
    config: SessionConfig,
}

impl TraceSession {
    pub fn new(config: SessionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Drain the definition stream, then the event stream
    ///
    /// # Errors
    /// * `SessionError::Definitions` - reader failed during definitions
    /// * `SessionError::Events` - reader failed or a handler aborted
    /// * `SessionError::Aggregate` - event log could not be allocated
    pub fn run(&self, source: &mut dyn TraceSource) -> Result<SessionReport, SessionError> {
        let start = Instant::now();

        let number_of_locations = source.number_of_locations();
        info!("Number of locations: {}", number_of_locations);

        // Phase 1: definitions
        info!("Step 1/3: Reading global definitions...");
        let mut resolver = DefinitionResolver::with_config(number_of_locations, &self.config);
        let definitions_read = source
            .read_definitions(&mut resolver)
            .map_err(SessionError::Definitions)?;
        let definitions = resolver.finish();
        let definitions_time = start.elapsed();
        info!(
            "Read {} global definitions in {:.2}s",
            definitions_read,
            definitions_time.as_secs_f64()
        );

        // Phase 2: select every defined location for event reading
        info!("Step 2/3: Selecting locations...");
        let selection_start = Instant::now();
        let location_ids = definitions.locations.ids();
        for location in &location_ids {
            source.select_location(*location);
        }
        let selection_time = selection_start.elapsed();
        debug!("Selected {} locations", location_ids.len());

        let clock = definitions.clock;
        let string_count = definitions.strings.len();
        let unresolved_names = definitions.unresolved_names;

        // Phase 3: events
        info!("Step 3/3: Reading events...");
        let events_start = Instant::now();
        let mut aggregator = EventAggregator::new(definitions, &self.config)?;
        let events_read = source
            .read_events(&mut aggregator)
            .map_err(SessionError::Events)?;
        let outcome = aggregator.finish();
        let events_time = events_start.elapsed();
        info!(
            "Read {} events in {:.2}s",
            events_read,
            events_time.as_secs_f64()
        );

        Ok(SessionReport {
            number_of_locations,
            definitions_read,
            events_read,
            clock,
            string_count,
            unresolved_names,
            outcome,
            timings: PhaseTimings {
                definitions: definitions_time,
                selection: selection_time,
                events: events_time,
                total: start.elapsed(),
            },
        })
    }
}
