//! Trace reader boundary.
//!
//! Decoding trace archives is the job of an external reader. This module
//! defines what the aggregation core expects from it:
//! - the record types and callback traits
//! - the `TraceSource` trait the session drives
//! - a JSON dump replay source used by the CLI and the tests

pub mod dump;
pub mod json_dump;
pub mod replay;
pub mod schema;

use crate::utils::error::ReaderError;

// Re-export main types
pub use dump::{RawEvent, RawEventKind, TraceDump};
pub use json_dump::{open_trace, parse_trace};
pub use replay::MemoryTrace;
pub use schema::{
    Attribute, CallbackResult, ClockProperties, DefinitionCallbacks, EventCallbacks,
    LocationDefinition, LocationGroupRef, LocationRef, LocationType, Paradigm, RegionDefinition,
    RegionRef, RegionRole, StringDefinition, StringRef, Timestamp,
};

/// A reader that delivers definitions, then events, through callbacks
pub trait TraceSource {
    /// Upper bound on the number of locations, used to size the location index
    fn number_of_locations(&self) -> u64;

    /// Replay every global definition; returns how many were read
    fn read_definitions(
        &mut self,
        callbacks: &mut dyn DefinitionCallbacks,
    ) -> Result<u64, ReaderError>;

    /// Mark a location's events for reading
    fn select_location(&mut self, location: LocationRef);

    /// Replay the events of all selected locations in global time order;
    /// returns how many were read, including kinds without a callback
    fn read_events(&mut self, callbacks: &mut dyn EventCallbacks) -> Result<u64, ReaderError>;
}
