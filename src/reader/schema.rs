//! Definition and event records delivered by the trace reader.
//!
//! Reference widths follow the trace format: locations are 64-bit,
//! everything else is 32-bit.

use crate::utils::error::AggregateError;
use serde::{Deserialize, Serialize};

pub type StringRef = u32;
pub type LocationRef = u64;
pub type RegionRef = u32;
pub type LocationGroupRef = u32;
pub type Timestamp = u64;

/// Result returned by every callback; an error stops the stream
pub type CallbackResult = Result<(), AggregateError>;

/// Timer properties of the trace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClockProperties {
    /// Ticks per second
    pub timer_resolution: u64,

    /// Timestamp of the first tick
    pub global_offset: u64,

    /// Trace duration in ticks
    pub trace_length: u64,

    /// Wall-clock time of the global offset, if recorded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub realtime_timestamp: Option<u64>,
}

/// String definition as stored in a trace dump
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StringDefinition {
    pub id: StringRef,

    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationType {
    CpuThread,
    Gpu,
    Metric,
    #[default]
    #[serde(other)]
    Unknown,
}

/// Location definition (a thread, process or accelerator stream)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationDefinition {
    pub id: LocationRef,

    /// String reference of the display name
    pub name: StringRef,

    #[serde(default, rename = "type")]
    pub location_type: LocationType,

    /// Event count announced by the producer
    #[serde(default)]
    pub number_of_events: u64,

    #[serde(default)]
    pub group: LocationGroupRef,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegionRole {
    Function,
    Wrapper,
    Loop,
    Code,
    Barrier,
    Task,
    Artificial,
    #[default]
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Paradigm {
    User,
    Compiler,
    Measurement,
    #[serde(rename = "openmp")]
    OpenMp,
    Mpi,
    Cuda,
    Hip,
    Pthread,
    #[default]
    #[serde(other)]
    Unknown,
}

/// Region definition (an instrumented code section)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionDefinition {
    pub id: RegionRef,

    /// String reference of the display name
    pub name: StringRef,

    #[serde(default)]
    pub canonical_name: Option<StringRef>,

    #[serde(default)]
    pub description: Option<StringRef>,

    #[serde(default)]
    pub role: RegionRole,

    #[serde(default)]
    pub paradigm: Paradigm,

    #[serde(default)]
    pub flags: u32,

    #[serde(default)]
    pub source_file: Option<StringRef>,

    #[serde(default)]
    pub begin_line: u32,

    #[serde(default)]
    pub end_line: u32,
}

impl LocationDefinition {
    pub fn new(id: LocationRef, name: StringRef) -> Self {
        Self {
            id,
            name,
            location_type: LocationType::default(),
            number_of_events: 0,
            group: 0,
        }
    }
}

impl RegionDefinition {
    pub fn new(id: RegionRef, name: StringRef) -> Self {
        Self {
            id,
            name,
            canonical_name: None,
            description: None,
            role: RegionRole::default(),
            paradigm: Paradigm::default(),
            flags: 0,
            source_file: None,
            begin_line: 0,
            end_line: 0,
        }
    }
}

/// Opaque event attribute, passed through untouched
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    pub id: u32,
    pub value: serde_json::Value,
}

/// Handlers for the definition stream
///
/// The reader guarantees every string is delivered before any location or
/// region that references it.
pub trait DefinitionCallbacks {
    fn on_clock_properties(&mut self, _clock: &ClockProperties) -> CallbackResult {
        Ok(())
    }

    fn on_string(&mut self, id: StringRef, text: Option<&str>) -> CallbackResult;

    fn on_location(&mut self, location: &LocationDefinition) -> CallbackResult;

    fn on_region(&mut self, region: &RegionDefinition) -> CallbackResult;
}

/// Handlers for the globally time-ordered event stream
pub trait EventCallbacks {
    fn on_enter(
        &mut self,
        location: LocationRef,
        time: Timestamp,
        attributes: &[Attribute],
        region: RegionRef,
    ) -> CallbackResult;

    fn on_leave(
        &mut self,
        location: LocationRef,
        time: Timestamp,
        attributes: &[Attribute],
        region: RegionRef,
    ) -> CallbackResult;

    /// Metric sample; `member` is `None` when the dump did not name it
    fn on_metric(
        &mut self,
        _location: LocationRef,
        _time: Timestamp,
        _member: Option<&str>,
        _value: Option<f64>,
    ) -> CallbackResult {
        Ok(())
    }

    fn on_program_begin(&mut self, _location: LocationRef, _time: Timestamp) -> CallbackResult {
        Ok(())
    }
}
