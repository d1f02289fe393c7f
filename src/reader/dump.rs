//! Trace dump document: already-decoded definitions plus per-location
//! event lists, replayed through the callback interface.

use super::schema::{
    Attribute, ClockProperties, LocationDefinition, LocationRef, RegionDefinition, RegionRef,
    StringDefinition, Timestamp,
};
use crate::utils::config::DUMP_FORMAT_VERSION;
use crate::utils::error::ReaderError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Event kind as stored in a dump; unrecognized kinds become `Other`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RawEventKind {
    Enter,
    Leave,
    Metric,
    ProgramBegin,
    #[serde(other)]
    Other,
}

impl RawEventKind {
    /// Enter and leave events must name a region
    pub fn requires_region(self) -> bool {
        matches!(self, RawEventKind::Enter | RawEventKind::Leave)
    }
}

/// One event of a location's event list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawEvent {
    pub kind: RawEventKind,

    pub time: Timestamp,

    /// Required for enter/leave
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<RegionRef>,

    /// Metric member name, metric events only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub member: Option<String>,

    /// Metric value, metric events only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<Attribute>,
}

impl RawEvent {
    pub fn new(kind: RawEventKind, time: Timestamp) -> Self {
        Self {
            kind,
            time,
            region: None,
            member: None,
            value: None,
            attributes: Vec::new(),
        }
    }
}

/// Top-level trace dump structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceDump {
    #[serde(default = "default_version")]
    pub version: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clock: Option<ClockProperties>,

    #[serde(default)]
    pub strings: Vec<StringDefinition>,

    #[serde(default)]
    pub locations: Vec<LocationDefinition>,

    #[serde(default)]
    pub regions: Vec<RegionDefinition>,

    /// Event lists keyed by location id, each in local time order
    #[serde(default)]
    pub events: BTreeMap<LocationRef, Vec<RawEvent>>,
}

fn default_version() -> String {
    DUMP_FORMAT_VERSION.to_string()
}

impl Default for TraceDump {
    fn default() -> Self {
        Self {
            version: default_version(),
            clock: None,
            strings: Vec::new(),
            locations: Vec::new(),
            regions: Vec::new(),
            events: BTreeMap::new(),
        }
    }
}

impl TraceDump {
    /// Check structural requirements the replay relies on
    ///
    /// # Errors
    /// * `ReaderError::InvalidFormat` - unsupported version, or an enter/leave
    ///   event without a region
    pub fn validate(&self) -> Result<(), ReaderError> {
        let expected_major = major_version(DUMP_FORMAT_VERSION);
        if major_version(&self.version) != expected_major {
            return Err(ReaderError::InvalidFormat(format!(
                "Unsupported dump version {} (expected {}.x)",
                self.version, expected_major
            )));
        }

        for (location, events) in &self.events {
            for (position, event) in events.iter().enumerate() {
                if event.kind.requires_region() && event.region.is_none() {
                    return Err(ReaderError::InvalidFormat(format!(
                        "Event {} of location {} is {:?} but has no region",
                        position, location, event.kind
                    )));
                }
            }
        }

        Ok(())
    }

    /// Number of definitions, counting clock properties as one
    pub fn definition_count(&self) -> u64 {
        let clock = u64::from(self.clock.is_some());
        clock + (self.strings.len() + self.locations.len() + self.regions.len()) as u64
    }

    /// Number of events across all locations
    pub fn event_count(&self) -> u64 {
        self.events.values().map(|events| events.len() as u64).sum()
    }

    /// Event lists keyed by a location that has no definition
    pub fn orphan_event_locations(&self) -> Vec<LocationRef> {
        self.events
            .keys()
            .copied()
            .filter(|id| !self.locations.iter().any(|location| location.id == *id))
            .collect()
    }
}

fn major_version(version: &str) -> &str {
    version.split('.').next().unwrap_or(version)
}
