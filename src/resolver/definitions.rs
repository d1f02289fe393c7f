//! Build the three reference indices from the definition stream.
//!
//! Location and region names are resolved through the string index at
//! registration time, so the event stream never touches strings.

use crate::index::ReferenceIndex;
use crate::reader::{
    CallbackResult, ClockProperties, DefinitionCallbacks, LocationDefinition, LocationRef,
    RegionDefinition, RegionRef, StringRef,
};
use crate::utils::config::{SessionConfig, UNKNOWN_LOCATION, UNKNOWN_REGION, UNKNOWN_STRING};
use log::debug;

/// Indices handed from the definition phase to the event phase
#[derive(Debug, Clone)]
pub struct ResolvedDefinitions {
    pub strings: ReferenceIndex<StringRef>,
    pub locations: ReferenceIndex<LocationRef>,
    pub regions: ReferenceIndex<RegionRef>,
    pub clock: Option<ClockProperties>,

    /// Locations and regions whose name reference was missing
    pub unresolved_names: u64,
}

/// Definition stream handler that populates the indices
#[derive(Debug)]
pub struct DefinitionResolver {
    strings: ReferenceIndex<StringRef>,
    locations: ReferenceIndex<LocationRef>,
    regions: ReferenceIndex<RegionRef>,
    clock: Option<ClockProperties>,
    unresolved_names: u64,
}

impl DefinitionResolver {
    /// Create a resolver with default bucket sizes
    ///
    /// # Arguments
    /// * `location_hint` - expected number of locations
    pub fn new(location_hint: u64) -> Self {
        Self::with_config(location_hint, &SessionConfig::default())
    }

    pub fn with_config(location_hint: u64, config: &SessionConfig) -> Self {
        Self {
            strings: ReferenceIndex::growable("strings", config.string_buckets),
            locations: ReferenceIndex::for_locations(location_hint),
            regions: ReferenceIndex::growable("regions", config.region_buckets),
            clock: None,
            unresolved_names: 0,
        }
    }

    pub fn strings(&self) -> &ReferenceIndex<StringRef> {
        &self.strings
    }

    pub fn locations(&self) -> &ReferenceIndex<LocationRef> {
        &self.locations
    }

    pub fn regions(&self) -> &ReferenceIndex<RegionRef> {
        &self.regions
    }

    /// End the definition phase
    pub fn finish(self) -> ResolvedDefinitions {
        debug!(
            "Resolved {} strings, {} locations, {} regions ({} unresolved names)",
            self.strings.len(),
            self.locations.len(),
            self.regions.len(),
            self.unresolved_names
        );

        ResolvedDefinitions {
            strings: self.strings,
            locations: self.locations,
            regions: self.regions,
            clock: self.clock,
            unresolved_names: self.unresolved_names,
        }
    }

    fn resolve_name(&mut self, name: StringRef, fallback: &str, owner: &str) -> String {
        match self.strings.lookup(name) {
            Some(text) => text.clone(),
            None => {
                self.unresolved_names += 1;
                debug!("{} references unknown string {}", owner, name);
                fallback.to_string()
            }
        }
    }
}

impl DefinitionCallbacks for DefinitionResolver {
    fn on_clock_properties(&mut self, clock: &ClockProperties) -> CallbackResult {
        self.clock = Some(*clock);
        Ok(())
    }

    fn on_string(&mut self, id: StringRef, text: Option<&str>) -> CallbackResult {
        self.strings
            .insert(id, text.unwrap_or(UNKNOWN_STRING).to_string());
        Ok(())
    }

    fn on_location(&mut self, location: &LocationDefinition) -> CallbackResult {
        let name = self.resolve_name(location.name, UNKNOWN_LOCATION, "Location");
        self.locations.insert(location.id, name);
        Ok(())
    }

    fn on_region(&mut self, region: &RegionDefinition) -> CallbackResult {
        let name = self.resolve_name(region.name, UNKNOWN_REGION, "Region");
        self.regions.insert(region.id, name);
        Ok(())
    }
}
