//! Configuration and constants for the indices, the event log and the CLI.

// Bucket counts for the three reference indices
pub const STRING_INDEX_BUCKETS: usize = 1024;
pub const REGION_INDEX_BUCKETS: usize = 512;
pub const MIN_LOCATION_INDEX_BUCKETS: usize = 256;

/// Average chain length that triggers a bucket doubling on growable indices
pub const MAX_LOAD_FACTOR: usize = 2;

/// Knuth-style multiplicative hashing constant (odd, close to 2^32 / phi)
pub const HASH_MULTIPLIER: u64 = 2_654_435_761;

// Sentinel names substituted when a reference cannot be resolved
pub const UNKNOWN_STRING: &str = "UnknownString";
pub const UNKNOWN_LOCATION: &str = "UnknownLocation";
pub const UNKNOWN_REGION: &str = "UnknownRegion";

/// Member name recorded for a metric event that carries none
pub const UNKNOWN_METRIC: &str = "Unknown";

/// Initial record capacity of the event log
pub const DEFAULT_EVENT_LOG_CAPACITY: usize = 1024;

/// Current summary output schema version
pub const SUMMARY_SCHEMA_VERSION: &str = "1.0.0";

/// Trace dump format understood by the JSON replay reader
pub const DUMP_FORMAT_VERSION: &str = "1.0";

/// Upper bound for `--show-events`
pub const MAX_SHOW_EVENTS: usize = 10_000;

/// Tunables for one aggregation session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Initial bucket count of the string index
    pub string_buckets: usize,

    /// Initial bucket count of the region index
    pub region_buckets: usize,

    /// Initial record capacity of the event log
    pub event_log_capacity: usize,

    /// Keep every resolved event in the log (counters are always kept)
    pub retain_events: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            string_buckets: STRING_INDEX_BUCKETS,
            region_buckets: REGION_INDEX_BUCKETS,
            event_log_capacity: DEFAULT_EVENT_LOG_CAPACITY,
            retain_events: true,
        }
    }
}
