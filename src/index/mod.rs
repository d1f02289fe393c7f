//! Reference-to-name indices.
//!
//! Three instances of the same hash index back name resolution:
//! - strings (only used while resolving definitions)
//! - locations (pre-sized from the location count hint)
//! - regions (grown on demand)

pub mod reference_index;

// Re-export main types and functions
pub use reference_index::{bucket_index, location_buckets, GrowthPolicy, ReferenceId, ReferenceIndex};
