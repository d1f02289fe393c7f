//! Append-only log of resolved events.
//!
//! Capacity grows as `2 * old + 1` and is reserved exactly, so n appends
//! cost O(log n) reallocations. Reservation is fallible: running out of
//! memory is reported as an error instead of aborting inside the allocator.

use crate::utils::error::AggregateError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Kind of a timeline event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    Enter,
    Leave,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            EventKind::Enter => "Enter",
            EventKind::Leave => "Leave",
        };
        f.pad(label)
    }
}

/// An event with its location and region resolved to names
///
/// Names are owned copies, independent of the indices they came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    pub location: String,
    pub kind: EventKind,
    pub region: String,
}

impl EventRecord {
    pub fn new(location: impl Into<String>, kind: EventKind, region: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            kind,
            region: region.into(),
        }
    }
}

/// Growable buffer of event records, in append order
#[derive(Debug, Default)]
pub struct EventLog {
    records: Vec<EventRecord>,
    capacity: usize,
    reallocations: usize,
}

impl EventLog {
    /// Create a log with room for `capacity` records
    ///
    /// # Errors
    /// * `AggregateError::AllocationFailed` - initial buffer cannot be reserved
    pub fn with_capacity(capacity: usize) -> Result<Self, AggregateError> {
        let mut records = Vec::new();
        records
            .try_reserve_exact(capacity)
            .map_err(|_| AggregateError::AllocationFailed {
                what: "event log",
                requested: capacity,
            })?;

        Ok(Self {
            records,
            capacity,
            reallocations: 0,
        })
    }

    /// Append a record, growing the buffer when it is full
    ///
    /// # Errors
    /// * `AggregateError::AllocationFailed` - buffer cannot grow; fatal
    pub fn append(&mut self, record: EventRecord) -> Result<(), AggregateError> {
        if self.records.len() == self.capacity {
            let new_capacity = self.capacity.saturating_mul(2).saturating_add(1);
            self.records
                .try_reserve_exact(new_capacity - self.records.len())
                .map_err(|_| AggregateError::AllocationFailed {
                    what: "event log",
                    requested: new_capacity,
                })?;
            self.capacity = new_capacity;
            self.reallocations += 1;
        }

        self.records.push(record);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Logical capacity following the growth policy
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of times the buffer had to grow
    pub fn reallocations(&self) -> usize {
        self.reallocations
    }

    /// Records in append order
    pub fn iter(&self) -> std::slice::Iter<'_, EventRecord> {
        self.records.iter()
    }

    pub fn as_slice(&self) -> &[EventRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<EventRecord> {
        self.records
    }

    /// Location names that appear in at least one record
    pub fn distinct_locations(&self) -> BTreeSet<&str> {
        self.records.iter().map(|r| r.location.as_str()).collect()
    }

    /// Region names that appear in at least one record
    pub fn distinct_regions(&self) -> BTreeSet<&str> {
        self.records.iter().map(|r| r.region.as_str()).collect()
    }
}

impl<'a> IntoIterator for &'a EventLog {
    type Item = &'a EventRecord;
    type IntoIter = std::slice::Iter<'a, EventRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_growth_policy() {
        let mut log = EventLog::with_capacity(1).unwrap();
        let mut capacities = vec![log.capacity()];

        for i in 0..8 {
            log.append(EventRecord::new("loc", EventKind::Enter, format!("r{}", i)))
                .unwrap();
            if *capacities.last().unwrap() != log.capacity() {
                capacities.push(log.capacity());
            }
        }

        assert_eq!(capacities, vec![1, 3, 7, 15]);
        assert_eq!(log.reallocations(), 3);
        assert_eq!(log.len(), 8);
    }

    #[test]
    fn test_zero_capacity_grows_on_first_append() {
        let mut log = EventLog::with_capacity(0).unwrap();
        assert!(log.is_empty());

        log.append(EventRecord::new("a", EventKind::Leave, "b")).unwrap();
        assert_eq!(log.capacity(), 1);
        assert_eq!(log.reallocations(), 1);
    }

    #[test]
    fn test_unreservable_capacity_is_an_error() {
        let result = EventLog::with_capacity(usize::MAX);

        assert!(matches!(
            result,
            Err(AggregateError::AllocationFailed {
                what: "event log",
                requested: usize::MAX,
            })
        ));
    }

    #[test]
    fn test_distinct_names() {
        let mut log = EventLog::with_capacity(4).unwrap();
        log.append(EventRecord::new("t1", EventKind::Enter, "main")).unwrap();
        log.append(EventRecord::new("t2", EventKind::Enter, "main")).unwrap();
        log.append(EventRecord::new("t1", EventKind::Leave, "main")).unwrap();

        assert_eq!(log.distinct_locations().into_iter().collect::<Vec<_>>(), vec!["t1", "t2"]);
        assert_eq!(log.distinct_regions().len(), 1);
    }

    #[test]
    fn test_event_kind_display() {
        assert_eq!(EventKind::Enter.to_string(), "Enter");
        assert_eq!(EventKind::Leave.to_string(), "Leave");
    }
}
