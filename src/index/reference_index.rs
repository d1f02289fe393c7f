//! Separate-chaining hash index from reference ids to owned names.
//!
//! Each chain keeps its entries in insertion order and is scanned from the
//! back, so the newest entry for an id is always the one found first. This
//! is what makes a duplicate insert "win" on lookup.

use crate::utils::config::{HASH_MULTIPLIER, MAX_LOAD_FACTOR, MIN_LOCATION_INDEX_BUCKETS};
use log::debug;
use std::fmt;

/// Integer reference id assigned by the trace producer
pub trait ReferenceId: Copy + Eq + fmt::Debug {
    /// Widen to the 64-bit hashing domain
    fn as_u64(self) -> u64;
}

impl ReferenceId for u32 {
    fn as_u64(self) -> u64 {
        u64::from(self)
    }
}

impl ReferenceId for u64 {
    fn as_u64(self) -> u64 {
        self
    }
}

/// Whether the bucket array may be resized after construction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrowthPolicy {
    /// Keep the initial bucket count; chains just get longer
    Fixed,
    /// Double the bucket count once the load factor exceeds `MAX_LOAD_FACTOR`
    Doubling,
}

/// Map a key to its bucket
///
/// **Public** - pure, so callers and tests can predict placement
pub fn bucket_index(key: u64, buckets: usize) -> usize {
    let buckets = buckets.max(1);
    ((key.wrapping_mul(HASH_MULTIPLIER) >> 16) % buckets as u64) as usize
}

/// Bucket count for a location index holding `hint` locations
///
/// Next power of two at or above the hint, never below the minimum.
pub fn location_buckets(hint: u64) -> usize {
    let hint = usize::try_from(hint).unwrap_or(usize::MAX);
    let mut buckets = MIN_LOCATION_INDEX_BUCKETS;
    while buckets < hint {
        match buckets.checked_mul(2) {
            Some(next) => buckets = next,
            None => break,
        }
    }
    buckets
}

/// Hash index from reference ids to names
#[derive(Debug, Clone)]
pub struct ReferenceIndex<K, V = String> {
    label: &'static str,
    buckets: Vec<Vec<(K, V)>>,
    len: usize,
    policy: GrowthPolicy,
    resizes: usize,
}

impl<K: ReferenceId, V> ReferenceIndex<K, V> {
    /// Create an index with a fixed bucket count
    pub fn with_buckets(label: &'static str, buckets: usize) -> Self {
        Self::with_policy(label, buckets, GrowthPolicy::Fixed)
    }

    /// Create an index that doubles its bucket array under load
    pub fn growable(label: &'static str, buckets: usize) -> Self {
        Self::with_policy(label, buckets, GrowthPolicy::Doubling)
    }

    /// Create an index pre-sized from an expected entry count
    pub fn for_locations(hint: u64) -> Self {
        Self::with_buckets("locations", location_buckets(hint))
    }

    fn with_policy(label: &'static str, buckets: usize, policy: GrowthPolicy) -> Self {
        let buckets = buckets.max(1);
        Self {
            label,
            buckets: (0..buckets).map(|_| Vec::new()).collect(),
            len: 0,
            policy,
            resizes: 0,
        }
    }

    /// Add an entry. Never fails; a repeated id shadows the older entry.
    pub fn insert(&mut self, id: K, name: V) {
        if self.policy == GrowthPolicy::Doubling
            && self.len >= self.buckets.len().saturating_mul(MAX_LOAD_FACTOR)
        {
            self.grow();
        }

        let bucket = bucket_index(id.as_u64(), self.buckets.len());
        self.buckets[bucket].push((id, name));
        self.len += 1;
    }

    /// Find the most recently inserted name for `id`
    pub fn lookup(&self, id: K) -> Option<&V> {
        let bucket = bucket_index(id.as_u64(), self.buckets.len());
        self.buckets[bucket]
            .iter()
            .rev()
            .find(|(key, _)| *key == id)
            .map(|(_, name)| name)
    }

    /// Number of inserts performed (duplicates included)
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Number of times the bucket array was doubled
    pub fn resizes(&self) -> usize {
        self.resizes
    }

    pub fn load_factor(&self) -> f64 {
        self.len as f64 / self.buckets.len() as f64
    }

    /// Entries in bucket order, newest first within a bucket
    pub fn iter(&self) -> impl Iterator<Item = (K, &V)> + '_ {
        self.buckets
            .iter()
            .flat_map(|chain| chain.iter().rev().map(|(id, name)| (*id, name)))
    }

    /// Every stored id, in iteration order
    pub fn ids(&self) -> Vec<K> {
        self.iter().map(|(id, _)| id).collect()
    }

    /// Every stored name, in iteration order
    pub fn names(&self) -> Vec<&V> {
        self.iter().map(|(_, name)| name).collect()
    }

    // Chains are drained oldest-first, so entries sharing an id land in the
    // new bucket in their original relative order.
    fn grow(&mut self) {
        let new_count = self.buckets.len().saturating_mul(2);
        let old = std::mem::replace(
            &mut self.buckets,
            (0..new_count).map(|_| Vec::new()).collect(),
        );

        for (id, name) in old.into_iter().flatten() {
            let bucket = bucket_index(id.as_u64(), new_count);
            self.buckets[bucket].push((id, name));
        }

        self.resizes += 1;
        debug!(
            "Grew {} index to {} buckets ({} entries)",
            self.label, new_count, self.len
        );
    }
}
