//! Least Recently Used rule cache with a configurable scan direction.
//!
//! Keeps cached rules in a recency list: the front is the most recently
//! confirmed rule and the back is the eviction victim. Lookup is a linear
//! probe over the list, because rules match by predicate rather than by key.
//!
//! ```text
//!   front ──► [R4] ◄──► [R2] ◄──► [R1] ◄── back
//!        (most recent)           (least recent, evicted first)
//!
//!   MostRecentFirst  probes front ─► back  (repeating workloads resolve
//!                                           in the first few entries)
//!   LeastRecentFirst probes back ─► front  (rotating workloads avoid
//!                                           re-checking the same hot entry)
//! ```
//!
//! ## Probe-then-commit
//!
//! | Step                    | Effect                                        |
//! |-------------------------|-----------------------------------------------|
//! | `get(contents, probe)`  | Scan only; arms a pending hit on match        |
//! | `record_hit()`          | Commit: move to front, `hits += 1`            |
//! | `record_miss()`         | `misses += 1`                                 |
//! | `put(rule)`             | Insert at front, evicting the back when full  |
//!
//! Recency only changes on `record_hit`, so a caller that probes but then
//! rejects the result leaves the order untouched.
//!
//! The scan direction is a persistent operator preference: it survives
//! [`clear`](crate::traits::RuleCache::clear) and round-trips through a saved
//! flag via [`ScanDirection::is_ascending`] / [`ScanDirection::from_ascending`].

use std::fmt;
use std::sync::Arc;

use crate::ds::{IntrusiveList, SlotId};
use crate::error::InvariantError;
use crate::stats::CacheStats;
use crate::traits::{MatchProbe, RuleCache};

/// Which end of the recency list a lookup probes first.
///
/// Stored as a persisted boolean in operator state: `MostRecentFirst` maps to
/// `true` (the historical "ascending" flag default).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScanDirection {
    /// Probe from the most recently used entry toward the least recently
    /// used. Best when the same few rules repeat back to back.
    #[default]
    MostRecentFirst,
    /// Probe from the least recently used entry toward the most recently
    /// used. Spreads probe work when the workload rotates through rules.
    LeastRecentFirst,
}

impl ScanDirection {
    /// Returns the opposite direction.
    pub fn toggled(self) -> Self {
        match self {
            ScanDirection::MostRecentFirst => ScanDirection::LeastRecentFirst,
            ScanDirection::LeastRecentFirst => ScanDirection::MostRecentFirst,
        }
    }

    /// Flips the direction in place.
    pub fn toggle(&mut self) {
        *self = self.toggled();
    }

    /// Maps the direction to the persisted boolean form.
    ///
    /// `MostRecentFirst` is the `true` (default) value.
    pub fn is_ascending(self) -> bool {
        matches!(self, ScanDirection::MostRecentFirst)
    }

    /// Restores a direction from its persisted boolean form.
    ///
    /// ```
    /// use rulecache::policy::lru::ScanDirection;
    ///
    /// let dir = ScanDirection::LeastRecentFirst;
    /// assert_eq!(ScanDirection::from_ascending(dir.is_ascending()), dir);
    /// ```
    pub fn from_ascending(ascending: bool) -> Self {
        if ascending {
            ScanDirection::MostRecentFirst
        } else {
            ScanDirection::LeastRecentFirst
        }
    }

    /// Operator-facing summary of what the direction means for a workload.
    pub fn description(self) -> &'static str {
        match self {
            ScanDirection::MostRecentFirst => {
                "sequential probe from the most recently used entry \
                 (better performance for repeating workloads)"
            },
            ScanDirection::LeastRecentFirst => {
                "round-robin probe from the least recently used entry \
                 (fairer rotation, slightly more probe work)"
            },
        }
    }
}

impl fmt::Display for ScanDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanDirection::MostRecentFirst => f.write_str("most-recent-first"),
            ScanDirection::LeastRecentFirst => f.write_str("least-recent-first"),
        }
    }
}

/// Bounded LRU cache over probe-matched rules.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use rulecache::policy::lru::LruRuleCache;
/// use rulecache::traits::RuleCache;
///
/// let mut cache: LruRuleCache<u64> = LruRuleCache::new(2);
/// let probe = |rule: &u64, contents: &u64| rule == contents;
///
/// // Miss path: probe, record, then publish the resolved rule.
/// assert!(cache.get(&7, &probe).is_none());
/// cache.record_miss();
/// cache.put(Arc::new(7));
///
/// // Hit path: probe then commit.
/// let hit = cache.get(&7, &probe).unwrap();
/// assert_eq!(*hit, 7);
/// cache.record_hit();
///
/// assert_eq!(cache.stats().hits, 1);
/// assert_eq!(cache.stats().misses, 1);
/// ```
#[derive(Debug)]
pub struct LruRuleCache<R> {
    entries: IntrusiveList<Arc<R>>,
    capacity: usize,
    direction: ScanDirection,
    /// Handle armed by a matching `get`, consumed by `record_hit`.
    pending: Option<SlotId>,
    hits: u64,
    misses: u64,
}

impl<R> LruRuleCache<R> {
    /// Creates a cache holding at most `capacity` rules, probing
    /// most-recent-first.
    ///
    /// A capacity of 0 disables the cache: lookups never match and `put`
    /// is a no-op.
    pub fn new(capacity: usize) -> Self {
        Self::with_direction(capacity, ScanDirection::default())
    }

    /// Creates a cache with an explicit initial scan direction, typically
    /// restored from persisted state.
    pub fn with_direction(capacity: usize, direction: ScanDirection) -> Self {
        Self {
            entries: IntrusiveList::with_capacity(capacity),
            capacity,
            direction,
            pending: None,
            hits: 0,
            misses: 0,
        }
    }

    /// Current scan direction.
    pub fn scan_direction(&self) -> ScanDirection {
        self.direction
    }

    /// Sets the scan direction for subsequent lookups.
    pub fn set_scan_direction(&mut self, direction: ScanDirection) {
        self.direction = direction;
    }

    /// Flips the scan direction and returns the new value.
    pub fn toggle_scan_direction(&mut self) -> ScanDirection {
        self.direction.toggle();
        self.direction
    }

    /// Committed hit count.
    pub fn hits(&self) -> u64 {
        self.hits
    }

    /// Recorded miss count.
    pub fn misses(&self) -> u64 {
        self.misses
    }

    /// Position of `rule` in recency order (0 = most recent), matched by
    /// allocation identity. Diagnostic, O(n).
    pub fn recency_rank(&self, rule: &Arc<R>) -> Option<usize> {
        self.entries
            .iter_entries()
            .position(|(_, cached)| Arc::ptr_eq(cached, rule))
    }

    /// Validates the recency list and the pending-hit handle.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        if self.capacity == 0 && !self.entries.is_empty() {
            return Err(InvariantError::new("disabled cache holds entries"));
        }
        if self.entries.len() > self.capacity {
            return Err(InvariantError::new("entry count exceeds capacity"));
        }

        let forward = self.entries.iter_entries().count();
        if forward != self.entries.len() {
            return Err(InvariantError::new("recency list length mismatch"));
        }
        let backward = self.entries.iter_entries_rev().count();
        if backward != forward {
            return Err(InvariantError::new("recency list direction mismatch"));
        }

        if let Some(id) = self.pending {
            if !self.entries.contains(id) {
                return Err(InvariantError::new("pending hit refers to a dead slot"));
            }
        }
        Ok(())
    }
}

impl<R> RuleCache<R> for LruRuleCache<R> {
    /// Probes entries in the configured scan direction and returns the first
    /// rule the probe accepts. Arms the pending hit without reordering; the
    /// caller commits via [`record_hit`](RuleCache::record_hit).
    fn get<C, P>(&mut self, contents: &C, probe: &P) -> Option<Arc<R>>
    where
        C: ?Sized,
        P: MatchProbe<R, C>,
    {
        self.pending = None;

        let mut found = None;
        match self.direction {
            ScanDirection::MostRecentFirst => {
                for (id, rule) in self.entries.iter_entries() {
                    if probe.matches(rule, contents) {
                        found = Some((id, Arc::clone(rule)));
                        break;
                    }
                }
            },
            ScanDirection::LeastRecentFirst => {
                for (id, rule) in self.entries.iter_entries_rev() {
                    if probe.matches(rule, contents) {
                        found = Some((id, Arc::clone(rule)));
                        break;
                    }
                }
            },
        }

        let (id, rule) = found?;
        self.pending = Some(id);
        Some(rule)
    }

    fn record_hit(&mut self) {
        if let Some(id) = self.pending.take() {
            self.entries.move_to_front(id);
            self.hits += 1;
        }
    }

    fn record_miss(&mut self) {
        self.pending = None;
        self.misses += 1;
    }

    /// Inserts `rule` at the most-recent position, evicting the least
    /// recently used entry when full. No-op when the cache is disabled.
    fn put(&mut self, rule: Arc<R>) {
        self.pending = None;
        if self.capacity == 0 {
            return;
        }
        if self.entries.len() >= self.capacity {
            self.entries.pop_back();
        }
        self.entries.push_front(rule);
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn capacity(&self) -> usize {
        self.capacity
    }

    /// Drops all entries and zeroes the counters. The scan direction is an
    /// operator preference and survives.
    fn clear(&mut self) {
        self.entries.clear();
        self.pending = None;
        self.hits = 0;
        self.misses = 0;
    }

    fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits,
            misses: self.misses,
            entries: self.entries.len(),
            capacity: self.capacity,
        }
    }
}
