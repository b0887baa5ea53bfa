//! Least Frequently Used rule cache with frequency-ordered probing.
//!
//! Every cached rule carries a use count. Lookup walks the population in
//! descending frequency order, so the rules that keep matching are probed
//! first; eviction removes the lowest count, oldest first among ties.
//!
//! ```text
//!   freq=5: [R2]            ◄── probed first
//!   freq=2: [R7] [R4]           (oldest first within a tier)
//!   freq=1: [R9]             ◄── eviction victim (lowest tier, oldest)
//! ```
//!
//! ## Probe-then-commit
//!
//! | Step                    | Effect                                         |
//! |-------------------------|------------------------------------------------|
//! | `get(contents, probe)`  | Scan only; arms a pending hit on match         |
//! | `record_hit()`          | Commit: bump the matched rule's frequency      |
//! | `record_miss()`         | `misses += 1`                                  |
//! | `put(rule)`             | Insert at frequency 1, evicting the LFU victim |
//!
//! A probe that the caller never commits leaves all counts untouched, so
//! speculative lookups cannot inflate a rule's standing.

use std::sync::Arc;

use crate::ds::{FrequencyBuckets, SlotArena, SlotId};
use crate::error::InvariantError;
use crate::stats::CacheStats;
use crate::traits::{MatchProbe, RuleCache};

/// Bounded LFU cache over probe-matched rules.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use rulecache::policy::lfu::LfuRuleCache;
/// use rulecache::traits::RuleCache;
///
/// let mut cache: LfuRuleCache<u64> = LfuRuleCache::new(2);
/// let probe = |rule: &u64, contents: &u64| rule == contents;
///
/// cache.put(Arc::new(7));
/// cache.put(Arc::new(9));
///
/// // Commit a hit on 7: its count rises to 2, leaving 9 as the victim.
/// let hit = cache.get(&7, &probe).unwrap();
/// cache.record_hit();
/// assert_eq!(cache.frequency_of(&hit), Some(2));
///
/// cache.put(Arc::new(3));
/// assert!(cache.get(&9, &probe).is_none());
/// assert!(cache.get(&7, &probe).is_some());
/// ```
#[derive(Debug)]
pub struct LfuRuleCache<R> {
    rules: SlotArena<Arc<R>>,
    freq: FrequencyBuckets,
    capacity: usize,
    /// Handle armed by a matching `get`, consumed by `record_hit`.
    pending: Option<SlotId>,
    hits: u64,
    misses: u64,
}

impl<R> LfuRuleCache<R> {
    /// Creates a cache holding at most `capacity` rules.
    ///
    /// A capacity of 0 disables the cache: lookups never match and `put`
    /// is a no-op.
    pub fn new(capacity: usize) -> Self {
        Self {
            rules: SlotArena::with_capacity(capacity),
            freq: FrequencyBuckets::with_capacity(capacity),
            capacity,
            pending: None,
            hits: 0,
            misses: 0,
        }
    }

    /// Committed hit count.
    pub fn hits(&self) -> u64 {
        self.hits
    }

    /// Recorded miss count.
    pub fn misses(&self) -> u64 {
        self.misses
    }

    /// Current use count for `rule`, matched by allocation identity.
    /// Diagnostic, O(n).
    pub fn frequency_of(&self, rule: &Arc<R>) -> Option<u64> {
        self.rules
            .iter()
            .find(|(_, cached)| Arc::ptr_eq(cached, rule))
            .and_then(|(id, _)| self.freq.frequency(id))
    }

    /// The rule the next eviction would remove, with its use count.
    pub fn peek_victim(&self) -> Option<(&Arc<R>, u64)> {
        let (id, freq) = self.freq.peek_min()?;
        self.rules.get(id).map(|rule| (rule, freq))
    }

    /// Validates that the arena and the frequency tracker agree.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        if self.capacity == 0 && !self.rules.is_empty() {
            return Err(InvariantError::new("disabled cache holds entries"));
        }
        if self.rules.len() > self.capacity {
            return Err(InvariantError::new("entry count exceeds capacity"));
        }
        if self.rules.len() != self.freq.len() {
            return Err(InvariantError::new("arena and frequency tracker disagree"));
        }
        for id in self.freq.iter_descending() {
            if !self.rules.contains(id) {
                return Err(InvariantError::new("tracked slot missing from arena"));
            }
        }
        if let Some(id) = self.pending {
            if !self.rules.contains(id) {
                return Err(InvariantError::new("pending hit refers to a dead slot"));
            }
        }
        self.freq.check_invariants()
    }
}

impl<R> RuleCache<R> for LfuRuleCache<R> {
    /// Probes rules in descending frequency order (oldest first within a
    /// tier) and returns the first one the probe accepts. Arms the pending
    /// hit without bumping any count; the caller commits via
    /// [`record_hit`](RuleCache::record_hit).
    fn get<C, P>(&mut self, contents: &C, probe: &P) -> Option<Arc<R>>
    where
        C: ?Sized,
        P: MatchProbe<R, C>,
    {
        self.pending = None;

        let mut found = None;
        for id in self.freq.iter_descending() {
            if let Some(rule) = self.rules.get(id) {
                if probe.matches(rule, contents) {
                    found = Some(id);
                    break;
                }
            }
        }

        let id = found?;
        self.pending = Some(id);
        self.rules.get(id).map(Arc::clone)
    }

    fn record_hit(&mut self) {
        if let Some(id) = self.pending.take() {
            self.freq.promote(id);
            self.hits += 1;
        }
    }

    fn record_miss(&mut self) {
        self.pending = None;
        self.misses += 1;
    }

    /// Inserts `rule` at frequency 1, evicting the least frequently used
    /// entry when full. No-op when the cache is disabled.
    fn put(&mut self, rule: Arc<R>) {
        self.pending = None;
        if self.capacity == 0 {
            return;
        }
        if self.rules.len() >= self.capacity {
            if let Some((victim, _)) = self.freq.pop_min() {
                self.rules.remove(victim);
            }
        }
        let id = self.rules.insert(rule);
        self.freq.insert(id);
    }

    fn len(&self) -> usize {
        self.rules.len()
    }

    fn capacity(&self) -> usize {
        self.capacity
    }

    /// Drops all entries and zeroes the counters.
    fn clear(&mut self) {
        self.rules.clear();
        self.freq.clear();
        self.pending = None;
        self.hits = 0;
        self.misses = 0;
    }

    fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits,
            misses: self.misses,
            entries: self.rules.len(),
            capacity: self.capacity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eq_probe(rule: &u64, contents: &u64) -> bool {
        rule == contents
    }

    fn filled(capacity: usize, rules: &[u64]) -> LfuRuleCache<u64> {
        let mut cache = LfuRuleCache::new(capacity);
        for &rule in rules {
            cache.put(Arc::new(rule));
        }
        cache
    }

    fn commit_hit(cache: &mut LfuRuleCache<u64>, target: u64) {
        cache.get(&target, &eq_probe).unwrap();
        cache.record_hit();
    }

    mod basic_behavior {
        use super::*;

        #[test]
        fn hit_commits_and_raises_frequency() {
            let mut cache = filled(3, &[1, 2, 3]);

            let hit = cache.get(&2, &eq_probe).unwrap();
            cache.record_hit();

            assert_eq!(*hit, 2);
            assert_eq!(cache.hits(), 1);
            assert_eq!(cache.frequency_of(&hit), Some(2));
            cache.check_invariants().unwrap();
        }

        #[test]
        fn probe_without_commit_leaves_counts() {
            let mut cache = filled(3, &[1, 2, 3]);

            let hit = cache.get(&2, &eq_probe).unwrap();
            assert_eq!(cache.frequency_of(&hit), Some(1));
            assert_eq!(cache.hits(), 0);
        }

        #[test]
        fn eviction_removes_lowest_frequency() {
            let mut cache = filled(3, &[1, 2, 3]);
            commit_hit(&mut cache, 1);
            commit_hit(&mut cache, 2);

            // 3 never hit, so it is the victim.
            cache.put(Arc::new(4));

            assert!(cache.get(&3, &eq_probe).is_none());
            assert!(cache.get(&1, &eq_probe).is_some());
            assert!(cache.get(&2, &eq_probe).is_some());
            assert!(cache.get(&4, &eq_probe).is_some());
        }

        #[test]
        fn tie_break_evicts_oldest_in_tier() {
            // Counts [1, 1, 2]: both 1 and 2 sit at frequency 1, and 1
            // entered the tier first.
            let mut cache = filled(3, &[1, 2, 3]);
            commit_hit(&mut cache, 3);

            let (victim, freq) = cache.peek_victim().unwrap();
            assert_eq!(**victim, 1);
            assert_eq!(freq, 1);

            cache.put(Arc::new(4));
            assert!(cache.get(&1, &eq_probe).is_none());
            assert!(cache.get(&2, &eq_probe).is_some());
        }

        #[test]
        fn higher_frequency_wins_ambiguous_probe() {
            let mut cache = filled(3, &[1, 2, 3]);
            commit_hit(&mut cache, 2);
            commit_hit(&mut cache, 2);
            commit_hit(&mut cache, 3);

            // Everything matches; the most frequent rule is probed first.
            let any = |_rule: &u64, _contents: &u64| true;
            let hit = cache.get(&0, &any).unwrap();
            assert_eq!(*hit, 2);
        }

        #[test]
        fn stats_reflect_counters_and_occupancy() {
            let mut cache = filled(4, &[1, 2]);
            commit_hit(&mut cache, 1);
            cache.get(&9, &eq_probe);
            cache.record_miss();

            let stats = cache.stats();
            assert_eq!(stats.hits, 1);
            assert_eq!(stats.misses, 1);
            assert_eq!(stats.entries, 2);
            assert_eq!(stats.capacity, 4);
        }

        #[test]
        fn clear_resets_entries_and_counters() {
            let mut cache = filled(3, &[1, 2]);
            commit_hit(&mut cache, 1);
            cache.record_miss();

            cache.clear();

            assert!(cache.is_empty());
            assert_eq!(cache.hits(), 0);
            assert_eq!(cache.misses(), 0);
            assert!(cache.get(&1, &eq_probe).is_none());
            cache.check_invariants().unwrap();
        }
    }

    mod edge_cases {
        use super::*;

        #[test]
        fn zero_capacity_disables_cache() {
            let mut cache: LfuRuleCache<u64> = LfuRuleCache::new(0);

            cache.put(Arc::new(1));
            assert!(cache.is_empty());
            assert!(cache.get(&1, &eq_probe).is_none());
            cache.check_invariants().unwrap();
        }

        #[test]
        fn record_hit_without_probe_is_noop() {
            let mut cache = filled(2, &[1]);
            cache.record_hit();
            assert_eq!(cache.hits(), 0);
        }

        #[test]
        fn record_hit_commits_only_once() {
            let mut cache = filled(2, &[1]);
            cache.get(&1, &eq_probe).unwrap();
            cache.record_hit();
            cache.record_hit();
            assert_eq!(cache.hits(), 1);
        }

        #[test]
        fn put_discards_pending_hit() {
            let mut cache = filled(3, &[1, 2]);
            cache.get(&1, &eq_probe).unwrap();
            cache.put(Arc::new(3));
            cache.record_hit();
            assert_eq!(cache.hits(), 0);
        }

        #[test]
        fn evicted_rule_is_never_returned() {
            let mut cache = filled(2, &[1, 2]);
            commit_hit(&mut cache, 2);

            cache.put(Arc::new(3));

            // 1 was the victim; churn through further lookups.
            assert!(cache.get(&1, &eq_probe).is_none());
            assert!(cache.get(&2, &eq_probe).is_some());
            assert!(cache.get(&3, &eq_probe).is_some());
            cache.check_invariants().unwrap();
        }

        #[test]
        fn slot_reuse_after_eviction_stays_consistent() {
            let mut cache = filled(2, &[1, 2]);
            for next in 3..20u64 {
                commit_hit(&mut cache, next - 1);
                cache.put(Arc::new(next));
                cache.check_invariants().unwrap();
            }
            assert_eq!(cache.len(), 2);
        }

        #[test]
        fn duplicate_rules_consume_capacity() {
            let mut cache = filled(2, &[7, 7]);
            assert_eq!(cache.len(), 2);
            cache.put(Arc::new(7));
            assert_eq!(cache.len(), 2);
        }
    }
}
