//! Hit/miss accounting shared by both cache policies.
//!
//! Every cache carries two monotonically increasing counters, bumped only by
//! the commit half of the probe-then-commit protocol (`record_hit` /
//! `record_miss`) and reset only by an explicit `clear`. [`CacheStats`] is the
//! read-only snapshot handed out for diagnostics and tooltips; it never feeds
//! back into cache behavior.

/// Point-in-time view of a cache's accounting counters.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use rulecache::policy::lru::LruRuleCache;
/// use rulecache::traits::RuleCache;
///
/// let mut cache: LruRuleCache<u64> = LruRuleCache::new(4);
/// cache.put(Arc::new(7));
/// cache.record_miss();
///
/// let stats = cache.stats();
/// assert_eq!(stats.hits, 0);
/// assert_eq!(stats.misses, 1);
/// assert_eq!(stats.entries, 1);
/// assert_eq!(stats.capacity, 4);
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    /// Committed hits (`record_hit` calls with a pending probe match).
    pub hits: u64,
    /// Committed misses (`record_miss` calls).
    pub misses: u64,
    /// Live entries at snapshot time.
    pub entries: usize,
    /// Configured capacity; `0` means the cache is disabled.
    pub capacity: usize,
}

impl CacheStats {
    /// Total committed lookups.
    pub fn lookups(&self) -> u64 {
        self.hits.saturating_add(self.misses)
    }

    /// Fraction of committed lookups that were hits, or `0.0` before the
    /// first committed lookup.
    pub fn hit_rate(&self) -> f64 {
        let lookups = self.lookups();
        if lookups == 0 {
            0.0
        } else {
            self.hits as f64 / lookups as f64
        }
    }
}
