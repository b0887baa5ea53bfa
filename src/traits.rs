//! # Cache Trait Seams
//!
//! This module defines the two seams of the cache subsystem: [`MatchProbe`],
//! the externally supplied predicate that decides whether a cached rule
//! matches the current contents, and [`RuleCache`], the probe-then-commit
//! interface both eviction policies implement.
//!
//! ## Probe-then-commit protocol
//!
//! ```text
//!   controller, once per simulation step
//!        │
//!        ▼
//!   cache.get(contents, probe) ──► Some(rule) ──► cache.record_hit()  (use rule)
//!        │
//!        └────────────────────► None ──► cache.record_miss()
//!                                            │
//!                                            ▼
//!                                   external full-registry scan
//!                                            │
//!                                   found ──► cache.put(rule)
//! ```
//!
//! `get` never reorders or re-ranks entries by itself; it only remembers the
//! matched entry. The split exists because the external full-registry scan on
//! a miss must happen *between* probe and commit, and because a caller may
//! probe without committing at all. Committing without a pending match is a
//! safe no-op.
//!
//! ## Why lookup is a linear probe
//!
//! The cache is keyed by nothing: whether a rule matches depends on mutable
//! external contents, so there is no hashable lookup key. `get` is a linear
//! probe bounded by the configured capacity, invoking the predicate once per
//! candidate in policy order (descending frequency for LFU, recency order per
//! [`ScanDirection`](crate::policy::lru::ScanDirection) for LRU).

use std::sync::Arc;

use crate::stats::CacheStats;

/// Pure predicate deciding whether a rule matches the current contents.
///
/// Supplied by the rule registry; must be side-effect free. The cache only
/// borrows `contents` for the duration of a single `get`.
///
/// Blanket-implemented for closures, so a plain `Fn(&R, &C) -> bool` works
/// anywhere a probe is expected:
///
/// ```
/// use rulecache::traits::MatchProbe;
///
/// let probe = |rule: &u64, contents: &u64| rule == contents;
/// assert!(probe.matches(&3, &3));
/// assert!(!probe.matches(&3, &4));
/// ```
pub trait MatchProbe<R, C: ?Sized> {
    /// Returns `true` if `rule`'s requirements hold against `contents`.
    fn matches(&self, rule: &R, contents: &C) -> bool;
}

impl<R, C: ?Sized, F> MatchProbe<R, C> for F
where
    F: Fn(&R, &C) -> bool,
{
    #[inline]
    fn matches(&self, rule: &R, contents: &C) -> bool {
        self(rule, contents)
    }
}

/// Probe-then-commit cache over opaque rules of type `R`.
///
/// Rules are stored as `Arc<R>` handles; `get` hands back a cloned handle so
/// the caller can keep the rule across the mandatory follow-up commit call
/// without borrowing the cache. The cache never inspects a rule beyond
/// passing `&R` to the probe; eviction bookkeeping is by stable handle, never
/// by value equality.
///
/// A capacity of `0` yields a disabled cache: `get` never matches and `put`
/// is a no-op. This is documented behavior, not an error.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use rulecache::policy::lfu::LfuRuleCache;
/// use rulecache::traits::RuleCache;
///
/// let mut cache: LfuRuleCache<u64> = LfuRuleCache::new(4);
/// let probe = |rule: &u64, contents: &u64| rule == contents;
///
/// // Miss path: probe, commit the miss, full scan happens externally, put.
/// assert!(cache.get(&7, &probe).is_none());
/// cache.record_miss();
/// cache.put(Arc::new(7));
///
/// // Hit path: probe, then commit the hit.
/// let rule = cache.get(&7, &probe).expect("cached rule matches");
/// assert_eq!(*rule, 7);
/// cache.record_hit();
///
/// assert_eq!(cache.stats().hits, 1);
/// assert_eq!(cache.stats().misses, 1);
/// ```
pub trait RuleCache<R> {
    /// Probes cached rules in policy order and returns the first match.
    ///
    /// Remembers the matched entry for the follow-up [`record_hit`]
    /// (any previously pending match is forgotten first). Returns `None`
    /// when nothing matches or the cache is empty/disabled.
    ///
    /// [`record_hit`]: Self::record_hit
    fn get<C, P>(&mut self, contents: &C, probe: &P) -> Option<Arc<R>>
    where
        C: ?Sized,
        P: MatchProbe<R, C>;

    /// Commits the pending probe match: promotes the entry per policy and
    /// bumps the hit counter. Safe no-op without a pending match.
    fn record_hit(&mut self);

    /// Commits a failed lookup by bumping the miss counter.
    fn record_miss(&mut self);

    /// Inserts a rule, evicting the policy's victim first when full.
    /// No-op on a disabled cache.
    fn put(&mut self, rule: Arc<R>);

    /// Current number of cached rules.
    fn len(&self) -> usize;

    /// Returns `true` if no rules are cached.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Configured capacity; `0` means disabled.
    fn capacity(&self) -> usize;

    /// Drops all cached rules and resets the hit/miss counters.
    /// Policy configuration (such as the LRU scan direction) is preserved.
    fn clear(&mut self);

    /// Read-only snapshot of the accounting counters.
    fn stats(&self) -> CacheStats;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closures_are_probes() {
        fn takes_probe<P: MatchProbe<u32, str>>(probe: &P) -> bool {
            probe.matches(&1, "one")
        }

        let by_name = |rule: &u32, contents: &str| *rule == 1 && contents == "one";
        assert!(takes_probe(&by_name));
    }

    #[test]
    fn probes_borrow_contents_only() {
        // A probe over an unsized contents view compiles and runs.
        let probe = |rule: &u8, contents: &[u8]| contents.contains(rule);
        assert!(probe.matches(&2, &[1, 2, 3][..]));
        assert!(!probe.matches(&9, &[1, 2, 3][..]));
    }
}
