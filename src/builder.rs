//! Unified builder for policy-selected rule caches.
//!
//! Lets a host pick the eviction policy from configuration without naming a
//! concrete cache type. The built [`PolicyCache`] dispatches every
//! [`RuleCache`] operation to the underlying policy.
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use rulecache::builder::{EvictionPolicy, RuleCacheBuilder};
//! use rulecache::traits::RuleCache;
//!
//! let mut cache = RuleCacheBuilder::new(16)
//!     .policy(EvictionPolicy::Lfu)
//!     .build::<u64>();
//!
//! cache.put(Arc::new(7));
//! let probe = |rule: &u64, contents: &u64| rule == contents;
//! assert!(cache.get(&7, &probe).is_some());
//! ```

use std::sync::Arc;

use crate::policy::lfu::LfuRuleCache;
use crate::policy::lru::{LruRuleCache, ScanDirection};
use crate::stats::CacheStats;
use crate::traits::{MatchProbe, RuleCache};

/// Available eviction policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvictionPolicy {
    /// Least Frequently Used eviction with frequency-ordered probing.
    Lfu,
    /// Least Recently Used eviction with a configurable scan direction.
    Lru { direction: ScanDirection },
}

impl Default for EvictionPolicy {
    fn default() -> Self {
        EvictionPolicy::Lru {
            direction: ScanDirection::default(),
        }
    }
}

/// Builder carrying capacity and policy choice.
#[derive(Debug, Clone, Copy)]
pub struct RuleCacheBuilder {
    capacity: usize,
    policy: EvictionPolicy,
}

impl RuleCacheBuilder {
    /// Starts a builder for a cache of at most `capacity` rules, defaulting
    /// to LRU with the default scan direction.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            policy: EvictionPolicy::default(),
        }
    }

    /// Selects the eviction policy.
    pub fn policy(mut self, policy: EvictionPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Builds the cache for rule type `R`.
    pub fn build<R>(self) -> PolicyCache<R> {
        let inner = match self.policy {
            EvictionPolicy::Lfu => PolicyInner::Lfu(LfuRuleCache::new(self.capacity)),
            EvictionPolicy::Lru { direction } => {
                PolicyInner::Lru(LruRuleCache::with_direction(self.capacity, direction))
            },
        };
        PolicyCache { inner }
    }
}

/// Policy-erased rule cache built by [`RuleCacheBuilder`].
#[derive(Debug)]
pub struct PolicyCache<R> {
    inner: PolicyInner<R>,
}

#[derive(Debug)]
enum PolicyInner<R> {
    Lfu(LfuRuleCache<R>),
    Lru(LruRuleCache<R>),
}

impl<R> PolicyCache<R> {
    /// Scan direction, if the policy is LRU.
    pub fn scan_direction(&self) -> Option<ScanDirection> {
        match &self.inner {
            PolicyInner::Lfu(_) => None,
            PolicyInner::Lru(lru) => Some(lru.scan_direction()),
        }
    }

    /// Sets the scan direction; returns `false` if the policy is not LRU.
    pub fn set_scan_direction(&mut self, direction: ScanDirection) -> bool {
        match &mut self.inner {
            PolicyInner::Lfu(_) => false,
            PolicyInner::Lru(lru) => {
                lru.set_scan_direction(direction);
                true
            },
        }
    }

    /// Flips the scan direction and returns the new value, if the policy
    /// is LRU.
    pub fn toggle_scan_direction(&mut self) -> Option<ScanDirection> {
        match &mut self.inner {
            PolicyInner::Lfu(_) => None,
            PolicyInner::Lru(lru) => Some(lru.toggle_scan_direction()),
        }
    }
}

impl<R> RuleCache<R> for PolicyCache<R> {
    fn get<C, P>(&mut self, contents: &C, probe: &P) -> Option<Arc<R>>
    where
        C: ?Sized,
        P: MatchProbe<R, C>,
    {
        match &mut self.inner {
            PolicyInner::Lfu(lfu) => lfu.get(contents, probe),
            PolicyInner::Lru(lru) => lru.get(contents, probe),
        }
    }

    fn record_hit(&mut self) {
        match &mut self.inner {
            PolicyInner::Lfu(lfu) => lfu.record_hit(),
            PolicyInner::Lru(lru) => lru.record_hit(),
        }
    }

    fn record_miss(&mut self) {
        match &mut self.inner {
            PolicyInner::Lfu(lfu) => lfu.record_miss(),
            PolicyInner::Lru(lru) => lru.record_miss(),
        }
    }

    fn put(&mut self, rule: Arc<R>) {
        match &mut self.inner {
            PolicyInner::Lfu(lfu) => lfu.put(rule),
            PolicyInner::Lru(lru) => lru.put(rule),
        }
    }

    fn len(&self) -> usize {
        match &self.inner {
            PolicyInner::Lfu(lfu) => lfu.len(),
            PolicyInner::Lru(lru) => lru.len(),
        }
    }

    fn capacity(&self) -> usize {
        match &self.inner {
            PolicyInner::Lfu(lfu) => lfu.capacity(),
            PolicyInner::Lru(lru) => lru.capacity(),
        }
    }

    fn clear(&mut self) {
        match &mut self.inner {
            PolicyInner::Lfu(lfu) => lfu.clear(),
            PolicyInner::Lru(lru) => lru.clear(),
        }
    }

    fn stats(&self) -> CacheStats {
        match &self.inner {
            PolicyInner::Lfu(lfu) => lfu.stats(),
            PolicyInner::Lru(lru) => lru.stats(),
        }
    }
}
