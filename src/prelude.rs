//! Convenience re-exports for the common surface.
//!
//! ```
//! use rulecache::prelude::*;
//! use std::sync::Arc;
//!
//! let mut cache: LruRuleCache<u64> = LruRuleCache::new(8);
//! cache.put(Arc::new(7));
//! ```

pub use crate::builder::{EvictionPolicy, PolicyCache, RuleCacheBuilder};
pub use crate::ds::{FrequencyBuckets, IntrusiveList, SlotArena, SlotId};
pub use crate::error::InvariantError;
pub use crate::policy::lfu::LfuRuleCache;
pub use crate::policy::lru::{LruRuleCache, ScanDirection};
pub use crate::stats::CacheStats;
pub use crate::traits::{MatchProbe, RuleCache};
