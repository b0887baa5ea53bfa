//! rulecache: bounded match-probe caches for repeated rule lookups.
//!
//! A processing unit repeatedly asks "which rule currently matches my input
//! contents?" once per simulation step. Scanning the full rule registry every
//! step is expensive, so a small per-unit cache of previously matched rules is
//! probed first. Lookups follow a two-phase probe-then-commit protocol:
//! [`get`](traits::RuleCache::get) never mutates ranking state on its own, and
//! the caller commits the outcome afterwards with
//! [`record_hit`](traits::RuleCache::record_hit) /
//! [`record_miss`](traits::RuleCache::record_miss) (running its external
//! full-registry scan in between on a miss).
//!
//! Two eviction policies are provided: [`policy::lfu::LfuRuleCache`] and
//! [`policy::lru::LruRuleCache`] with a reversible scan order.

pub mod builder;
pub mod ds;
pub mod error;
pub mod policy;
pub mod prelude;
pub mod stats;
pub mod traits;
