//! Eviction policies over probe-matched rules.
//!
//! - [`lfu`]: frequency-ordered probing with least-frequently-used eviction.
//! - [`lru`]: recency-ordered probing with a configurable scan direction and
//!   least-recently-used eviction.

pub mod lfu;
pub mod lru;

pub use lfu::LfuRuleCache;
pub use lru::{LruRuleCache, ScanDirection};
