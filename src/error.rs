//! Error types for the rulecache library.
//!
//! The operational API has no failure modes: a probe that finds nothing
//! returns `None`, a commit without a preceding hit is a guarded no-op, and a
//! zero-capacity cache is a documented disabled cache rather than an error.
//! The only error type here backs the debug-side `check_invariants` methods
//! on the caches and their data structures.
//!
//! ## Example Usage
//!
//! ```
//! use rulecache::policy::lfu::LfuRuleCache;
//!
//! let cache: LfuRuleCache<u64> = LfuRuleCache::new(8);
//! assert!(cache.check_invariants().is_ok());
//! ```

use std::fmt;

/// Error returned when internal cache invariants are violated.
///
/// Produced by `check_invariants` methods on cache types and the data
/// structures backing them. Carries a human-readable description of which
/// invariant failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantError(String);

impl InvariantError {
    /// Creates a new `InvariantError` with the given description.
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Returns the error description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InvariantError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for InvariantError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_shows_message() {
        let err = InvariantError::new("bucket chain broken at frequency 3");
        assert_eq!(err.to_string(), "bucket chain broken at frequency 3");
        assert_eq!(err.message(), "bucket chain broken at frequency 3");
    }

    #[test]
    fn implements_std_error() {
        let err = InvariantError::new("entry count mismatch");
        let as_dyn: &dyn std::error::Error = &err;
        assert_eq!(as_dyn.to_string(), "entry count mismatch");
    }
}
