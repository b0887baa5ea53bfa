//! Frequency buckets for O(1) LFU tracking over arena handles.
//!
//! Tracks how often each slot has been used and keeps the slots grouped by
//! frequency, so the least-frequently-used slot can be found in O(1) and the
//! whole population can be walked in descending frequency order. Ordering
//! within a frequency tier is FIFO: the slot that reached the tier first is
//! the first one visited and the first one evicted.
//!
//! ## Layout
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │  links: FxHashMap<SlotId, Link>        (per-slot freq + siblings)│
//! │  buckets: FxHashMap<u64, Bucket>       (frequency → linked list) │
//! │                                                                  │
//! │  min_freq = 1                     max_freq = 2                   │
//! │       │                                │                         │
//! │       ▼                                ▼                         │
//! │  freq=1: head ──► [id_2] ◄──► [id_1] ◄── tail  (tail = oldest)   │
//! │  freq=2: head ──► [id_0] ◄── tail                                │
//! │                                                                  │
//! │  Bucket chain: freq=1 ──next──► freq=2                           │
//! │                freq=1 ◄──prev── freq=2                           │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Operations
//!
//! | Operation         | Time | Notes                                   |
//! |-------------------|------|-----------------------------------------|
//! | `insert`          | O(1) | New slot starts at freq=1               |
//! | `promote`         | O(1) | Increment frequency, newest in new tier |
//! | `pop_min`         | O(1) | Evict LFU slot (FIFO tie-break)         |
//! | `frequency`       | O(1) | Query current frequency                 |
//! | `iter_descending` | O(n) | Highest tier first, oldest-first within |
//!
//! Slots are identified by [`SlotId`] handles minted by the layer that owns
//! the values. This module never looks at the values themselves.

use rustc_hash::FxHashMap;

use crate::ds::slot_arena::SlotId;
use crate::error::InvariantError;

/// Per-slot frequency record. `prev` points toward the bucket head (newer),
/// `next` toward the tail (older).
#[derive(Debug)]
struct Link {
    prev: Option<SlotId>,
    next: Option<SlotId>,
    freq: u64,
}

#[derive(Debug, Default)]
struct Bucket {
    head: Option<SlotId>,
    tail: Option<SlotId>,
    prev: Option<u64>,
    next: Option<u64>,
}

/// Default bucket pre-allocation. Frequencies cluster at the low end, so a
/// small bucket map covers the common case.
const BUCKET_PREALLOC: usize = 16;

/// O(1) LFU frequency tracker keyed by arena handles.
///
/// # Example
///
/// ```
/// use rulecache::ds::{FrequencyBuckets, SlotArena};
///
/// let mut arena = SlotArena::new();
/// let a = arena.insert("a");
/// let b = arena.insert("b");
///
/// let mut freq = FrequencyBuckets::new();
/// freq.insert(a);
/// freq.insert(b);
/// freq.promote(a);
///
/// assert_eq!(freq.frequency(a), Some(2));
/// assert_eq!(freq.pop_min(), Some((b, 1)));
/// ```
#[derive(Debug, Default)]
pub struct FrequencyBuckets {
    links: FxHashMap<SlotId, Link>,
    buckets: FxHashMap<u64, Bucket>,
    /// Lowest populated frequency, 0 when empty.
    min_freq: u64,
    /// Highest populated frequency, 0 when empty.
    max_freq: u64,
}

impl FrequencyBuckets {
    /// Creates an empty tracker.
    pub fn new() -> Self {
        Self {
            links: FxHashMap::default(),
            buckets: FxHashMap::default(),
            min_freq: 0,
            max_freq: 0,
        }
    }

    /// Creates an empty tracker with reserved capacity for slots.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            links: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            buckets: FxHashMap::with_capacity_and_hasher(BUCKET_PREALLOC, Default::default()),
            min_freq: 0,
            max_freq: 0,
        }
    }

    /// Returns the number of tracked slots.
    pub fn len(&self) -> usize {
        self.links.len()
    }

    /// Returns `true` if there are no tracked slots.
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Returns `true` if `id` is tracked.
    #[inline]
    pub fn contains(&self, id: SlotId) -> bool {
        self.links.contains_key(&id)
    }

    /// Returns the current frequency for `id`, if tracked.
    #[inline]
    pub fn frequency(&self, id: SlotId) -> Option<u64> {
        self.links.get(&id).map(|link| link.freq)
    }

    /// Returns the lowest populated frequency, or `None` when empty.
    pub fn min_freq(&self) -> Option<u64> {
        if self.min_freq == 0 {
            None
        } else {
            Some(self.min_freq)
        }
    }

    /// Peeks the eviction candidate `(id, freq)` without removing it.
    ///
    /// The candidate is the oldest slot in the lowest-frequency tier.
    pub fn peek_min(&self) -> Option<(SlotId, u64)> {
        if self.min_freq == 0 {
            return None;
        }
        let bucket = self.buckets.get(&self.min_freq)?;
        bucket.tail.map(|id| (id, self.min_freq))
    }

    /// Starts tracking `id` at frequency 1.
    ///
    /// Returns `false` if the slot is already tracked (no update performed).
    #[inline]
    pub fn insert(&mut self, id: SlotId) -> bool {
        if self.links.contains_key(&id) {
            return false;
        }

        self.links.insert(
            id,
            Link {
                prev: None,
                next: None,
                freq: 1,
            },
        );

        if !self.buckets.contains_key(&1) {
            let next = if self.min_freq == 0 {
                None
            } else {
                Some(self.min_freq)
            };
            self.insert_bucket(1, None, next);
        }
        self.list_push_front(1, id);

        self.min_freq = 1;
        if self.max_freq == 0 {
            self.max_freq = 1;
        }
        true
    }

    /// Increments the frequency for `id` and returns the new frequency.
    ///
    /// Returns `None` if the slot is untracked. The slot becomes the newest
    /// member of its new tier, so among equal frequencies it is evicted last.
    ///
    /// # Example
    ///
    /// ```
    /// use rulecache::ds::{FrequencyBuckets, SlotArena};
    ///
    /// let mut arena = SlotArena::new();
    /// let id = arena.insert(());
    ///
    /// let mut freq = FrequencyBuckets::new();
    /// freq.insert(id);
    /// assert_eq!(freq.promote(id), Some(2));
    /// assert_eq!(freq.promote(id), Some(3));
    /// ```
    #[inline]
    pub fn promote(&mut self, id: SlotId) -> Option<u64> {
        let current_freq = self.links.get(&id)?.freq;
        if current_freq == u64::MAX {
            // Saturated: refresh recency within the tier, keep the count.
            self.list_remove(current_freq, id)?;
            self.list_push_front(current_freq, id);
            return Some(current_freq);
        }
        let next_freq = current_freq + 1;

        let (prev_freq, next_existing) = {
            let bucket = self.buckets.get(&current_freq)?;
            (bucket.prev, bucket.next)
        };

        self.list_remove(current_freq, id)?;
        let bucket_empty = self.bucket_is_empty(current_freq);

        if bucket_empty {
            self.remove_bucket(current_freq, prev_freq, next_existing);
            if self.min_freq == current_freq {
                self.min_freq = next_existing.unwrap_or(0);
            }
        }

        if !self.buckets.contains_key(&next_freq) {
            let prev = if bucket_empty {
                prev_freq
            } else {
                Some(current_freq)
            };
            self.insert_bucket(next_freq, prev, next_existing);
        }

        if let Some(link) = self.links.get_mut(&id) {
            link.freq = next_freq;
        }
        self.list_push_front(next_freq, id);

        if self.min_freq == 0 || next_freq < self.min_freq {
            self.min_freq = next_freq;
        }
        if next_freq > self.max_freq {
            self.max_freq = next_freq;
        }

        Some(next_freq)
    }

    /// Removes and returns the eviction candidate `(id, freq)`.
    ///
    /// Candidates come from the lowest-frequency tier, oldest first.
    #[inline]
    pub fn pop_min(&mut self) -> Option<(SlotId, u64)> {
        let freq = self.min_freq;
        if freq == 0 {
            return None;
        }

        let id = self.buckets.get(&freq)?.tail?;
        self.list_remove(freq, id)?;
        let bucket_empty = self.bucket_is_empty(freq);
        let (prev, next) = {
            let bucket = self.buckets.get(&freq)?;
            (bucket.prev, bucket.next)
        };

        if bucket_empty {
            self.remove_bucket(freq, prev, next);
            self.min_freq = next.unwrap_or(0);
            if self.max_freq == freq {
                self.max_freq = prev.unwrap_or(0);
            }
        }

        self.links.remove(&id);
        Some((id, freq))
    }

    /// Clears all state.
    pub fn clear(&mut self) {
        self.links.clear();
        self.buckets.clear();
        self.min_freq = 0;
        self.max_freq = 0;
    }

    /// Walks all tracked slots in probe order: highest frequency tier first,
    /// oldest-first within a tier.
    ///
    /// # Example
    ///
    /// ```
    /// use rulecache::ds::{FrequencyBuckets, SlotArena};
    ///
    /// let mut arena = SlotArena::new();
    /// let a = arena.insert("a");
    /// let b = arena.insert("b");
    /// let c = arena.insert("c");
    ///
    /// let mut freq = FrequencyBuckets::new();
    /// freq.insert(a);
    /// freq.insert(b);
    /// freq.insert(c);
    /// freq.promote(b);
    ///
    /// let order: Vec<_> = freq.iter_descending().collect();
    /// assert_eq!(order, vec![b, a, c]);
    /// ```
    pub fn iter_descending(&self) -> DescendingIds<'_> {
        let start = if self.max_freq == 0 {
            None
        } else {
            self.buckets
                .get(&self.max_freq)
                .and_then(|bucket| bucket.tail)
                .map(|id| (self.max_freq, id))
        };
        DescendingIds {
            buckets: self,
            cursor: start,
        }
    }

    /// Validates the bucket chain and per-tier lists.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        if self.is_empty() {
            if !self.buckets.is_empty() {
                return Err(InvariantError::new("empty tracker holds buckets"));
            }
            if self.min_freq != 0 || self.max_freq != 0 {
                return Err(InvariantError::new("empty tracker has nonzero bounds"));
            }
            return Ok(());
        }

        if !self.buckets.contains_key(&self.min_freq) {
            return Err(InvariantError::new("min_freq bucket missing"));
        }
        if !self.buckets.contains_key(&self.max_freq) {
            return Err(InvariantError::new("max_freq bucket missing"));
        }

        let mut seen = 0usize;
        for (&freq, bucket) in &self.buckets {
            if bucket.head.is_none() || bucket.tail.is_none() {
                return Err(InvariantError::new("bucket exists but is empty"));
            }
            match bucket.prev {
                Some(prev) => {
                    if self.buckets.get(&prev).map(|b| b.next) != Some(Some(freq)) {
                        return Err(InvariantError::new("bucket chain prev/next mismatch"));
                    }
                },
                None => {
                    if freq != self.min_freq {
                        return Err(InvariantError::new("non-minimum bucket has no prev"));
                    }
                },
            }
            if bucket.next.is_none() && freq != self.max_freq {
                return Err(InvariantError::new("non-maximum bucket has no next"));
            }

            let mut current = bucket.head;
            let mut last = None;
            while let Some(id) = current {
                let link = self
                    .links
                    .get(&id)
                    .ok_or_else(|| InvariantError::new("bucket references untracked slot"))?;
                if link.freq != freq {
                    return Err(InvariantError::new("slot filed under wrong frequency"));
                }
                if link.prev != last {
                    return Err(InvariantError::new("tier list back-link broken"));
                }
                last = Some(id);
                current = link.next;
                seen += 1;
            }
            if bucket.tail != last {
                return Err(InvariantError::new("bucket tail does not terminate list"));
            }
        }

        if seen != self.links.len() {
            return Err(InvariantError::new("tier lists disagree with link count"));
        }
        Ok(())
    }

    fn bucket_is_empty(&self, freq: u64) -> bool {
        self.buckets
            .get(&freq)
            .map(|bucket| bucket.head.is_none())
            .unwrap_or(true)
    }

    fn insert_bucket(&mut self, freq: u64, prev: Option<u64>, next: Option<u64>) {
        self.buckets.insert(
            freq,
            Bucket {
                head: None,
                tail: None,
                prev,
                next,
            },
        );

        if let Some(prev) = prev {
            if let Some(prev_bucket) = self.buckets.get_mut(&prev) {
                prev_bucket.next = Some(freq);
            }
        }
        if let Some(next) = next {
            if let Some(next_bucket) = self.buckets.get_mut(&next) {
                next_bucket.prev = Some(freq);
            }
        }
    }

    fn remove_bucket(&mut self, freq: u64, prev: Option<u64>, next: Option<u64>) {
        if let Some(prev) = prev {
            if let Some(prev_bucket) = self.buckets.get_mut(&prev) {
                prev_bucket.next = next;
            }
        }
        if let Some(next) = next {
            if let Some(next_bucket) = self.buckets.get_mut(&next) {
                next_bucket.prev = prev;
            }
        }
        self.buckets.remove(&freq);
    }

    fn list_push_front(&mut self, freq: u64, id: SlotId) {
        let bucket = match self.buckets.get_mut(&freq) {
            Some(bucket) => bucket,
            None => return,
        };

        let old_head = bucket.head;
        if let Some(link) = self.links.get_mut(&id) {
            link.prev = None;
            link.next = old_head;
        }
        if let Some(old_head) = old_head {
            if let Some(link) = self.links.get_mut(&old_head) {
                link.prev = Some(id);
            }
        } else {
            bucket.tail = Some(id);
        }
        bucket.head = Some(id);
    }

    fn list_remove(&mut self, freq: u64, id: SlotId) -> Option<()> {
        let (prev, next) = {
            let link = self.links.get(&id)?;
            (link.prev, link.next)
        };

        let bucket = self.buckets.get_mut(&freq)?;
        if let Some(prev) = prev {
            if let Some(link) = self.links.get_mut(&prev) {
                link.next = next;
            }
        } else {
            bucket.head = next;
        }
        if let Some(next) = next {
            if let Some(link) = self.links.get_mut(&next) {
                link.prev = prev;
            }
        } else {
            bucket.tail = prev;
        }

        if let Some(link) = self.links.get_mut(&id) {
            link.prev = None;
            link.next = None;
        }

        Some(())
    }
}

/// Iterator over slot ids in descending-frequency, oldest-first order.
///
/// Walks each tier from tail toward head (oldest toward newest), then drops
/// to the next lower frequency tier.
#[derive(Debug)]
pub struct DescendingIds<'a> {
    buckets: &'a FrequencyBuckets,
    cursor: Option<(u64, SlotId)>,
}

impl<'a> Iterator for DescendingIds<'a> {
    type Item = SlotId;

    fn next(&mut self) -> Option<Self::Item> {
        let (freq, id) = self.cursor?;

        let link = self.buckets.links.get(&id)?;
        self.cursor = match link.prev {
            Some(newer) => Some((freq, newer)),
            None => {
                // Tier exhausted, fall to the next lower frequency.
                let bucket = self.buckets.buckets.get(&freq)?;
                match bucket.prev {
                    Some(lower) => self
                        .buckets
                        .buckets
                        .get(&lower)
                        .and_then(|b| b.tail)
                        .map(|tail| (lower, tail)),
                    None => None,
                }
            },
        };

        Some(id)
    }
}
