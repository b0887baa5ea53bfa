//! Stable-handle slab for cache entries.
//!
//! Values live in a `Vec` of slots and are addressed by [`SlotId`]. Freed
//! slots form a free list threaded through the vacant slots themselves, so
//! removal costs no side allocation and reuse is LIFO: the most recently
//! freed slot is filled first. Handles stay valid until their slot is freed;
//! a lookup through a stale handle returns `None` for a vacant slot, but a
//! handle whose slot has been reused will observe the new occupant, so the
//! owning layer must drop handles when it frees them.

/// Stable handle to a slot in a [`SlotArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotId(pub(crate) usize);

impl SlotId {
    /// Raw slot index, for diagnostics and deterministic test snapshots.
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug)]
enum Slot<T> {
    Occupied(T),
    Vacant { next_free: Option<usize> },
}

/// Fixed-purpose slab: insert returns a [`SlotId`], remove frees the slot
/// for reuse.
///
/// # Example
///
/// ```
/// use rulecache::ds::SlotArena;
///
/// let mut arena = SlotArena::new();
/// let a = arena.insert("a");
/// let b = arena.insert("b");
/// assert_eq!(arena.get(a), Some(&"a"));
///
/// arena.remove(a);
/// let c = arena.insert("c");
/// // The freed slot is recycled; the handle value is reused.
/// assert_eq!(c.index(), a.index());
/// assert_eq!(arena.get(b), Some(&"b"));
/// ```
#[derive(Debug)]
pub struct SlotArena<T> {
    slots: Vec<Slot<T>>,
    free_head: Option<usize>,
    len: usize,
}

impl<T> SlotArena<T> {
    /// Creates an empty arena.
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free_head: None,
            len: 0,
        }
    }

    /// Creates an empty arena with space reserved for `capacity` slots.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free_head: None,
            len: 0,
        }
    }

    /// Inserts a value, reusing the most recently freed slot when one is
    /// available.
    pub fn insert(&mut self, value: T) -> SlotId {
        self.len += 1;
        match self.free_head {
            Some(idx) => {
                let next_free = match self.slots[idx] {
                    Slot::Vacant { next_free } => next_free,
                    Slot::Occupied(_) => None,
                };
                self.free_head = next_free;
                self.slots[idx] = Slot::Occupied(value);
                SlotId(idx)
            },
            None => {
                self.slots.push(Slot::Occupied(value));
                SlotId(self.slots.len() - 1)
            },
        }
    }

    /// Removes and returns the value at `id`, threading the slot onto the
    /// free list.
    pub fn remove(&mut self, id: SlotId) -> Option<T> {
        match self.slots.get_mut(id.0) {
            Some(slot @ Slot::Occupied(_)) => {
                let freed = std::mem::replace(
                    slot,
                    Slot::Vacant {
                        next_free: self.free_head,
                    },
                );
                self.free_head = Some(id.0);
                self.len -= 1;
                match freed {
                    Slot::Occupied(value) => Some(value),
                    Slot::Vacant { .. } => None,
                }
            },
            _ => None,
        }
    }

    /// Returns the value at `id`, if the slot is live.
    pub fn get(&self, id: SlotId) -> Option<&T> {
        match self.slots.get(id.0) {
            Some(Slot::Occupied(value)) => Some(value),
            _ => None,
        }
    }

    /// Returns a mutable reference to the value at `id`, if the slot is live.
    pub fn get_mut(&mut self, id: SlotId) -> Option<&mut T> {
        match self.slots.get_mut(id.0) {
            Some(Slot::Occupied(value)) => Some(value),
            _ => None,
        }
    }

    /// Returns `true` if `id` refers to a live slot.
    pub fn contains(&self, id: SlotId) -> bool {
        matches!(self.slots.get(id.0), Some(Slot::Occupied(_)))
    }

    /// Number of live slots.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if no slots are live.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Frees all slots.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.free_head = None;
        self.len = 0;
    }

    /// Iterates live slots in index order.
    pub fn iter(&self) -> impl Iterator<Item = (SlotId, &T)> {
        self.slots.iter().enumerate().filter_map(|(idx, slot)| {
            match slot {
                Slot::Occupied(value) => Some((SlotId(idx), value)),
                Slot::Vacant { .. } => None,
            }
        })
    }
}
