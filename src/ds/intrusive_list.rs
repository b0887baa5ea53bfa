//! Intrusive doubly linked list backed by [`SlotArena`].
//!
//! Stores list nodes in a `SlotArena` and links them by [`SlotId`], giving
//! stable handles and O(1) reposition without value-equality scans. The LRU
//! policy keeps its recency sequence here: front is most recent, back is
//! least recent (the eviction victim).
//!
//! ```text
//!   arena (SlotArena<Node<T>>)
//!   ┌────────┬─────────────────────────────────────────────┐
//!   │ SlotId │ Node { value, prev, next }                  │
//!   ├────────┼─────────────────────────────────────────────┤
//!   │ id_1   │ { value: A, prev: None, next: Some(id_2) }  │
//!   │ id_2   │ { value: B, prev: Some(id_1), next: id_3 }  │
//!   │ id_3   │ { value: C, prev: Some(id_2), next: None }  │
//!   └────────┴─────────────────────────────────────────────┘
//!
//!   front ─► [id_1] ◄──► [id_2] ◄──► [id_3] ◄── back
//!   (most recent)                       (least recent)
//! ```
//!
//! Both traversal directions are exposed because the LRU scan order is
//! configurable: [`iter_entries`](IntrusiveList::iter_entries) walks
//! front-to-back, [`iter_entries_rev`](IntrusiveList::iter_entries_rev)
//! back-to-front.

use crate::ds::slot_arena::{SlotArena, SlotId};

#[derive(Debug)]
struct Node<T> {
    value: T,
    prev: Option<SlotId>,
    next: Option<SlotId>,
}

/// Arena-backed doubly linked list with handle-based repositioning.
#[derive(Debug)]
pub struct IntrusiveList<T> {
    arena: SlotArena<Node<T>>,
    front: Option<SlotId>,
    back: Option<SlotId>,
}

impl<T> IntrusiveList<T> {
    /// Creates an empty list.
    pub fn new() -> Self {
        Self {
            arena: SlotArena::new(),
            front: None,
            back: None,
        }
    }

    /// Creates an empty list with reserved node capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            arena: SlotArena::with_capacity(capacity),
            front: None,
            back: None,
        }
    }

    /// Number of nodes in the list.
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    /// Returns `true` if the list is empty.
    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Returns `true` if `id` is currently a node in this list.
    pub fn contains(&self, id: SlotId) -> bool {
        self.arena.contains(id)
    }

    /// Value at the front (most recent position).
    pub fn front(&self) -> Option<&T> {
        self.front
            .and_then(|id| self.arena.get(id).map(|node| &node.value))
    }

    /// Value at the back (least recent position).
    pub fn back(&self) -> Option<&T> {
        self.back
            .and_then(|id| self.arena.get(id).map(|node| &node.value))
    }

    /// Value for a node handle, if present.
    pub fn get(&self, id: SlotId) -> Option<&T> {
        self.arena.get(id).map(|node| &node.value)
    }

    /// Inserts a new node at the front and returns its handle.
    pub fn push_front(&mut self, value: T) -> SlotId {
        let id = self.arena.insert(Node {
            value,
            prev: None,
            next: self.front,
        });
        if let Some(front) = self.front {
            if let Some(node) = self.arena.get_mut(front) {
                node.prev = Some(id);
            }
        } else {
            self.back = Some(id);
        }
        self.front = Some(id);
        id
    }

    /// Removes and returns the back value.
    pub fn pop_back(&mut self) -> Option<T> {
        let id = self.back?;
        self.detach(id)?;
        self.arena.remove(id).map(|node| node.value)
    }

    /// Removes the node `id` from the list and returns its value.
    pub fn remove(&mut self, id: SlotId) -> Option<T> {
        self.detach(id)?;
        self.arena.remove(id).map(|node| node.value)
    }

    /// Moves an existing node to the front; returns `false` if `id` is
    /// not present.
    pub fn move_to_front(&mut self, id: SlotId) -> bool {
        if !self.arena.contains(id) {
            return false;
        }
        if Some(id) == self.front {
            return true;
        }
        self.detach(id);
        self.attach_front(id);
        true
    }

    /// Clears the list and frees all nodes.
    pub fn clear(&mut self) {
        self.arena.clear();
        self.front = None;
        self.back = None;
    }

    /// Iterates `(SlotId, &T)` from front (most recent) to back.
    pub fn iter_entries(&self) -> EntryIter<'_, T> {
        EntryIter {
            list: self,
            current: self.front,
            forward: true,
        }
    }

    /// Iterates `(SlotId, &T)` from back (least recent) to front.
    pub fn iter_entries_rev(&self) -> EntryIter<'_, T> {
        EntryIter {
            list: self,
            current: self.back,
            forward: false,
        }
    }

    fn detach(&mut self, id: SlotId) -> Option<()> {
        let (prev, next) = {
            let node = self.arena.get(id)?;
            (node.prev, node.next)
        };

        if let Some(prev_id) = prev {
            if let Some(prev_node) = self.arena.get_mut(prev_id) {
                prev_node.next = next;
            }
        } else {
            self.front = next;
        }

        if let Some(next_id) = next {
            if let Some(next_node) = self.arena.get_mut(next_id) {
                next_node.prev = prev;
            }
        } else {
            self.back = prev;
        }

        if let Some(node) = self.arena.get_mut(id) {
            node.prev = None;
            node.next = None;
        }

        Some(())
    }

    fn attach_front(&mut self, id: SlotId) {
        let old_front = self.front;
        if let Some(node) = self.arena.get_mut(id) {
            node.prev = None;
            node.next = old_front;
        } else {
            return;
        }
        if let Some(old_front) = old_front {
            if let Some(front_node) = self.arena.get_mut(old_front) {
                front_node.prev = Some(id);
            }
        } else {
            self.back = Some(id);
        }
        self.front = Some(id);
    }
}

impl<T> Default for IntrusiveList<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over `(SlotId, &T)` in either list direction.
#[derive(Debug)]
pub struct EntryIter<'a, T> {
    list: &'a IntrusiveList<T>,
    current: Option<SlotId>,
    forward: bool,
}

impl<'a, T> Iterator for EntryIter<'a, T> {
    type Item = (SlotId, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        let node = self.list.arena.get(id)?;
        self.current = if self.forward { node.next } else { node.prev };
        Some((id, &node.value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values<T: Copy>(list: &IntrusiveList<T>) -> Vec<T> {
        list.iter_entries().map(|(_, v)| *v).collect()
    }

    #[test]
    fn push_front_orders_most_recent_first() {
        let mut list = IntrusiveList::new();
        list.push_front(1);
        list.push_front(2);
        list.push_front(3);
        assert_eq!(values(&list), vec![3, 2, 1]);
        assert_eq!(list.front(), Some(&3));
        assert_eq!(list.back(), Some(&1));
    }

    #[test]
    fn reverse_iteration_mirrors_forward() {
        let mut list = IntrusiveList::new();
        list.push_front("a");
        list.push_front("b");
        list.push_front("c");

        let forward: Vec<&str> = list.iter_entries().map(|(_, v)| *v).collect();
        let mut backward: Vec<&str> = list.iter_entries_rev().map(|(_, v)| *v).collect();
        backward.reverse();
        assert_eq!(forward, backward);
    }

    #[test]
    fn pop_back_removes_least_recent() {
        let mut list = IntrusiveList::new();
        list.push_front(1);
        list.push_front(2);
        assert_eq!(list.pop_back(), Some(1));
        assert_eq!(list.pop_back(), Some(2));
        assert_eq!(list.pop_back(), None);
        assert!(list.is_empty());
    }

    #[test]
    fn move_to_front_repositions_by_handle() {
        let mut list = IntrusiveList::new();
        let a = list.push_front(1);
        let _b = list.push_front(2);
        let _c = list.push_front(3);

        assert!(list.move_to_front(a));
        assert_eq!(values(&list), vec![1, 3, 2]);

        // Moving the current front is a no-op.
        assert!(list.move_to_front(a));
        assert_eq!(values(&list), vec![1, 3, 2]);
    }

    #[test]
    fn move_to_front_on_stale_handle_is_refused() {
        let mut list = IntrusiveList::new();
        let a = list.push_front(1);
        list.remove(a);
        assert!(!list.move_to_front(a));
    }

    #[test]
    fn remove_middle_relinks_neighbors() {
        let mut list = IntrusiveList::new();
        let _a = list.push_front(1);
        let b = list.push_front(2);
        let _c = list.push_front(3);

        assert_eq!(list.remove(b), Some(2));
        assert_eq!(values(&list), vec![3, 1]);
        let rev: Vec<i32> = list.iter_entries_rev().map(|(_, v)| *v).collect();
        assert_eq!(rev, vec![1, 3]);
    }

    #[test]
    fn clear_empties_and_iterators_stop() {
        let mut list = IntrusiveList::with_capacity(4);
        list.push_front(1);
        list.push_front(2);
        list.clear();
        assert!(list.is_empty());
        assert_eq!(list.iter_entries().count(), 0);
        assert_eq!(list.iter_entries_rev().count(), 0);
    }
}
