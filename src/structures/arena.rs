//! Index-based node storage for the linked list and the tree.
//!
//! A node is owned by exactly one arena slot. Links between nodes are plain
//! [`NodeId`] handles; freeing a slot is the single point where a node's
//! ownership ends.

/// Handle to a node slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone)]
pub struct Arena<T> {
    slots: Vec<Option<T>>,
    free: Vec<usize>,
    live: usize,
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            live: 0,
        }
    }
}

impl<T> Arena<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `value` and return its handle, reusing a freed slot when possible
    pub fn alloc(&mut self, value: T) -> NodeId {
        self.live += 1;
        match self.free.pop() {
            Some(idx) => {
                self.slots[idx] = Some(value);
                NodeId(idx)
            }
            None => {
                self.slots.push(Some(value));
                NodeId(self.slots.len() - 1)
            }
        }
    }

    /// Release a node. Returns its value, or None when the handle was already
    /// released.
    pub fn release(&mut self, id: NodeId) -> Option<T> {
        let value = self.slots.get_mut(id.0)?.take()?;
        self.free.push(id.0);
        self.live -= 1;
        Some(value)
    }

    pub fn get(&self, id: NodeId) -> Option<&T> {
        self.slots.get(id.0).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut T> {
        self.slots.get_mut(id.0).and_then(Option::as_mut)
    }

    /// Number of nodes currently allocated
    pub fn live(&self) -> usize {
        self.live
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_release_happens_once() {
        let mut arena = Arena::new();
        let a = arena.alloc(1);
        let b = arena.alloc(2);
        assert_eq!(arena.live(), 2);
        assert_eq!(arena.release(a), Some(1));
        assert_eq!(arena.release(a), None);
        assert_eq!(arena.live(), 1);
        assert_eq!(arena.get(b), Some(&2));
    }

    #[test]
    fn test_freed_slot_is_reused() {
        let mut arena = Arena::new();
        let a = arena.alloc("a");
        arena.release(a);
        let c = arena.alloc("c");
        assert_eq!(a.index(), c.index());
        assert_eq!(arena.get(c), Some(&"c"));
    }
}
