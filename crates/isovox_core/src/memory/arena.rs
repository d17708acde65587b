//! # Slot Arena
//!
//! Index-addressed storage for node graphs with back references.
//!
//! Nodes refer to each other by [`NodeId`] instead of pointers, so a parent
//! link is just a copied index. Released slots go on a free list and are
//! reused by the next allocation.

/// Handle to a value stored in an [`Arena`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    /// Returns the raw slot index.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// A typed slot arena.
///
/// Cloning an arena clones every live value, producing a structurally
/// independent copy whose ids line up with the original.
///
/// # Example
///
/// ```rust
/// use isovox_core::memory::Arena;
///
/// let mut arena = Arena::new();
/// let a = arena.alloc("root");
/// let b = arena.alloc("child");
/// arena.release(b);
/// assert_eq!(arena.len(), 1);
/// assert_eq!(arena[a], "root");
/// ```
#[derive(Clone, Debug)]
pub struct Arena<T> {
    slots: Vec<Option<T>>,
    free: Vec<u32>,
    live: usize,
}

impl<T> Arena<T> {
    /// Creates an empty arena.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            live: 0,
        }
    }

    /// Creates an empty arena with room for `capacity` values.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
            live: 0,
        }
    }

    /// Stores `value` and returns its id.
    pub fn alloc(&mut self, value: T) -> NodeId {
        self.live += 1;
        if let Some(slot) = self.free.pop() {
            self.slots[slot as usize] = Some(value);
            return NodeId(slot);
        }
        self.slots.push(Some(value));
        NodeId(self.slots.len() as u32 - 1)
    }

    /// Removes and returns the value behind `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` was already released.
    pub fn release(&mut self, id: NodeId) -> T {
        let value = self.slots[id.index()]
            .take()
            .unwrap_or_else(|| panic!("arena slot {} released twice", id.0));
        self.free.push(id.0);
        self.live -= 1;
        value
    }

    /// Returns the value behind `id`, if it is live.
    #[inline]
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&T> {
        self.slots.get(id.index()).and_then(Option::as_ref)
    }

    /// Mutable variant of [`Arena::get`].
    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut T> {
        self.slots.get_mut(id.index()).and_then(Option::as_mut)
    }

    /// Number of live values.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.live
    }

    /// Returns true if nothing is live.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Number of slots ever allocated, live or free.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::ops::Index<NodeId> for Arena<T> {
    type Output = T;

    fn index(&self, id: NodeId) -> &T {
        self.get(id)
            .unwrap_or_else(|| panic!("arena slot {} is not live", id.0))
    }
}

impl<T> std::ops::IndexMut<NodeId> for Arena<T> {
    fn index_mut(&mut self, id: NodeId) -> &mut T {
        self.get_mut(id)
            .unwrap_or_else(|| panic!("arena slot {} is not live", id.0))
    }
}
