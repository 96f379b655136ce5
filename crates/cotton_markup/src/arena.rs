//! Append-only node storage addressed by [`NodeId`].
//!
//! Tree edits never free a slot: a replaced subtree is only unlinked from its
//! parent, so every `NodeId` handed out stays valid while its document lives.

use std::ops::{Index, IndexMut};

/// Handle to a node inside one [`Document`](crate::Document).
///
/// IDs are only meaningful for the document that produced them.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct NodeId(u32);

impl NodeId {
    fn slot(self) -> usize {
        self.0 as usize
    }
}

/// Slots for the nodes of one document.
#[derive(Debug, Clone)]
pub(crate) struct Arena<T> {
    slots: Vec<T>,
}

impl<T> Arena<T> {
    pub(crate) fn new() -> Self {
        Self { slots: Vec::new() }
    }

    /// Stores `value` in a fresh slot.
    pub(crate) fn alloc(&mut self, value: T) -> NodeId {
        let id = NodeId(self.slots.len() as u32);
        self.slots.push(value);
        id
    }
}

impl<T> Index<NodeId> for Arena<T> {
    type Output = T;

    fn index(&self, id: NodeId) -> &T {
        &self.slots[id.slot()]
    }
}

impl<T> IndexMut<NodeId> for Arena<T> {
    fn index_mut(&mut self, id: NodeId) -> &mut T {
        &mut self.slots[id.slot()]
    }
}
