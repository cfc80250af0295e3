//! Node storage.
//!
//! [`NodeArena`] owns every value in the tree. Slots are handed out by
//! [`NodeArena::allocate`], filled by [`NodeArena::construct`], emptied by
//! [`NodeArena::destroy`] and returned by [`NodeArena::deallocate`]. The tree
//! links a node only after `construct` returns, so a failed allocation never
//! leaves a half-linked node behind.

use std::mem::ManuallyDrop;

use log::{debug, trace, warn};

use crate::error::TreeError;
use crate::types::{Color, RbNode, HEAD};
use crate::util::{first, last};

/// Construction-time settings of a tree.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TreeOptions {
    /// Number of node slots to reserve up front.
    pub capacity: usize,
    /// Maximum number of live nodes. Allocation beyond it fails with
    /// [`TreeError::AllocationFailure`].
    pub node_limit: Option<usize>,
}

impl TreeOptions {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            ..Self::default()
        }
    }

    pub fn with_node_limit(limit: usize) -> Self {
        Self {
            node_limit: Some(limit),
            ..Self::default()
        }
    }
}

/// Slot allocator backing a tree. Slot [`HEAD`] is always the sentinel.
#[derive(Debug)]
pub struct NodeArena<T> {
    nodes: Vec<RbNode<T>>,
    free: Vec<u32>,
    live: usize,
    limit: Option<usize>,
}

impl<T> NodeArena<T> {
    pub fn new(options: TreeOptions) -> Self {
        let mut nodes = Vec::with_capacity(options.capacity.saturating_add(1));
        nodes.push(RbNode::head());
        Self {
            nodes,
            free: Vec::new(),
            live: 0,
            limit: options.node_limit,
        }
    }

    #[inline]
    pub fn nodes(&self) -> &[RbNode<T>] {
        &self.nodes
    }

    #[inline]
    pub fn nodes_mut(&mut self) -> &mut [RbNode<T>] {
        &mut self.nodes
    }

    #[inline]
    pub fn node(&self, i: u32) -> &RbNode<T> {
        &self.nodes[i as usize]
    }

    #[inline]
    pub fn node_mut(&mut self, i: u32) -> &mut RbNode<T> {
        &mut self.nodes[i as usize]
    }

    /// Number of slots currently holding a value.
    pub fn live(&self) -> usize {
        self.live
    }

    /// Reserves one slot. The slot stays vacant until [`Self::construct`].
    pub fn allocate(&mut self) -> Result<u32, TreeError> {
        if self.limit.is_some_and(|limit| self.live >= limit) {
            warn!(
                "node limit reached ({} live, limit {:?})",
                self.live, self.limit
            );
            return Err(self.exhausted());
        }
        if let Some(slot) = self.free.pop() {
            return Ok(slot);
        }
        if self.nodes.len() > u32::MAX as usize {
            warn!("node index space exhausted");
            return Err(self.exhausted());
        }
        if self.nodes.len() == self.nodes.capacity() {
            trace!("growing node arena from {} slots", self.nodes.len());
            if self.nodes.try_reserve(1).is_err() {
                warn!("node arena reservation failed at {} slots", self.nodes.len());
                return Err(self.exhausted());
            }
        }
        let slot = self.nodes.len() as u32;
        self.nodes.push(RbNode::vacant(0));
        Ok(slot)
    }

    /// Like [`Self::allocate`], but the slot goes back to the free list if
    /// the returned [`Reservation`] is dropped without being filled.
    pub fn reserve(&mut self) -> Result<Reservation<'_, T>, TreeError> {
        let slot = self.allocate()?;
        Ok(Reservation { arena: self, slot })
    }

    /// Places `value` into a slot obtained from [`Self::allocate`], as a
    /// detached red node.
    pub fn construct(&mut self, slot: u32, value: T) {
        debug_assert_ne!(slot, HEAD, "cannot construct into the head sentinel");
        let node = &mut self.nodes[slot as usize];
        debug_assert!(node.v.is_none(), "slot {slot} is already occupied");
        node.p = None;
        node.l = None;
        node.r = None;
        node.c = Color::Red;
        node.v = Some(value);
        self.live += 1;
    }

    /// Moves the value out of an occupied slot. The slot must be unlinked.
    pub fn destroy(&mut self, slot: u32) -> Option<T> {
        let value = self.nodes[slot as usize].v.take();
        if value.is_some() {
            self.live -= 1;
        }
        value
    }

    /// Returns a destroyed slot to the free list and retires its generation.
    pub fn deallocate(&mut self, slot: u32) {
        debug_assert_ne!(slot, HEAD, "cannot deallocate the head sentinel");
        let node = &mut self.nodes[slot as usize];
        debug_assert!(node.v.is_none(), "slot {slot} still holds a value");
        *node = RbNode::vacant(node.g.wrapping_add(1));
        self.free.push(slot);
    }

    /// Drops every value and resets the sentinel. Slot storage is kept.
    pub fn clear(&mut self) {
        debug!("clearing node arena ({} live)", self.live);
        self.free.clear();
        for slot in (1..self.nodes.len()).rev() {
            let node = &mut self.nodes[slot];
            *node = RbNode::vacant(node.g.wrapping_add(1));
            self.free.push(slot as u32);
        }
        self.nodes[HEAD as usize] = RbNode::head();
        self.live = 0;
    }

    fn exhausted(&self) -> TreeError {
        TreeError::AllocationFailure {
            live: self.live,
            limit: self.limit,
        }
    }
}

/// A slot obtained from [`NodeArena::reserve`] that holds no value yet.
#[must_use]
pub struct Reservation<'a, T> {
    arena: &'a mut NodeArena<T>,
    slot: u32,
}

impl<T> Reservation<'_, T> {
    pub fn slot(&self) -> u32 {
        self.slot
    }

    /// Constructs `value` in the reserved slot and hands the slot over.
    pub fn fill(self, value: T) -> u32 {
        let mut this = ManuallyDrop::new(self);
        let slot = this.slot;
        this.arena.construct(slot, value);
        slot
    }
}

impl<T> Drop for Reservation<'_, T> {
    fn drop(&mut self) {
        trace!("releasing unfilled slot {}", self.slot);
        self.arena.deallocate(self.slot);
    }
}

impl<T: Clone> NodeArena<T> {
    /// Copies the linked tree into a fresh, compact arena. Shape and colors
    /// are preserved; slot numbers and generations are not.
    pub fn clone_tree(&self) -> Self {
        let mut out = Self::new(TreeOptions {
            capacity: self.live,
            node_limit: self.limit,
        });
        let Some(root) = self.nodes[HEAD as usize].p else {
            return out;
        };

        let mut stack = vec![(root, HEAD, true)];
        while let Some((src, dst_parent, left)) = stack.pop() {
            let node = &self.nodes[src as usize];
            let dst = out.nodes.len() as u32;
            out.nodes.push(RbNode {
                p: Some(dst_parent),
                l: None,
                r: None,
                c: node.c,
                g: 0,
                v: node.v.clone(),
            });
            out.live += 1;

            let parent = &mut out.nodes[dst_parent as usize];
            if dst_parent == HEAD {
                parent.p = Some(dst);
            } else if left {
                parent.l = Some(dst);
            } else {
                parent.r = Some(dst);
            }

            if let Some(r) = node.r {
                stack.push((r, dst, false));
            }
            if let Some(l) = node.l {
                stack.push((l, dst, true));
            }
        }

        let root = out.nodes[HEAD as usize].p;
        let min = first(&out.nodes, root);
        let max = last(&out.nodes, root);
        let head = &mut out.nodes[HEAD as usize];
        head.l = min;
        head.r = max;
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocate_reuses_freed_slots_with_new_generation() {
        let mut arena = NodeArena::<&str>::new(TreeOptions::default());
        let a = arena.allocate().unwrap();
        arena.construct(a, "a");
        assert_eq!(arena.live(), 1);
        assert_eq!(arena.node(a).g, 0);

        assert_eq!(arena.destroy(a), Some("a"));
        arena.deallocate(a);
        assert_eq!(arena.live(), 0);

        let b = arena.allocate().unwrap();
        assert_eq!(b, a);
        arena.construct(b, "b");
        assert_eq!(arena.node(b).g, 1);
        assert_eq!(arena.node(b).v, Some("b"));
    }

    #[test]
    fn node_limit_rejects_allocation() {
        let mut arena = NodeArena::<u8>::new(TreeOptions::with_node_limit(1));
        let a = arena.allocate().unwrap();
        arena.construct(a, 1);
        assert_eq!(
            arena.allocate(),
            Err(TreeError::AllocationFailure {
                live: 1,
                limit: Some(1)
            })
        );
    }

    #[test]
    fn dropped_reservation_returns_slot() {
        let mut arena = NodeArena::<u8>::new(TreeOptions::default());
        let reserved = arena.reserve().unwrap();
        let slot = reserved.slot();
        drop(reserved);
        assert_eq!(arena.live(), 0);

        let again = arena.reserve().unwrap();
        assert_eq!(again.slot(), slot);
        assert_eq!(again.fill(7), slot);
        assert_eq!(arena.live(), 1);
        assert_eq!(arena.node(slot).g, 1);
        assert_eq!(arena.nodes().len(), 2);
    }

    #[test]
    fn clear_keeps_storage_and_resets_head() {
        let mut arena = NodeArena::<u8>::new(TreeOptions::with_capacity(4));
        for v in 0..3 {
            let s = arena.allocate().unwrap();
            arena.construct(s, v);
        }
        arena.clear();
        assert_eq!(arena.live(), 0);
        assert_eq!(arena.nodes().len(), 4);
        assert_eq!(arena.node(HEAD).l, Some(HEAD));
        assert_eq!(arena.node(HEAD).r, Some(HEAD));
        assert_eq!(arena.allocate().unwrap(), 1);
    }
}
