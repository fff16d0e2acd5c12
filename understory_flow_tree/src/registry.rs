// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The block registry: canonical storage for blocks and their parent/child relations.

use alloc::collections::BTreeMap;
use alloc::vec::Vec;
use core::fmt;

use crate::types::{Block, BlockId};

/// Errors returned by structural registry operations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RegistryError {
    /// A block with this id is already registered.
    DuplicateId(BlockId),
    /// No block with this id is registered.
    UnknownId(BlockId),
    /// The block names a parent that is not registered.
    MissingParent {
        /// The rejected block.
        id: BlockId,
        /// The parent it named.
        parent: BlockId,
    },
    /// The registry already has a root.
    SecondRoot {
        /// The current root.
        existing: BlockId,
        /// The rejected block.
        rejected: BlockId,
    },
    /// The block still has children.
    HasChildren(BlockId),
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateId(id) => write!(f, "block {id} is already registered"),
            Self::UnknownId(id) => write!(f, "block {id} is not registered"),
            Self::MissingParent { id, parent } => {
                write!(f, "block {id} names unregistered parent {parent}")
            }
            Self::SecondRoot { existing, rejected } => {
                write!(f, "block {rejected} would be a second root next to {existing}")
            }
            Self::HasChildren(id) => write!(f, "block {id} still has children"),
        }
    }
}

impl core::error::Error for RegistryError {}

#[derive(Clone, Debug)]
pub(crate) struct Slot {
    pub(crate) block: Block,
    /// Insertion rank; defines iteration and sibling order.
    pub(crate) rank: u64,
}

/// Canonical set of blocks.
///
/// ## Invariants
///
/// After every public operation:
/// - ids are unique;
/// - at most one block is a root, and a non-empty registry has exactly one;
/// - every parent reference names a registered block, so following parents always reaches the root.
///
/// Blocks are admitted parent-first, which makes cycles unrepresentable.
///
/// ## Order
///
/// Every block carries an insertion rank. [`Registry::iter`] and [`Registry::children_of`]
/// yield blocks by ascending rank, which is the order attachment candidates are tested in
/// and the order siblings are laid out left to right.
#[derive(Clone)]
pub struct Registry {
    slots: BTreeMap<BlockId, Slot>,
    order: BTreeMap<u64, BlockId>,
    /// Children per parent, sorted by rank.
    children: BTreeMap<BlockId, Vec<BlockId>>,
    root: Option<BlockId>,
    next_rank: u64,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("len", &self.slots.len())
            .field("root", &self.root)
            .field("parents", &self.children.len())
            .field("next_rank", &self.next_rank)
            .finish_non_exhaustive()
    }
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            slots: BTreeMap::new(),
            order: BTreeMap::new(),
            children: BTreeMap::new(),
            root: None,
            next_rank: 0,
        }
    }

    /// Register `block` after every existing block.
    ///
    /// Fails without changing anything if the id is taken, the parent is unknown,
    /// or the block is a root while a root already exists.
    pub fn add(&mut self, block: Block) -> Result<(), RegistryError> {
        let rank = self.next_rank;
        self.insert_ranked(block, rank)?;
        self.next_rank += 1;
        Ok(())
    }

    /// Insert with an explicit rank. Ranks handed out by [`Registry::add`] are never reissued,
    /// so re-inserting a block with the rank it was taken out with restores its position.
    pub(crate) fn insert_ranked(&mut self, block: Block, rank: u64) -> Result<(), RegistryError> {
        let id = block.id;
        if self.slots.contains_key(&id) {
            return Err(RegistryError::DuplicateId(id));
        }
        match block.parent {
            None => {
                if let Some(existing) = self.root {
                    return Err(RegistryError::SecondRoot {
                        existing,
                        rejected: id,
                    });
                }
                self.root = Some(id);
            }
            Some(parent) => {
                if !self.slots.contains_key(&parent) {
                    return Err(RegistryError::MissingParent { id, parent });
                }
                self.link_parent(id, rank, parent);
            }
        }
        self.order.insert(rank, id);
        self.slots.insert(id, Slot { block, rank });
        self.next_rank = self.next_rank.max(rank + 1);
        Ok(())
    }

    /// Rank the next [`Registry::add`] would use.
    pub(crate) fn fresh_rank(&self) -> u64 {
        self.next_rank
    }

    fn link_parent(&mut self, id: BlockId, rank: u64, parent: BlockId) {
        let slots = &self.slots;
        let siblings = self.children.entry(parent).or_default();
        let at = siblings.partition_point(|s| slots.get(s).is_some_and(|slot| slot.rank < rank));
        siblings.insert(at, id);
    }

    fn unlink_parent(&mut self, id: BlockId, parent: BlockId) {
        if let Some(siblings) = self.children.get_mut(&parent) {
            siblings.retain(|c| *c != id);
            if siblings.is_empty() {
                self.children.remove(&parent);
            }
        }
    }

    /// Remove a block that has no children and return it.
    pub fn remove(&mut self, id: BlockId) -> Result<Block, RegistryError> {
        self.take(id).map(|slot| slot.block)
    }

    pub(crate) fn take(&mut self, id: BlockId) -> Result<Slot, RegistryError> {
        if !self.slots.contains_key(&id) {
            return Err(RegistryError::UnknownId(id));
        }
        if self.children.contains_key(&id) {
            return Err(RegistryError::HasChildren(id));
        }
        let slot = self
            .slots
            .remove(&id)
            .ok_or(RegistryError::UnknownId(id))?;
        self.order.remove(&slot.rank);
        match slot.block.parent {
            Some(parent) => self.unlink_parent(id, parent),
            None => self.root = None,
        }
        Ok(slot)
    }

    /// Look up a block.
    pub fn get(&self, id: BlockId) -> Option<&Block> {
        self.slots.get(&id).map(|s| &s.block)
    }

    pub(crate) fn block_mut(&mut self, id: BlockId) -> Option<&mut Block> {
        self.slots.get_mut(&id).map(|s| &mut s.block)
    }

    pub(crate) fn blocks_mut(&mut self) -> impl Iterator<Item = &mut Block> {
        self.slots.values_mut().map(|s| &mut s.block)
    }

    /// Whether a block with this id is registered.
    pub fn contains(&self, id: BlockId) -> bool {
        self.slots.contains_key(&id)
    }

    /// All blocks in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Block> + '_ {
        self.order
            .values()
            .filter_map(|id| self.slots.get(id).map(|s| &s.block))
    }

    /// Ids of the children of `parent`, in insertion order.
    pub fn child_ids(&self, parent: BlockId) -> &[BlockId] {
        self.children.get(&parent).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Children of `parent`, in insertion order.
    pub fn children_of(&self, parent: BlockId) -> impl Iterator<Item = &Block> + '_ {
        self.child_ids(parent).iter().filter_map(|id| self.get(*id))
    }

    /// Number of children of `parent`.
    pub fn child_count(&self, parent: BlockId) -> usize {
        self.child_ids(parent).len()
    }

    /// The root block's id, if any.
    pub fn root(&self) -> Option<BlockId> {
        self.root
    }

    /// Number of blocks.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the registry holds no blocks.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Largest registered id.
    pub fn max_id(&self) -> Option<BlockId> {
        self.slots.keys().next_back().copied()
    }

    /// Id for a newly created block: `0` when empty, otherwise one past the largest id.
    ///
    /// Saturates at `u32::MAX`; once that id is taken the returned id is already registered
    /// and [`Registry::add`] rejects it with [`RegistryError::DuplicateId`].
    pub fn next_id(&self) -> BlockId {
        self.max_id()
            .map_or(BlockId(0), |max| BlockId(max.0.saturating_add(1)))
    }

    /// Remove every block.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.order.clear();
        self.children.clear();
        self.root = None;
    }

    /// Ancestors of `id`, nearest first, ending at the root.
    ///
    /// Empty for the root or an unknown id.
    pub fn ancestors(&self, id: BlockId) -> Vec<BlockId> {
        let mut out = Vec::new();
        let mut cur = self.get(id).and_then(|b| b.parent);
        // Bounded walk; a well-formed registry reaches the root in fewer steps.
        while let Some(p) = cur {
            if out.len() >= self.slots.len() {
                break;
            }
            out.push(p);
            cur = self.get(p).and_then(|b| b.parent);
        }
        out
    }

    /// Path from the root to `id` (inclusive), or empty for an unknown id.
    pub fn path_to_root(&self, id: BlockId) -> Vec<BlockId> {
        if !self.contains(id) {
            return Vec::new();
        }
        let mut out = self.ancestors(id);
        out.reverse();
        out.push(id);
        out
    }
}
