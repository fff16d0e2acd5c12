// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Subtree extraction and reparenting.
//!
//! Rearranging a block moves it and all of its descendants out of the [`Registry`] into a
//! [`TempSet`]. While the set is out, the registry is a smaller but still valid tree, so
//! attachment tests and layout can run against it unchanged. On release the set is merged back:
//! under a new parent ([`Registry::graft`]), under its old parent ([`Registry::restore`]),
//! or as the new root ([`Registry::reroot`]). Dropping a `TempSet` discards its blocks.

use alloc::vec;
use alloc::vec::Vec;
use core::fmt;

use kurbo::{Point, Vec2};

use crate::registry::{Registry, RegistryError};
use crate::types::{Block, BlockId};

#[derive(Clone, Debug)]
struct Member {
    block: Block,
    rank: u64,
}

/// A block and its full descendant subtree, held outside the registry.
///
/// Members are stored breadth-first with the anchor (the dragged block) first, so parents
/// always precede their children. A `TempSet` is never empty.
#[derive(Clone, Debug)]
pub struct TempSet {
    previous_parent: Option<BlockId>,
    members: Vec<Member>,
}

impl TempSet {
    /// The dragged block's id.
    pub fn anchor(&self) -> BlockId {
        self.members[0].block.id
    }

    /// The dragged block.
    pub fn anchor_block(&self) -> &Block {
        &self.members[0].block
    }

    /// Parent the anchor had when it was extracted.
    pub fn previous_parent(&self) -> Option<BlockId> {
        self.previous_parent
    }

    /// Number of blocks held, anchor included.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Always `false`; present for symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Ids of held blocks, anchor first, breadth-first.
    pub fn ids(&self) -> impl Iterator<Item = BlockId> + '_ {
        self.members.iter().map(|m| m.block.id)
    }

    /// Held blocks, anchor first, breadth-first.
    pub fn blocks(&self) -> impl Iterator<Item = &Block> + '_ {
        self.members.iter().map(|m| &m.block)
    }

    /// Whether `id` is held.
    pub fn contains(&self, id: BlockId) -> bool {
        self.members.iter().any(|m| m.block.id == id)
    }

    /// Move every held block by `delta`.
    pub fn translate(&mut self, delta: Vec2) {
        for m in &mut self.members {
            m.block.center += delta;
        }
    }

    /// Move the anchor's center to `center`, carrying the subtree rigidly.
    pub fn move_anchor_to(&mut self, center: Point) {
        let delta = center - self.anchor_block().center;
        self.translate(delta);
    }

    /// Top-left of each non-anchor member relative to the anchor's top-left.
    ///
    /// A renderer that groups the members under the dragged block's element positions them
    /// at these offsets so the subtree follows the pointer as one piece.
    pub fn offsets(&self) -> impl Iterator<Item = (BlockId, Vec2)> + '_ {
        let origin = self.anchor_block().top_left();
        self.members
            .iter()
            .skip(1)
            .map(move |m| (m.block.id, m.block.top_left() - origin))
    }
}

/// A merge that could not be applied. The registry is unchanged and the set is handed back.
#[derive(Debug)]
pub struct MergeError {
    /// Why the merge was refused.
    pub reason: RegistryError,
    /// The set, exactly as it was passed in.
    pub temp: TempSet,
}

impl fmt::Display for MergeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "cannot merge subtree of {}: {}",
            self.temp.anchor(),
            self.reason
        )
    }
}

impl core::error::Error for MergeError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        Some(&self.reason)
    }
}

impl Registry {
    /// Move `id` and all of its descendants into a [`TempSet`].
    ///
    /// Descendants are discovered one layer at a time starting from `id`'s children, until a
    /// layer finds nothing new. Parent references inside the set are kept.
    pub fn extract_subtree(&mut self, id: BlockId) -> Result<TempSet, RegistryError> {
        let previous_parent = self.get(id).ok_or(RegistryError::UnknownId(id))?.parent;

        let mut order = vec![id];
        let mut layer = vec![id];
        while !layer.is_empty() {
            let mut next = Vec::new();
            for p in &layer {
                next.extend_from_slice(self.child_ids(*p));
            }
            order.extend_from_slice(&next);
            layer = next;
        }

        // Leaves first, so every block is childless when it is taken.
        let mut members = Vec::with_capacity(order.len());
        for member in order.iter().rev() {
            let slot = self.take(*member)?;
            members.push(Member {
                block: slot.block,
                rank: slot.rank,
            });
        }
        members.reverse();

        #[cfg(feature = "tracing")]
        tracing::debug!(anchor = id.0, len = members.len(), "extracted subtree");

        Ok(TempSet {
            previous_parent,
            members,
        })
    }

    /// Merge `temp` back with its anchor attached under `parent`.
    ///
    /// Members are appended after every registered block, so the anchor becomes `parent`'s last child.
    pub fn graft(&mut self, temp: TempSet, parent: BlockId) -> Result<(), MergeError> {
        self.merge(temp, Some(parent), false)
    }

    /// Merge `temp` back exactly where it was extracted from.
    ///
    /// Original insertion ranks are reused, so sibling order and iteration order are as before
    /// the extraction.
    pub fn restore(&mut self, temp: TempSet) -> Result<(), MergeError> {
        let parent = temp.previous_parent;
        self.merge(temp, parent, true)
    }

    /// Merge `temp` back with its anchor as the root. Fails unless the registry is empty.
    pub fn reroot(&mut self, temp: TempSet) -> Result<(), MergeError> {
        self.merge(temp, None, false)
    }

    fn merge(
        &mut self,
        mut temp: TempSet,
        parent: Option<BlockId>,
        keep_ranks: bool,
    ) -> Result<(), MergeError> {
        let clash = temp.ids().find(|id| self.contains(*id));
        if let Some(id) = clash {
            return Err(MergeError {
                reason: RegistryError::DuplicateId(id),
                temp,
            });
        }

        let detached = core::mem::replace(&mut temp.members[0].block.parent, parent);
        let mut failure = None;
        for (inserted, m) in temp.members.iter().enumerate() {
            let rank = if keep_ranks { m.rank } else { self.fresh_rank() };
            if let Err(reason) = self.insert_ranked(m.block.clone(), rank) {
                failure = Some((inserted, reason));
                break;
            }
        }
        if let Some((inserted, reason)) = failure {
            for done in temp.members[..inserted].iter().rev() {
                let _ = self.take(done.block.id);
            }
            temp.members[0].block.parent = detached;
            return Err(MergeError { reason, temp });
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(
            anchor = temp.anchor().0,
            parent = ?parent,
            len = temp.len(),
            "merged subtree"
        );

        Ok(())
    }
}
